//! Output formatting for the CLI.

use prompt_template::{PreviewResponse, PromptFunctionDoc};

use crate::CliError;

/// Output format of `prompt-template functions`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum FunctionsFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

pub fn format_functions(
    docs: &[PromptFunctionDoc],
    format: FunctionsFormat,
) -> Result<String, CliError> {
    match format {
        FunctionsFormat::Json => {
            serde_json::to_string_pretty(docs).map_err(|e| CliError::Output(e.to_string()))
        }
        FunctionsFormat::Yaml => {
            serde_yaml::to_string(docs).map_err(|e| CliError::Output(e.to_string()))
        }
        FunctionsFormat::Table => Ok(table(docs)),
    }
}

fn table(docs: &[PromptFunctionDoc]) -> String {
    let name_w = docs
        .iter()
        .map(|d| d.name.chars().count())
        .fold("NAME".len(), usize::max);
    let sig_w = docs
        .iter()
        .map(|d| d.signature.chars().count())
        .fold("SIGNATURE".len(), usize::max);

    let mut out = format!("{:<name_w$}  {:<sig_w$}  DESCRIPTION\n", "NAME", "SIGNATURE");
    for d in docs {
        out.push_str(&format!(
            "{:<name_w$}  {:<sig_w$}  {}\n",
            d.name, d.signature, d.description
        ));
    }
    out
}

/// `error[TYPE] at `expr`: message` for a failed preview.
pub fn format_failure(response: &PreviewResponse) -> String {
    let error_type = response
        .error_type
        .map(|t| t.to_string())
        .unwrap_or_else(|| "UNKNOWN".to_string());
    format!(
        "error[{}] at `{}`: {}",
        error_type,
        response.error_expression.as_deref().unwrap_or(""),
        response.error_message.as_deref().unwrap_or("")
    )
}
