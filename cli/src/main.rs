//! `prompt-template` binary: render and preview prompt templates from the command line.
//!
//! Subcommands: `render`, `preview`, `functions`, `serve`.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use cli::input::{load_object, load_request, read_path, read_source};
use cli::output::{format_failure, format_functions};
use cli::{FunctionsFormat, LocalBackend, PreviewBackend, RemoteBackend};
use config::Settings;
use prompt_template::{PreviewRequest, PreviewResponse};

#[derive(Parser, Debug)]
#[command(name = "prompt-template")]
#[command(about = "Prompt templates: render, preview, list functions, serve")]
struct Args {
    #[command(subcommand)]
    cmd: Command,

    /// Use a running server instead of rendering in-process. Without a value, uses
    /// PROMPT_REMOTE_URL (default http://127.0.0.1:8090). An explicit URL is passed as --remote=URL
    #[arg(
        long,
        global = true,
        value_name = "URL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = ""
    )]
    remote: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one template and print the prompt
    Render(RenderArgs),
    /// Send a full preview request (JSON or YAML) and print the response envelope
    Preview(PreviewArgs),
    /// List the fn.* functions available in templates
    Functions(FunctionsArgs),
    /// Run the HTTP preview server
    Serve(ServeArgs),
}

#[derive(clap::Args, Debug)]
struct RenderArgs {
    /// Template text
    #[arg(long, value_name = "TEXT", conflicts_with = "template_file", required_unless_present = "template_file")]
    template: Option<String>,
    /// Read the template from a file
    #[arg(long, value_name = "PATH")]
    template_file: Option<PathBuf>,
    /// Input bindings: JSON/YAML text, @FILE, or - for stdin
    #[arg(long, value_name = "JSON|@FILE")]
    input: Option<String>,
    /// Context bindings: JSON/YAML text, @FILE, or - for stdin
    #[arg(long, value_name = "JSON|@FILE")]
    ctx: Option<String>,
    /// Value of `localPrompt` (also the template when --template is blank)
    #[arg(long, value_name = "TEXT")]
    local_prompt: Option<String>,
    /// Value of `operationType`
    #[arg(long, value_name = "TYPE")]
    operation_type: Option<String>,
    /// Fail on unresolved variables
    #[arg(long)]
    strict: bool,
    /// Print the response envelope as JSON instead of the prompt
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args, Debug)]
struct PreviewArgs {
    /// Request file (JSON or YAML), or - for stdin
    #[arg(long, value_name = "PATH|-")]
    request: String,
}

#[derive(clap::Args, Debug)]
struct FunctionsArgs {
    #[arg(long, value_enum, default_value_t = FunctionsFormat::Table)]
    format: FunctionsFormat,
}

#[derive(clap::Args, Debug)]
struct ServeArgs {
    /// Listen address (default PROMPT_SERVE_ADDR or 127.0.0.1:8090)
    #[arg(long, value_name = "ADDR")]
    addr: Option<SocketAddr>,
}

fn make_backend(
    remote: Option<&str>,
    settings: &Settings,
) -> Result<Arc<dyn PreviewBackend>, Box<dyn std::error::Error>> {
    let backend: Arc<dyn PreviewBackend> = match remote {
        None => Arc::new(LocalBackend::default()),
        Some("") => Arc::new(RemoteBackend::new(settings.remote_url.as_str())?),
        Some(url) => Arc::new(RemoteBackend::new(url)?),
    };
    Ok(backend)
}

fn build_request(args: &RenderArgs) -> Result<PreviewRequest, Box<dyn std::error::Error>> {
    let template = match (&args.template, &args.template_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => read_path(path)?,
        (None, None) => String::new(),
    };
    let input = args
        .input
        .as_deref()
        .map(|arg| load_object(arg, "--input"))
        .transpose()?;
    let ctx = args
        .ctx
        .as_deref()
        .map(|arg| load_object(arg, "--ctx"))
        .transpose()?;
    let local_prompt = args.local_prompt.as_deref().map(read_source).transpose()?;
    Ok(PreviewRequest {
        operation_type: args.operation_type.clone(),
        template,
        strict_render: args.strict,
        input,
        ctx,
        local_prompt,
    })
}

fn print_json(response: &PreviewResponse) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(())
}

async fn run(args: Args, settings: Settings) -> Result<bool, Box<dyn std::error::Error>> {
    if let Command::Serve(sa) = &args.cmd {
        let mut settings = settings;
        if let Some(addr) = sa.addr {
            settings.serve_addr = addr;
        }
        serve::run_serve(settings).await?;
        return Ok(true);
    }

    let backend = make_backend(args.remote.as_deref(), &settings)?;
    match &args.cmd {
        Command::Render(ra) => {
            let request = build_request(ra)?;
            let response = backend.preview(&request).await?;
            if ra.json {
                print_json(&response)?;
                return Ok(response.success);
            }
            match response.rendered_prompt.as_deref() {
                Some(prompt) if response.success => {
                    println!("{}", prompt);
                    Ok(true)
                }
                _ => {
                    eprintln!("{}", format_failure(&response));
                    Ok(false)
                }
            }
        }
        Command::Preview(pa) => {
            let request = load_request(&pa.request)?;
            let response = backend.preview(&request).await?;
            print_json(&response)?;
            Ok(response.success)
        }
        Command::Functions(fa) => {
            let docs = backend.functions().await?;
            print!("{}", format_functions(&docs, fa.format)?);
            if fa.format == FunctionsFormat::Json {
                println!();
            }
            Ok(true)
        }
        Command::Serve(_) => Ok(true),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_result = config::load_and_apply(config::APP_NAME, None);
    let args = Args::parse();

    let default_filter = if matches!(args.cmd, Command::Serve(_)) {
        "info"
    } else {
        "warn"
    };
    let log_guard = config::tracing_init::init_with_default("prompt-template", default_filter)
        .map_err(|e| e as Box<dyn std::error::Error>)?;
    if let Err(e) = config_result {
        tracing::warn!("config not applied: {}", e);
    }

    let settings = Settings::from_env();
    let outcome = run(args, settings).await;
    drop(log_guard);
    match outcome {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}
