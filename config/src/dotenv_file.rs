//! Read a project `.env` file into a key-value map without touching the process environment.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// `.env` in `override_dir` if given, else in the current directory; `None` if absent.
fn dotenv_path(override_dir: Option<&Path>) -> Option<PathBuf> {
    let dir = override_dir
        .map(Path::to_path_buf)
        .or_else(|| std::env::current_dir().ok())?;
    let path = dir.join(".env");
    path.is_file().then_some(path)
}

/// Loads `.env` into a map. A missing file yields an empty map.
///
/// Parsing (quotes, escapes, `export` prefixes, comments) is done by the `dotenv` crate;
/// its variable substitution sees the process environment at call time.
pub fn load_env_map(override_dir: Option<&Path>) -> Result<HashMap<String, String>, dotenv::Error> {
    let Some(path) = dotenv_path(override_dir) else {
        return Ok(HashMap::new());
    };
    tracing::debug!(path = %path.display(), "reading .env");
    dotenv::from_path_iter(&path)?.collect()
}
