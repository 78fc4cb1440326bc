use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Service descriptor file names, in lookup order
pub const SERVICE_FILE_NAMES: [&str; 3] = ["serverless.yml", "serverless.yaml", "serverless.json"];

/// Returns the OpenWhisk CLI properties path: $WSK_CONFIG_FILE or ~/.wskprops
pub fn wskprops_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("WSK_CONFIG_FILE") {
        if !path.is_empty() {
            return Ok(expand_path(&path));
        }
    }
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".wskprops"))
}

/// Returns the tool settings path: ~/.config/wsklogs/config.toml
pub fn settings_path() -> Result<PathBuf> {
    let config = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config.join("wsklogs").join("config.toml"))
}

/// Returns the first service descriptor present in `dir`
pub fn find_service_file(dir: &Path) -> Option<PathBuf> {
    SERVICE_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Expands a leading `~` in a user-supplied path
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}
