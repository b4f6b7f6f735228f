pub mod approve;
pub mod config;
pub mod serve;
pub mod tick;

use axis_core::config::Config;
use std::path::Path;

/// Resolve the effective config: explicit file, else `axis.yaml` in the
/// working directory, else environment only.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = explicit {
        return Ok(Config::load(path)?);
    }
    let default = Path::new("axis.yaml");
    if default.exists() {
        return Ok(Config::load(default)?);
    }
    Ok(Config::from_env()?)
}
