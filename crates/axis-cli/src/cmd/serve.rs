use axis_core::config::WarnLevel;
use std::path::Path;

pub fn run(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    let warnings = config.validate();
    let mut fatal = false;
    for warning in &warnings {
        match warning.level {
            WarnLevel::Warning => tracing::warn!("{}", warning.message),
            WarnLevel::Error => {
                tracing::error!("{}", warning.message);
                fatal = true;
            }
        }
    }
    if fatal {
        anyhow::bail!("configuration is invalid; run `axis config check`");
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(axis_server::serve(config))
}
