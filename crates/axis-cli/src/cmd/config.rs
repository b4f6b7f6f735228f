use crate::output::{print_json, print_table};
use axis_core::config::{Config, WarnLevel};
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective configuration (secret redacted)
    Show,
    /// Validate the configuration and list warnings
    Check,
}

pub fn run(config_path: Option<&Path>, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    match subcmd {
        ConfigSubcommand::Show => show(config, json),
        ConfigSubcommand::Check => check(config, json),
    }
}

fn show(mut config: Config, json: bool) -> anyhow::Result<()> {
    if !config.backend.service_role_key.is_empty() {
        config.backend.service_role_key = "<redacted>".into();
    }
    if json {
        print_json(&config)
    } else {
        print!("{}", serde_yaml::to_string(&config)?);
        Ok(())
    }
}

fn check(config: Config, json: bool) -> anyhow::Result<()> {
    let warnings = config.validate();
    if json {
        print_json(&warnings)?;
    } else if warnings.is_empty() {
        println!("configuration ok");
    } else {
        print_table(
            &["level", "message"],
            warnings
                .iter()
                .map(|w| {
                    vec![
                        match w.level {
                            WarnLevel::Warning => "warning".to_string(),
                            WarnLevel::Error => "error".to_string(),
                        },
                        w.message.clone(),
                    ]
                })
                .collect(),
        );
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("configuration has errors");
    }
    Ok(())
}
