mod cmd;
mod output;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(
    name = "axis",
    about = "Axis orchestration service — autonomy tick scheduler and workflow approval gateway",
    version,
    propagate_version = true
)]
struct Cli {
    /// Path to the YAML config file (environment overrides still apply)
    #[arg(long, global = true, env = "AXIS_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the orchestration server
    Serve,

    /// Invoke the autonomy tick on a running server
    Tick {
        /// Base URL of the running server
        #[arg(long, env = "AXIS_SERVER_URL", default_value = "http://127.0.0.1:8787")]
        server: String,

        /// Service credential sent as the bearer token
        #[arg(long, env = "AXIS_SERVICE_ROLE_KEY", hide_env_values = true)]
        token: String,

        /// Process exactly this company instead of scanning
        #[arg(long)]
        company_id: Option<Uuid>,

        /// Companies per tick (server clamps to [1,100])
        #[arg(long)]
        max_companies: Option<i64>,

        /// Role loop triggers per company (server clamps to [1,30])
        #[arg(long)]
        max_roles_per_company: Option<i64>,

        /// Auto-approvals per company (server clamps to [1,100])
        #[arg(long)]
        max_auto_approvals_per_company: Option<i64>,
    },

    /// Approve or reject a workflow request as a human reviewer
    Approve {
        request_id: Uuid,

        /// Reject instead of approve
        #[arg(long)]
        reject: bool,

        /// Review notes recorded on the request
        #[arg(long)]
        notes: Option<String>,

        /// Base URL of the running server
        #[arg(long, env = "AXIS_SERVER_URL", default_value = "http://127.0.0.1:8787")]
        server: String,

        /// Reviewer credential sent as the bearer token
        #[arg(long, env = "AXIS_SERVICE_ROLE_KEY", hide_env_values = true)]
        token: String,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let config_path = cli.config.as_deref();

    let result = match cli.command {
        Commands::Serve => cmd::serve::run(config_path),
        Commands::Tick {
            server,
            token,
            company_id,
            max_companies,
            max_roles_per_company,
            max_auto_approvals_per_company,
        } => cmd::tick::run(
            &server,
            &token,
            company_id,
            max_companies,
            max_roles_per_company,
            max_auto_approvals_per_company,
            cli.json,
        ),
        Commands::Approve {
            request_id,
            reject,
            notes,
            server,
            token,
        } => cmd::approve::run(&server, &token, request_id, reject, notes.as_deref(), cli.json),
        Commands::Config { subcommand } => cmd::config::run(config_path, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
