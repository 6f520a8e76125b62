mod deploy_commands;
mod env_commands;
mod scan_commands;

use std::path::PathBuf;

use {
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "switchboard", about = "Switchboard: messaging and remote-ops gateway")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gateway server.
    Gateway {
        /// Address to bind (defaults to the config value, `0.0.0.0`).
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (defaults to the config value, 5000).
        #[arg(long, env = "PORT")]
        port: Option<u16>,
        /// Only look for `switchboard.{toml,yaml,json}` in this directory.
        #[arg(long)]
        config_dir: Option<PathBuf>,
    },
    /// Interactively write an env file with provider credentials.
    SetupEnv {
        #[arg(long, default_value = ".env")]
        path: PathBuf,
        /// Overwrite an existing file without asking.
        #[arg(long, default_value_t = false)]
        force: bool,
        /// Add the production block used for hosted deployment.
        #[arg(long, default_value_t = false)]
        deploy: bool,
    },
    /// Print deployment steps and open the hosting dashboard.
    Deploy {
        #[arg(long, default_value = deploy_commands::DEFAULT_DASHBOARD_URL)]
        url: String,
        /// Print the steps only.
        #[arg(long, default_value_t = false)]
        no_browser: bool,
    },
    /// Scan a source tree for credentials before publishing it.
    Scan {
        #[arg(default_value = ".")]
        root: PathBuf,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "switchboard starting");

    match cli.command {
        Commands::Gateway {
            bind,
            port,
            config_dir,
        } => {
            if let Some(dir) = config_dir {
                switchboard_config::set_config_dir(dir);
            }
            let config = switchboard_config::discover_and_load();
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            let port = port.unwrap_or(config.server.port);
            switchboard_gateway::server::start_gateway(&bind, port, config).await
        },
        Commands::SetupEnv {
            path,
            force,
            deploy,
        } => env_commands::handle_setup_env(&path, force, deploy),
        Commands::Deploy { url, no_browser } => deploy_commands::handle_deploy(&url, !no_browser),
        Commands::Scan { root } => scan_commands::handle_scan(&root),
    }
}
