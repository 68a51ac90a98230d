//! signaldesk - proxy and terminal dashboard for post-driven trade signals.

use clap::Parser;
use signaldesk::cli::{Cli, Commands};
use signaldesk::server::ProxyServer;
use signaldesk::{App, Config, Result};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| "signaldesk=info".into())
}

/// Log to stdout.
fn init_stdout_logging() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

/// Log to a daily file so the terminal stays free for the dashboard.
fn init_file_logging() -> Result<WorkerGuard> {
    let dir = signaldesk::config::log_dir()?;
    std::fs::create_dir_all(&dir)?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "signaldesk.log"));

    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer),
        )
        .init();
    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let mut config = Config::load(cli.config)?;

    match cli.command {
        Commands::Serve { bind } => {
            init_stdout_logging();
            if let Some(bind) = bind {
                config.server.bind_addr = bind;
            }
            info!(backend = %config.backend.base_url, "signaldesk proxy starting");

            let server = ProxyServer::from_config(&config)?;
            if let Err(e) = server.run().await {
                error!(error = %e, "proxy stopped");
                return Err(e);
            }
        }
        Commands::Dashboard { api_url } => {
            let _guard = init_file_logging()?;
            if let Some(api_url) = api_url {
                config.feed.api_url = api_url;
            }

            let mut app = App::new(config)?;
            let result = app.run();
            drop(app);
            if let Err(e) = &result {
                error!(error = %e, "dashboard stopped");
            }
            result?;
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}
