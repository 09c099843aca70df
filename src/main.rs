use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use provider_registry::config::{self, Config};
use provider_registry::http::handlers::registry_router;
use provider_registry::http::types::Request;
use provider_registry::provider::refresh::{RefreshEvent, Refreshed, refresh_provider};

#[derive(Parser)]
#[command(name = "provider-registry")]
#[command(version, about = "Registry backend for provider packages")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Refresh the cached version listing for one provider
    Refresh {
        #[arg(long)]
        namespace: String,
        #[arg(long = "type")]
        provider_type: String,
    },
    /// Dispatch a request path and print the response as JSON
    Handle { path: String },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    std::fs::create_dir_all(config::data_dir())?;
    let file_appender = tracing_appender::rolling::never(config::data_dir(), config::LOG_FILE_NAME);
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(writer)
        .with_ansi(false)
        .init();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli.command))
}

async fn run(command: Command) -> anyhow::Result<()> {
    let config = Config::load()?;

    match command {
        Command::Refresh {
            namespace,
            provider_type,
        } => {
            let event = RefreshEvent::new(&namespace, &provider_type);
            let outcome = refresh_provider(
                config.store.as_ref(),
                config.upstream.as_ref(),
                &event,
                config.max_allowed_age,
            )
            .await?;

            match outcome {
                Refreshed::Stored => info!("Stored refreshed listing for {}/{}", namespace, provider_type),
                Refreshed::Fresh => info!("Listing for {}/{} is up to date", namespace, provider_type),
            }
        }
        Command::Handle { path } => {
            let router = registry_router(config.store.clone());
            let response = router.dispatch(&Request::get(&path)).await;
            println!("{}", serde_json::to_string(&response)?);
        }
    }

    Ok(())
}
