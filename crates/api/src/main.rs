use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use sparetrack_api::app::{build_app, ServiceKind};
use sparetrack_infra::Settings;

#[derive(Debug, Parser)]
#[command(name = "sparetrack", about = "Spare-parts inventory services")]
struct Cli {
    /// Which service this process runs.
    #[arg(long, value_enum)]
    service: ServiceKind,

    /// Settings file (TOML or YAML, picked by extension).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listen address; overrides `server.bind`.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("loading settings")?;
    if let Some(bind) = cli.bind {
        settings.server.bind = bind;
    }

    sparetrack_observability::init(&settings.log);

    let app = build_app(cli.service, &settings)
        .await
        .with_context(|| format!("starting the {} service", cli.service))?;

    let listener = tokio::net::TcpListener::bind(&settings.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", settings.server.bind))?;

    tracing::info!(service = %cli.service, addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
