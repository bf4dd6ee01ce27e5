use clap::Parser;
use parcel_notify::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = cli::load_config(&cli).map_err(|e| {
        eprintln!("Configuration error: {}", e);
        e
    })?;
    cli::init_logger_from_settings(&settings, &cli).map_err(|e| {
        eprintln!("Logger initialization error: {}", e);
        e
    })?;

    tracing::debug!(
        version = parcel_notify::pkg_version(),
        environment = ?cli.env,
        "parcel-notify starting"
    );

    cli::execute_command(&cli, settings).await?;
    Ok(())
}
