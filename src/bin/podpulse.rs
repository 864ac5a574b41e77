use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use podpulse::Settings;

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let settings = Settings::parse();

    let filter = EnvFilter::try_new(&settings.log_level)
        .with_context(|| format!("invalid log level: {}", settings.log_level))?;
    fmt().with_env_filter(filter).with_target(true).init();

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    rt.block_on(podpulse::app::run(settings))
}
