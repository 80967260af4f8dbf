use anyhow::Result;
use clap::Parser;
use iac_docgen::cli::{run, Cli};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // OPENAI_API_KEY and friends may come from a local .env file.
    dotenvy::dotenv().ok();

    // Logs go to stderr so the per-folder summary on stdout stays clean.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::info!("Documentation CLI started");
    let result = run(cli).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "Documentation CLI exited with error");
    }
    result
}
