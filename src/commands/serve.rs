use crate::config::Config;
use crate::error::Result;
use crate::server;
use colored::Colorize;

/// Run the coaching API server until interrupted
pub async fn run_serve(config: Config) -> Result<()> {
    println!(
        "{} {}",
        "शिक्षक साथी - Shikshak Saathi".bold(),
        format!("http://{}:{}", config.server.host, config.server.port).cyan()
    );
    server::serve(&config).await
}
