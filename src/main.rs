use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use roster::config::Config;
use roster::db::PgBackend;
use roster::error::Result;
use roster::tui;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // A missing .env file is fine; the environment and defaults still apply.
    dotenvy::dotenv().ok();

    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&cfg) {
        eprintln!("Cannot open log file {}: {e}", cfg.log_file);
        std::process::exit(1);
    }

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        eprintln!("Fatal error: {e}");
        std::process::exit(1);
    }
}

/// The terminal belongs to the UI, so logs go to a file.
fn init_logging(cfg: &Config) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cfg.log_file)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run(cfg: Config) -> Result<()> {
    info!(
        host = %cfg.db_host,
        port = cfg.db_port,
        database = %cfg.db_name,
        user = %cfg.db_user,
        "starting roster manager"
    );
    let backend = PgBackend::new(cfg);
    tui::run(&backend).await?;
    info!("bye");
    Ok(())
}
