//! Application startup: configuration, logging, storage and the shell loop

use core_config::tracing::{init_tracing, install_color_eyre};
use domain_tasks::{GeminiProvider, JsonFileTaskRepository, TaskService};
use eyre::{Result, WrapErr};
use std::sync::Arc;
use tokio::io::{self, BufReader};
use tracing::{info, warn};

use crate::config::Config;
use crate::shell::Shell;

/// Run the interactive task manager on stdin/stdout
///
/// # Errors
///
/// Returns an error if configuration is malformed or the terminal cannot be
/// read or written. Storage and suggestion failures are reported in the shell.
pub async fn run() -> Result<()> {
    install_color_eyre();

    let config = Config::from_env().wrap_err("Failed to load configuration")?;
    init_tracing(&config.environment);

    let repository = JsonFileTaskRepository::new(&config.storage);
    info!(path = %repository.path().display(), "Using task storage");

    let mut service = TaskService::load_default(repository).await;
    match config.gemini {
        Some(gemini) => {
            info!(model = %gemini.model, "Subtask suggestions enabled");
            service = service.with_suggester(Arc::new(GeminiProvider::new(gemini)));
        }
        None => warn!("No API key configured, subtask suggestions are disabled"),
    }

    Shell::new(service)
        .run(BufReader::new(io::stdin()), io::stdout())
        .await
        .wrap_err("Terminal I/O failed")
}
