mod app;
mod cli;
mod config;
mod dispatcher;
mod event;
mod focus;
mod keymap;
mod loader;
mod logging;
mod panes;
mod storage;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::App;
use cli::CommandLineArgs;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CommandLineArgs::parse();
    let config = config::load_config(args.config()).context("loading configuration")?;
    let _log_guard = logging::setup_logging(&config)?;

    tracing::debug!(
        data_dir = %config.data_dir.display(),
        color_scheme = %config.color_scheme,
        "configuration loaded"
    );

    let mut app = App::new(&config)?;
    let result = app.run().await;
    if let Err(ref e) = result {
        tracing::error!(error = %e, "exited with error");
    }
    result
}
