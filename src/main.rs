// SocLookup - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading (platform config dir or --config)
// 3. Logging initialisation (debug mode support)
// 4. Store, catalog and history construction
// 5. Command dispatch

mod cli;

// Re-export modules from the library crate so that `cli.rs` can still use
// `crate::app::...`, `crate::core::...` etc.
pub use soclookup::app;
pub use soclookup::core;
pub use soclookup::platform;
pub use soclookup::util;

use clap::Parser;
use std::sync::Arc;

fn main() {
    let cli = cli::Cli::parse();

    // Resolve platform paths and load config before logging so the
    // configured level and file take effect. Events emitted before `init`
    // are discarded; config warnings are replayed below.
    let platform_paths = platform::config::PlatformPaths::resolve();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| platform_paths.config_file());
    let (config, config_warnings) = platform::config::load_config(&config_path);

    util::logging::init(
        cli.debug,
        config.log_level.as_deref(),
        config.log_file.as_deref(),
    );

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "SocLookup starting"
    );

    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
        eprintln!("Warning: {warning}");
    }

    // Data directory: CLI override > platform default
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| platform_paths.data_dir.clone());
    tracing::debug!(data_dir = %data_dir.display(), "Using data directory");

    let store: Arc<dyn core::store::KeyValueStore> =
        Arc::new(platform::store::FileStore::new(data_dir));

    let opener: Arc<dyn core::dispatch::UrlOpener> = if cli.command.opens_browser() {
        Arc::new(platform::browser::SystemBrowser::new(
            config.browser_command.clone(),
        ))
    } else {
        Arc::new(platform::browser::DryRun)
    };

    let mut state = app::state::AppState::new(store, opener, config);

    if let Err(e) = cli::run(cli.command, &mut state) {
        tracing::error!(error = %e, "Command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
