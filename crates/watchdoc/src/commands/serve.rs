//! Serve-and-watch command.
//!
//! Orchestrates the server lifecycle:
//! - resolve the served root and watch targets
//! - start the watcher and the debounce loop
//! - bind and run the HTTP server
//! - open the browser
//! - stop on Ctrl+C

use crate::cli::Cli;
use crate::config::WatchdocConfig;
use crate::dev::{
    targets, DebounceDispatcher, DevServer, DevServerState, FileWatcher, LiveReloadTarget,
    WatchLoop,
};
use crate::error::{CliError, Result};
use crate::ui;
use std::sync::Arc;
use tokio::signal;

/// Execute the serve command.
///
/// # Errors
///
/// Returns errors for:
/// - Invalid configuration
/// - A served directory that does not exist
/// - A watcher that cannot be created
/// - An address that cannot be bound
pub async fn execute(cli: Cli) -> Result<()> {
    let config = WatchdocConfig::load(&cli)?;
    let served_root = config.served_root()?;
    let addr = config.addr()?;

    let targets = targets::resolve(&config.watch_dirs, &served_root);
    let state = Arc::new(DevServerState::new(served_root.clone()));

    // Initial walk is blocking I/O
    let roots = targets.targets();
    let (watcher, stream) = tokio::task::spawn_blocking(move || FileWatcher::new(&roots))
        .await
        .map_err(|e| CliError::Watch(notify::Error::generic(&e.to_string())))??;
    tracing::debug!("Watching {} directories", watcher.watched());

    let dispatcher = DebounceDispatcher::new(
        served_root.clone(),
        targets.sources().to_vec(),
        config.command().map(str::to_string),
    );
    let target = Arc::new(LiveReloadTarget::new(state.broadcaster()));
    let watch_handle = tokio::spawn(
        WatchLoop::new(dispatcher, target)
            .with_watcher(watcher)
            .run(stream),
    );

    let server = DevServer::new(addr, state.clone());
    let listener = server.bind().await?;
    let mut server_handle = tokio::spawn(async move {
        if let Err(e) = server.serve(listener).await {
            ui::error(&format!("Server error: {}", e));
        }
    });

    ui::banner(&config, &targets);

    if !config.no_browser {
        open_browser(&config.server_url());
    }

    ui::info("Press Ctrl+C to stop");

    tokio::select! {
        _ = signal::ctrl_c() => {
            ui::info("Shutting down development server...");
        }
        _ = &mut server_handle => {
            ui::warning("Server task completed unexpectedly");
        }
    }

    server_handle.abort();
    watch_handle.abort();

    ui::success("Development server stopped");
    Ok(())
}

/// Open the server URL in the default browser.
///
/// Uses platform-specific commands:
/// - macOS: `open`
/// - Windows: `start`
/// - Linux: `xdg-open`
fn open_browser(url: &str) {
    use std::process::{Command, Stdio};

    let mut command = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start"]);
        cmd
    } else {
        Command::new("xdg-open")
    };

    let result = command
        .arg(url)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();

    match result {
        Ok(_) => tracing::debug!("Opened browser at {}", url),
        Err(e) => ui::warning(&format!("Failed to open browser: {}", e)),
    }
}
