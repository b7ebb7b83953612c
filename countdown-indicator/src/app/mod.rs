pub mod edit;
pub mod presenter;

use countdown_core::SettingsStore;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::AppError;
use crate::notify::DesktopNotice;
use crate::platform::console::{
    ConsoleDialog, ConsoleIndicator, ConsoleInput, ConsoleMenu, OutputFormat,
};
use crate::platform::{Autostart, Surfaces};

pub use presenter::{Presenter, UPDATE_INTERVAL};

/// Terminal surfaces: frames on stdout, menu and dialog on stdin/stderr.
pub fn console_surfaces(output: OutputFormat, autostart: Box<dyn Autostart>) -> Surfaces {
    let input = ConsoleInput::stdin();
    Surfaces {
        indicator: Box::new(ConsoleIndicator::stdout(output)),
        menu: Box::new(ConsoleMenu::new(input.clone())),
        dialog: Box::new(ConsoleDialog::with_stderr(input)),
        notices: Box::new(DesktopNotice::new()),
        autostart,
    }
}

/// Loads the settings, forces the dialog when needed, then runs the
/// indicator until quit or a termination signal.
pub async fn run(store: SettingsStore, surfaces: Surfaces) -> Result<(), AppError> {
    let (settings, status) = store.load();
    info!(path=?store.path(), ?status, "loaded config");

    let shutdown = CancellationToken::new();
    let watcher = tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            shutdown_signal().await;
            info!("shutdown signal received; stopping indicator");
            shutdown.cancel();
        }
    });

    let mut presenter = Presenter::new(settings, store, surfaces);
    let confirmed = tokio::select! {
        biased;
        _ = shutdown.cancelled() => false,
        ok = presenter.confirm_initial(&status) => ok,
    };
    if !confirmed {
        info!("settings not confirmed; exiting");
        watcher.abort();
        return Ok(());
    }

    presenter.run(shutdown).await;
    watcher.abort();
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let (mut sigint, mut sigterm) =
            match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
                (Ok(i), Ok(t)) => (i, t),
                (Err(e), _) | (_, Err(e)) => {
                    warn!(error=%e, "failed to install signal handlers; use the quit command");
                    return std::future::pending().await;
                }
            };
        tokio::select! {
            _ = sigint.recv() => {
                info!("shutdown: received SIGINT");
            }
            _ = sigterm.recv() => {
                info!("shutdown: received SIGTERM");
            }
        }
    }
    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error=%e, "failed to listen for ctrl_c; use the quit command");
            return std::future::pending().await;
        }
        info!("shutdown: received ctrl_c");
    }
}
