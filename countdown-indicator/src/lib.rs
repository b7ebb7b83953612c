use std::path::{Path, PathBuf};

use countdown_core::{LoadStatus, SettingsStore, StoreError, countdown};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

pub mod app;
pub mod cli;
pub mod config;
pub mod icons;
pub mod notify;
pub mod platform;

pub use cli::{Cli, Command};

use platform::autostart::{DesktopEntryAutostart, LaunchTarget, ScriptAutostart};
use platform::console::{ConsoleDialog, ConsoleIndicator, ConsoleInput, OutputFormat};
use platform::{Autostart, IndicatorSurface};

const LOG_FILE_PREFIX: &str = "indicator-countdown.log";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings store error: {0}")]
    Store(#[from] StoreError),
    #[error("autostart error: {0}")]
    Autostart(String),
    #[error("template error: {0}")]
    Template(String),
}

/// Logs go to stderr (stdout carries indicator frames) or, with a log
/// directory, to a daily-rotated file. Keep the guard alive until exit.
fn init_tracing(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>, AppError> {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact();
    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(AppError::Io)?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            builder.with_ansi(false).with_writer(writer).init();
            Ok(Some(guard))
        }
        None => {
            builder.with_writer(std::io::stderr).init();
            Ok(None)
        }
    }
}

pub async fn run(cli: Cli) -> Result<(), AppError> {
    let _log_guard = init_tracing(cli.log_dir.as_deref())?;

    let cfg_path = config::resolve_config_path(cli.config.clone())?;
    let icon_dir = config::resolve_icon_dir(cli.icon_dir.clone())?;
    match icons::install_bundled(&icon_dir) {
        Ok(0) => {}
        Ok(n) => info!(dir=?icon_dir, count = n, "installed bundled icons"),
        Err(e) => warn!(error=%e, dir=?icon_dir, "could not install bundled icons"),
    }
    let store = SettingsStore::new(&cfg_path, &icon_dir);

    match &cli.command {
        Some(Command::Once) => print_once(&store, cli.output),
        Some(Command::Configure) => {
            let autostart = build_autostart(&cli, &cfg_path, &icon_dir)?;
            configure(store, autostart.as_ref()).await
        }
        None => {
            let autostart = build_autostart(&cli, &cfg_path, &icon_dir)?;
            let surfaces = app::console_surfaces(cli.output, autostart);
            app::run(store, surfaces).await
        }
    }
}

fn build_autostart(
    cli: &Cli,
    cfg_path: &Path,
    icon_dir: &Path,
) -> Result<Box<dyn Autostart>, AppError> {
    if let (Some(enable), Some(disable)) =
        (&cli.autostart_enable_script, &cli.autostart_disable_script)
    {
        return Ok(Box::new(ScriptAutostart::new(enable, disable)));
    }
    let dir = config::autostart_dir()
        .ok_or_else(|| AppError::Config("could not determine autostart dir".into()))?;
    let launch = LaunchTarget {
        binary_path: std::env::current_exe().map_err(AppError::Io)?,
        config_path: absolute(cfg_path),
        icon_dir: absolute(icon_dir),
        icon_path: absolute(&icon_dir.join(countdown_core::settings::DEFAULT_ICON_NORMAL)),
    };
    Ok(Box::new(DesktopEntryAutostart::new(dir, launch)))
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn print_once(store: &SettingsStore, output: OutputFormat) -> Result<(), AppError> {
    let (settings, status) = store.load();
    match status {
        LoadStatus::Loaded => {}
        LoadStatus::FirstRun => {
            return Err(AppError::Config(format!(
                "no config at {}; run `indicator-countdown configure` first",
                store.path().display()
            )));
        }
        LoadStatus::ReadError(reason) => return Err(AppError::Config(reason)),
    }
    let mut indicator = ConsoleIndicator::stdout(output);
    indicator.set_icons(
        &store.icon_path(&settings.icon_normal),
        &store.icon_path(&settings.icon_attention),
    );
    indicator.set_menu_title(&settings.menu_title());
    indicator.show(&countdown::frame(&settings, store.now()));
    Ok(())
}

async fn configure(store: SettingsStore, autostart: &dyn Autostart) -> Result<(), AppError> {
    let (mut settings, status) = store.load();
    if let LoadStatus::ReadError(reason) = &status {
        warn!(%reason, "existing config unusable; editing defaults");
    }
    let mut dialog = ConsoleDialog::with_stderr(ConsoleInput::stdin());
    let notices = notify::DesktopNotice::new();
    if app::edit::edit_settings(&mut settings, &store, &mut dialog, &notices, autostart).await {
        info!(path=?store.path(), "settings saved");
    } else {
        info!("settings unchanged");
    }
    Ok(())
}
