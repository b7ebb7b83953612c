use std::path::PathBuf;

use directories::{BaseDirs, ProjectDirs};

use crate::AppError;

pub const ENV_CONFIG: &str = "COUNTDOWN_CONFIG";
pub const ENV_ICON_DIR: &str = "COUNTDOWN_ICON_DIR";

const APP_DIR: &str = "jh-indicator-countdown";
const CONFIG_FILE: &str = "indicator-countdown.config";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_DIR)
}

pub fn resolve_config_path(cli_value: Option<PathBuf>) -> Result<PathBuf, AppError> {
    if let Some(p) = cli_value {
        return Ok(p);
    }
    if let Ok(p) = std::env::var(ENV_CONFIG) {
        return Ok(PathBuf::from(p));
    }
    default_config_path().ok_or_else(|| AppError::Config("could not determine config dir".into()))
}

pub fn resolve_icon_dir(cli_value: Option<PathBuf>) -> Result<PathBuf, AppError> {
    if let Some(p) = cli_value {
        return Ok(p);
    }
    if let Ok(p) = std::env::var(ENV_ICON_DIR) {
        return Ok(PathBuf::from(p));
    }
    default_icon_dir().ok_or_else(|| AppError::Config("could not determine data dir".into()))
}

/// `~/.config/jh-indicator-countdown/indicator-countdown.config` on Linux.
pub fn default_config_path() -> Option<PathBuf> {
    Some(project_dirs()?.config_dir().join(CONFIG_FILE))
}

/// `~/.local/share/jh-indicator-countdown/icons` on Linux.
pub fn default_icon_dir() -> Option<PathBuf> {
    Some(project_dirs()?.data_dir().join("icons"))
}

/// XDG autostart directory, `~/.config/autostart`.
pub fn autostart_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|b| b.config_dir().join("autostart"))
}
