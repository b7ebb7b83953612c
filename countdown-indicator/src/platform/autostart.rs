use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tinytemplate::TinyTemplate;
use tokio::process::Command;
use tracing::{debug, info};

use super::Autostart;
use crate::AppError;

pub const DESKTOP_ENTRY_NAME: &str = "indicator-countdown.desktop";
const DESKTOP_ENTRY_TEMPLATE: &str = include_str!("../../../autostart/indicator-countdown.desktop");

/// What the autostart entry launches.
#[derive(Debug, Clone)]
pub struct LaunchTarget {
    pub binary_path: PathBuf,
    pub config_path: PathBuf,
    pub icon_dir: PathBuf,
    pub icon_path: PathBuf,
}

/// XDG autostart: a `.desktop` file in `~/.config/autostart`.
#[derive(Debug, Clone)]
pub struct DesktopEntryAutostart {
    dir: PathBuf,
    launch: LaunchTarget,
}

impl DesktopEntryAutostart {
    pub fn new(dir: impl Into<PathBuf>, launch: LaunchTarget) -> Self {
        Self {
            dir: dir.into(),
            launch,
        }
    }

    pub fn entry_path(&self) -> PathBuf {
        self.dir.join(DESKTOP_ENTRY_NAME)
    }
}

#[async_trait(?Send)]
impl Autostart for DesktopEntryAutostart {
    async fn apply(&self, enabled: bool) -> Result<(), AppError> {
        let entry = self.entry_path();
        if enabled {
            std::fs::create_dir_all(&self.dir).map_err(AppError::Io)?;
            let text = render_desktop_entry(&self.launch)?;
            std::fs::write(&entry, text).map_err(AppError::Io)?;
            info!(path=?entry, "autostart: desktop entry installed");
        } else if entry.exists() {
            std::fs::remove_file(&entry).map_err(AppError::Io)?;
            info!(path=?entry, "autostart: desktop entry removed");
        } else {
            debug!(path=?entry, "autostart: already disabled");
        }
        Ok(())
    }
}

#[derive(serde::Serialize)]
struct EntryCtx<'a> {
    binary_path: &'a str,
    config_path: &'a str,
    icon_dir: &'a str,
    icon_path: &'a str,
}

/// Renders the autostart entry. Paths inside `Exec=` are escaped as quoted
/// arguments, `Icon=` as a plain string value.
pub fn render_desktop_entry(launch: &LaunchTarget) -> Result<String, AppError> {
    let mut tt = TinyTemplate::new();
    tt.set_default_formatter(&tinytemplate::format_unescaped);
    tt.add_template("entry", DESKTOP_ENTRY_TEMPLATE)
        .map_err(|e| AppError::Template(e.to_string()))?;
    let binary_path = exec_quoted(&launch.binary_path);
    let config_path = exec_quoted(&launch.config_path);
    let icon_dir = exec_quoted(&launch.icon_dir);
    let icon_path = string_value(&launch.icon_path.display().to_string());
    let ctx = EntryCtx {
        binary_path: &binary_path,
        config_path: &config_path,
        icon_dir: &icon_dir,
        icon_path: &icon_path,
    };
    tt.render("entry", &ctx)
        .map_err(|e| AppError::Template(e.to_string()))
}

/// Escapes a path for use between double quotes in `Exec=`: `"`, `` ` ``,
/// `$` and `\` get a backslash, `%` is doubled, then the result is encoded
/// as a string value.
fn exec_quoted(path: &Path) -> String {
    let raw = path.display().to_string();
    let mut quoted = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '"' | '`' | '$' | '\\' => {
                quoted.push('\\');
                quoted.push(c);
            }
            '%' => quoted.push_str("%%"),
            _ => quoted.push(c),
        }
    }
    string_value(&quoted)
}

/// Desktop entry string escapes.
fn string_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

/// Runs one of two user-provided shell scripts, like `sh enable-autostart.sh`.
#[derive(Debug, Clone)]
pub struct ScriptAutostart {
    enable: PathBuf,
    disable: PathBuf,
}

impl ScriptAutostart {
    pub fn new(enable: impl Into<PathBuf>, disable: impl Into<PathBuf>) -> Self {
        Self {
            enable: enable.into(),
            disable: disable.into(),
        }
    }
}

#[async_trait(?Send)]
impl Autostart for ScriptAutostart {
    async fn apply(&self, enabled: bool) -> Result<(), AppError> {
        let script = if enabled { &self.enable } else { &self.disable };
        run_script(script).await
    }
}

async fn run_script(script: &Path) -> Result<(), AppError> {
    let status = Command::new("sh")
        .arg(script)
        .status()
        .await
        .map_err(AppError::Io)?;
    if !status.success() {
        return Err(AppError::Autostart(format!(
            "sh {} failed with status {}",
            script.display(),
            status
        )));
    }
    info!(script=?script, "autostart: script finished");
    Ok(())
}
