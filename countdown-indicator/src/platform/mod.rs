pub mod autostart;
pub mod console;

use std::path::Path;

use async_trait::async_trait;
use countdown_core::{Frame, Settings};

use crate::AppError;

/// Entries of the indicator's menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent {
    Setup,
    Quit,
}

/// What the settings dialog hands back.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogOutcome {
    Cancelled,
    /// Raw field map, keyed like the persisted record. Not yet validated.
    Submitted(serde_json::Value),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Tray-indicator surface: renders labels and icons, owns no countdown logic.
pub trait IndicatorSurface {
    fn set_icons(&mut self, normal: &Path, attention: &Path);
    fn set_menu_title(&mut self, title: &str);
    fn show(&mut self, frame: &Frame);
}

/// Source of menu activations.
///
/// `next_event` must be cancel-safe: it is raced against the tick timer.
#[async_trait(?Send)]
pub trait MenuSource {
    async fn next_event(&mut self) -> MenuEvent;
}

/// Modal settings editor. Ticks are suspended while `run` is pending.
#[async_trait(?Send)]
pub trait SettingsDialog {
    async fn run(&mut self, current: &Settings) -> DialogOutcome;
}

/// User-facing messages for first run, read, validation and save problems.
#[async_trait(?Send)]
pub trait Notice {
    async fn show(&self, level: NoticeLevel, title: &str, text: &str);
}

/// Registers or unregisters launching at login.
#[async_trait(?Send)]
pub trait Autostart {
    async fn apply(&self, enabled: bool) -> Result<(), AppError>;
}

/// The external collaborators the presenter drives.
pub struct Surfaces {
    pub indicator: Box<dyn IndicatorSurface>,
    pub menu: Box<dyn MenuSource>,
    pub dialog: Box<dyn SettingsDialog>,
    pub notices: Box<dyn Notice>,
    pub autostart: Box<dyn Autostart>,
}
