use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};

/// Token in `format_template` that is replaced by the rendered countdown.
pub const PLACEHOLDER: &str = "{%}";

pub const DEFAULT_EVENT_NAME: &str = "Default";
pub const DEFAULT_FORMAT: &str = "Countdown: {%}";
pub const DEFAULT_ICON_NORMAL: &str = "watch-normal.svg";
pub const DEFAULT_ICON_ATTENTION: &str = "watch-attention.svg";
pub const DEFAULT_LEAD_MINUTES: u32 = 120;
/// Offset of the default target from "now" on first run.
pub const DEFAULT_TARGET_OFFSET_SECS: i64 = 3600;

/// The persisted countdown settings.
///
/// Field names are the on-disk JSON keys. Older config files used
/// `timestamp`, `format_str`, `icon`, `attention_diff` and `autostart`;
/// those keys are still accepted when reading. A record carrying both a key
/// and its legacy alias is rejected as a duplicate field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// UNIX timestamp (seconds) the countdown runs towards.
    #[serde(alias = "timestamp")]
    pub target_time: i64,
    pub event_name: String,
    /// Label template, must contain [`PLACEHOLDER`].
    #[serde(alias = "format_str")]
    pub format_template: String,
    /// Icon shown in the normal state, relative to the icon directory or absolute.
    #[serde(alias = "icon")]
    pub icon_normal: PathBuf,
    pub icon_attention: PathBuf,
    /// Minutes before `target_time` at which the attention state starts.
    #[serde(alias = "attention_diff", deserialize_with = "de_minutes")]
    pub attention_lead_minutes: u32,
    #[serde(alias = "autostart")]
    pub autostart_enabled: bool,
}

impl Settings {
    /// Built-in defaults, counting down to one hour after `now`.
    pub fn defaults(now: i64) -> Self {
        Self {
            target_time: now + DEFAULT_TARGET_OFFSET_SECS,
            event_name: DEFAULT_EVENT_NAME.to_string(),
            format_template: DEFAULT_FORMAT.to_string(),
            icon_normal: PathBuf::from(DEFAULT_ICON_NORMAL),
            icon_attention: PathBuf::from(DEFAULT_ICON_ATTENTION),
            attention_lead_minutes: DEFAULT_LEAD_MINUTES,
            autostart_enabled: false,
        }
    }

    /// Title of the menu entry that opens the settings dialog.
    pub fn menu_title(&self) -> String {
        format!("Setup {}...", self.event_name)
    }
}

/// Accepts an unsigned integer, or a float with no fractional part
/// (older dialogs stored spin-button values as floats).
fn de_minutes<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = serde_json::Number::deserialize(deserializer)?;
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).map_err(|_| D::Error::custom(format!("{n} minutes is too large")));
    }
    match value.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) => Ok(f as u32),
        _ => Err(D::Error::custom(format!(
            "expected a whole number of minutes, got {value}"
        ))),
    }
}
