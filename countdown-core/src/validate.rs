use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::settings::{PLACEHOLDER, Settings};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("malformed settings: {0}")]
    Malformed(String),
    #[error("target time {target} is not in the future (now {now})")]
    TargetNotInFuture { target: i64, now: i64 },
    #[error("icon not found: {}", .0.display())]
    MissingIcon(PathBuf),
    #[error("format template must contain the {{%}} placeholder")]
    MissingPlaceholder,
    #[error("attention lead must be at least one minute")]
    LeadNotPositive,
}

/// Resolves an icon reference against the icon directory.
/// Absolute references are returned unchanged.
pub fn resolve_icon(icon_dir: &Path, icon: &Path) -> PathBuf {
    icon_dir.join(icon)
}

/// Decodes a raw field map into [`Settings`].
///
/// Missing keys and wrong-typed values become [`ValidationError::Malformed`].
pub fn parse(candidate: &Value) -> Result<Settings, ValidationError> {
    Settings::deserialize(candidate).map_err(|e| ValidationError::Malformed(e.to_string()))
}

/// Checks the invariants a stored or submitted record must satisfy:
/// - `target_time` is strictly after `now`
/// - both icons exist as files under `icon_dir`
/// - `format_template` contains the placeholder
/// - `attention_lead_minutes` is at least one
pub fn check(settings: &Settings, now: i64, icon_dir: &Path) -> Result<(), ValidationError> {
    if settings.target_time <= now {
        return Err(ValidationError::TargetNotInFuture {
            target: settings.target_time,
            now,
        });
    }
    for icon in [&settings.icon_normal, &settings.icon_attention] {
        let path = resolve_icon(icon_dir, icon);
        if !path.is_file() {
            return Err(ValidationError::MissingIcon(path));
        }
    }
    if !settings.format_template.contains(PLACEHOLDER) {
        return Err(ValidationError::MissingPlaceholder);
    }
    if settings.attention_lead_minutes == 0 {
        return Err(ValidationError::LeadNotPositive);
    }
    Ok(())
}

/// `true` when `candidate` decodes and passes [`check`].
pub fn validate(candidate: &Value, now: i64, icon_dir: &Path) -> bool {
    parse(candidate)
        .and_then(|settings| check(&settings, now, icon_dir))
        .is_ok()
}
