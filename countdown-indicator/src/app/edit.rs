use countdown_core::{Settings, SettingsStore, StoreError, validate};
use tracing::{debug, info, warn};

use crate::platform::{Autostart, DialogOutcome, Notice, NoticeLevel, SettingsDialog};

pub const VALIDATION_TITLE: &str = "Error validating config.";
pub const SAVE_TITLE: &str = "Error saving config.";
pub const AUTOSTART_TITLE: &str = "Error changing autostart.";

/// Runs the settings dialog and, if the user applies it, validates,
/// persists and adopts the result.
///
/// Returns `true` only when `current` was replaced. Validation and save
/// failures are reported through `notices` and leave `current` as it was.
/// An autostart failure is reported but does not undo the saved settings.
pub async fn edit_settings(
    current: &mut Settings,
    store: &SettingsStore,
    dialog: &mut dyn SettingsDialog,
    notices: &dyn Notice,
    autostart: &dyn Autostart,
) -> bool {
    let raw = match dialog.run(current).await {
        DialogOutcome::Cancelled => {
            debug!("edit: dialog cancelled");
            return false;
        }
        DialogOutcome::Submitted(raw) => raw,
    };

    let candidate = match validate::parse(&raw) {
        Ok(s) => s,
        Err(e) => {
            warn!(error=%e, "edit: submitted settings are malformed");
            notices
                .show(NoticeLevel::Error, VALIDATION_TITLE, &invalid_text(&e))
                .await;
            return false;
        }
    };

    match store.save(&candidate) {
        Ok(()) => {}
        Err(StoreError::Invalid(e)) => {
            warn!(error=%e, "edit: submitted settings rejected");
            notices
                .show(NoticeLevel::Error, VALIDATION_TITLE, &invalid_text(&e))
                .await;
            return false;
        }
        Err(e) => {
            warn!(error=%e, "edit: saving settings failed; keeping previous settings");
            notices
                .show(
                    NoticeLevel::Error,
                    SAVE_TITLE,
                    &format!("The config file could not be written ({e}). Please check your filesystem."),
                )
                .await;
            return false;
        }
    }

    *current = candidate;
    info!(event=%current.event_name, target_time = current.target_time, "edit: settings applied");

    if let Err(e) = autostart.apply(current.autostart_enabled).await {
        warn!(error=%e, autostart = current.autostart_enabled, "edit: autostart toggle failed");
        notices
            .show(NoticeLevel::Warning, AUTOSTART_TITLE, &e.to_string())
            .await;
    }
    true
}

fn invalid_text(e: &validate::ValidationError) -> String {
    format!("The settings were not saved: {e}. Please check your values.")
}
