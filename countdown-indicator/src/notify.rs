use std::cell::Cell;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::platform::{Notice, NoticeLevel};

const APP_NAME: &str = "Countdown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NotifierKind {
    #[cfg_attr(not(all(unix, not(target_os = "macos"))), allow(dead_code))]
    NotifyRust,
    LogOnly,
}

/// Desktop notifications through notify-rust, echoed to stderr.
///
/// Starts optimistic; the first failed notification downgrades it to
/// log-only for the rest of the process.
#[derive(Debug)]
pub struct DesktopNotice {
    kind: Cell<NotifierKind>,
}

impl Default for DesktopNotice {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopNotice {
    pub fn new() -> Self {
        #[cfg(all(unix, not(target_os = "macos")))]
        let kind = NotifierKind::NotifyRust;
        #[cfg(not(all(unix, not(target_os = "macos"))))]
        let kind = NotifierKind::LogOnly;
        debug!(?kind, "DesktopNotice created");
        Self {
            kind: Cell::new(kind),
        }
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    async fn show_desktop(&self, level: NoticeLevel, title: &str, text: &str) {
        let urgency = match level {
            NoticeLevel::Info => notify_rust::Urgency::Normal,
            NoticeLevel::Warning | NoticeLevel::Error => notify_rust::Urgency::Critical,
        };
        let mut n = notify_rust::Notification::new();
        let res = n
            .appname(APP_NAME)
            .summary(title)
            .body(text)
            .urgency(urgency)
            .show_async()
            .await;
        match res {
            Ok(_handle) => debug!(%title, "notice: notification shown"),
            Err(e) => {
                warn!(error=%e, "notify-rust failed; downgrading to log-only notices");
                self.kind.set(NotifierKind::LogOnly);
            }
        }
    }

    #[cfg(not(all(unix, not(target_os = "macos"))))]
    async fn show_desktop(&self, _level: NoticeLevel, _title: &str, _text: &str) {}
}

#[async_trait(?Send)]
impl Notice for DesktopNotice {
    async fn show(&self, level: NoticeLevel, title: &str, text: &str) {
        match level {
            NoticeLevel::Info => info!(%title, "{text}"),
            NoticeLevel::Warning => warn!(%title, "{text}"),
            NoticeLevel::Error => error!(%title, "{text}"),
        }
        eprintln!("{APP_NAME}: {title} {text}");
        if self.kind.get() == NotifierKind::NotifyRust {
            self.show_desktop(level, title, text).await;
        }
    }
}
