use std::time::Duration;

use countdown_core::countdown;
use countdown_core::{Frame, IndicatorState, LoadStatus, Settings, SettingsStore};
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::edit;
use crate::platform::{MenuEvent, NoticeLevel, Surfaces};

/// How often the label is recomputed.
pub const UPDATE_INTERVAL: Duration = Duration::from_secs(2);

/// Periodic tick that can be parked while a modal dialog is open.
pub struct TickScheduler {
    interval: Interval,
    suspended: bool,
}

impl TickScheduler {
    /// First tick fires one `period` from now.
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            interval,
            suspended: false,
        }
    }

    /// Completes on the next tick; never completes while suspended.
    pub async fn tick(&mut self) {
        if self.suspended {
            return std::future::pending().await;
        }
        self.interval.tick().await;
    }

    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    /// Restarts the period from now.
    pub fn resume(&mut self) {
        self.suspended = false;
        self.interval.reset();
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }
}

enum Wake {
    Shutdown,
    Tick,
    Menu(MenuEvent),
}

/// Owns the live settings and drives the indicator surface.
pub struct Presenter {
    settings: Settings,
    store: SettingsStore,
    surfaces: Surfaces,
    last_state: Option<IndicatorState>,
}

impl Presenter {
    pub fn new(settings: Settings, store: SettingsStore, surfaces: Surfaces) -> Self {
        Self {
            settings,
            store,
            surfaces,
            last_state: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Recomputes the frame for "now" and pushes it to the indicator.
    pub fn refresh(&mut self) -> Frame {
        let frame = countdown::frame(&self.settings, self.store.now());
        if self.last_state != Some(frame.state) {
            info!(state=?frame.state, remaining = frame.remaining, "indicator state changed");
            self.last_state = Some(frame.state);
        }
        self.surfaces.indicator.show(&frame);
        frame
    }

    /// Pushes icons and the menu title for the current settings.
    pub fn apply_appearance(&mut self) {
        let normal = self.store.icon_path(&self.settings.icon_normal);
        let attention = self.store.icon_path(&self.settings.icon_attention);
        self.surfaces.indicator.set_icons(&normal, &attention);
        self.surfaces
            .indicator
            .set_menu_title(&self.settings.menu_title());
    }

    /// Opens the settings dialog; on success re-renders immediately.
    pub async fn edit_settings(&mut self) -> bool {
        let Surfaces {
            dialog,
            notices,
            autostart,
            ..
        } = &mut self.surfaces;
        let accepted = edit::edit_settings(
            &mut self.settings,
            &self.store,
            dialog.as_mut(),
            notices.as_ref(),
            autostart.as_ref(),
        )
        .await;
        if accepted {
            self.apply_appearance();
            self.refresh();
        }
        accepted
    }

    /// Handles the outcome of the initial load. First run and unreadable
    /// configs force the settings dialog; `false` means the user declined
    /// and the application should exit.
    pub async fn confirm_initial(&mut self, status: &LoadStatus) -> bool {
        match status {
            LoadStatus::Loaded => return true,
            LoadStatus::FirstRun => {
                self.surfaces
                    .notices
                    .show(
                        NoticeLevel::Info,
                        "First start of Countdown.",
                        "This seems to be your first start of this indicator, please set your preferences.",
                    )
                    .await;
            }
            LoadStatus::ReadError(reason) => {
                self.surfaces
                    .notices
                    .show(
                        NoticeLevel::Error,
                        "Error reading config file.",
                        &format!("The config file could not be used ({reason}). Using default values instead."),
                    )
                    .await;
            }
        }
        self.edit_settings().await
    }

    /// Renders immediately, then every [`UPDATE_INTERVAL`] until `shutdown`
    /// is cancelled or the menu asks to quit. Cancellation also abandons an
    /// open settings dialog; nothing is saved in that case.
    pub async fn run(&mut self, shutdown: CancellationToken) {
        self.run_with_interval(shutdown, UPDATE_INTERVAL).await
    }

    pub async fn run_with_interval(&mut self, shutdown: CancellationToken, period: Duration) {
        let mut ticks = TickScheduler::new(period);
        self.apply_appearance();
        self.refresh();

        loop {
            let wake = tokio::select! {
                biased;
                _ = shutdown.cancelled() => Wake::Shutdown,
                _ = ticks.tick() => Wake::Tick,
                event = self.surfaces.menu.next_event() => Wake::Menu(event),
            };
            match wake {
                Wake::Shutdown => break,
                Wake::Tick => {
                    if shutdown.is_cancelled() {
                        break;
                    }
                    self.refresh();
                }
                Wake::Menu(MenuEvent::Setup) => {
                    ticks.suspend();
                    debug!("presenter: ticks suspended for settings dialog");
                    let interrupted = tokio::select! {
                        biased;
                        _ = shutdown.cancelled() => true,
                        _ = self.edit_settings() => false,
                    };
                    if interrupted {
                        info!("shutdown while the settings dialog was open");
                        break;
                    }
                    ticks.resume();
                    debug!("presenter: ticks resumed");
                }
                Wake::Menu(MenuEvent::Quit) => {
                    info!("quit requested from menu");
                    shutdown.cancel();
                    break;
                }
            }
        }
        info!("presenter stopped");
    }
}
