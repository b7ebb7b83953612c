#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use countdown_core::{FixedClock, Frame, Settings, SettingsStore};
use countdown_indicator::AppError;
use countdown_indicator::platform::{
    Autostart, DialogOutcome, IndicatorSurface, MenuEvent, MenuSource, Notice, NoticeLevel,
    SettingsDialog, Surfaces,
};
use tokio::time::Instant;

pub const NOW: i64 = 1_700_000_000;

/// Everything the fake surfaces observed.
#[derive(Default, Clone)]
pub struct Recorder {
    pub frames: Rc<RefCell<Vec<(Instant, Frame)>>>,
    pub icons: Rc<RefCell<Vec<(PathBuf, PathBuf)>>>,
    pub titles: Rc<RefCell<Vec<String>>>,
    pub notices: Rc<RefCell<Vec<(NoticeLevel, String)>>>,
    pub autostart: Rc<RefCell<Vec<bool>>>,
    pub dialogs: Rc<RefCell<Vec<Instant>>>,
}

impl Recorder {
    /// Whole seconds since `start` at which frames were shown.
    pub fn frame_offsets(&self, start: Instant) -> Vec<u64> {
        self.frames
            .borrow()
            .iter()
            .map(|(at, _)| at.duration_since(start).as_secs())
            .collect()
    }

    pub fn labels(&self) -> Vec<String> {
        self.frames
            .borrow()
            .iter()
            .map(|(_, f)| f.label.clone())
            .collect()
    }

    pub fn notice_titles(&self) -> Vec<String> {
        self.notices.borrow().iter().map(|(_, t)| t.clone()).collect()
    }
}

pub struct FakeIndicator(pub Recorder);

impl IndicatorSurface for FakeIndicator {
    fn set_icons(&mut self, normal: &Path, attention: &Path) {
        self.0
            .icons
            .borrow_mut()
            .push((normal.to_path_buf(), attention.to_path_buf()));
    }

    fn set_menu_title(&mut self, title: &str) {
        self.0.titles.borrow_mut().push(title.to_string());
    }

    fn show(&mut self, frame: &Frame) {
        self.0.frames.borrow_mut().push((Instant::now(), frame.clone()));
    }
}

/// Emits each event at an absolute instant; silent afterwards.
pub struct ScriptedMenu {
    events: VecDeque<(Instant, MenuEvent)>,
}

impl ScriptedMenu {
    pub fn new(start: Instant, events: &[(u64, MenuEvent)]) -> Self {
        Self {
            events: events
                .iter()
                .map(|&(secs, ev)| (start + Duration::from_secs(secs), ev))
                .collect(),
        }
    }

    pub fn silent() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }
}

#[async_trait(?Send)]
impl MenuSource for ScriptedMenu {
    async fn next_event(&mut self) -> MenuEvent {
        let Some(&(at, event)) = self.events.front() else {
            return std::future::pending().await;
        };
        tokio::time::sleep_until(at).await;
        self.events.pop_front();
        event
    }
}

/// Returns queued outcomes after a simulated think time; cancels when empty.
pub struct ScriptedDialog {
    outcomes: VecDeque<(Duration, DialogOutcome)>,
    rec: Recorder,
}

impl ScriptedDialog {
    pub fn new(rec: &Recorder, outcomes: Vec<(u64, DialogOutcome)>) -> Self {
        Self {
            outcomes: outcomes
                .into_iter()
                .map(|(secs, o)| (Duration::from_secs(secs), o))
                .collect(),
            rec: rec.clone(),
        }
    }
}

#[async_trait(?Send)]
impl SettingsDialog for ScriptedDialog {
    async fn run(&mut self, _current: &Settings) -> DialogOutcome {
        self.rec.dialogs.borrow_mut().push(Instant::now());
        match self.outcomes.pop_front() {
            Some((think, outcome)) => {
                tokio::time::sleep(think).await;
                outcome
            }
            None => DialogOutcome::Cancelled,
        }
    }
}

pub struct RecordingNotice(pub Recorder);

#[async_trait(?Send)]
impl Notice for RecordingNotice {
    async fn show(&self, level: NoticeLevel, title: &str, _text: &str) {
        self.0.notices.borrow_mut().push((level, title.to_string()));
    }
}

pub struct RecordingAutostart {
    pub rec: Recorder,
    pub fail: bool,
}

#[async_trait(?Send)]
impl Autostart for RecordingAutostart {
    async fn apply(&self, enabled: bool) -> Result<(), AppError> {
        self.rec.autostart.borrow_mut().push(enabled);
        if self.fail {
            return Err(AppError::Autostart("scripted failure".into()));
        }
        Ok(())
    }
}

pub fn surfaces(rec: &Recorder, menu: ScriptedMenu, dialog: ScriptedDialog) -> Surfaces {
    Surfaces {
        indicator: Box::new(FakeIndicator(rec.clone())),
        menu: Box::new(menu),
        dialog: Box::new(dialog),
        notices: Box::new(RecordingNotice(rec.clone())),
        autostart: Box::new(RecordingAutostart {
            rec: rec.clone(),
            fail: false,
        }),
    }
}

/// Temp config dir plus an icon dir holding the two default icons.
pub struct Env {
    pub dir: tempfile::TempDir,
    pub clock: Arc<FixedClock>,
    pub store: SettingsStore,
}

impl Env {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let icons = dir.path().join("icons");
        std::fs::create_dir(&icons).unwrap();
        for name in ["watch-normal.svg", "watch-attention.svg", "alt.svg"] {
            std::fs::write(icons.join(name), "<svg/>").unwrap();
        }
        let clock = Arc::new(FixedClock::new(NOW));
        let store = SettingsStore::new(dir.path().join("cfg").join("countdown.config"), &icons)
            .with_clock(clock.clone());
        Self { dir, clock, store }
    }

    pub fn icon_dir(&self) -> &Path {
        self.store.icon_dir()
    }
}

pub fn settings(target_in: i64) -> Settings {
    Settings {
        target_time: NOW + target_in,
        event_name: "Launch".into(),
        format_template: "Launch: {%}".into(),
        icon_normal: "watch-normal.svg".into(),
        icon_attention: "watch-attention.svg".into(),
        attention_lead_minutes: 2,
        autostart_enabled: false,
    }
}

pub fn raw(settings: &Settings) -> serde_json::Value {
    serde_json::to_value(settings).unwrap()
}
