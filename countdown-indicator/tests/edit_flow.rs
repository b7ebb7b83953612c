mod common;

use common::{Env, Recorder, RecordingAutostart, RecordingNotice, ScriptedDialog, raw, settings};
use countdown_core::LoadStatus;
use countdown_indicator::app::edit::{
    AUTOSTART_TITLE, SAVE_TITLE, VALIDATION_TITLE, edit_settings,
};
use countdown_indicator::platform::{DialogOutcome, NoticeLevel};
use serde_json::json;

struct Harness {
    env: Env,
    rec: Recorder,
    autostart_fails: bool,
}

impl Harness {
    fn new() -> Self {
        Self {
            env: Env::new(),
            rec: Recorder::default(),
            autostart_fails: false,
        }
    }

    async fn submit(&self, current: &mut countdown_core::Settings, outcome: DialogOutcome) -> bool {
        let mut dialog = ScriptedDialog::new(&self.rec, vec![(0, outcome)]);
        let notices = RecordingNotice(self.rec.clone());
        let autostart = RecordingAutostart {
            rec: self.rec.clone(),
            fail: self.autostart_fails,
        };
        edit_settings(current, &self.env.store, &mut dialog, &notices, &autostart).await
    }
}

#[tokio::test]
async fn accepted_settings_are_saved_and_adopted() {
    let h = Harness::new();
    let mut current = settings(3600);
    let mut next = settings(1800);
    next.event_name = "Demo".into();
    next.autostart_enabled = true;

    assert!(h.submit(&mut current, DialogOutcome::Submitted(raw(&next))).await);

    assert_eq!(current, next);
    assert_eq!(h.env.store.load(), (next, LoadStatus::Loaded));
    assert_eq!(h.rec.autostart.borrow().as_slice(), [true]);
    assert!(h.rec.notices.borrow().is_empty());
}

#[tokio::test]
async fn cancelled_dialog_changes_nothing() {
    let h = Harness::new();
    let mut current = settings(3600);

    assert!(!h.submit(&mut current, DialogOutcome::Cancelled).await);

    assert_eq!(current, settings(3600));
    assert!(!h.env.store.path().exists());
    assert!(h.rec.autostart.borrow().is_empty());
    assert!(h.rec.notices.borrow().is_empty());
}

#[tokio::test]
async fn malformed_submission_reports_validation_error() {
    let h = Harness::new();
    let mut current = settings(3600);
    let mut bad = raw(&current);
    bad["target_time"] = json!("tomorrow");

    assert!(!h.submit(&mut current, DialogOutcome::Submitted(bad)).await);

    assert_eq!(current, settings(3600));
    assert_eq!(
        h.rec.notices.borrow().as_slice(),
        [(NoticeLevel::Error, VALIDATION_TITLE.to_string())]
    );
    assert!(!h.env.store.path().exists());
}

#[tokio::test]
async fn invalid_settings_keep_the_previous_record() {
    let h = Harness::new();
    h.env.store.save(&settings(3600)).unwrap();
    let before = std::fs::read(h.env.store.path()).unwrap();
    let mut current = settings(3600);

    let mut no_placeholder = settings(3600);
    no_placeholder.format_template = "Countdown".into();
    assert!(!h.submit(&mut current, DialogOutcome::Submitted(raw(&no_placeholder))).await);

    let mut past = settings(-10);
    past.event_name = "Past".into();
    assert!(!h.submit(&mut current, DialogOutcome::Submitted(raw(&past))).await);

    let mut missing_icon = settings(3600);
    missing_icon.icon_attention = "nope.svg".into();
    assert!(!h.submit(&mut current, DialogOutcome::Submitted(raw(&missing_icon))).await);

    assert_eq!(current, settings(3600));
    assert_eq!(std::fs::read(h.env.store.path()).unwrap(), before);
    assert_eq!(h.rec.notice_titles(), vec![VALIDATION_TITLE; 3]);
    assert!(h.rec.autostart.borrow().is_empty());
}

#[tokio::test]
async fn save_failure_rolls_back() {
    let h = Harness::new();
    // a regular file where the config directory should be
    std::fs::write(h.env.store.path().parent().unwrap(), "blocker").unwrap();
    let mut current = settings(3600);
    let next = settings(1800);

    assert!(!h.submit(&mut current, DialogOutcome::Submitted(raw(&next))).await);

    assert_eq!(current, settings(3600));
    assert_eq!(
        h.rec.notices.borrow().as_slice(),
        [(NoticeLevel::Error, SAVE_TITLE.to_string())]
    );
    assert!(h.rec.autostart.borrow().is_empty());
}

#[tokio::test]
async fn autostart_failure_still_keeps_saved_settings() {
    let mut h = Harness::new();
    h.autostart_fails = true;
    let mut current = settings(3600);
    let mut next = settings(900);
    next.autostart_enabled = true;

    assert!(h.submit(&mut current, DialogOutcome::Submitted(raw(&next))).await);

    assert_eq!(current, next);
    assert_eq!(h.env.store.load().1, LoadStatus::Loaded);
    assert_eq!(h.rec.autostart.borrow().as_slice(), [true]);
    assert_eq!(
        h.rec.notices.borrow().as_slice(),
        [(NoticeLevel::Warning, AUTOSTART_TITLE.to_string())]
    );
}

#[tokio::test]
async fn legacy_keys_from_the_dialog_are_accepted() {
    let h = Harness::new();
    let mut current = settings(3600);
    let legacy = json!({
        "timestamp": common::NOW + 60,
        "event_name": "Legacy",
        "format_str": "{%} left",
        "icon": "watch-normal.svg",
        "icon_attention": "watch-attention.svg",
        "attention_diff": 5.0,
        "autostart": false,
    });

    assert!(h.submit(&mut current, DialogOutcome::Submitted(legacy)).await);
    assert_eq!(current.event_name, "Legacy");
    assert_eq!(current.attention_lead_minutes, 5);
    assert_eq!(h.rec.autostart.borrow().as_slice(), [false]);
}
