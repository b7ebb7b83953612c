//! Remaining-time arithmetic and label rendering.
//!
//! Negative remaining time is rendered as a signed duration (`-0:00:30`);
//! there is no separate "event passed" state.

use serde::Serialize;

use crate::settings::{PLACEHOLDER, Settings};

const SECS_PER_DAY: u64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorState {
    Normal,
    Attention,
}

/// One computed countdown display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub remaining: i64,
    pub label: String,
    pub state: IndicatorState,
}

pub fn remaining_secs(settings: &Settings, now: i64) -> i64 {
    settings.target_time - now
}

/// `Attention` strictly below the lead window, `Normal` at or above it.
pub fn state_for(remaining: i64, lead_minutes: u32) -> IndicatorState {
    if remaining < i64::from(lead_minutes) * 60 {
        IndicatorState::Attention
    } else {
        IndicatorState::Normal
    }
}

/// Formats seconds as `H:MM:SS`, prefixed with `N day(s), ` past 24 hours
/// and with `-` when negative.
pub fn format_remaining(secs: i64) -> String {
    let sign = if secs < 0 { "-" } else { "" };
    let total = secs.unsigned_abs();
    let days = total / SECS_PER_DAY;
    let rest = total % SECS_PER_DAY;
    let (h, m, s) = (rest / 3600, rest % 3600 / 60, rest % 60);
    match days {
        0 => format!("{sign}{h}:{m:02}:{s:02}"),
        1 => format!("{sign}1 day, {h}:{m:02}:{s:02}"),
        d => format!("{sign}{d} days, {h}:{m:02}:{s:02}"),
    }
}

pub fn render_label(template: &str, rendered: &str) -> String {
    template.replace(PLACEHOLDER, rendered)
}

pub fn frame(settings: &Settings, now: i64) -> Frame {
    let remaining = remaining_secs(settings, now);
    Frame {
        remaining,
        label: render_label(&settings.format_template, &format_remaining(remaining)),
        state: state_for(remaining, settings.attention_lead_minutes),
    }
}
