use std::io::Write;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime};
use countdown_core::Settings;
use serde_json::json;
use tracing::debug;

use super::ConsoleInput;
use crate::platform::{DialogOutcome, SettingsDialog};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Prompt-per-field settings editor.
///
/// An empty answer keeps the current value, `cancel` or end of input
/// aborts the whole dialog. Answers that cannot be parsed are asked again;
/// everything else is left to the settings validator.
pub struct ConsoleDialog {
    input: ConsoleInput,
    out: Box<dyn Write>,
}

impl ConsoleDialog {
    pub fn new(input: ConsoleInput, out: Box<dyn Write>) -> Self {
        Self { input, out }
    }

    pub fn with_stderr(input: ConsoleInput) -> Self {
        Self::new(input, Box::new(std::io::stderr()))
    }

    fn say(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
        let _ = self.out.flush();
    }

    /// `None` means the user cancelled.
    async fn ask(&mut self, question: &str, current: &str) -> Option<String> {
        let _ = write!(self.out, "{question} [{current}]: ");
        let _ = self.out.flush();
        let answer = self.input.read_line().await?;
        let answer = answer.trim();
        if answer.eq_ignore_ascii_case("cancel") {
            return None;
        }
        if answer.is_empty() {
            Some(current.to_string())
        } else {
            Some(answer.to_string())
        }
    }

    async fn ask_parsed<T>(
        &mut self,
        question: &str,
        current: &str,
        parse: impl Fn(&str) -> Result<T, String>,
    ) -> Option<T> {
        loop {
            let answer = self.ask(question, current).await?;
            match parse(&answer) {
                Ok(value) => return Some(value),
                Err(msg) => self.say(&format!("  {msg}")),
            }
        }
    }

    async fn collect(&mut self, current: &Settings) -> Option<serde_json::Value> {
        self.say(&format!(
            "Settings for '{}' (empty keeps the current value, 'cancel' aborts)",
            current.event_name
        ));
        let event_name = self
            .ask("The name of this countdown", &current.event_name)
            .await?;
        let target_time = self
            .ask_parsed(
                "When it happens (UNIX timestamp or UTC YYYY-MM-DD HH:MM[:SS])",
                &describe_timestamp(current.target_time),
                parse_target_time,
            )
            .await?;
        let format_template = self
            .ask(
                "The label format ({%} is replaced by the countdown)",
                &current.format_template,
            )
            .await?;
        let icon_normal = self
            .ask(
                "The default icon for this event",
                &current.icon_normal.display().to_string(),
            )
            .await?;
        let icon_attention = self
            .ask(
                "The attention icon for this event",
                &current.icon_attention.display().to_string(),
            )
            .await?;
        let attention_lead_minutes = self
            .ask_parsed(
                "Minutes before the event when attention starts",
                &current.attention_lead_minutes.to_string(),
                |s| {
                    s.parse::<u32>()
                        .map_err(|_| format!("'{s}' is not a whole number of minutes"))
                },
            )
            .await?;
        let autostart_enabled = self
            .ask_parsed(
                "Start at login (y/n)",
                if current.autostart_enabled { "y" } else { "n" },
                parse_yes_no,
            )
            .await?;

        Some(json!({
            "target_time": target_time,
            "event_name": event_name,
            "format_template": format_template,
            "icon_normal": icon_normal,
            "icon_attention": icon_attention,
            "attention_lead_minutes": attention_lead_minutes,
            "autostart_enabled": autostart_enabled,
        }))
    }
}

#[async_trait(?Send)]
impl SettingsDialog for ConsoleDialog {
    async fn run(&mut self, current: &Settings) -> DialogOutcome {
        match self.collect(current).await {
            Some(raw) => DialogOutcome::Submitted(raw),
            None => {
                debug!("console dialog: cancelled");
                self.say("Cancelled.");
                DialogOutcome::Cancelled
            }
        }
    }
}

/// Parses a UNIX timestamp or a UTC date-time.
pub fn parse_target_time(input: &str) -> Result<i64, String> {
    let input = input.trim();
    if let Ok(ts) = input.parse::<i64>() {
        return Ok(ts);
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|dt| dt.and_utc().timestamp())
        .ok_or_else(|| format!("'{input}' is neither a UNIX timestamp nor YYYY-MM-DD HH:MM[:SS]"))
}

pub fn parse_yes_no(input: &str) -> Result<bool, String> {
    match input.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "on" | "1" => Ok(true),
        "n" | "no" | "false" | "off" | "0" => Ok(false),
        other => Err(format!("answer y or n, not '{other}'")),
    }
}

/// The value shown as "current" for the target time; parses back to itself.
fn describe_timestamp(ts: i64) -> String {
    match DateTime::from_timestamp(ts, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => ts.to_string(),
    }
}
