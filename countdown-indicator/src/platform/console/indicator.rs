use std::io::Write;
use std::path::{Path, PathBuf};

use countdown_core::{Frame, IndicatorState};
use serde::Serialize;
use tracing::warn;

use crate::platform::IndicatorSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// One label per line; ` (!)` marks the attention state
    #[default]
    Plain,
    /// One JSON object per line (text, tooltip, class, icon), e.g. for waybar
    Json,
}

#[derive(Serialize)]
struct JsonFrame<'a> {
    text: &'a str,
    tooltip: &'a str,
    class: IndicatorState,
    icon: &'a Path,
}

/// Writes each frame as a line to a writer, stdout by default.
///
/// The first failed write (usually a closed pipe) is logged and disables
/// further output.
pub struct ConsoleIndicator {
    format: OutputFormat,
    out: Box<dyn Write>,
    closed: bool,
    icon_normal: PathBuf,
    icon_attention: PathBuf,
    title: String,
}

impl ConsoleIndicator {
    pub fn new(format: OutputFormat, out: Box<dyn Write>) -> Self {
        Self {
            format,
            out,
            closed: false,
            icon_normal: PathBuf::new(),
            icon_attention: PathBuf::new(),
            title: String::new(),
        }
    }

    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(format, Box::new(std::io::stdout()))
    }

    fn render(&self, frame: &Frame) -> String {
        match self.format {
            OutputFormat::Plain => match frame.state {
                IndicatorState::Normal => frame.label.clone(),
                IndicatorState::Attention => format!("{} (!)", frame.label),
            },
            OutputFormat::Json => {
                let icon = match frame.state {
                    IndicatorState::Normal => &self.icon_normal,
                    IndicatorState::Attention => &self.icon_attention,
                };
                let line = JsonFrame {
                    text: &frame.label,
                    tooltip: &self.title,
                    class: frame.state,
                    icon,
                };
                serde_json::to_string(&line).unwrap_or_else(|e| {
                    warn!(error=%e, "indicator: failed to encode frame");
                    serde_json::json!({ "text": frame.label }).to_string()
                })
            }
        }
    }
}

impl IndicatorSurface for ConsoleIndicator {
    fn set_icons(&mut self, normal: &Path, attention: &Path) {
        self.icon_normal = normal.to_path_buf();
        self.icon_attention = attention.to_path_buf();
    }

    fn set_menu_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn show(&mut self, frame: &Frame) {
        if self.closed {
            return;
        }
        let line = self.render(frame);
        if let Err(e) = writeln!(self.out, "{line}").and_then(|_| self.out.flush()) {
            warn!(error=%e, "indicator: failed to write frame; output disabled");
            self.closed = true;
        }
    }
}
