use std::path::PathBuf;

use crate::platform::console::OutputFormat;
use clap::{Parser, Subcommand};

const HELP_EPILOG: &str = r#"Config resolution order:
  1) --config/-c PATH
  2) $COUNTDOWN_CONFIG
  3) XDG default: ~/.config/jh-indicator-countdown/indicator-countdown.config

Icon directory resolution order:
  1) --icon-dir PATH
  2) $COUNTDOWN_ICON_DIR
  3) XDG default: ~/.local/share/jh-indicator-countdown/icons

While the indicator runs, type `s` and Enter to edit the settings,
`q` and Enter to quit.
"#;

#[derive(Debug, Parser)]
#[command(
    name = "indicator-countdown",
    version,
    about = "Countdown indicator for the desktop tray or a status bar",
    long_about = None,
    after_long_help = HELP_EPILOG,
)]
pub struct Cli {
    /// Path to the JSON config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Directory icon names are resolved against
    #[arg(long)]
    pub icon_dir: Option<PathBuf>,
    /// How frames are written to stdout
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Plain)]
    pub output: OutputFormat,
    /// Write logs to a daily-rotated file in this directory instead of stderr
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
    /// Script run with `sh` to enable autostart (instead of the XDG desktop entry)
    #[arg(long, requires = "autostart_disable_script")]
    pub autostart_enable_script: Option<PathBuf>,
    /// Script run with `sh` to disable autostart
    #[arg(long, requires = "autostart_enable_script")]
    pub autostart_disable_script: Option<PathBuf>,
    /// Optional subcommand. Without one, runs the indicator.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the current countdown once and exit
    Once,
    /// Edit and save the settings, then exit
    Configure,
}
