//! Terminal implementations of the indicator surfaces.
//!
//! stdout carries indicator frames only; prompts and hints go to stderr.
//! The menu and the settings dialog share one stdin line reader.

pub mod dialog;
pub mod indicator;

use std::io::BufRead;
use std::rc::Rc;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, warn};

use super::{MenuEvent, MenuSource};

pub use dialog::ConsoleDialog;
pub use indicator::{ConsoleIndicator, OutputFormat};

const MENU_HINT: &str = "commands: s|setup = edit settings, q|quit = exit";
const LINE_BUFFER: usize = 16;

/// Line reader shared by the menu and the dialog.
///
/// Lines are read by a detached OS thread and handed over through a
/// channel, so a read blocked on the terminal never holds the runtime
/// open at shutdown.
#[derive(Clone)]
pub struct ConsoleInput {
    lines: Rc<Mutex<mpsc::Receiver<String>>>,
}

impl ConsoleInput {
    pub fn stdin() -> Self {
        Self::from_reader(std::io::BufReader::new(std::io::stdin()))
    }

    pub fn from_reader<R: BufRead + Send + 'static>(reader: R) -> Self {
        let (tx, rx) = mpsc::channel(LINE_BUFFER);
        let spawned = std::thread::Builder::new()
            .name("console-input".into())
            .spawn(move || {
                for line in reader.lines() {
                    match line {
                        Ok(line) => {
                            if tx.blocking_send(line).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            warn!(error=%e, "console: failed to read input");
                            break;
                        }
                    }
                }
                debug!("console: reader thread finished");
            });
        if let Err(e) = spawned {
            warn!(error=%e, "console: could not start input thread; console input disabled");
        }
        Self {
            lines: Rc::new(Mutex::new(rx)),
        }
    }

    /// Next line without its terminator; `None` once input is closed.
    /// Cancel-safe.
    pub async fn read_line(&self) -> Option<String> {
        self.lines.lock().await.recv().await
    }
}

/// Reads menu commands from the console.
///
/// Once input is exhausted the menu stays silent instead of quitting, so
/// the indicator keeps running with stdin redirected from `/dev/null`.
pub struct ConsoleMenu {
    input: ConsoleInput,
    closed: bool,
}

impl ConsoleMenu {
    pub fn new(input: ConsoleInput) -> Self {
        Self {
            input,
            closed: false,
        }
    }
}

pub fn parse_command(line: &str) -> Option<MenuEvent> {
    match line.trim().to_ascii_lowercase().as_str() {
        "s" | "setup" | "settings" => Some(MenuEvent::Setup),
        "q" | "quit" | "exit" => Some(MenuEvent::Quit),
        _ => None,
    }
}

#[async_trait(?Send)]
impl MenuSource for ConsoleMenu {
    async fn next_event(&mut self) -> MenuEvent {
        loop {
            if self.closed {
                return std::future::pending().await;
            }
            let Some(line) = self.input.read_line().await else {
                debug!("console: input closed; menu disabled");
                self.closed = true;
                continue;
            };
            match parse_command(&line) {
                Some(event) => return event,
                None if line.trim().is_empty() => {}
                None => eprintln!("{MENU_HINT}"),
            }
        }
    }
}
