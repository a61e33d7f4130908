use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use clap::ValueEnum;

use crate::kana::PracticeMode;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrillEvent {
    Line(String),
    /// Input is exhausted (EOF or the reader failed)
    Closed,
    Tick,
}

/// Source of input events
pub trait DrillEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<DrillEvent, RecvTimeoutError>;
}

/// Production event source reading lines from any buffered reader on a helper thread
pub struct LineEventSource {
    tx: Sender<DrillEvent>,
    rx: Receiver<DrillEvent>,
}

impl LineEventSource {
    pub fn new<R: BufRead + Send + 'static>(reader: R) -> Self {
        let (tx, rx) = mpsc::channel();
        let reader_tx = tx.clone();

        std::thread::spawn(move || {
            let tx = reader_tx;
            for line in reader.lines() {
                match line {
                    Ok(line) => {
                        if tx.send(DrillEvent::Line(line)).is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        log::warn!("input read failed: {e}");
                        break;
                    }
                }
            }
            let _ = tx.send(DrillEvent::Closed);
        });

        Self { tx, rx }
    }

    pub fn stdin() -> Self {
        Self::new(std::io::BufReader::new(std::io::stdin()))
    }

    /// Extra handle into the event stream, e.g. for a signal handler
    pub fn sender(&self) -> Sender<DrillEvent> {
        self.tx.clone()
    }
}

impl DrillEventSource for LineEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<DrillEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<DrillEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<DrillEvent>) -> Self {
        Self { rx }
    }
}

impl DrillEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<DrillEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: DrillEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: DrillEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> DrillEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => DrillEvent::Tick,
        }
    }
}

/// Delayed move to the next question, tied to the question that was answered
#[derive(Clone, Copy, Debug)]
pub struct AdvanceTimer {
    delay: Duration,
    pending: Option<(u64, Instant)>,
}

impl AdvanceTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm (or re-arm) the timer for `question_id`
    pub fn schedule(&mut self, question_id: u64, now: Instant) {
        self.pending = Some((question_id, now + self.delay));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// True once the delay has passed and `current_question` is still the one
    /// that was answered. Fires at most once; a stale timer is dropped silently.
    pub fn poll(&mut self, now: Instant, current_question: u64) -> bool {
        match self.pending {
            Some((id, _)) if id != current_question => {
                self.pending = None;
                false
            }
            Some((_, due)) if now >= due => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}

/// One line of learner input
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Answer(String),
    Next,
    Swap,
    Random,
    Mode(PracticeMode),
    Triple,
    Reset,
    Map,
    Review,
    Stats,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    /// Lines starting with ':' are commands, anything else is a tapped key.
    /// Blank lines yield None.
    pub fn parse(line: &str) -> Option<Command> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let Some(rest) = line.strip_prefix(':') else {
            return Some(Command::Answer(line.to_string()));
        };

        let mut parts = rest.split_whitespace();
        let command = match (parts.next().unwrap_or(""), parts.next()) {
            ("next" | "n", None) => Command::Next,
            ("swap" | "s", None) => Command::Swap,
            ("random" | "r", None) => Command::Random,
            ("mode" | "m", Some(name)) => match PracticeMode::from_str(name, true) {
                Ok(mode) => Command::Mode(mode),
                Err(_) => Command::Unknown(line.to_string()),
            },
            ("triple" | "t", None) => Command::Triple,
            ("reset", None) => Command::Reset,
            ("map", None) => Command::Map,
            ("review", None) => Command::Review,
            ("stats", None) => Command::Stats,
            ("help" | "h" | "?", None) => Command::Help,
            ("quit" | "q", None) => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        };
        Some(command)
    }
}
