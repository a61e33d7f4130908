//! Line-driven front-end state: turns learner input into drill calls and
//! writes what should be shown.

use crate::config::Config;
use crate::drill::Drill;
use crate::evaluator::{DrillError, Verdict};
use crate::kana::PracticeMode;
use crate::matching::{MatchBoard, Selection};
use crate::render;
use crate::runtime::{AdvanceTimer, Command};
use crate::store::{ProgressStore, StoreError};
use std::io::{self, Write};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    Drilling,
    /// Playing the matching game from a focused review
    Reviewing(MatchBoard),
}

#[derive(Debug)]
pub struct App<S: ProgressStore> {
    pub drill: Drill<S>,
    pub state: AppState,
    pub timer: AdvanceTimer,
    pub weak_set_size: usize,
}

impl<S: ProgressStore> App<S> {
    pub fn new(drill: Drill<S>, config: &Config) -> Self {
        Self {
            drill,
            state: AppState::Drilling,
            timer: AdvanceTimer::new(Duration::from_millis(config.advance_delay_ms)),
            weak_set_size: config.weak_set_size,
        }
    }

    pub fn start<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.show_question(out, None)
    }

    /// Advance to a new question once the post-answer delay has passed
    pub fn on_tick<W: Write>(&mut self, now: Instant, out: &mut W) -> io::Result<()> {
        if self.state == AppState::Drilling && self.timer.poll(now, self.drill.question().id) {
            self.drill.new_question(self.drill.mode());
            self.show_question(out, None)?;
        }
        Ok(())
    }

    pub fn handle_line<W: Write>(&mut self, line: &str, now: Instant, out: &mut W) -> io::Result<Flow> {
        let Some(command) = Command::parse(line) else {
            return Ok(Flow::Continue);
        };

        match command {
            Command::Answer(answer) => {
                if let AppState::Reviewing(board) = &mut self.state {
                    if Self::select_tile(board, &answer, out)? {
                        self.state = AppState::Drilling;
                    }
                    return Ok(Flow::Continue);
                }
                if !self.drill.keyboard().contains(&answer) {
                    writeln!(out, "{answer:?} is not a key on this keyboard")?;
                    return Ok(Flow::Continue);
                }
                match self.drill.submit(&answer) {
                    Ok(verdict) => {
                        self.timer.schedule(verdict.question_id, now);
                        writeln!(out, "{}", render::render_verdict(&verdict))?;
                        self.show_keyboard(out, Some(&verdict))?;
                    }
                    Err(e) => writeln!(out, "{e}")?,
                }
            }
            Command::Next => self.force_question(self.drill.mode(), out)?,
            Command::Swap => self.force_question(self.drill.mode().swapped(), out)?,
            Command::Mode(mode) => self.force_question(mode, out)?,
            Command::Random => {
                self.timer.cancel();
                self.state = AppState::Drilling;
                self.drill.random_mode();
                self.show_question(out, None)?;
            }
            Command::Triple => {
                let multiplier = self.drill.toggle_triple();
                let state = if multiplier.is_active() { "on" } else { "off" };
                writeln!(out, "triple rewards {state}")?;
                self.show_keyboard(out, None)?;
            }
            Command::Reset => {
                self.timer.cancel();
                // A board built from the old weak set is meaningless now.
                self.state = AppState::Drilling;
                match self.drill.reset() {
                    Ok(()) => writeln!(out, "progress reset")?,
                    Err(e) => writeln!(out, "progress cleared but not saved: {e}")?,
                }
            }
            Command::Map => {
                writeln!(out, "{}", render::render_map(&self.drill.proficiency_map()))?;
            }
            Command::Review => match self.drill.focused_review(self.weak_set_size) {
                Ok(review) => {
                    self.timer.cancel();
                    writeln!(out, "{}", render::render_review(&review))?;
                    writeln!(out, "pick two tiles of the same sound by number; :next to leave")?;
                    self.state = AppState::Reviewing(review.board());
                }
                Err(DrillError::InsufficientData) => {
                    writeln!(out, "{}", DrillError::InsufficientData)?;
                }
                Err(e) => writeln!(out, "{e}")?,
            },
            Command::Stats => writeln!(out, "{}", render::render_stats(self.drill.progress()))?,
            Command::Help => writeln!(out, "{}", render::HELP)?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Unknown(text) => writeln!(out, "unknown command {text:?}, :help lists them")?,
        }

        Ok(Flow::Continue)
    }

    /// Save everything; called once on the way out
    pub fn shutdown(&mut self) -> Result<(), StoreError> {
        self.timer.cancel();
        self.drill.save()
    }

    fn force_question<W: Write>(&mut self, mode: PracticeMode, out: &mut W) -> io::Result<()> {
        self.timer.cancel();
        self.state = AppState::Drilling;
        self.drill.new_question(mode);
        self.show_question(out, None)
    }

    /// Returns true once the board is cleared
    fn select_tile<W: Write>(board: &mut MatchBoard, input: &str, out: &mut W) -> io::Result<bool> {
        let Ok(pos) = input.parse::<usize>() else {
            writeln!(out, "enter a tile number")?;
            return Ok(false);
        };

        match board.select(pos) {
            Selection::Selected(_) | Selection::Ignored => {}
            Selection::Matched(_, _) => writeln!(out, "match!")?,
            Selection::Mismatched(_, _) => writeln!(out, "not a pair")?,
        }

        if board.is_cleared() {
            writeln!(out, "board cleared, back to drilling")?;
            return Ok(true);
        }
        writeln!(out, "{}", render::render_board(board))?;
        Ok(false)
    }

    fn show_question<W: Write>(&self, out: &mut W, verdict: Option<&Verdict>) -> io::Result<()> {
        writeln!(
            out,
            "{}",
            render::render_question(self.drill.question(), self.drill.session(), self.drill.multiplier())
        )?;
        self.show_keyboard(out, verdict)
    }

    fn show_keyboard<W: Write>(&self, out: &mut W, verdict: Option<&Verdict>) -> io::Result<()> {
        writeln!(out, "{}\n", render::render_keyboard(self.drill.keyboard(), verdict))
    }
}
