//! Plain-text rendering for the terminal front-end.

use crate::evaluator::{KeyHighlight, Question, RewardMultiplier, Verdict};
use crate::kana::Keyboard;
use crate::matching::MatchBoard;
use crate::proficiency::{MapCell, ProficiencyBand};
use crate::session::SessionState;
use crate::store::Progress;
use crate::util::format_percentage;
use crate::weak_set::FocusedReview;
use crossterm::style::Stylize;
use unicode_width::UnicodeWidthStr;

pub const HELP: &str = "\
type the matching key and press enter
  :next          skip to a new question (also leaves a review)
  :swap          reverse the current mode
  :random        pick a random mode
  :mode <name>   kata-hira hira-kata hira-roma roma-hira kata-roma roma-kata
  :triple        toggle triple rewards (shuffles the keyboard)
  :map           show the proficiency map
  :review        build a focused review from your weakest kana
  :stats         show totals
  :reset         erase all progress
  :help          show this list
  :quit          save and exit";

/// Left-align `text` in a cell `width` columns wide
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

pub fn render_question(question: &Question, session: SessionState, multiplier: RewardMultiplier) -> String {
    let reward = if multiplier.is_active() { "  x3" } else { "" };
    format!(
        "[{}]  streak {}  best {}{reward}\n\n    {}\n",
        question.mode, session.streak, session.high_score, question.prompt
    )
}

/// Keyboard grid; after an answer the expected key is green and a wrong tap red
pub fn render_keyboard(keyboard: &Keyboard, verdict: Option<&Verdict>) -> String {
    let width = keyboard.keys().map(|k| k.width()).max().unwrap_or(1) + 2;

    keyboard
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| {
                    let key = cell.unwrap_or("");
                    let padded = pad(key, width);
                    match verdict.map(|v| v.highlight(key)) {
                        Some(KeyHighlight::Correct) if !key.is_empty() => padded.green().to_string(),
                        Some(KeyHighlight::Wrong) if !key.is_empty() => padded.red().to_string(),
                        _ => padded,
                    }
                })
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_verdict(verdict: &Verdict) -> String {
    let change = format!(
        "{} {} -> {}",
        verdict.target,
        format_percentage(verdict.previous.percentage()),
        format_percentage(verdict.record.percentage())
    );
    if verdict.is_correct {
        format!("{}  ({change})", "√".green().bold())
    } else {
        format!(
            "{} {}  ({change})",
            "×".red().bold(),
            format!("answer: {}", verdict.expected).red()
        )
    }
}

pub fn render_map(rows: &[Vec<Option<MapCell>>]) -> String {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Some(cell) => {
                        let text = pad(
                            &format!("{} {}", cell.character, format_percentage(cell.percentage)),
                            10,
                        );
                        match cell.band {
                            ProficiencyBand::Strong => text.green().to_string(),
                            ProficiencyBand::Developing => text.yellow().to_string(),
                            ProficiencyBand::Weak => text.red().to_string(),
                        }
                    }
                    None => pad("", 10),
                })
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_board(board: &MatchBoard) -> String {
    let (rows, cols) = board.dimensions();
    (0..rows)
        .map(|r| {
            (0..cols)
                .map(|c| {
                    let label = format!("{:>2}:", r * cols + c);
                    let tile = board.tile(r, c).unwrap_or("·");
                    pad(&format!("{label}{tile}"), 8)
                })
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_review(review: &FocusedReview) -> String {
    let weak = review
        .weights()
        .iter()
        .map(|(c, w)| format!("{c} ({w:.2})"))
        .collect::<Vec<_>>()
        .join("  ");
    format!("weakest: {weak}\n\n{}", render_board(&review.board()))
}

pub fn render_stats(progress: &Progress) -> String {
    let combined = progress.records.combined();
    format!(
        "answered {}  correct {}  ({})\nstreak {}  best {}",
        combined.total(),
        combined.correct(),
        format_percentage(combined.percentage()),
        progress.session.streak,
        progress.session.high_score
    )
}
