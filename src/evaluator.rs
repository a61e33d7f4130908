use crate::kana::{PracticeMode, Script};
use crate::proficiency::ProficiencyRecord;
use crate::store::Progress;
use crate::util::format_percentage;

/// Errors raised while drilling
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DrillError {
    #[error("prompt {prompt:?} is not a {script} character")]
    Lookup { prompt: String, script: Script },

    #[error("no kana at index {0}")]
    IndexOutOfRange(usize),

    #[error("not enough data for a focused review yet, keep practicing")]
    InsufficientData,
}

/// The question currently on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Unique per drawn question; keys the auto-advance timer
    pub id: u64,
    pub mode: PracticeMode,
    pub prompt: String,
    pub expected: String,
}

/// Triple mode scales every answer's weight by three
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RewardMultiplier {
    #[default]
    Single,
    Triple,
}

impl RewardMultiplier {
    pub fn increment(self) -> u64 {
        match self {
            RewardMultiplier::Single => 1,
            RewardMultiplier::Triple => 3,
        }
    }

    pub fn is_active(self) -> bool {
        self == RewardMultiplier::Triple
    }

    pub fn toggled(self) -> Self {
        match self {
            RewardMultiplier::Single => RewardMultiplier::Triple,
            RewardMultiplier::Triple => RewardMultiplier::Single,
        }
    }
}

impl From<bool> for RewardMultiplier {
    fn from(triple: bool) -> Self {
        if triple {
            RewardMultiplier::Triple
        } else {
            RewardMultiplier::Single
        }
    }
}

/// How a key should be highlighted after an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyHighlight {
    Correct,
    Wrong,
    Plain,
}

/// Outcome of one submitted answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub question_id: u64,
    pub is_correct: bool,
    pub submitted: String,
    pub expected: String,
    /// The character whose record was updated: the prompt, in its own script
    pub target: String,
    pub previous: ProficiencyRecord,
    pub record: ProficiencyRecord,
    pub streak: u64,
    pub high_score: u64,
}

impl Verdict {
    /// The expected key turns green; a wrong tap turns red
    pub fn highlight(&self, key: &str) -> KeyHighlight {
        if key == self.expected {
            KeyHighlight::Correct
        } else if !self.is_correct && key == self.submitted {
            KeyHighlight::Wrong
        } else {
            KeyHighlight::Plain
        }
    }
}

/// Score `answer` against `question`, updating the prompt character's record
/// and the streak. Nothing is touched if the prompt isn't in its own script.
pub fn evaluate(
    progress: &mut Progress,
    question: &Question,
    answer: &str,
    multiplier: RewardMultiplier,
) -> Result<Verdict, DrillError> {
    let script = question.mode.source();
    let target = match script.position(&question.prompt).and_then(|i| script.get(i)) {
        Some(target) => target,
        None => {
            log::error!(
                "cannot score answer: prompt {:?} not found in {script} (mode {})",
                question.prompt,
                question.mode
            );
            return Err(DrillError::Lookup {
                prompt: question.prompt.clone(),
                script,
            });
        }
    };

    let is_correct = answer == question.expected;
    let previous = progress.records.get(target);
    let record = progress
        .records
        .record(target, is_correct, multiplier.increment());
    progress.session.record(is_correct);

    log::info!(
        "target[{target}]: {} -> {}",
        format_percentage(previous.percentage()),
        format_percentage(record.percentage())
    );

    Ok(Verdict {
        question_id: question.id,
        is_correct,
        submitted: answer.to_string(),
        expected: question.expected.clone(),
        target: target.to_string(),
        previous,
        record,
        streak: progress.session.streak,
        high_score: progress.session.high_score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionState;
    use assert_matches::assert_matches;

    fn question(mode: PracticeMode, prompt: &str, expected: &str) -> Question {
        Question {
            id: 1,
            mode,
            prompt: prompt.to_string(),
            expected: expected.to_string(),
        }
    }

    #[test]
    fn test_correct_answer_updates_prompt_record() {
        let mut progress = Progress::zeroed();
        let q = question(PracticeMode::KatakanaToHiragana, "ア", "あ");

        let verdict = evaluate(&mut progress, &q, "あ", RewardMultiplier::Single).unwrap();

        assert!(verdict.is_correct);
        assert_eq!(verdict.streak, 1);
        assert_eq!(verdict.high_score, 1);
        assert_eq!(verdict.target, "ア");
        assert_eq!(progress.records.get("ア"), ProficiencyRecord::new(1, 1));
        assert_eq!(progress.records.get("あ"), ProficiencyRecord::default());
    }

    #[test]
    fn test_wrong_answer_breaks_streak() {
        let mut progress = Progress::zeroed();
        progress.session = SessionState::new(4, 4);
        let q = question(PracticeMode::HiraganaToRomaji, "し", "shi");

        let verdict = evaluate(&mut progress, &q, "chi", RewardMultiplier::Single).unwrap();

        assert!(!verdict.is_correct);
        assert_eq!(verdict.streak, 0);
        assert_eq!(verdict.high_score, 4);
        assert_eq!(verdict.record, ProficiencyRecord::new(0, 1));
        assert_eq!(verdict.previous, ProficiencyRecord::default());
    }

    #[test]
    fn test_romaji_prompt_tracks_romaji() {
        let mut progress = Progress::zeroed();
        let q = question(PracticeMode::RomajiToKatakana, "tsu", "ツ");
        evaluate(&mut progress, &q, "ツ", RewardMultiplier::Single).unwrap();
        assert_eq!(progress.records.get("tsu"), ProficiencyRecord::new(1, 1));
        assert_eq!(progress.records.get("ツ"), ProficiencyRecord::default());
    }

    #[test]
    fn test_triple_mode_counts_three() {
        let mut progress = Progress::zeroed();
        let q = question(PracticeMode::HiraganaToKatakana, "ぬ", "ヌ");

        evaluate(&mut progress, &q, "ヌ", RewardMultiplier::Triple).unwrap();
        assert_eq!(progress.records.get("ぬ"), ProficiencyRecord::new(3, 3));

        evaluate(&mut progress, &q, "メ", RewardMultiplier::Triple).unwrap();
        assert_eq!(progress.records.get("ぬ"), ProficiencyRecord::new(3, 6));
        // Streaks still move by one per answer.
        assert_eq!(progress.session, SessionState::new(0, 1));
    }

    #[test]
    fn test_unknown_prompt_changes_nothing() {
        let mut progress = Progress::zeroed();
        progress.session = SessionState::new(2, 3);
        let before = progress.clone();
        // A hiragana prompt under a katakana-source mode is not in the source table.
        let q = question(PracticeMode::KatakanaToHiragana, "あ", "あ");

        let result = evaluate(&mut progress, &q, "あ", RewardMultiplier::Single);

        assert_matches!(
            result,
            Err(DrillError::Lookup { ref prompt, script: Script::Katakana }) if prompt == "あ"
        );
        assert_eq!(progress, before);
    }

    #[test]
    fn test_highlight() {
        let mut progress = Progress::zeroed();
        let q = question(PracticeMode::KatakanaToHiragana, "カ", "か");
        let wrong = evaluate(&mut progress, &q, "が", RewardMultiplier::Single).unwrap();
        assert_eq!(wrong.highlight("か"), KeyHighlight::Correct);
        assert_eq!(wrong.highlight("が"), KeyHighlight::Wrong);
        assert_eq!(wrong.highlight("き"), KeyHighlight::Plain);

        let right = evaluate(&mut progress, &q, "か", RewardMultiplier::Single).unwrap();
        assert_eq!(right.highlight("か"), KeyHighlight::Correct);
    }

    #[test]
    fn test_multiplier_toggle() {
        assert_eq!(RewardMultiplier::default().increment(), 1);
        assert!(RewardMultiplier::Single.toggled().is_active());
        assert_eq!(RewardMultiplier::from(true), RewardMultiplier::Triple);
    }
}
