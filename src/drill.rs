//! A practice session: the current question, the answer keyboard, and the
//! learner's progress, with persistence delegated to a [`ProgressStore`].

use crate::evaluator::{evaluate, DrillError, Question, RewardMultiplier, Verdict};
use crate::kana::{Keyboard, PracticeMode, KANA_COUNT};
use crate::proficiency::{MapCell, ProficiencyTable};
use crate::session::SessionState;
use crate::store::{Progress, ProgressStore, StoreError};
use crate::weak_set::{select_weak, FocusedReview};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug)]
pub struct Drill<S: ProgressStore> {
    store: S,
    progress: Progress,
    multiplier: RewardMultiplier,
    question: Question,
    keyboard: Keyboard,
    rng: StdRng,
    /// Save after this many answers; 0 saves only on demand
    autosave_every: usize,
    unsaved_answers: usize,
}

impl<S: ProgressStore> Drill<S> {
    /// Load progress from `store` and pose a first question in `mode`
    pub fn new(store: S, mode: PracticeMode) -> Self {
        Self::with_rng(store, mode, StdRng::from_entropy())
    }

    pub fn with_rng(mut store: S, mode: PracticeMode, mut rng: StdRng) -> Self {
        let progress = store.load();
        let index = rng.gen_range(0..KANA_COUNT);
        let question = pose(0, mode, index);
        Self {
            store,
            progress,
            multiplier: RewardMultiplier::Single,
            question,
            keyboard: Keyboard::new(mode.target()),
            rng,
            autosave_every: 0,
            unsaved_answers: 0,
        }
    }

    pub fn set_autosave_every(&mut self, answers: usize) {
        self.autosave_every = answers;
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn mode(&self) -> PracticeMode {
        self.question.mode
    }

    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn records(&self) -> &ProficiencyTable {
        &self.progress.records
    }

    pub fn session(&self) -> SessionState {
        self.progress.session
    }

    pub fn multiplier(&self) -> RewardMultiplier {
        self.multiplier
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Answers not yet written to the store
    pub fn unsaved_answers(&self) -> usize {
        self.unsaved_answers
    }

    /// Draw a random kana and make it the current question
    pub fn new_question(&mut self, mode: PracticeMode) -> &Question {
        let index = self.rng.gen_range(0..KANA_COUNT);
        self.replace_question(mode, index)
    }

    /// Make kana `index` the current question
    pub fn ask(&mut self, mode: PracticeMode, index: usize) -> Result<&Question, DrillError> {
        if index >= KANA_COUNT {
            return Err(DrillError::IndexOutOfRange(index));
        }
        Ok(self.replace_question(mode, index))
    }

    /// Reverse the current mode and draw a new question
    pub fn swap_mode(&mut self) -> &Question {
        let mode = self.mode().swapped();
        self.new_question(mode)
    }

    /// Pick any of the six modes and draw a new question
    pub fn random_mode(&mut self) -> &Question {
        let mode = PracticeMode::random(&mut self.rng);
        self.new_question(mode)
    }

    /// Flip triple mode; the keyboard is shuffled while it is on
    pub fn toggle_triple(&mut self) -> RewardMultiplier {
        self.set_multiplier(self.multiplier.toggled());
        self.multiplier
    }

    pub fn set_multiplier(&mut self, multiplier: RewardMultiplier) {
        self.multiplier = multiplier;
        self.rebuild_keyboard();
    }

    /// Score `answer` against the current question. The question stays current
    /// until the caller draws a new one, so repeated taps keep scoring it.
    pub fn submit(&mut self, answer: &str) -> Result<Verdict, DrillError> {
        let verdict = evaluate(&mut self.progress, &self.question, answer, self.multiplier)?;
        self.unsaved_answers += 1;

        if self.autosave_every > 0 && self.unsaved_answers >= self.autosave_every {
            if let Err(e) = self.save() {
                log::warn!("autosave failed, will retry: {e}");
            }
        }

        Ok(verdict)
    }

    /// Lowest-accuracy characters, weakest first
    pub fn select_weak(&self, n: usize) -> Vec<&'static str> {
        select_weak(&self.progress.records, n)
    }

    pub fn focused_review(&mut self, n: usize) -> Result<FocusedReview, DrillError> {
        FocusedReview::build(&self.progress.records, n, &mut self.rng)
    }

    /// Proficiency of the script this mode is scored against, on the chart grid
    pub fn proficiency_map(&self) -> Vec<Vec<Option<MapCell>>> {
        self.progress.records.map_rows(self.mode().source())
    }

    /// Write the full progress to the store
    pub fn save(&mut self) -> Result<(), StoreError> {
        self.store.save(&self.progress)?;
        self.unsaved_answers = 0;
        Ok(())
    }

    /// Zero all counters and the streak, in memory and in the store. Memory is
    /// cleared even if the store write fails; the next save retries it.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.progress = Progress::zeroed();
        match self.store.reset() {
            Ok(progress) => {
                self.progress = progress;
                self.unsaved_answers = 0;
                log::info!("progress reset");
                Ok(())
            }
            Err(e) => {
                self.unsaved_answers += 1;
                Err(e)
            }
        }
    }

    fn replace_question(&mut self, mode: PracticeMode, index: usize) -> &Question {
        self.question = pose(self.question.id + 1, mode, index);
        self.rebuild_keyboard();
        &self.question
    }

    fn rebuild_keyboard(&mut self) {
        let script = self.mode().target();
        let shuffled = self.multiplier.is_active();
        if self.keyboard.script == script && self.keyboard.shuffled == shuffled {
            return;
        }
        self.keyboard = if shuffled {
            Keyboard::shuffled(script, &mut self.rng)
        } else {
            Keyboard::new(script)
        };
    }
}

/// `index` must be below KANA_COUNT
fn pose(id: u64, mode: PracticeMode, index: usize) -> Question {
    Question {
        id,
        mode,
        prompt: mode.source().characters()[index].to_string(),
        expected: mode.target().characters()[index].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kana::Script;
    use crate::proficiency::ProficiencyRecord;
    use crate::store::MemoryStore;
    use assert_matches::assert_matches;

    fn drill(mode: PracticeMode) -> Drill<MemoryStore> {
        Drill::with_rng(MemoryStore::new(), mode, StdRng::seed_from_u64(11))
    }

    #[test]
    fn test_first_question_matches_mode() {
        let d = drill(PracticeMode::HiraganaToRomaji);
        let q = d.question();
        let i = Script::Hiragana.position(&q.prompt).unwrap();
        assert_eq!(q.expected, Script::Romaji.characters()[i]);
        assert_eq!(d.keyboard().script, Script::Romaji);
    }

    #[test]
    fn test_new_question_is_aligned_and_fresh() {
        let mut d = drill(PracticeMode::KatakanaToHiragana);
        for mode in PracticeMode::ALL {
            let previous_id = d.question().id;
            let q = d.new_question(mode).clone();
            assert!(q.id > previous_id);
            let i = mode.source().position(&q.prompt).unwrap();
            assert_eq!(mode.target().get(i), Some(q.expected.as_str()));
            assert_eq!(d.keyboard().script, mode.target());
        }
    }

    #[test]
    fn test_ask_specific_index() {
        let mut d = drill(PracticeMode::KatakanaToHiragana);
        let q = d.ask(PracticeMode::KatakanaToHiragana, 0).unwrap();
        assert_eq!(q.prompt, "ア");
        assert_eq!(q.expected, "あ");
        assert_matches!(
            d.ask(PracticeMode::KatakanaToHiragana, KANA_COUNT),
            Err(DrillError::IndexOutOfRange(46))
        );
    }

    #[test]
    fn test_fresh_scenario_katakana_to_hiragana() {
        let mut d = drill(PracticeMode::KatakanaToHiragana);
        d.ask(PracticeMode::KatakanaToHiragana, 0).unwrap();

        let v = d.submit("あ").unwrap();

        assert!(v.is_correct);
        assert_eq!(v.streak, 1);
        assert_eq!(d.records().get("ア"), ProficiencyRecord::new(1, 1));
    }

    #[test]
    fn test_second_tap_scores_same_question() {
        let mut d = drill(PracticeMode::HiraganaToKatakana);
        d.ask(PracticeMode::HiraganaToKatakana, 1).unwrap();
        let id = d.question().id;

        d.submit("ア").unwrap();
        let v = d.submit("イ").unwrap();

        assert_eq!(v.question_id, id);
        assert_eq!(d.records().get("い"), ProficiencyRecord::new(1, 2));
        assert_eq!(d.session(), SessionState::new(1, 1));
    }

    #[test]
    fn test_swap_and_random_mode() {
        let mut d = drill(PracticeMode::RomajiToHiragana);
        assert_eq!(d.swap_mode().mode, PracticeMode::HiraganaToRomaji);
        assert_eq!(d.swap_mode().mode, PracticeMode::RomajiToHiragana);

        let mode = d.random_mode().mode;
        assert!(PracticeMode::ALL.contains(&mode));
        assert_eq!(d.keyboard().script, mode.target());
    }

    #[test]
    fn test_triple_mode_shuffles_keyboard_and_triples_counts() {
        let mut d = drill(PracticeMode::KatakanaToRomaji);
        assert_eq!(d.toggle_triple(), RewardMultiplier::Triple);
        assert!(d.keyboard().shuffled);

        d.ask(PracticeMode::KatakanaToRomaji, 5).unwrap();
        d.submit("ka").unwrap();
        assert_eq!(d.records().get("カ"), ProficiencyRecord::new(3, 3));

        assert_eq!(d.toggle_triple(), RewardMultiplier::Single);
        assert!(!d.keyboard().shuffled);
    }

    #[test]
    fn test_autosave_batches_answers() {
        let mut d = drill(PracticeMode::KatakanaToHiragana);
        d.set_autosave_every(2);

        d.submit("x").unwrap();
        assert_eq!(d.store().saves, 0);
        assert_eq!(d.unsaved_answers(), 1);

        d.submit("x").unwrap();
        assert_eq!(d.store().saves, 1);
        assert_eq!(d.unsaved_answers(), 0);
        assert_eq!(d.store().saved.as_ref(), Some(d.progress()));
    }

    #[test]
    fn test_reset_zeroes_and_persists() {
        let mut d = drill(PracticeMode::KatakanaToHiragana);
        d.ask(PracticeMode::KatakanaToHiragana, 0).unwrap();
        d.submit("あ").unwrap();

        d.reset().unwrap();

        assert_eq!(d.progress(), &Progress::zeroed());
        assert_eq!(d.store().saved, Some(Progress::zeroed()));
    }

    #[test]
    fn test_reset_clears_memory_when_store_fails() {
        let store = MemoryStore {
            fail_writes: true,
            ..MemoryStore::default()
        };
        let mut d = Drill::with_rng(store, PracticeMode::KatakanaToHiragana, StdRng::seed_from_u64(2));
        d.ask(PracticeMode::KatakanaToHiragana, 0).unwrap();
        d.submit("あ").unwrap();

        assert_matches!(d.reset(), Err(StoreError::WriteFailure { .. }));
        assert_eq!(d.progress(), &Progress::zeroed());
        assert!(d.unsaved_answers() > 0);
    }

    #[test]
    fn test_focused_review_needs_data() {
        let mut d = drill(PracticeMode::KatakanaToHiragana);
        assert_matches!(d.focused_review(10), Err(DrillError::InsufficientData));

        d.ask(PracticeMode::KatakanaToHiragana, 2).unwrap();
        d.submit("x").unwrap();
        d.submit("う").unwrap();
        assert_eq!(d.select_weak(10), vec!["ウ"]);
        let review = d.focused_review(10).unwrap();
        assert_eq!(review.deck.len(), 8);
    }

    #[test]
    fn test_proficiency_map_uses_prompt_script() {
        let mut d = drill(PracticeMode::RomajiToKatakana);
        d.ask(PracticeMode::RomajiToKatakana, 0).unwrap();
        d.submit("ア").unwrap();
        let map = d.proficiency_map();
        let a = map[0][0].unwrap();
        assert_eq!(a.character, "a");
        assert_eq!(a.percentage, 100.0);
    }

    #[test]
    fn test_loads_existing_progress() {
        let mut progress = Progress::zeroed();
        progress.session = SessionState::new(3, 8);
        let d = Drill::with_rng(
            MemoryStore::with_progress(progress.clone()),
            PracticeMode::KatakanaToHiragana,
            StdRng::seed_from_u64(5),
        );
        assert_eq!(d.progress(), &progress);
    }
}
