use serde::{Deserialize, Serialize};

/// Streak bookkeeping for the learner across sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Consecutive correct answers since the last miss
    pub streak: u64,
    /// Longest streak ever reached; never decreases
    pub high_score: u64,
}

impl SessionState {
    pub fn new(streak: u64, high_score: u64) -> Self {
        Self {
            streak,
            high_score: high_score.max(streak),
        }
    }

    pub fn record_correct(&mut self) {
        self.streak += 1;
        if self.streak > self.high_score {
            self.high_score = self.streak;
        }
    }

    pub fn record_miss(&mut self) {
        self.streak = 0;
    }

    pub fn record(&mut self, was_correct: bool) {
        if was_correct {
            self.record_correct()
        } else {
            self.record_miss()
        }
    }
}
