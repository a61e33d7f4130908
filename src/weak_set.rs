use crate::evaluator::DrillError;
use crate::kana::table::{unit_of, units};
use crate::matching::MatchBoard;
use crate::proficiency::ProficiencyTable;
use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;

/// Records need more than this many attempts before they are ranked
const MIN_ATTEMPTS: u64 = 1;

/// Characters in tie-break order: sound units in chart order, and within a
/// unit hiragana, katakana, romaji
fn ranking_order() -> impl Iterator<Item = &'static str> {
    units().flat_map(|unit| unit.members())
}

/// The `n` lowest-accuracy characters with more than one attempt, weakest first.
/// Equal accuracies keep chart order.
pub fn select_weak(records: &ProficiencyTable, n: usize) -> Vec<&'static str> {
    ranking_order()
        .filter_map(|c| {
            let record = records.get(c);
            if record.total() > MIN_ATTEMPTS {
                record.accuracy().map(|acc| (c, acc))
            } else {
                None
            }
        })
        // sorted_by is stable, which is what keeps ties in chart order
        .sorted_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .take(n)
        .map(|(c, _)| c)
        .collect()
}

/// A matching-game deck built from the weakest characters
#[derive(Debug, Clone, PartialEq)]
pub struct FocusedReview {
    /// Weakest first
    pub weak: Vec<&'static str>,
    /// Shuffled tiles; always an even count
    pub deck: Vec<&'static str>,
}

impl FocusedReview {
    /// For each weak character take its whole sound unit plus one random
    /// member of it, then double the list and shuffle.
    pub fn build<R: Rng + ?Sized>(
        records: &ProficiencyTable,
        n: usize,
        rng: &mut R,
    ) -> Result<Self, DrillError> {
        let weak = select_weak(records, n);
        if weak.is_empty() {
            return Err(DrillError::InsufficientData);
        }

        let mut deck = Vec::with_capacity(weak.len() * 8);
        for unit in weak.iter().filter_map(|c| unit_of(c)) {
            let members = unit.members();
            deck.extend(members);
            if let Some(extra) = members.choose(rng) {
                deck.push(*extra);
            }
        }

        let mut doubled = deck.clone();
        doubled.extend(deck);
        doubled.shuffle(rng);

        Ok(Self {
            weak,
            deck: doubled,
        })
    }

    /// Display weight per weak character: 1 for the weakest, then 1/2, 1/3, ...
    pub fn weights(&self) -> Vec<(&'static str, f64)> {
        self.weak
            .iter()
            .enumerate()
            .map(|(rank, c)| (*c, 1.0 / (rank as f64 + 1.0)))
            .collect()
    }

    pub fn board(&self) -> MatchBoard {
        MatchBoard::new(self.deck.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kana::lookup;
    use crate::proficiency::ProficiencyRecord;
    use assert_matches::assert_matches;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_weak_ordering_excludes_small_samples() {
        let mut records = ProficiencyTable::zeroed();
        records.insert("あ", ProficiencyRecord::new(1, 2));
        records.insert("い", ProficiencyRecord::new(4, 5));
        records.insert("う", ProficiencyRecord::new(0, 0));
        records.insert("え", ProficiencyRecord::new(1, 3));

        assert_eq!(select_weak(&records, 2), vec!["え", "あ"]);
        assert_eq!(select_weak(&records, 10), vec!["え", "あ", "い"]);
    }

    #[test]
    fn test_single_attempt_is_not_ranked() {
        let mut records = ProficiencyTable::zeroed();
        records.insert("か", ProficiencyRecord::new(0, 1));
        assert!(select_weak(&records, 5).is_empty());
    }

    #[test]
    fn test_ties_keep_chart_order() {
        let mut records = ProficiencyTable::zeroed();
        records.insert("ko", ProficiencyRecord::new(1, 2));
        records.insert("カ", ProficiencyRecord::new(1, 2));
        records.insert("こ", ProficiencyRecord::new(1, 2));
        records.insert("か", ProficiencyRecord::new(1, 2));

        assert_eq!(select_weak(&records, 4), vec!["か", "カ", "こ", "ko"]);
    }

    #[test]
    fn test_zero_requested() {
        let mut records = ProficiencyTable::zeroed();
        records.insert("あ", ProficiencyRecord::new(0, 4));
        assert!(select_weak(&records, 0).is_empty());
    }

    #[test]
    fn test_review_without_data() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_matches!(
            FocusedReview::build(&ProficiencyTable::zeroed(), 10, &mut rng),
            Err(DrillError::InsufficientData)
        );
    }

    #[test]
    fn test_review_deck_shape() {
        let mut records = ProficiencyTable::zeroed();
        records.insert("ヌ", ProficiencyRecord::new(0, 3));
        records.insert("fu", ProficiencyRecord::new(1, 4));
        let mut rng = StdRng::seed_from_u64(3);

        let review = FocusedReview::build(&records, 10, &mut rng).unwrap();

        assert_eq!(review.weak, vec!["ヌ", "fu"]);
        assert_eq!(review.deck.len(), 16);
        assert_eq!(review.deck.len() % 2, 0);

        let nu = lookup("nu").unwrap();
        let fu = lookup("fu").unwrap();
        assert_eq!(review.deck.iter().filter(|c| nu.contains(c)).count(), 8);
        assert_eq!(review.deck.iter().filter(|c| fu.contains(c)).count(), 8);
        for member in nu.members().into_iter().chain(fu.members()) {
            assert!(review.deck.iter().filter(|c| **c == member).count() >= 2);
        }
    }

    #[test]
    fn test_weights_fall_off_by_rank() {
        let review = FocusedReview {
            weak: vec!["あ", "イ", "u"],
            deck: vec![],
        };
        assert_eq!(
            review.weights(),
            vec![("あ", 1.0), ("イ", 0.5), ("u", 1.0 / 3.0)]
        );
    }
}
