use super::table::Script;
use rand::seq::SliceRandom;
use rand::Rng;

/// Answer keyboard laid out on the kana chart grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyboard {
    pub script: Script,
    pub shuffled: bool,
    rows: Vec<Vec<Option<&'static str>>>,
}

impl Keyboard {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            shuffled: false,
            rows: script.rows(),
        }
    }

    /// Same cells as `new`, with the characters permuted among the non-blank cells
    pub fn shuffled<R: Rng + ?Sized>(script: Script, rng: &mut R) -> Self {
        let mut chars: Vec<&'static str> = script.characters().to_vec();
        chars.shuffle(rng);
        let mut chars = chars.into_iter();

        let rows = script
            .rows()
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| cell.and_then(|_| chars.next()))
                    .collect()
            })
            .collect();

        Self {
            script,
            shuffled: true,
            rows,
        }
    }

    pub fn rows(&self) -> &[Vec<Option<&'static str>>] {
        &self.rows
    }

    /// Keys in reading order, blanks skipped
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rows.iter().flat_map(|row| row.iter().flatten().copied())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys().any(|k| k == key)
    }
}
