use crate::kana::table::unit_of;

/// Result of tapping a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// First tile of a pair is now held
    Selected(usize),
    /// Both tiles were the same sound and are gone
    Matched(usize, usize),
    /// Different sounds; both tiles are released
    Mismatched(usize, usize),
    /// Empty slot, out of range, or the held tile again
    Ignored,
}

/// Grid of tiles where two spellings of the same sound clear each other
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchBoard {
    rows: usize,
    cols: usize,
    tiles: Vec<Option<&'static str>>,
    held: Option<usize>,
}

/// Most square layout whose row count divides `n`
pub fn board_dimensions(n: usize) -> (usize, usize) {
    if n == 0 {
        return (0, 0);
    }
    let mut rows = ((n as f64).sqrt() as usize).max(1);
    while n % rows != 0 {
        rows -= 1;
    }
    (rows, n / rows)
}

impl MatchBoard {
    pub fn new(deck: Vec<&'static str>) -> Self {
        let (rows, cols) = board_dimensions(deck.len());
        Self {
            rows,
            cols,
            tiles: deck.into_iter().map(Some).collect(),
            held: None,
        }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn tile(&self, row: usize, col: usize) -> Option<&'static str> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.tiles.get(row * self.cols + col).copied().flatten()
    }

    pub fn held(&self) -> Option<usize> {
        self.held
    }

    pub fn select(&mut self, pos: usize) -> Selection {
        let Some(Some(character)) = self.tiles.get(pos).copied() else {
            return Selection::Ignored;
        };

        match self.held.take() {
            None => {
                self.held = Some(pos);
                Selection::Selected(pos)
            }
            Some(first) if first == pos => {
                self.held = Some(first);
                Selection::Ignored
            }
            Some(first) => {
                let first_char = self.tiles[first];
                let same_sound = match (first_char.and_then(unit_of), unit_of(character)) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                };
                if same_sound {
                    self.tiles[first] = None;
                    self.tiles[pos] = None;
                    Selection::Matched(first, pos)
                } else {
                    Selection::Mismatched(first, pos)
                }
            }
        }
    }

    pub fn remaining(&self) -> usize {
        self.tiles.iter().flatten().count()
    }

    pub fn is_cleared(&self) -> bool {
        self.remaining() == 0
    }
}
