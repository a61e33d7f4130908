//! The compiled-in kana chart.
//!
//! The three scripts are stored as positionally aligned arrays, so index `i`
//! names the same sound in every script. Grid layout (the 5x10 chart plus the
//! trailing ん row) is kept separately as indices into those arrays.

use serde::{Deserialize, Serialize};

pub const KANA_COUNT: usize = 46;

pub const HIRAGANA: [&str; KANA_COUNT] = [
    "あ", "い", "う", "え", "お", //
    "か", "き", "く", "け", "こ", //
    "さ", "し", "す", "せ", "そ", //
    "た", "ち", "つ", "て", "と", //
    "な", "に", "ぬ", "ね", "の", //
    "は", "ひ", "ふ", "へ", "ほ", //
    "ま", "み", "む", "め", "も", //
    "や", "ゆ", "よ", //
    "ら", "り", "る", "れ", "ろ", //
    "わ", "を", //
    "ん",
];

pub const KATAKANA: [&str; KANA_COUNT] = [
    "ア", "イ", "ウ", "エ", "オ", //
    "カ", "キ", "ク", "ケ", "コ", //
    "サ", "シ", "ス", "セ", "ソ", //
    "タ", "チ", "ツ", "テ", "ト", //
    "ナ", "ニ", "ヌ", "ネ", "ノ", //
    "ハ", "ヒ", "フ", "ヘ", "ホ", //
    "マ", "ミ", "ム", "メ", "モ", //
    "ヤ", "ユ", "ヨ", //
    "ラ", "リ", "ル", "レ", "ロ", //
    "ワ", "ヲ", //
    "ン",
];

pub const ROMAJI: [&str; KANA_COUNT] = [
    "a", "i", "u", "e", "o", //
    "ka", "ki", "ku", "ke", "ko", //
    "sa", "shi", "su", "se", "so", //
    "ta", "chi", "tsu", "te", "to", //
    "na", "ni", "nu", "ne", "no", //
    "ha", "hi", "fu", "he", "ho", //
    "ma", "mi", "mu", "me", "mo", //
    "ya", "yu", "yo", //
    "ra", "ri", "ru", "re", "ro", //
    "wa", "wo", //
    "n",
];

/// Chart rows as indices into the script arrays; `None` is a blank cell.
const LAYOUT: [&[Option<usize>]; 11] = [
    &[Some(0), Some(1), Some(2), Some(3), Some(4)],
    &[Some(5), Some(6), Some(7), Some(8), Some(9)],
    &[Some(10), Some(11), Some(12), Some(13), Some(14)],
    &[Some(15), Some(16), Some(17), Some(18), Some(19)],
    &[Some(20), Some(21), Some(22), Some(23), Some(24)],
    &[Some(25), Some(26), Some(27), Some(28), Some(29)],
    &[Some(30), Some(31), Some(32), Some(33), Some(34)],
    &[Some(35), None, Some(36), None, Some(37)],
    &[Some(38), Some(39), Some(40), Some(41), Some(42)],
    &[Some(43), None, None, None, Some(44)],
    &[Some(45)],
];

/// One of the three writing systems a character can belong to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Script {
    Hiragana,
    Katakana,
    Romaji,
}

impl Script {
    pub const ALL: [Script; 3] = [Script::Hiragana, Script::Katakana, Script::Romaji];

    /// The aligned character sequence for this script
    pub fn characters(self) -> &'static [&'static str; KANA_COUNT] {
        match self {
            Script::Hiragana => &HIRAGANA,
            Script::Katakana => &KATAKANA,
            Script::Romaji => &ROMAJI,
        }
    }

    pub fn get(self, index: usize) -> Option<&'static str> {
        self.characters().get(index).copied()
    }

    /// Index of `character` in this script, matching the exact string
    pub fn position(self, character: &str) -> Option<usize> {
        self.characters().iter().position(|c| *c == character)
    }

    /// Chart rows for this script with blank cells preserved
    pub fn rows(self) -> Vec<Vec<Option<&'static str>>> {
        let chars = self.characters();
        LAYOUT
            .iter()
            .map(|row| row.iter().map(|cell| cell.map(|i| chars[i])).collect())
            .collect()
    }
}

/// A single sound written in all three scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundUnit {
    pub hiragana: &'static str,
    pub katakana: &'static str,
    pub romaji: &'static str,
}

impl SoundUnit {
    pub fn at(index: usize) -> Option<Self> {
        Some(Self {
            hiragana: *HIRAGANA.get(index)?,
            katakana: *KATAKANA.get(index)?,
            romaji: *ROMAJI.get(index)?,
        })
    }

    pub fn get(&self, script: Script) -> &'static str {
        match script {
            Script::Hiragana => self.hiragana,
            Script::Katakana => self.katakana,
            Script::Romaji => self.romaji,
        }
    }

    /// Members in hiragana, katakana, romaji order
    pub fn members(&self) -> [&'static str; 3] {
        [self.hiragana, self.katakana, self.romaji]
    }

    pub fn contains(&self, character: &str) -> bool {
        self.members().contains(&character)
    }
}

/// All sound units in chart order
pub fn units() -> impl Iterator<Item = SoundUnit> {
    (0..KANA_COUNT).filter_map(SoundUnit::at)
}

/// Look up a sound by its romaji key
pub fn lookup(romaji: &str) -> Option<SoundUnit> {
    Script::Romaji.position(romaji).and_then(SoundUnit::at)
}

/// The sound unit that `character` belongs to, in whichever script it is written
pub fn unit_of(character: &str) -> Option<SoundUnit> {
    Script::ALL
        .iter()
        .find_map(|script| script.position(character))
        .and_then(SoundUnit::at)
}

/// Every tracked character: all hiragana, then all katakana, then all romaji
pub fn all_characters() -> impl Iterator<Item = &'static str> {
    HIRAGANA
        .iter()
        .chain(KATAKANA.iter())
        .chain(ROMAJI.iter())
        .copied()
}
