use super::table::Script;
use clap::ValueEnum;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Which script is shown as the prompt and which one answers it
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
pub enum PracticeMode {
    #[default]
    #[serde(rename = "kata-hira")]
    #[value(name = "kata-hira")]
    #[strum(serialize = "kata-hira")]
    KatakanaToHiragana,
    #[serde(rename = "hira-kata")]
    #[value(name = "hira-kata")]
    #[strum(serialize = "hira-kata")]
    HiraganaToKatakana,
    #[serde(rename = "hira-roma")]
    #[value(name = "hira-roma")]
    #[strum(serialize = "hira-roma")]
    HiraganaToRomaji,
    #[serde(rename = "roma-hira")]
    #[value(name = "roma-hira")]
    #[strum(serialize = "roma-hira")]
    RomajiToHiragana,
    #[serde(rename = "kata-roma")]
    #[value(name = "kata-roma")]
    #[strum(serialize = "kata-roma")]
    KatakanaToRomaji,
    #[serde(rename = "roma-kata")]
    #[value(name = "roma-kata")]
    #[strum(serialize = "roma-kata")]
    RomajiToKatakana,
}

impl PracticeMode {
    pub const ALL: [PracticeMode; 6] = [
        PracticeMode::KatakanaToHiragana,
        PracticeMode::HiraganaToKatakana,
        PracticeMode::HiraganaToRomaji,
        PracticeMode::RomajiToHiragana,
        PracticeMode::KatakanaToRomaji,
        PracticeMode::RomajiToKatakana,
    ];

    /// Script of the prompt; statistics are tracked against it
    pub fn source(self) -> Script {
        self.scripts().0
    }

    /// Script of the answer keyboard
    pub fn target(self) -> Script {
        self.scripts().1
    }

    pub fn scripts(self) -> (Script, Script) {
        match self {
            PracticeMode::KatakanaToHiragana => (Script::Katakana, Script::Hiragana),
            PracticeMode::HiraganaToKatakana => (Script::Hiragana, Script::Katakana),
            PracticeMode::HiraganaToRomaji => (Script::Hiragana, Script::Romaji),
            PracticeMode::RomajiToHiragana => (Script::Romaji, Script::Hiragana),
            PracticeMode::KatakanaToRomaji => (Script::Katakana, Script::Romaji),
            PracticeMode::RomajiToKatakana => (Script::Romaji, Script::Katakana),
        }
    }

    pub fn from_scripts(source: Script, target: Script) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.scripts() == (source, target))
    }

    /// "A-B" becomes "B-A"
    pub fn swapped(self) -> Self {
        let (source, target) = self.scripts();
        // Every ordered pair of distinct scripts is a mode, so the reverse always exists.
        Self::from_scripts(target, source).unwrap_or(self)
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&Self::KatakanaToHiragana)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_modes_cover_every_ordered_pair() {
        let pairs: HashSet<(Script, Script)> =
            PracticeMode::ALL.iter().map(|m| m.scripts()).collect();
        assert_eq!(pairs.len(), 6);
        for mode in PracticeMode::ALL {
            assert_ne!(mode.source(), mode.target());
        }
    }

    #[test]
    fn test_swap_reverses_and_is_involutive() {
        assert_eq!(
            PracticeMode::KatakanaToHiragana.swapped(),
            PracticeMode::HiraganaToKatakana
        );
        assert_eq!(
            PracticeMode::RomajiToKatakana.swapped(),
            PracticeMode::KatakanaToRomaji
        );
        for mode in PracticeMode::ALL {
            assert_eq!(mode.swapped().swapped(), mode);
        }
    }

    #[test]
    fn test_random_draws_every_mode() {
        let mut rng = StdRng::seed_from_u64(7);
        let seen: HashSet<PracticeMode> =
            (0..200).map(|_| PracticeMode::random(&mut rng)).collect();
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_names_roundtrip_through_serde_and_display() {
        for mode in PracticeMode::ALL {
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{mode}\""));
            let back: PracticeMode = serde_json::from_str(&json).unwrap();
            assert_eq!(back, mode);
            assert_eq!(PracticeMode::from_str(&mode.to_string(), true), Ok(mode));
        }
    }

    #[test]
    fn test_default_mode() {
        assert_eq!(PracticeMode::default(), PracticeMode::KatakanaToHiragana);
    }
}
