pub mod keyboard;
pub mod mode;
pub mod table;

pub use keyboard::Keyboard;
pub use mode::PracticeMode;
pub use table::{lookup, unit_of, Script, SoundUnit, KANA_COUNT};
