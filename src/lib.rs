// Library surface for the binary and the integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod drill;
pub mod evaluator;
pub mod kana;
pub mod matching;
pub mod proficiency;
pub mod render;
pub mod runtime;
pub mod session;
pub mod snapshot;
pub mod stats;
pub mod store;
pub mod util;
pub mod weak_set;
