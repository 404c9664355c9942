//! Test fixtures and mock collaborators.
//!
//! Shared by the crate's own tests and benchmarks, and usable by hosts
//! that want to exercise the engine without a real page.

mod fixtures;
mod mocks;

pub use fixtures::{append_hidden_paragraph, append_paragraph, article};
pub use mocks::{manual_signal, ManualSignal, ManualTrigger, RecordingScroller};
