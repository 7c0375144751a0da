//! Test helpers shared across docbench crates.

pub mod store;

pub use store::{FailingStore, RecordingStore, seeded_memory_store};
