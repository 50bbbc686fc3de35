//! Nullable infrastructure for deterministic testing.
//!
//! External inputs the engine depends on are abstracted behind traits in
//! `agora-types`. This crate provides test-friendly implementations that
//! return deterministic values and can be driven programmatically.

pub mod clock;

pub use clock::NullClock;
