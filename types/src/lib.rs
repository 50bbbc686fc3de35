//! Fundamental types for the Agora governance engine.
//!
//! This crate defines the boundary types shared by every other crate in the
//! workspace: principals, voting weights, timestamps and the time source
//! abstraction the hosting layer reads the clock through.

pub mod error;
pub mod principal;
pub mod time;
pub mod weight;

pub use error::TypesError;
pub use principal::Principal;
pub use time::{format_duration, SystemClock, TimeSource, Timestamp};
pub use weight::Weight;
