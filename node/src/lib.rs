//! Hosting layer for the Agora governance engine.
//!
//! The engine itself is single-threaded and clock-free. This crate provides
//! what a host process needs around it:
//! - [`SharedEngine`]: one mutex around the whole engine, clock reads
//!   inside the lock
//! - [`NodeConfig`]: TOML configuration
//! - [`init_logging`]: tracing subscriber setup
//! - [`GovernanceMetrics`]: Prometheus counters
//! - snapshot files for restarts

pub mod config;
pub mod error;
pub mod event_log;
pub mod logging;
pub mod metrics;
pub mod shared;
pub mod snapshot;
pub mod tracing_spans;

pub use config::NodeConfig;
pub use error::NodeError;
pub use event_log::attach_event_log;
pub use logging::{init_logging, LogFormat};
pub use metrics::GovernanceMetrics;
pub use shared::SharedEngine;
