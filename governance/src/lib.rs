//! Governance engine for Agora.
//!
//! Time-boxed proposals, token-weighted voting and a two-phase transfer of
//! administrative authority with a guardian override.
//!
//! Components, leaf first:
//! - [`WeightLedger`]: principal → voting weight, set by the admin.
//! - [`VotingLedger`]: one weighted vote per (proposal, voter).
//! - [`ProposalRegistry`]: append-only proposals and their lifecycle.
//! - [`AdminAuthority`]: gates administrative calls on the others.
//!
//! [`GovernanceEngine`] owns all four. It never reads a clock or an ambient
//! sender: caller and time are parameters of every call.

pub mod admin;
pub mod engine;
pub mod error;
pub mod event;
pub mod params;
pub mod proposal;
pub mod registry;
pub mod snapshot;
pub mod voting;
pub mod weights;
pub mod whitelist;

pub use admin::AdminAuthority;
pub use engine::GovernanceEngine;
pub use error::GovernanceError;
pub use event::{EventBus, GovernanceEvent};
pub use params::GovernanceParams;
pub use proposal::{Proposal, ProposalOutcome, ProposalPhase};
pub use registry::ProposalRegistry;
pub use voting::{VoteRecord, VotingLedger};
pub use weights::WeightLedger;
pub use whitelist::Whitelist;
