//! Prometheus metrics for the governance host.
//!
//! The [`GovernanceMetrics`] struct owns a dedicated [`Registry`] that an
//! embedding server can encode into the Prometheus text exposition format.

use prometheus::{
    register_int_counter_with_registry, register_int_gauge_with_registry, Encoder, IntCounter,
    IntGauge, Opts, Registry, TextEncoder,
};

use crate::NodeError;

/// Which successful call a metric update refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    CreateProposal,
    CastVote,
    Finalize,
    Other,
}

pub struct GovernanceMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Proposals created.
    pub proposals_created: IntCounter,
    /// Votes accepted.
    pub votes_cast: IntCounter,
    /// Proposals finalized.
    pub proposals_finalized: IntCounter,
    /// Calls rejected with a governance error.
    pub calls_rejected: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Proposals ever created (the registry never shrinks).
    pub proposal_count: IntGauge,
}

impl GovernanceMetrics {
    /// Create a fresh set of metrics registered under a new [`Registry`].
    pub fn new() -> Result<Self, NodeError> {
        let registry = Registry::new();

        let proposals_created = register_int_counter_with_registry!(
            Opts::new("agora_proposals_created_total", "Total proposals created"),
            registry
        )?;
        let votes_cast = register_int_counter_with_registry!(
            Opts::new("agora_votes_cast_total", "Total votes accepted"),
            registry
        )?;
        let proposals_finalized = register_int_counter_with_registry!(
            Opts::new(
                "agora_proposals_finalized_total",
                "Total proposals finalized"
            ),
            registry
        )?;
        let calls_rejected = register_int_counter_with_registry!(
            Opts::new(
                "agora_calls_rejected_total",
                "Total governance calls rejected"
            ),
            registry
        )?;
        let proposal_count = register_int_gauge_with_registry!(
            Opts::new("agora_proposal_count", "Number of proposals in the registry"),
            registry
        )?;

        Ok(Self {
            registry,
            proposals_created,
            votes_cast,
            proposals_finalized,
            calls_rejected,
            proposal_count,
        })
    }

    /// Record the result of one call.
    pub fn observe(&self, kind: CallKind, succeeded: bool, proposal_count: u64) {
        if !succeeded {
            self.calls_rejected.inc();
            return;
        }
        match kind {
            CallKind::CreateProposal => self.proposals_created.inc(),
            CallKind::CastVote => self.votes_cast.inc(),
            CallKind::Finalize => self.proposals_finalized.inc(),
            CallKind::Other => {}
        }
        self.proposal_count
            .set(i64::try_from(proposal_count).unwrap_or(i64::MAX));
    }

    /// Render every metric in the Prometheus text format.
    pub fn encode(&self) -> Result<String, NodeError> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| NodeError::Config(e.to_string()))
    }
}
