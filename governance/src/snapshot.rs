//! Byte snapshots of the engine state.
//!
//! Listeners are not part of a snapshot; re-subscribe after loading.

use std::collections::HashMap;

use agora_types::Weight;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::admin::AdminAuthority;
use crate::engine::GovernanceEngine;
use crate::error::GovernanceError;
use crate::event::EventBus;
use crate::params::GovernanceParams;
use crate::registry::ProposalRegistry;
use crate::voting::VotingLedger;
use crate::weights::WeightLedger;

/// Bumped whenever the snapshot layout changes.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a, P> {
    version: u32,
    authority: &'a AdminAuthority,
    weights: &'a WeightLedger,
    votes: &'a VotingLedger,
    registry: &'a ProposalRegistry,
    params: &'a GovernanceParams,
    policy: &'a P,
}

#[derive(Deserialize)]
struct Snapshot<P> {
    version: u32,
    authority: AdminAuthority,
    weights: WeightLedger,
    votes: VotingLedger,
    registry: ProposalRegistry,
    params: GovernanceParams,
    policy: P,
}

impl<P: Serialize + DeserializeOwned> GovernanceEngine<P> {
    /// Serialize the full governance state.
    pub fn save_state(&self) -> Result<Vec<u8>, GovernanceError> {
        let snapshot = SnapshotRef {
            version: SNAPSHOT_VERSION,
            authority: &self.authority,
            weights: &self.weights,
            votes: &self.votes,
            registry: &self.registry,
            params: &self.params,
            policy: &self.policy,
        };
        bincode::serialize(&snapshot)
            .map_err(|e| GovernanceError::InvalidInput(format!("snapshot encode failed: {e}")))
    }

    /// Restore an engine from [`save_state`](Self::save_state) output.
    ///
    /// The decoded state is checked against the engine invariants before it
    /// is accepted.
    pub fn load_state(data: &[u8]) -> Result<Self, GovernanceError> {
        let snapshot: Snapshot<P> = bincode::deserialize(data)
            .map_err(|e| GovernanceError::InvalidInput(format!("snapshot decode failed: {e}")))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(GovernanceError::InvalidInput(format!(
                "unsupported snapshot version {} (expected {SNAPSHOT_VERSION})",
                snapshot.version
            )));
        }
        check_integrity(&snapshot)?;

        Ok(Self {
            authority: snapshot.authority,
            weights: snapshot.weights,
            votes: snapshot.votes,
            registry: snapshot.registry,
            params: snapshot.params,
            policy: snapshot.policy,
            events: EventBus::new(),
        })
    }
}

fn check_integrity<P>(snapshot: &Snapshot<P>) -> Result<(), GovernanceError> {
    let corrupt = |what: &str| GovernanceError::InvalidInput(format!("corrupt snapshot: {what}"));
    let authority = &snapshot.authority;

    if authority.admin().is_null() {
        return Err(corrupt("null admin"));
    }
    if authority.pending_admin().is_some_and(|p| p.is_null()) {
        return Err(corrupt("null pending admin"));
    }
    // Clearing the guardian stores `None`, never the null principal.
    if authority.whitelist_guardian().is_some_and(|g| g.is_null()) {
        return Err(corrupt("null whitelist guardian"));
    }
    snapshot.params.validate()?;

    let registry = &snapshot.registry;
    if !registry.ids_are_sequential() {
        return Err(corrupt("proposal ids out of sequence"));
    }
    if registry.iter().any(|p| p.end_time() <= p.start_time()) {
        return Err(corrupt("proposal ends before it starts"));
    }
    if snapshot.weights.recomputed_total() != Some(snapshot.weights.total_weight()) {
        return Err(corrupt("weight total mismatch"));
    }

    let votes = &snapshot.votes;
    if !votes.keys_match_records() {
        return Err(corrupt("vote stored under another key"));
    }
    let mut tallies: HashMap<u64, (Weight, Weight)> = HashMap::new();
    for record in votes.records() {
        if registry.get(record.proposal_id).is_err() {
            return Err(corrupt("vote for unknown proposal"));
        }
        let (yes, no) = tallies.entry(record.proposal_id).or_default();
        let side = if record.support { yes } else { no };
        *side = side
            .checked_add(record.weight)
            .ok_or_else(|| corrupt("vote weights overflow"))?;
    }
    for proposal in registry.iter() {
        let counted = tallies.get(&proposal.id()).copied().unwrap_or_default();
        if counted != (proposal.yes_votes(), proposal.no_votes()) {
            return Err(corrupt("tallies disagree with vote records"));
        }
    }
    Ok(())
}
