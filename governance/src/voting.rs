//! Vote accounting: one weighted vote per (proposal, voter).

use agora_types::{Principal, Timestamp, Weight};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::GovernanceError;
use crate::proposal::Proposal;
use crate::weights::WeightLedger;

/// Receipt of a cast vote. Never updated or removed once written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub proposal_id: u64,
    pub voter: Principal,
    pub support: bool,
    /// Weight counted, as read when the vote was cast.
    pub weight: Weight,
    pub cast_at: Timestamp,
}

/// Append-only set of vote records.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingLedger {
    records: HashMap<(u64, Principal), VoteRecord>,
}

impl VotingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_voted(&self, proposal_id: u64, voter: &Principal) -> bool {
        self.records.contains_key(&(proposal_id, *voter))
    }

    pub fn receipt(&self, proposal_id: u64, voter: &Principal) -> Option<&VoteRecord> {
        self.records.get(&(proposal_id, *voter))
    }

    /// Total number of votes cast across all proposals.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn records(&self) -> impl Iterator<Item = &VoteRecord> {
        self.records.values()
    }

    /// Every record is stored under its own (proposal, voter) key.
    pub(crate) fn keys_match_records(&self) -> bool {
        self.records
            .iter()
            .all(|(&(proposal_id, voter), r)| r.proposal_id == proposal_id && r.voter == voter)
    }

    /// Count `voter`'s current weight toward `proposal`.
    ///
    /// Every check runs before anything is written, so a rejected vote
    /// touches neither the record set nor the tallies.
    pub(crate) fn cast_vote(
        &mut self,
        proposal: &mut Proposal,
        weights: &WeightLedger,
        voter: Principal,
        support: bool,
        now: Timestamp,
    ) -> Result<VoteRecord, GovernanceError> {
        if !proposal.is_open(now) {
            return Err(GovernanceError::VotingClosed);
        }
        let weight = weights.weight_of(&voter);
        if weight.is_zero() {
            return Err(GovernanceError::Ineligible);
        }
        if self.has_voted(proposal.id, &voter) {
            return Err(GovernanceError::AlreadyVoted);
        }

        let tally = if support {
            &mut proposal.yes_votes
        } else {
            &mut proposal.no_votes
        };
        *tally = tally.checked_add(weight).ok_or(GovernanceError::Overflow)?;

        let record = VoteRecord {
            proposal_id: proposal.id,
            voter,
            support,
            weight,
            cast_at: now,
        };
        self.records.insert((proposal.id, voter), record);
        Ok(record)
    }
}
