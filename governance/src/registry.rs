//! Append-only proposal registry.
//!
//! Ids are the index into the backing vector, so they start at zero, never
//! skip and never get reused.

use agora_types::{Principal, Timestamp, Weight};
use serde::{Deserialize, Serialize};

use crate::error::GovernanceError;
use crate::params::GovernanceParams;
use crate::proposal::{Proposal, ProposalOutcome, ProposalPhase};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRegistry {
    proposals: Vec<Proposal>,
}

impl ProposalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of proposals ever created; also the next id.
    pub fn proposal_count(&self) -> u64 {
        self.proposals.len() as u64
    }

    pub fn get(&self, id: u64) -> Result<&Proposal, GovernanceError> {
        usize::try_from(id)
            .ok()
            .and_then(|idx| self.proposals.get(idx))
            .ok_or(GovernanceError::NotFound(id))
    }

    pub(crate) fn get_mut(&mut self, id: u64) -> Result<&mut Proposal, GovernanceError> {
        usize::try_from(id)
            .ok()
            .and_then(|idx| self.proposals.get_mut(idx))
            .ok_or(GovernanceError::NotFound(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.iter()
    }

    pub fn phase(&self, id: u64, now: Timestamp) -> Result<ProposalPhase, GovernanceError> {
        Ok(self.get(id)?.phase(now))
    }

    /// Open a new proposal whose window starts at `now`.
    pub(crate) fn create(
        &mut self,
        proposer: Principal,
        description: String,
        voting_period: u64,
        now: Timestamp,
        params: &GovernanceParams,
    ) -> Result<&Proposal, GovernanceError> {
        params.check_voting_period(voting_period)?;
        let end_time = now
            .checked_add_secs(voting_period)
            .ok_or(GovernanceError::Overflow)?;

        let id = self.proposal_count();
        self.proposals.push(Proposal {
            id,
            proposer,
            description,
            start_time: now,
            end_time,
            yes_votes: Weight::ZERO,
            no_votes: Weight::ZERO,
            executed: false,
        });
        self.get(id)
    }

    /// Mark a closed proposal executed. Succeeds once per proposal.
    pub(crate) fn finalize(
        &mut self,
        id: u64,
        now: Timestamp,
    ) -> Result<ProposalOutcome, GovernanceError> {
        let proposal = self.get_mut(id)?;
        if now < proposal.end_time {
            return Err(GovernanceError::VotingInProgress);
        }
        if proposal.executed {
            return Err(GovernanceError::AlreadyFinalized);
        }
        proposal.executed = true;
        Ok(proposal.outcome())
    }

    /// Every proposal sits at the index matching its id.
    pub(crate) fn ids_are_sequential(&self) -> bool {
        self.proposals
            .iter()
            .enumerate()
            .all(|(idx, p)| p.id == idx as u64)
    }
}
