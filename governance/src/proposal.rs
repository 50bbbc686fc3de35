//! Governance proposals and their lifecycle.
//!
//! The phase of a proposal is never stored: it is derived on every read
//! from the supplied time, the proposal window and the `executed` flag.

use agora_types::{Principal, Timestamp, Weight};
use serde::{Deserialize, Serialize};

/// Where a proposal sits in its lifecycle at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalPhase {
    /// The supplied time is before the window opens.
    Pending,
    /// Inside `[start_time, end_time)`; votes are accepted.
    Open,
    /// The window has closed but nobody has finalized yet.
    Closed,
    /// Finalized; terminal.
    Finalized,
}

/// Decision recorded when a proposal is finalized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalOutcome {
    /// Strictly more yes weight than no weight.
    Passed,
    /// Ties and no-majorities.
    Rejected,
}

/// A governance proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub(crate) id: u64,
    pub(crate) proposer: Principal,
    pub(crate) description: String,
    pub(crate) start_time: Timestamp,
    pub(crate) end_time: Timestamp,
    pub(crate) yes_votes: Weight,
    pub(crate) no_votes: Weight,
    pub(crate) executed: bool,
}

impl Proposal {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn proposer(&self) -> Principal {
        self.proposer
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn start_time(&self) -> Timestamp {
        self.start_time
    }

    pub fn end_time(&self) -> Timestamp {
        self.end_time
    }

    pub fn voting_period(&self) -> u64 {
        self.end_time.as_secs() - self.start_time.as_secs()
    }

    pub fn yes_votes(&self) -> Weight {
        self.yes_votes
    }

    pub fn no_votes(&self) -> Weight {
        self.no_votes
    }

    /// `yes + no`, or `None` if the sum does not fit.
    pub fn total_votes(&self) -> Option<Weight> {
        self.yes_votes.checked_add(self.no_votes)
    }

    pub fn executed(&self) -> bool {
        self.executed
    }

    /// Whether `now` falls inside the half-open window `[start, end)`.
    pub fn is_open(&self, now: Timestamp) -> bool {
        self.start_time <= now && now < self.end_time
    }

    pub fn phase(&self, now: Timestamp) -> ProposalPhase {
        if self.executed {
            ProposalPhase::Finalized
        } else if now < self.start_time {
            ProposalPhase::Pending
        } else if now < self.end_time {
            ProposalPhase::Open
        } else {
            ProposalPhase::Closed
        }
    }

    /// The decision implied by the current tallies.
    pub fn outcome(&self) -> ProposalOutcome {
        if self.yes_votes > self.no_votes {
            ProposalOutcome::Passed
        } else {
            ProposalOutcome::Rejected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal(start: u64, end: u64) -> Proposal {
        Proposal {
            id: 0,
            proposer: Principal::new([1; 32]),
            description: "raise the quorum".to_string(),
            start_time: Timestamp::new(start),
            end_time: Timestamp::new(end),
            yes_votes: Weight::ZERO,
            no_votes: Weight::ZERO,
            executed: false,
        }
    }

    #[test]
    fn phase_follows_the_half_open_window() {
        let p = proposal(100, 200);
        assert_eq!(p.phase(Timestamp::new(99)), ProposalPhase::Pending);
        assert_eq!(p.phase(Timestamp::new(100)), ProposalPhase::Open);
        assert_eq!(p.phase(Timestamp::new(199)), ProposalPhase::Open);
        assert_eq!(p.phase(Timestamp::new(200)), ProposalPhase::Closed);
    }

    #[test]
    fn executed_is_finalized_at_any_time() {
        let mut p = proposal(100, 200);
        p.executed = true;
        assert_eq!(p.phase(Timestamp::new(150)), ProposalPhase::Finalized);
        assert_eq!(p.phase(Timestamp::new(500)), ProposalPhase::Finalized);
    }

    #[test]
    fn outcome_requires_strict_majority() {
        let mut p = proposal(0, 10);
        assert_eq!(p.outcome(), ProposalOutcome::Rejected);
        p.yes_votes = Weight::new(5);
        p.no_votes = Weight::new(5);
        assert_eq!(p.outcome(), ProposalOutcome::Rejected);
        p.yes_votes = Weight::new(6);
        assert_eq!(p.outcome(), ProposalOutcome::Passed);
    }

    #[test]
    fn voting_period_is_window_length() {
        assert_eq!(proposal(1_000, 87_400).voting_period(), 86_400);
    }
}
