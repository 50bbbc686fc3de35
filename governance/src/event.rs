//! Events emitted after successful governance calls.

use agora_types::{Principal, Timestamp, Weight};
use serde::Serialize;

use crate::proposal::ProposalOutcome;

/// A committed state change. Rejected calls emit nothing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum GovernanceEvent {
    WeightSet {
        principal: Principal,
        previous: Weight,
        weight: Weight,
    },
    ProposalCreated {
        id: u64,
        proposer: Principal,
        start_time: Timestamp,
        end_time: Timestamp,
    },
    VoteCast {
        proposal_id: u64,
        voter: Principal,
        support: bool,
        weight: Weight,
    },
    ProposalFinalized {
        id: u64,
        outcome: ProposalOutcome,
        yes_votes: Weight,
        no_votes: Weight,
    },
    PendingAdminSet {
        previous: Option<Principal>,
        nominee: Principal,
    },
    AdminAccepted {
        previous: Principal,
        admin: Principal,
    },
    WhitelistGuardianSet {
        previous: Option<Principal>,
        guardian: Option<Principal>,
    },
    GuardedActionApplied {
        caller: Principal,
    },
}

type Listener = Box<dyn Fn(&GovernanceEvent) + Send + Sync>;

/// Synchronous fan-out event bus.
///
/// Listeners run inline on the calling thread, after the state change has
/// been committed.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &GovernanceEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
