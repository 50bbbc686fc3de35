//! The governance engine: one owned aggregate per deployed instance.
//!
//! Every mutating call takes the caller and the current time explicitly,
//! validates everything up front and only then commits, so a rejected call
//! leaves no trace. Callers that share an engine across threads must wrap
//! the whole engine in a single lock.

use agora_types::{format_duration, Principal, Timestamp, Weight};
use tracing::{debug, info};

use crate::admin::AdminAuthority;
use crate::error::GovernanceError;
use crate::event::{EventBus, GovernanceEvent};
use crate::params::GovernanceParams;
use crate::proposal::{Proposal, ProposalOutcome, ProposalPhase};
use crate::registry::ProposalRegistry;
use crate::voting::{VoteRecord, VotingLedger};
use crate::weights::WeightLedger;
use crate::whitelist::Whitelist;

/// Governance state machine.
///
/// `P` is the policy state that guardian-gated actions operate on; it
/// defaults to the stock [`Whitelist`].
pub struct GovernanceEngine<P = Whitelist> {
    pub(crate) authority: AdminAuthority,
    pub(crate) weights: WeightLedger,
    pub(crate) votes: VotingLedger,
    pub(crate) registry: ProposalRegistry,
    pub(crate) params: GovernanceParams,
    pub(crate) policy: P,
    pub(crate) events: EventBus,
}

impl<P: Default> GovernanceEngine<P> {
    /// Initialize an engine administered by `admin` with default parameters.
    pub fn new(admin: Principal) -> Result<Self, GovernanceError> {
        Self::with_params(admin, GovernanceParams::default())
    }

    pub fn with_params(admin: Principal, params: GovernanceParams) -> Result<Self, GovernanceError> {
        Self::with_policy(admin, params, P::default())
    }
}

impl<P> GovernanceEngine<P> {
    pub fn with_policy(
        admin: Principal,
        params: GovernanceParams,
        policy: P,
    ) -> Result<Self, GovernanceError> {
        params.validate()?;
        let authority = AdminAuthority::new(admin)?;
        info!(%admin, "governance engine initialized");
        Ok(Self {
            authority,
            weights: WeightLedger::new(),
            votes: VotingLedger::new(),
            registry: ProposalRegistry::new(),
            params,
            policy,
            events: EventBus::new(),
        })
    }

    // ── Reads ───────────────────────────────────────────────────────────

    pub fn admin(&self) -> Principal {
        self.authority.admin()
    }

    pub fn pending_admin(&self) -> Option<Principal> {
        self.authority.pending_admin()
    }

    pub fn whitelist_guardian(&self) -> Option<Principal> {
        self.authority.whitelist_guardian()
    }

    pub fn params(&self) -> &GovernanceParams {
        &self.params
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn weight_of(&self, principal: &Principal) -> Weight {
        self.weights.weight_of(principal)
    }

    pub fn total_weight(&self) -> Weight {
        self.weights.total_weight()
    }

    pub fn get_proposal(&self, id: u64) -> Result<&Proposal, GovernanceError> {
        self.registry.get(id)
    }

    pub fn proposal_count(&self) -> u64 {
        self.registry.proposal_count()
    }

    pub fn proposals(&self) -> impl Iterator<Item = &Proposal> {
        self.registry.iter()
    }

    pub fn phase(&self, id: u64, now: Timestamp) -> Result<ProposalPhase, GovernanceError> {
        self.registry.phase(id, now)
    }

    pub fn has_voted(&self, proposal_id: u64, voter: &Principal) -> bool {
        self.votes.has_voted(proposal_id, voter)
    }

    pub fn receipt(&self, proposal_id: u64, voter: &Principal) -> Option<&VoteRecord> {
        self.votes.receipt(proposal_id, voter)
    }

    /// Register a listener for committed state changes.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&GovernanceEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    // ── Weights ─────────────────────────────────────────────────────────

    /// Overwrite `principal`'s voting weight. Admin only.
    pub fn set_weight(
        &mut self,
        caller: Principal,
        principal: Principal,
        weight: Weight,
    ) -> Result<(), GovernanceError> {
        self.authority
            .require_admin(&caller)
            .and_then(|()| self.weights.set(principal, weight))
            .map(|previous| {
                info!(%principal, %previous, %weight, "voting weight set");
                self.events.emit(&GovernanceEvent::WeightSet {
                    principal,
                    previous,
                    weight,
                });
            })
            .inspect_err(|e| debug!(%caller, %principal, error = %e, "set_weight rejected"))
    }

    // ── Proposals ───────────────────────────────────────────────────────

    /// Open a proposal whose window is `[now, now + voting_period)`.
    /// Admin only. Returns the new proposal id.
    pub fn create_proposal(
        &mut self,
        caller: Principal,
        description: impl Into<String>,
        voting_period: u64,
        now: Timestamp,
    ) -> Result<u64, GovernanceError> {
        if let Err(e) = self.authority.require_admin(&caller) {
            debug!(%caller, error = %e, "create_proposal rejected");
            return Err(e);
        }
        let proposal = self
            .registry
            .create(caller, description.into(), voting_period, now, &self.params)
            .inspect_err(|e| debug!(%caller, voting_period, error = %e, "create_proposal rejected"))?;

        let event = GovernanceEvent::ProposalCreated {
            id: proposal.id(),
            proposer: caller,
            start_time: proposal.start_time(),
            end_time: proposal.end_time(),
        };
        let id = proposal.id();
        info!(
            proposal_id = id,
            %caller,
            period = %format_duration(voting_period),
            end_time = %proposal.end_time(),
            "proposal created"
        );
        self.events.emit(&event);
        Ok(id)
    }

    /// Cast `caller`'s full current weight for or against a proposal.
    /// Returns the weight counted.
    pub fn cast_vote(
        &mut self,
        caller: Principal,
        proposal_id: u64,
        support: bool,
        now: Timestamp,
    ) -> Result<Weight, GovernanceError> {
        let result = self
            .registry
            .get_mut(proposal_id)
            .and_then(|proposal| {
                self.votes
                    .cast_vote(proposal, &self.weights, caller, support, now)
            });
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                debug!(proposal_id, %caller, error = %e, "vote rejected");
                return Err(e);
            }
        };

        info!(proposal_id, %caller, support, weight = %record.weight, "vote cast");
        self.events.emit(&GovernanceEvent::VoteCast {
            proposal_id,
            voter: caller,
            support,
            weight: record.weight,
        });
        Ok(record.weight)
    }

    /// Close out a proposal once its window has ended. Open to any caller.
    pub fn finalize(
        &mut self,
        caller: Principal,
        proposal_id: u64,
        now: Timestamp,
    ) -> Result<ProposalOutcome, GovernanceError> {
        let outcome = self
            .registry
            .finalize(proposal_id, now)
            .inspect_err(|e| debug!(proposal_id, %caller, error = %e, "finalize rejected"))?;

        let proposal = self.registry.get(proposal_id)?;
        let (yes_votes, no_votes) = (proposal.yes_votes(), proposal.no_votes());
        info!(
            proposal_id,
            %caller,
            ?outcome,
            %yes_votes,
            %no_votes,
            "proposal finalized"
        );
        self.events.emit(&GovernanceEvent::ProposalFinalized {
            id: proposal_id,
            outcome,
            yes_votes,
            no_votes,
        });
        Ok(outcome)
    }

    // ── Admin authority ─────────────────────────────────────────────────

    /// Nominate the next admin. Admin only; replaces any prior nomination.
    pub fn set_pending_admin(
        &mut self,
        caller: Principal,
        nominee: Principal,
    ) -> Result<(), GovernanceError> {
        let previous = self
            .authority
            .set_pending_admin(&caller, nominee)
            .inspect_err(|e| debug!(%caller, %nominee, error = %e, "set_pending_admin rejected"))?;
        info!(%caller, %nominee, "pending admin set");
        self.events
            .emit(&GovernanceEvent::PendingAdminSet { previous, nominee });
        Ok(())
    }

    /// Complete an admin transfer. Only the pending admin may call this.
    pub fn accept_admin(&mut self, caller: Principal) -> Result<(), GovernanceError> {
        let previous = self
            .authority
            .accept_admin(&caller)
            .inspect_err(|e| debug!(%caller, error = %e, "accept_admin rejected"))?;
        info!(%previous, admin = %caller, "admin transferred");
        self.events.emit(&GovernanceEvent::AdminAccepted {
            previous,
            admin: caller,
        });
        Ok(())
    }

    /// Replace the whitelist guardian. Admin only; the null principal
    /// removes the guardian.
    pub fn set_whitelist_guardian(
        &mut self,
        caller: Principal,
        guardian: Principal,
    ) -> Result<(), GovernanceError> {
        let previous = self
            .authority
            .set_whitelist_guardian(&caller, guardian)
            .inspect_err(|e| debug!(%caller, error = %e, "set_whitelist_guardian rejected"))?;
        let guardian = self.authority.whitelist_guardian();
        info!(%caller, ?guardian, "whitelist guardian set");
        self.events
            .emit(&GovernanceEvent::WhitelistGuardianSet { previous, guardian });
        Ok(())
    }

    /// Run a policy action on behalf of the admin or the guardian.
    ///
    /// The action only runs after the access check passes. It must leave
    /// the policy untouched when it returns an error.
    pub fn guarded<R>(
        &mut self,
        caller: Principal,
        action: impl FnOnce(&mut P) -> Result<R, GovernanceError>,
    ) -> Result<R, GovernanceError> {
        if let Err(e) = self.authority.require_admin_or_guardian(&caller) {
            debug!(%caller, error = %e, "guarded action rejected");
            return Err(e);
        }
        let value =
            action(&mut self.policy).inspect_err(|e| debug!(%caller, error = %e, "guarded action failed"))?;
        info!(%caller, "guarded action applied");
        self.events
            .emit(&GovernanceEvent::GuardedActionApplied { caller });
        Ok(value)
    }
}

impl GovernanceEngine<Whitelist> {
    /// Set when `account` stops being whitelisted. Admin or guardian.
    pub fn set_whitelist_account_expiration(
        &mut self,
        caller: Principal,
        account: Principal,
        expires_at: Timestamp,
    ) -> Result<(), GovernanceError> {
        self.guarded(caller, |whitelist| {
            whitelist.set_expiration(account, expires_at).map(|_| ())
        })
    }

    pub fn is_whitelisted(&self, account: &Principal, now: Timestamp) -> bool {
        self.policy.is_whitelisted(account, now)
    }
}
