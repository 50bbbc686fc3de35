//! Thread-safe hosting of one governance engine.
//!
//! The whole engine sits behind a single mutex. The clock is read while the
//! lock is held, so the time a call observes and the state it mutates can
//! never be interleaved with another call.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use agora_governance::{
    GovernanceEngine, GovernanceError, Proposal, ProposalOutcome, ProposalPhase, VoteRecord,
    Whitelist,
};
use agora_types::{Principal, TimeSource, Timestamp, Weight};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::config::NodeConfig;
use crate::event_log::attach_event_log;
use crate::metrics::{CallKind, GovernanceMetrics};
use crate::snapshot::{read_snapshot, write_snapshot};
use crate::tracing_spans::{governance_call_span, governance_query_span};
use crate::NodeError;

pub struct SharedEngine<P = Whitelist> {
    engine: Mutex<GovernanceEngine<P>>,
    clock: Arc<dyn TimeSource>,
    metrics: Option<Arc<GovernanceMetrics>>,
    snapshot_path: Option<PathBuf>,
}

impl<P> SharedEngine<P> {
    pub fn new(engine: GovernanceEngine<P>, clock: Arc<dyn TimeSource>) -> Self {
        Self {
            engine: Mutex::new(engine),
            clock,
            metrics: None,
            snapshot_path: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<GovernanceMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    pub fn metrics(&self) -> Option<&Arc<GovernanceMetrics>> {
        self.metrics.as_ref()
    }

    /// Current time according to the hosting clock.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    fn lock(&self) -> Result<MutexGuard<'_, GovernanceEngine<P>>, NodeError> {
        self.engine.lock().map_err(|_| NodeError::LockPoisoned)
    }

    /// Run one mutating call under the lock with the current time.
    fn dispatch<R>(
        &self,
        op: &'static str,
        kind: CallKind,
        caller: Principal,
        call: impl FnOnce(&mut GovernanceEngine<P>, Timestamp) -> Result<R, GovernanceError>,
    ) -> Result<R, NodeError> {
        let _span = governance_call_span(op, &caller).entered();
        let mut engine = self.lock()?;
        let now = self.clock.now();
        let result = call(&mut engine, now);
        if let Some(metrics) = &self.metrics {
            metrics.observe(kind, result.is_ok(), engine.proposal_count());
        }
        result.map_err(NodeError::from)
    }

    /// Run a read-only query under the lock with the current time.
    pub fn query<R>(
        &self,
        op: &'static str,
        f: impl FnOnce(&GovernanceEngine<P>, Timestamp) -> R,
    ) -> Result<R, NodeError> {
        let _span = governance_query_span(op).entered();
        let engine = self.lock()?;
        let now = self.clock.now();
        Ok(f(&engine, now))
    }

    // ── Mutations ───────────────────────────────────────────────────────

    pub fn set_weight(
        &self,
        caller: Principal,
        principal: Principal,
        weight: Weight,
    ) -> Result<(), NodeError> {
        self.dispatch("set_weight", CallKind::Other, caller, |e, _| {
            e.set_weight(caller, principal, weight)
        })
    }

    pub fn create_proposal(
        &self,
        caller: Principal,
        description: impl Into<String>,
        voting_period: u64,
    ) -> Result<u64, NodeError> {
        let description = description.into();
        self.dispatch("create_proposal", CallKind::CreateProposal, caller, |e, now| {
            e.create_proposal(caller, description, voting_period, now)
        })
    }

    pub fn cast_vote(
        &self,
        caller: Principal,
        proposal_id: u64,
        support: bool,
    ) -> Result<Weight, NodeError> {
        self.dispatch("cast_vote", CallKind::CastVote, caller, |e, now| {
            e.cast_vote(caller, proposal_id, support, now)
        })
    }

    pub fn finalize(&self, caller: Principal, proposal_id: u64) -> Result<ProposalOutcome, NodeError> {
        self.dispatch("finalize", CallKind::Finalize, caller, |e, now| {
            e.finalize(caller, proposal_id, now)
        })
    }

    pub fn set_pending_admin(&self, caller: Principal, nominee: Principal) -> Result<(), NodeError> {
        self.dispatch("set_pending_admin", CallKind::Other, caller, |e, _| {
            e.set_pending_admin(caller, nominee)
        })
    }

    pub fn accept_admin(&self, caller: Principal) -> Result<(), NodeError> {
        self.dispatch("accept_admin", CallKind::Other, caller, |e, _| {
            e.accept_admin(caller)
        })
    }

    pub fn set_whitelist_guardian(
        &self,
        caller: Principal,
        guardian: Principal,
    ) -> Result<(), NodeError> {
        self.dispatch("set_whitelist_guardian", CallKind::Other, caller, |e, _| {
            e.set_whitelist_guardian(caller, guardian)
        })
    }

    /// Run a guardian-gated policy action. The action also receives the
    /// current time.
    pub fn guarded<R>(
        &self,
        caller: Principal,
        action: impl FnOnce(&mut P, Timestamp) -> Result<R, GovernanceError>,
    ) -> Result<R, NodeError> {
        self.dispatch("guarded", CallKind::Other, caller, |e, now| {
            e.guarded(caller, |policy| action(policy, now))
        })
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn proposal(&self, id: u64) -> Result<Proposal, NodeError> {
        self.query("proposal", |e, _| e.get_proposal(id).cloned())?
            .map_err(NodeError::from)
    }

    pub fn phase(&self, id: u64) -> Result<ProposalPhase, NodeError> {
        self.query("phase", |e, now| e.phase(id, now))?
            .map_err(NodeError::from)
    }

    pub fn receipt(&self, id: u64, voter: &Principal) -> Result<Option<VoteRecord>, NodeError> {
        self.query("receipt", |e, _| e.receipt(id, voter).copied())
    }

    pub fn weight_of(&self, principal: &Principal) -> Result<Weight, NodeError> {
        self.query("weight_of", |e, _| e.weight_of(principal))
    }

    pub fn admin(&self) -> Result<Principal, NodeError> {
        self.query("admin", |e, _| e.admin())
    }

    pub fn pending_admin(&self) -> Result<Option<Principal>, NodeError> {
        self.query("pending_admin", |e, _| e.pending_admin())
    }

    pub fn proposal_count(&self) -> Result<u64, NodeError> {
        self.query("proposal_count", |e, _| e.proposal_count())
    }
}

impl SharedEngine<Whitelist> {
    pub fn set_whitelist_account_expiration(
        &self,
        caller: Principal,
        account: Principal,
        expires_at: Timestamp,
    ) -> Result<(), NodeError> {
        self.dispatch("set_whitelist_account_expiration", CallKind::Other, caller, |e, _| {
            e.set_whitelist_account_expiration(caller, account, expires_at)
        })
    }

    pub fn is_whitelisted(&self, account: &Principal) -> Result<bool, NodeError> {
        self.query("is_whitelisted", |e, now| e.is_whitelisted(account, now))
    }
}

impl<P: Serialize + DeserializeOwned> SharedEngine<P> {
    /// Write the current state to the configured snapshot path.
    pub fn save_snapshot(&self) -> Result<(), NodeError> {
        let path = self
            .snapshot_path
            .as_deref()
            .ok_or_else(|| NodeError::Config("snapshot_path is not set".to_string()))?;
        self.save_snapshot_to(path)
    }

    pub fn save_snapshot_to(&self, path: &Path) -> Result<(), NodeError> {
        let bytes = self.lock()?.save_state()?;
        write_snapshot(path, &bytes)
    }
}

impl<P: Default + Serialize + DeserializeOwned> SharedEngine<P> {
    /// Build an engine from configuration.
    ///
    /// When a snapshot exists at the configured path the engine is restored
    /// from it; otherwise a fresh engine is initialized for the configured
    /// admin, with the configured guardian installed.
    pub fn from_config(config: &NodeConfig, clock: Arc<dyn TimeSource>) -> Result<Self, NodeError> {
        config.validate()?;

        let restored = match &config.snapshot_path {
            Some(path) => read_snapshot(path)?
                .map(|bytes| GovernanceEngine::<P>::load_state(&bytes))
                .transpose()?,
            None => None,
        };

        let mut engine = match restored {
            Some(engine) => {
                info!(admin = %engine.admin(), proposals = engine.proposal_count(), "engine restored from snapshot");
                engine
            }
            None => {
                let admin = config.admin_principal()?;
                let mut engine = GovernanceEngine::<P>::with_params(admin, config.params())?;
                if let Some(guardian) = config.guardian_principal()? {
                    engine.set_whitelist_guardian(admin, guardian)?;
                }
                engine
            }
        };
        attach_event_log(&mut engine);

        let mut shared = Self::new(engine, clock);
        if config.enable_metrics {
            shared = shared.with_metrics(Arc::new(GovernanceMetrics::new()?));
        }
        if let Some(path) = &config.snapshot_path {
            shared = shared.with_snapshot_path(path.clone());
        }
        Ok(shared)
    }
}
