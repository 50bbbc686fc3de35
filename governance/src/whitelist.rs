//! Time-limited account whitelist, the stock guardian policy.
//!
//! Whitelisted accounts are meant to be treated specially by the embedding
//! application (e.g. allowed to propose through a side channel). The engine
//! only stores expirations; both the admin and the guardian may edit them.

use agora_types::{Principal, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::GovernanceError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Whitelist {
    expirations: HashMap<Principal, Timestamp>,
}

impl Whitelist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or move) the instant at which `account` stops being whitelisted.
    /// An expiry at or before the current time effectively revokes it.
    pub fn set_expiration(
        &mut self,
        account: Principal,
        expires_at: Timestamp,
    ) -> Result<Option<Timestamp>, GovernanceError> {
        if account.is_null() {
            return Err(GovernanceError::InvalidInput(
                "cannot whitelist the null principal".to_string(),
            ));
        }
        Ok(self.expirations.insert(account, expires_at))
    }

    /// Drop an account entirely. Returns whether it was present.
    pub fn revoke(&mut self, account: &Principal) -> bool {
        self.expirations.remove(account).is_some()
    }

    pub fn expiration(&self, account: &Principal) -> Option<Timestamp> {
        self.expirations.get(account).copied()
    }

    pub fn is_whitelisted(&self, account: &Principal, now: Timestamp) -> bool {
        self.expiration(account).is_some_and(|exp| now < exp)
    }

    pub fn len(&self) -> usize {
        self.expirations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expirations.is_empty()
    }
}
