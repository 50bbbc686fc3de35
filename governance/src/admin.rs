//! Administrative authority: two-phase admin transfer plus a guardian.
//!
//! The admin can only change hands when the nominee calls
//! [`AdminAuthority::accept_admin`] itself, so a typo in a nomination can
//! never lock the engine out. The guardian shares a narrow slice of the
//! admin's power (the guarded policy actions) and nothing else.

use agora_types::Principal;
use serde::{Deserialize, Serialize};

use crate::error::GovernanceError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminAuthority {
    admin: Principal,
    pending_admin: Option<Principal>,
    whitelist_guardian: Option<Principal>,
}

impl AdminAuthority {
    pub fn new(admin: Principal) -> Result<Self, GovernanceError> {
        if admin.is_null() {
            return Err(GovernanceError::InvalidInput(
                "admin cannot be the null principal".to_string(),
            ));
        }
        Ok(Self {
            admin,
            pending_admin: None,
            whitelist_guardian: None,
        })
    }

    pub fn admin(&self) -> Principal {
        self.admin
    }

    pub fn pending_admin(&self) -> Option<Principal> {
        self.pending_admin
    }

    pub fn whitelist_guardian(&self) -> Option<Principal> {
        self.whitelist_guardian
    }

    pub fn is_admin(&self, caller: &Principal) -> bool {
        *caller == self.admin
    }

    pub fn require_admin(&self, caller: &Principal) -> Result<(), GovernanceError> {
        if self.is_admin(caller) {
            Ok(())
        } else {
            Err(GovernanceError::Unauthorized)
        }
    }

    /// Admin or guardian.
    pub fn require_admin_or_guardian(&self, caller: &Principal) -> Result<(), GovernanceError> {
        if self.is_admin(caller) || self.whitelist_guardian == Some(*caller) {
            Ok(())
        } else {
            Err(GovernanceError::Unauthorized)
        }
    }

    /// Nominate a successor, replacing any outstanding nomination.
    /// Returns the nomination that was replaced.
    pub(crate) fn set_pending_admin(
        &mut self,
        caller: &Principal,
        nominee: Principal,
    ) -> Result<Option<Principal>, GovernanceError> {
        self.require_admin(caller)?;
        if nominee.is_null() {
            return Err(GovernanceError::InvalidInput(
                "pending admin cannot be the null principal".to_string(),
            ));
        }
        Ok(self.pending_admin.replace(nominee))
    }

    /// Complete a transfer. Only the current nominee may call this.
    /// Returns the admin that was replaced.
    pub(crate) fn accept_admin(&mut self, caller: &Principal) -> Result<Principal, GovernanceError> {
        match self.pending_admin {
            Some(pending) if pending == *caller => {
                self.pending_admin = None;
                Ok(std::mem::replace(&mut self.admin, pending))
            }
            _ => Err(GovernanceError::Unauthorized),
        }
    }

    /// Replace the guardian. The null principal clears it.
    pub(crate) fn set_whitelist_guardian(
        &mut self,
        caller: &Principal,
        guardian: Principal,
    ) -> Result<Option<Principal>, GovernanceError> {
        self.require_admin(caller)?;
        let next = (!guardian.is_null()).then_some(guardian);
        Ok(std::mem::replace(&mut self.whitelist_guardian, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(seed: u8) -> Principal {
        Principal::new([seed; 32])
    }

    #[test]
    fn null_admin_rejected() {
        assert!(matches!(
            AdminAuthority::new(Principal::NULL),
            Err(GovernanceError::InvalidInput(_))
        ));
    }

    #[test]
    fn two_phase_transfer() {
        let mut auth = AdminAuthority::new(principal(1)).unwrap();
        auth.set_pending_admin(&principal(1), principal(2)).unwrap();
        assert_eq!(auth.admin(), principal(1));
        assert_eq!(auth.pending_admin(), Some(principal(2)));

        let old = auth.accept_admin(&principal(2)).unwrap();
        assert_eq!(old, principal(1));
        assert_eq!(auth.admin(), principal(2));
        assert_eq!(auth.pending_admin(), None);
    }

    #[test]
    fn only_nominee_can_accept() {
        let mut auth = AdminAuthority::new(principal(1)).unwrap();
        assert_eq!(
            auth.accept_admin(&principal(1)),
            Err(GovernanceError::Unauthorized)
        );
        auth.set_pending_admin(&principal(1), principal(2)).unwrap();
        assert_eq!(
            auth.accept_admin(&principal(3)),
            Err(GovernanceError::Unauthorized)
        );
        assert_eq!(auth.pending_admin(), Some(principal(2)));
    }

    #[test]
    fn nomination_is_overwritten() {
        let mut auth = AdminAuthority::new(principal(1)).unwrap();
        auth.set_pending_admin(&principal(1), principal(2)).unwrap();
        let replaced = auth.set_pending_admin(&principal(1), principal(3)).unwrap();
        assert_eq!(replaced, Some(principal(2)));
        assert_eq!(
            auth.accept_admin(&principal(2)),
            Err(GovernanceError::Unauthorized)
        );
        auth.accept_admin(&principal(3)).unwrap();
        assert_eq!(auth.admin(), principal(3));
    }

    #[test]
    fn non_admin_cannot_nominate_or_set_guardian() {
        let mut auth = AdminAuthority::new(principal(1)).unwrap();
        assert_eq!(
            auth.set_pending_admin(&principal(2), principal(2)),
            Err(GovernanceError::Unauthorized)
        );
        assert_eq!(
            auth.set_whitelist_guardian(&principal(2), principal(2)),
            Err(GovernanceError::Unauthorized)
        );
    }

    #[test]
    fn guardian_passes_guarded_check_only() {
        let mut auth = AdminAuthority::new(principal(1)).unwrap();
        auth.set_whitelist_guardian(&principal(1), principal(5)).unwrap();
        assert!(auth.require_admin_or_guardian(&principal(5)).is_ok());
        assert!(auth.require_admin_or_guardian(&principal(1)).is_ok());
        assert!(auth.require_admin_or_guardian(&principal(6)).is_err());
        assert!(auth.require_admin(&principal(5)).is_err());
        assert_eq!(
            auth.set_pending_admin(&principal(5), principal(5)),
            Err(GovernanceError::Unauthorized)
        );
    }

    #[test]
    fn null_guardian_clears() {
        let mut auth = AdminAuthority::new(principal(1)).unwrap();
        auth.set_whitelist_guardian(&principal(1), principal(5)).unwrap();
        auth.set_whitelist_guardian(&principal(1), Principal::NULL)
            .unwrap();
        assert_eq!(auth.whitelist_guardian(), None);
        assert!(auth.require_admin_or_guardian(&Principal::NULL).is_err());
    }
}
