//! Principal → voting weight ledger.
//!
//! Weights are overwritten, never accumulated, and an absent entry reads as
//! zero. The ledger also tracks the sum of all stored weights so that the
//! total can never exceed the representable range.

use agora_types::{Principal, Weight};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::GovernanceError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightLedger {
    weights: HashMap<Principal, Weight>,
    total: Weight,
}

impl WeightLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current weight of `principal`; zero when unknown.
    pub fn weight_of(&self, principal: &Principal) -> Weight {
        self.weights.get(principal).copied().unwrap_or(Weight::ZERO)
    }

    /// Sum of every stored weight.
    pub fn total_weight(&self) -> Weight {
        self.total
    }

    /// Number of principals holding a non-zero weight.
    pub fn holders(&self) -> usize {
        self.weights.len()
    }

    /// Overwrite the weight of `principal`, returning the previous value.
    ///
    /// A zero weight removes the entry. Access control is the caller's job.
    pub(crate) fn set(
        &mut self,
        principal: Principal,
        weight: Weight,
    ) -> Result<Weight, GovernanceError> {
        if principal.is_null() {
            return Err(GovernanceError::InvalidInput(
                "cannot assign weight to the null principal".to_string(),
            ));
        }
        let previous = self.weight_of(&principal);
        let total = self
            .total
            .checked_sub(previous)
            .and_then(|t| t.checked_add(weight))
            .ok_or(GovernanceError::Overflow)?;

        if weight.is_zero() {
            self.weights.remove(&principal);
        } else {
            self.weights.insert(principal, weight);
        }
        self.total = total;
        Ok(previous)
    }

    /// Recompute the total from the entries; `None` when it would overflow.
    pub(crate) fn recomputed_total(&self) -> Option<Weight> {
        self.weights
            .values()
            .try_fold(Weight::ZERO, |acc, w| acc.checked_add(*w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(seed: u8) -> Principal {
        Principal::new([seed; 32])
    }

    #[test]
    fn unknown_principal_has_zero_weight() {
        let ledger = WeightLedger::new();
        assert_eq!(ledger.weight_of(&principal(1)), Weight::ZERO);
    }

    #[test]
    fn set_overwrites_rather_than_accumulates() {
        let mut ledger = WeightLedger::new();
        ledger.set(principal(1), Weight::new(100)).unwrap();
        let previous = ledger.set(principal(1), Weight::new(40)).unwrap();
        assert_eq!(previous, Weight::new(100));
        assert_eq!(ledger.weight_of(&principal(1)), Weight::new(40));
        assert_eq!(ledger.total_weight(), Weight::new(40));
    }

    #[test]
    fn zero_weight_removes_entry() {
        let mut ledger = WeightLedger::new();
        ledger.set(principal(1), Weight::new(7)).unwrap();
        ledger.set(principal(1), Weight::ZERO).unwrap();
        assert_eq!(ledger.holders(), 0);
        assert_eq!(ledger.total_weight(), Weight::ZERO);
    }

    #[test]
    fn null_principal_rejected() {
        let mut ledger = WeightLedger::new();
        let err = ledger.set(Principal::NULL, Weight::new(1)).unwrap_err();
        assert!(matches!(err, GovernanceError::InvalidInput(_)));
        assert_eq!(ledger.holders(), 0);
    }

    #[test]
    fn total_overflow_rejected_without_side_effects() {
        let mut ledger = WeightLedger::new();
        ledger.set(principal(1), Weight::new(u128::MAX)).unwrap();
        let err = ledger.set(principal(2), Weight::new(1)).unwrap_err();
        assert_eq!(err, GovernanceError::Overflow);
        assert_eq!(ledger.weight_of(&principal(2)), Weight::ZERO);
        assert_eq!(ledger.total_weight(), Weight::new(u128::MAX));

        // Replacing the large holding frees room.
        ledger.set(principal(1), Weight::new(10)).unwrap();
        ledger.set(principal(2), Weight::new(1)).unwrap();
        assert_eq!(ledger.total_weight(), Weight::new(11));
        assert_eq!(ledger.recomputed_total(), Some(Weight::new(11)));
    }
}
