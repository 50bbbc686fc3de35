//! Tunable governance parameters.

use serde::{Deserialize, Serialize};

use crate::error::GovernanceError;

pub const SECONDS_PER_DAY: u64 = 86_400;

/// Shortest accepted voting period.
pub const DEFAULT_MIN_VOTING_PERIOD_SECS: u64 = 1;

/// Longest accepted voting period: seven days, inclusive.
pub const DEFAULT_MAX_VOTING_PERIOD_SECS: u64 = 7 * SECONDS_PER_DAY;

/// Bounds applied when a proposal is created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceParams {
    pub min_voting_period_secs: u64,
    pub max_voting_period_secs: u64,
}

impl GovernanceParams {
    /// Reject parameter sets that would admit a zero-length window or an
    /// empty range.
    pub fn validate(&self) -> Result<(), GovernanceError> {
        if self.min_voting_period_secs == 0 {
            return Err(GovernanceError::InvalidInput(
                "min_voting_period_secs must be at least 1".to_string(),
            ));
        }
        if self.min_voting_period_secs > self.max_voting_period_secs {
            return Err(GovernanceError::InvalidInput(format!(
                "min_voting_period_secs ({}) exceeds max_voting_period_secs ({})",
                self.min_voting_period_secs, self.max_voting_period_secs
            )));
        }
        Ok(())
    }

    pub fn check_voting_period(&self, period: u64) -> Result<(), GovernanceError> {
        if period == 0
            || period < self.min_voting_period_secs
            || period > self.max_voting_period_secs
        {
            return Err(GovernanceError::InvalidPeriod {
                period,
                min: self.min_voting_period_secs,
                max: self.max_voting_period_secs,
            });
        }
        Ok(())
    }
}

impl Default for GovernanceParams {
    fn default() -> Self {
        Self {
            min_voting_period_secs: DEFAULT_MIN_VOTING_PERIOD_SECS,
            max_voting_period_secs: DEFAULT_MAX_VOTING_PERIOD_SECS,
        }
    }
}
