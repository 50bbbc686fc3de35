use thiserror::Error;

/// Every way a governance call can be rejected.
///
/// A rejected call never leaves partial state behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GovernanceError {
    #[error("caller is not authorized for this operation")]
    Unauthorized,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid voting period {period}s: must be within {min}s..={max}s")]
    InvalidPeriod { period: u64, min: u64, max: u64 },

    #[error("proposal {0} not found")]
    NotFound(u64),

    #[error("caller has no voting weight")]
    Ineligible,

    #[error("caller has already voted on this proposal")]
    AlreadyVoted,

    #[error("voting window has closed")]
    VotingClosed,

    #[error("voting is still in progress")]
    VotingInProgress,

    #[error("proposal has already been finalized")]
    AlreadyFinalized,

    #[error("arithmetic overflow")]
    Overflow,
}
