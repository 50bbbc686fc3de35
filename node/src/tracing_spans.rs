//! Pre-built [`tracing::Span`] constructors for governance calls.
//!
//! Every call dispatched through the shared engine runs inside one of these
//! spans so log lines emitted by the engine can be correlated per call.

use agora_types::Principal;
use tracing::{info_span, Span};

/// Span covering one mutating call, from lock acquisition to commit.
pub fn governance_call_span(op: &'static str, caller: &Principal) -> Span {
    info_span!("governance_call", op = %op, caller = %caller)
}

/// Span covering a read-only query.
pub fn governance_query_span(op: &'static str) -> Span {
    info_span!("governance_query", op = %op)
}
