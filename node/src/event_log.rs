//! Mirrors committed governance events into the log as JSON.

use agora_governance::{GovernanceEngine, GovernanceEvent};

/// Render an event as a single JSON line.
pub fn event_json(event: &GovernanceEvent) -> String {
    serde_json::to_string(event).unwrap_or_else(|e| format!("{{\"unencodable\":\"{e}\"}}"))
}

/// Subscribe a listener that logs every event at `info` under the
/// `agora::events` target.
pub fn attach_event_log<P>(engine: &mut GovernanceEngine<P>) {
    engine.subscribe(Box::new(|event| {
        tracing::info!(target: "agora::events", event = %event_json(event), "governance event");
    }));
}
