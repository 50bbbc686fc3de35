//! End-to-end governance scenarios driven through the public engine API
//! with a deterministic clock.

use agora_governance::{GovernanceEngine, GovernanceError, ProposalOutcome, ProposalPhase};
use agora_nullables::NullClock;
use agora_types::{Principal, Weight};

const DAY: u64 = 86_400;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn principal(name: &str) -> Principal {
    Principal::derive(name.as_bytes())
}

struct World {
    engine: GovernanceEngine,
    clock: NullClock,
    admin: Principal,
}

fn world() -> World {
    let admin = principal("owner");
    World {
        engine: GovernanceEngine::new(admin).expect("engine"),
        clock: NullClock::new(1_700_000_000),
        admin,
    }
}

/// One open proposal (id 0) with two funded voters, mirroring the usual
/// voting fixture.
fn world_with_voters() -> (World, Principal, Principal) {
    let mut w = world();
    let now = w.clock.now();
    w.engine
        .create_proposal(w.admin, "Test proposal", DAY, now)
        .unwrap();
    let a1 = principal("addr1");
    let a2 = principal("addr2");
    w.engine.set_weight(w.admin, a1, Weight::new(100)).unwrap();
    w.engine.set_weight(w.admin, a2, Weight::new(200)).unwrap();
    (w, a1, a2)
}

// ---------------------------------------------------------------------------
// Deployment & proposal creation
// ---------------------------------------------------------------------------

#[test]
fn deployer_is_admin() {
    let w = world();
    assert_eq!(w.engine.admin(), w.admin);
}

#[test]
fn scenario_a_create_vote_and_double_vote() {
    let (mut w, a1, _) = world_with_voters();
    let t = w.clock.now();

    let p = w.engine.get_proposal(0).unwrap();
    assert_eq!(p.description(), "Test proposal");
    assert_eq!(p.start_time(), t);
    assert_eq!(p.end_time().as_secs(), t.as_secs() + DAY);
    assert!(!p.executed());

    w.engine.cast_vote(a1, 0, true, t).unwrap();
    assert_eq!(w.engine.get_proposal(0).unwrap().yes_votes(), Weight::new(100));

    assert_eq!(
        w.engine.cast_vote(a1, 0, true, t),
        Err(GovernanceError::AlreadyVoted)
    );
    assert_eq!(w.engine.get_proposal(0).unwrap().yes_votes(), Weight::new(100));
}

#[test]
fn scenario_b_invalid_periods() {
    let mut w = world();
    let now = w.clock.now();
    assert!(matches!(
        w.engine.create_proposal(w.admin, "Test proposal", 0, now),
        Err(GovernanceError::InvalidPeriod { period: 0, .. })
    ));
    assert!(matches!(
        w.engine.create_proposal(w.admin, "Test proposal", 8 * DAY, now),
        Err(GovernanceError::InvalidPeriod { .. })
    ));
    assert_eq!(
        w.engine.create_proposal(w.admin, "Test proposal", 7 * DAY, now),
        Ok(0)
    );
}

#[test]
fn scenario_c_non_admin_cannot_create() {
    let mut w = world();
    let now = w.clock.now();
    assert_eq!(
        w.engine
            .create_proposal(principal("addr1"), "Test proposal", DAY, now),
        Err(GovernanceError::Unauthorized)
    );
    assert_eq!(w.engine.proposal_count(), 0);
    // No id was consumed by the rejected call.
    assert_eq!(w.engine.create_proposal(w.admin, "first", DAY, now), Ok(0));
}

// ---------------------------------------------------------------------------
// Voting
// ---------------------------------------------------------------------------

#[test]
fn non_holders_cannot_vote() {
    let (mut w, _, _) = world_with_voters();
    let now = w.clock.now();
    assert_eq!(
        w.engine.cast_vote(principal("addr3"), 0, true, now),
        Err(GovernanceError::Ineligible)
    );
}

#[test]
fn scenario_d_vote_at_end_time_is_closed() {
    let (mut w, a1, a2) = world_with_voters();
    w.clock.advance(DAY - 1);
    w.engine.cast_vote(a2, 0, false, w.clock.now()).unwrap();

    w.clock.advance(1);
    assert_eq!(w.engine.phase(0, w.clock.now()).unwrap(), ProposalPhase::Closed);
    assert_eq!(
        w.engine.cast_vote(a1, 0, true, w.clock.now()),
        Err(GovernanceError::VotingClosed)
    );
}

#[test]
fn voting_after_window_is_closed() {
    let (mut w, a1, _) = world_with_voters();
    w.clock.advance(DAY + 1);
    assert_eq!(
        w.engine.cast_vote(a1, 0, true, w.clock.now()),
        Err(GovernanceError::VotingClosed)
    );
}

// ---------------------------------------------------------------------------
// Finalization
// ---------------------------------------------------------------------------

#[test]
fn scenario_e_finalize_guards() {
    let (mut w, a1, a2) = world_with_voters();
    let anyone = principal("anyone");
    let now = w.clock.now();
    w.engine.cast_vote(a1, 0, true, now).unwrap();
    w.engine.cast_vote(a2, 0, false, now).unwrap();

    assert_eq!(
        w.engine.finalize(anyone, 0, now),
        Err(GovernanceError::VotingInProgress)
    );

    w.clock.advance(DAY + 1);
    let outcome = w.engine.finalize(anyone, 0, w.clock.now()).unwrap();
    assert_eq!(outcome, ProposalOutcome::Rejected);
    assert!(w.engine.get_proposal(0).unwrap().executed());

    assert_eq!(
        w.engine.finalize(anyone, 0, w.clock.now()),
        Err(GovernanceError::AlreadyFinalized)
    );
}

#[test]
fn second_proposal_still_in_progress() {
    let (mut w, _, _) = world_with_voters();
    w.clock.advance(DAY + 1);
    let now = w.clock.now();
    let id = w
        .engine
        .create_proposal(w.admin, "Test proposal 2", DAY, now)
        .unwrap();
    assert_eq!(id, 1);
    assert_eq!(
        w.engine.finalize(w.admin, id, now),
        Err(GovernanceError::VotingInProgress)
    );
    assert!(w.engine.finalize(w.admin, 0, now).is_ok());
}

#[test]
fn finalize_exactly_at_end_time() {
    let (mut w, a1, _) = world_with_voters();
    w.engine.cast_vote(a1, 0, true, w.clock.now()).unwrap();
    w.clock.advance(DAY);
    assert_eq!(
        w.engine.finalize(a1, 0, w.clock.now()),
        Ok(ProposalOutcome::Passed)
    );
}

#[test]
fn finalize_unknown_proposal() {
    let mut w = world();
    assert_eq!(
        w.engine.finalize(w.admin, 42, w.clock.now()),
        Err(GovernanceError::NotFound(42))
    );
}

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

#[test]
fn admin_sets_weights() {
    let mut w = world();
    let a1 = principal("addr1");
    w.engine.set_weight(w.admin, a1, Weight::new(100)).unwrap();
    assert_eq!(w.engine.weight_of(&a1), Weight::new(100));
}

#[test]
fn non_admin_cannot_set_weights() {
    let mut w = world();
    assert_eq!(
        w.engine
            .set_weight(principal("addr1"), principal("addr2"), Weight::new(100)),
        Err(GovernanceError::Unauthorized)
    );
    assert_eq!(w.engine.weight_of(&principal("addr2")), Weight::ZERO);
}

#[test]
fn null_principal_weight_rejected() {
    let mut w = world();
    assert!(matches!(
        w.engine.set_weight(w.admin, Principal::NULL, Weight::new(1)),
        Err(GovernanceError::InvalidInput(_))
    ));
}

// ---------------------------------------------------------------------------
// Admin transfer
// ---------------------------------------------------------------------------

#[test]
fn scenario_f_two_phase_admin_transfer() {
    let mut w = world();
    let p = principal("successor");
    let q = principal("impostor");

    w.engine.set_pending_admin(w.admin, p).unwrap();
    assert_eq!(w.engine.accept_admin(q), Err(GovernanceError::Unauthorized));
    assert_eq!(w.engine.admin(), w.admin);

    w.engine.accept_admin(p).unwrap();
    assert_eq!(w.engine.admin(), p);
    assert_eq!(w.engine.pending_admin(), None);

    // The nomination is spent.
    assert_eq!(w.engine.accept_admin(p), Err(GovernanceError::Unauthorized));
    assert_eq!(w.engine.accept_admin(q), Err(GovernanceError::Unauthorized));

    // Authority moved with the transfer.
    let now = w.clock.now();
    assert_eq!(
        w.engine.create_proposal(w.admin, "old admin", DAY, now),
        Err(GovernanceError::Unauthorized)
    );
    assert_eq!(w.engine.create_proposal(p, "new admin", DAY, now), Ok(0));
}

#[test]
fn guardian_override_is_narrow() {
    let mut w = world();
    let guardian = principal("guardian");
    let account = principal("partner");
    w.engine.set_whitelist_guardian(w.admin, guardian).unwrap();

    let expiry = agora_types::Timestamp::new(w.clock.now().as_secs() + DAY);
    w.engine
        .set_whitelist_account_expiration(guardian, account, expiry)
        .unwrap();
    assert!(w.engine.is_whitelisted(&account, w.clock.now()));

    assert_eq!(
        w.engine.set_whitelist_guardian(guardian, guardian),
        Err(GovernanceError::Unauthorized)
    );
    assert_eq!(
        w.engine.set_pending_admin(guardian, guardian),
        Err(GovernanceError::Unauthorized)
    );
    assert_eq!(
        w.engine.set_weight(guardian, guardian, Weight::new(1)),
        Err(GovernanceError::Unauthorized)
    );

    w.clock.advance(DAY);
    assert!(!w.engine.is_whitelisted(&account, w.clock.now()));
}
