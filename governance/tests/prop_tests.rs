use proptest::prelude::*;

use fundgov_governance::{
    evaluate, AuthContext, EngineConfig, GovernanceEngine, NewProposal, ProposalStatus,
    VoteDirection, VoteTotals, WeightPolicy,
};
use fundgov_nullables::{NullClock, NullLedger, NullStore};
use fundgov_types::{Asset, GovernanceParams, Name, Symbol};

fn name(s: &str) -> Name {
    Name::new(s).unwrap()
}

fn xpr(amount: u128) -> Asset {
    Asset::new(amount, Symbol::new("XPR", 4).unwrap())
}

// ---------------------------------------------------------------------------
// Tally
// ---------------------------------------------------------------------------

proptest! {
    /// The verdict is Succeeded exactly when the threshold is met and for
    /// strictly outweighs against.
    #[test]
    fn verdict_matches_threshold_and_majority(
        votes_for in 0u128..10_000,
        votes_against in 0u128..10_000,
        supply in 1u128..20_000,
        threshold in 0u8..=100,
    ) {
        let outcome = evaluate(VoteTotals { votes_for, votes_against }, supply, threshold).unwrap();
        let expected = votes_for * 100 >= threshold as u128 * supply && votes_for > votes_against;
        prop_assert_eq!(outcome.verdict == ProposalStatus::Succeeded, expected);
        prop_assert_eq!(outcome.meets_threshold && outcome.has_majority, expected);
    }

    /// More votes in favour never turn a pass into a fail.
    #[test]
    fn more_support_never_hurts(
        votes_for in 0u128..10_000,
        extra in 0u128..10_000,
        votes_against in 0u128..10_000,
        supply in 1u128..20_000,
        threshold in 0u8..=100,
    ) {
        let before = evaluate(VoteTotals { votes_for, votes_against }, supply, threshold).unwrap();
        let after = evaluate(
            VoteTotals { votes_for: votes_for + extra, votes_against },
            supply,
            threshold,
        )
        .unwrap();
        if before.verdict == ProposalStatus::Succeeded {
            prop_assert_eq!(after.verdict, ProposalStatus::Succeeded);
        }
    }

    /// Participation rounds down and stays within 100% while the votes in
    /// favour do not exceed the supply.
    #[test]
    fn participation_is_bounded(supply in 1u128..1_000_000, share in 0u128..=10_000) {
        let votes_for = supply * share / 10_000;
        let outcome = evaluate(VoteTotals { votes_for, votes_against: 0 }, supply, 50).unwrap();
        prop_assert!(outcome.participation_bps <= 10_000);
        prop_assert_eq!(outcome.participation_bps, votes_for * 10_000 / supply);
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
enum Op {
    PayFee { exact: bool },
    Vote { voter: usize, in_favor: bool },
    Advance { days: u64 },
    Finalize,
    Approve,
    Reject,
    Deliver,
}

const VOTERS: [&str; 3] = ["alice", "bob", "carol"];

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<bool>().prop_map(|exact| Op::PayFee { exact }),
        (0..VOTERS.len(), any::<bool>()).prop_map(|(voter, in_favor)| Op::Vote { voter, in_favor }),
        (0u64..5).prop_map(|days| Op::Advance { days }),
        Just(Op::Finalize),
        Just(Op::Approve),
        Just(Op::Reject),
        Just(Op::Deliver),
    ]
}

fn engine(policy: WeightPolicy) -> GovernanceEngine<NullStore, NullLedger> {
    let ledger = NullLedger::new(Symbol::new("XPR", 4).unwrap());
    ledger.set_supply(1_000);
    for (voter, balance) in VOTERS.iter().zip([300, 200, 100]) {
        ledger.set_balance(&name(voter), balance);
    }
    let config = EngineConfig {
        weight_policy: policy,
        ..EngineConfig::default()
    };
    let mut engine = GovernanceEngine::new(NullStore::new(), ledger, config);
    let admin = AuthContext::signed_by(&engine.config().governance_account.clone());
    engine
        .set_params(
            &admin,
            GovernanceParams {
                funding_account: name("treasury"),
                vote_threshold: 30,
                voting_period_days: 3,
                minimum_proposer_balance: xpr(1),
                listing_fee: xpr(500),
                approver: name("council"),
            },
        )
        .unwrap();
    engine
}

proptest! {
    /// Under any sequence of operations, successful or not, a proposal's
    /// status only moves forward, terminal statuses stick, and at most one
    /// transfer is ever sent for it.
    #[test]
    fn lifecycle_only_moves_forward(
        ops in prop::collection::vec(op_strategy(), 1..40),
        resample in any::<bool>(),
    ) {
        let policy = if resample { WeightPolicy::ResampleAtTally } else { WeightPolicy::SnapshotAtCast };
        let mut engine = engine(policy);
        let clock = NullClock::new(10_000);
        let gov = engine.config().governance_account.clone();
        let council = AuthContext::signed_by(&name("council"));
        let grant = name("grant1");

        engine
            .create(
                &AuthContext::signed_by(&name("alice")),
                NewProposal {
                    creator: name("alice"),
                    receiver: name("dave"),
                    name: grant.clone(),
                    title: "Relay".into(),
                    detail: String::new(),
                    amount: xpr(70_000),
                    url: String::new(),
                },
                clock.now(),
            )
            .unwrap();
        let mut last = ProposalStatus::Draft;

        for op in ops {
            let now = clock.now();
            // Rejections are expected; only the resulting state is checked.
            let _ = match op {
                Op::PayFee { exact } => {
                    let fee = if exact { 500 } else { 499 };
                    engine
                        .on_value_received(&name("alice"), &gov, &xpr(fee), "payment:grant1", now)
                        .map(|_| ())
                }
                Op::Vote { voter, in_favor } => {
                    let voter = name(VOTERS[voter]);
                    let direction = if in_favor { VoteDirection::For } else { VoteDirection::Against };
                    engine
                        .cast_vote(&AuthContext::signed_by(&voter), &voter, &grant, direction, now)
                        .map(|_| ())
                }
                Op::Advance { days } => {
                    clock.advance_days(days);
                    Ok(())
                }
                Op::Finalize => engine.finalize(&council, &grant, now).map(|_| ()),
                Op::Approve => engine.approve(&council, &grant, now).map(|_| ()),
                Op::Reject => engine.reject(&council, &grant),
                Op::Deliver => engine.deliver_disbursements(now).map(|_| ()),
            };

            let status = engine.proposal(&grant).unwrap().status;
            prop_assert!(status.rank() >= last.rank(), "{last} -> {status}");
            if last.is_terminal() {
                prop_assert_eq!(status, last);
            }
            last = status;

            let intents = engine.disbursements().unwrap();
            prop_assert!(intents.len() <= 1);
            prop_assert_eq!(intents.is_empty(), status != ProposalStatus::Completed);
            prop_assert!(engine.ledger().transfers().len() <= 1);
        }
    }
}
