//! The engine over a real LMDB store: state written by one engine must be
//! readable after the environment is reopened.

use fundgov_governance::{
    AuthContext, DeliveryStatus, EngineConfig, GovernanceEngine, GovernanceReader, NewProposal,
    ProposalStatus, VoteDirection,
};
use fundgov_nullables::{NullClock, NullLedger};
use fundgov_store_lmdb::LmdbEnvironment;
use fundgov_types::{Asset, GovernanceParams, Name, Symbol};

const MAP_SIZE: usize = 4 << 20;

fn name(s: &str) -> Name {
    Name::new(s).expect("valid name")
}

fn xpr(amount: u128) -> Asset {
    Asset::new(amount, Symbol::new("XPR", 4).expect("valid symbol"))
}

fn temp_env() -> (tempfile::TempDir, LmdbEnvironment) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let env = LmdbEnvironment::open(dir.path(), MAP_SIZE).expect("open LMDB");
    (dir, env)
}

fn ledger() -> NullLedger {
    let ledger = NullLedger::new(Symbol::new("XPR", 4).expect("valid symbol"));
    ledger.set_supply(1_000);
    ledger.set_balance(&name("alice"), 600);
    ledger.set_balance(&name("bob"), 100);
    ledger
}

// ---------------------------------------------------------------------------
// Full lifecycle
// ---------------------------------------------------------------------------

#[test]
fn lifecycle_persists_across_reopen() {
    let (dir, env) = temp_env();
    let config = EngineConfig {
        data_dir: dir.path().to_path_buf(),
        ..EngineConfig::default()
    };
    let clock = NullClock::new(50_000);
    let gov = config.governance_account.clone();
    let council = AuthContext::signed_by(&name("council"));
    let grant = name("grant1");

    {
        let mut engine = GovernanceEngine::new(env.governance_store(), ledger(), config.clone());
        engine
            .set_params(
                &AuthContext::signed_by(&gov),
                GovernanceParams {
                    funding_account: name("treasury"),
                    vote_threshold: 50,
                    voting_period_days: 3,
                    minimum_proposer_balance: xpr(10),
                    listing_fee: xpr(2_000),
                    approver: name("council"),
                },
            )
            .expect("set params");

        engine
            .create(
                &AuthContext::signed_by(&name("alice")),
                NewProposal {
                    creator: name("alice"),
                    receiver: name("alice"),
                    name: grant.clone(),
                    title: "Block explorer".into(),
                    detail: String::new(),
                    amount: xpr(90_000),
                    url: String::new(),
                },
                clock.now(),
            )
            .expect("create");
        engine
            .on_value_received(&name("alice"), &gov, &xpr(2_000), "payment:grant1", clock.now())
            .expect("pay fee");

        for (voter, direction) in [("alice", VoteDirection::For), ("bob", VoteDirection::Against)] {
            let voter = name(voter);
            engine
                .cast_vote(&AuthContext::signed_by(&voter), &voter, &grant, direction, clock.now())
                .expect("vote");
        }

        clock.advance_days(3);
        let outcome = engine.finalize(&council, &grant, clock.now()).expect("finalize");
        assert_eq!(outcome.verdict, ProposalStatus::Succeeded);
        assert_eq!(outcome.participation_bps, 6_000);

        engine.approve(&council, &grant, clock.now()).expect("approve");
        let report = engine.deliver_disbursements(clock.now()).expect("deliver");
        assert_eq!(report.delivered, vec![grant.clone()]);
        assert_eq!(engine.ledger().transfers().len(), 1);
    }
    env.close().expect("close read-write environment");

    let env = LmdbEnvironment::open_read_only(dir.path(), MAP_SIZE).expect("reopen read-only");
    let store = env.governance_store();
    let reader = GovernanceReader::new(&store, &config);

    assert_eq!(reader.params().unwrap().listing_fee, xpr(2_000));

    let proposal = reader.proposal(&grant).unwrap();
    assert_eq!(proposal.status, ProposalStatus::Completed);
    assert_eq!((proposal.votes_for, proposal.votes_against), (600, 100));

    let ballots = reader.ballots(&grant).unwrap();
    let voters: Vec<&str> = ballots.iter().map(|b| b.voter.as_str()).collect();
    assert_eq!(voters, vec!["alice", "bob"]);

    let intents = reader.disbursements().unwrap();
    assert_eq!(intents.len(), 1);
    assert!(matches!(intents[0].status, DeliveryStatus::Delivered { .. }));
    assert!(reader.pending_disbursements().unwrap().is_empty());
}

#[test]
fn removal_clears_ballots_on_disk() {
    let (_dir, env) = temp_env();
    let config = EngineConfig::default();
    let gov = config.governance_account.clone();
    let clock = NullClock::new(1);
    let mut engine = GovernanceEngine::new(env.governance_store(), ledger(), config);

    engine
        .set_params(
            &AuthContext::signed_by(&gov),
            GovernanceParams {
                voting_period_days: 1,
                ..GovernanceParams::unconfigured(&gov, &Symbol::new("XPR", 4).unwrap())
            },
        )
        .unwrap();
    engine
        .create(
            &AuthContext::signed_by(&name("bob")),
            NewProposal {
                creator: name("bob"),
                receiver: name("bob"),
                name: name("grant"),
                title: "Faucet".into(),
                detail: String::new(),
                amount: xpr(1),
                url: String::new(),
            },
            clock.now(),
        )
        .unwrap();
    engine
        .on_value_received(&name("bob"), &gov, &xpr(0), "payment:grant", clock.now())
        .unwrap();
    let bob = name("bob");
    engine
        .cast_vote(&AuthContext::signed_by(&bob), &bob, &name("grant"), VoteDirection::For, clock.now())
        .unwrap();

    engine
        .remove_proposal(&AuthContext::signed_by(&gov), &name("grant"))
        .unwrap();
    assert!(engine.proposals(None).unwrap().is_empty());
    assert!(engine.reader().ballot_box(&name("grant")).unwrap().is_empty());
}
