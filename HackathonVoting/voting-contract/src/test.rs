#![cfg(test)]
extern crate std;

use super::*;
use crate::types::{VoteHistoryEntry, VOTE_HISTORY_TOPIC};
use soroban_sdk::{
    testutils::{Address as _, Events, Ledger},
    Address, Env, IntoVal, String, Symbol, TryFromVal, Val, Vec,
};

const VOTING_START: u32 = 1_725_000_000;
const VOTING_END: u32 = 1_725_086_400;

struct Setup<'a> {
    env: Env,
    client: HackathonVotingContractClient<'a>,
    admin: Address,
}

// Helper: deploys and initializes the contract with a budget of 3 votes,
// clock placed inside the voting window
fn setup<'a>() -> Setup<'a> {
    let env = Env::default();
    env.mock_all_auths(); // Mock all authorizations to bypass require_auth
    set_time(&env, VOTING_START + 10);

    let contract_id = env.register(HackathonVotingContract, ());
    let client = HackathonVotingContractClient::new(&env, &contract_id);
    let admin = Address::generate(&env);

    client.initialize(
        &admin,
        &Config {
            voting_start_timestamp: VOTING_START,
            voting_end_timestamp: VOTING_END,
            votes_per_participant: 3,
        },
    );

    Setup { env, client, admin }
}

fn set_time(env: &Env, timestamp: u32) {
    env.ledger().with_mut(|ledger| {
        ledger.timestamp = timestamp as u64;
    });
}

// Helper: registers a participant through the admin
fn participant(setup: &Setup) -> Address {
    let user = Address::generate(&setup.env);
    setup.client.set_participant(&setup.admin, &user, &true);
    user
}

fn submit(setup: &Setup, creator: &Address, name: &str) {
    setup.client.create_submission(
        creator,
        &String::from_str(&setup.env, name),
        &String::from_str(&setup.env, "https://github.com/dust/project"),
        &String::from_str(&setup.env, "https://youtu.be/dQw4w9WgXcQ"),
    );
}

#[test]
fn test_initialize_twice_fails() {
    let s = setup();
    let result = s.client.try_initialize(
        &s.admin,
        &Config {
            voting_start_timestamp: VOTING_START,
            voting_end_timestamp: VOTING_END,
            votes_per_participant: 3,
        },
    );
    assert_eq!(result, Err(Ok(Error::AlreadyInitialized)));
}

#[test]
fn test_invalid_config_rejected() {
    let s = setup();
    let inverted = Config {
        voting_start_timestamp: VOTING_END,
        voting_end_timestamp: VOTING_START,
        votes_per_participant: 3,
    };
    assert_eq!(
        s.client.try_set_config(&s.admin, &inverted),
        Err(Ok(Error::InvalidConfig))
    );

    let empty_budget = Config {
        voting_start_timestamp: VOTING_START,
        voting_end_timestamp: VOTING_END,
        votes_per_participant: 0,
    };
    assert_eq!(
        s.client.try_set_config(&s.admin, &empty_budget),
        Err(Ok(Error::InvalidConfig))
    );
}

#[test]
fn test_only_admin_sets_config_and_moderators() {
    let s = setup();
    let outsider = Address::generate(&s.env);
    let config = s.client.get_config();

    assert_eq!(
        s.client.try_set_config(&outsider, &config),
        Err(Ok(Error::Unauthorized))
    );
    assert_eq!(
        s.client.try_set_moderator(&outsider, &outsider, &true),
        Err(Ok(Error::Unauthorized))
    );
}

#[test]
fn test_moderator_registers_participants() {
    let s = setup();
    let moderator = Address::generate(&s.env);
    let user = Address::generate(&s.env);

    assert_eq!(
        s.client.try_set_participant(&moderator, &user, &true),
        Err(Ok(Error::Unauthorized))
    );

    s.client.set_moderator(&s.admin, &moderator, &true);
    assert!(s.client.is_moderator(&moderator));
    s.client.set_participant(&moderator, &user, &true);

    let record = s.client.get_participant(&user);
    assert!(record.is_participant);
    assert_eq!(record.votes_given, 0);

    s.client.set_moderator(&s.admin, &moderator, &false);
    assert!(!s.client.is_moderator(&moderator));
}

#[test]
fn test_create_submission() {
    let s = setup();
    let alice = participant(&s);
    submit(&s, &alice, "Dust Racer");

    let submission = s.client.get_submission(&alice);
    assert_eq!(submission.creator, alice);
    assert_eq!(submission.name, String::from_str(&s.env, "Dust Racer"));
    assert_eq!(submission.votes_received, 0);
    assert_eq!(submission.submitted_timestamp, VOTING_START + 10);
    assert_eq!(s.client.get_submission_creators().len(), 1);
}

#[test]
fn test_one_submission_per_creator() {
    let s = setup();
    let alice = participant(&s);
    submit(&s, &alice, "First");

    let result = s.client.try_create_submission(
        &alice,
        &String::from_str(&s.env, "Second"),
        &String::from_str(&s.env, ""),
        &String::from_str(&s.env, ""),
    );
    assert_eq!(result, Err(Ok(Error::SubmissionExists)));
    assert_eq!(s.client.get_submission_creators().len(), 1);
}

#[test]
fn test_non_participant_cannot_submit() {
    let s = setup();
    let stranger = Address::generate(&s.env);
    let result = s.client.try_create_submission(
        &stranger,
        &String::from_str(&s.env, "Nope"),
        &String::from_str(&s.env, ""),
        &String::from_str(&s.env, ""),
    );
    assert_eq!(result, Err(Ok(Error::NotParticipant)));
}

#[test]
fn test_update_fields_independently() {
    let s = setup();
    let alice = participant(&s);
    submit(&s, &alice, "Old Name");

    s.client
        .update_name(&alice, &String::from_str(&s.env, "New Name"));
    let submission = s.client.get_submission(&alice);
    assert_eq!(submission.name, String::from_str(&s.env, "New Name"));
    assert_eq!(
        submission.github_url,
        String::from_str(&s.env, "https://github.com/dust/project")
    );

    s.client
        .update_github_url(&alice, &String::from_str(&s.env, "https://github.com/a/b"));
    s.client
        .update_demo_video_url(&alice, &String::from_str(&s.env, "https://youtu.be/x"));
    let submission = s.client.get_submission(&alice);
    assert_eq!(submission.name, String::from_str(&s.env, "New Name"));
    assert_eq!(submission.github_url, String::from_str(&s.env, "https://github.com/a/b"));
    assert_eq!(submission.demo_video_url, String::from_str(&s.env, "https://youtu.be/x"));
}

#[test]
fn test_update_without_submission_fails() {
    let s = setup();
    let bob = participant(&s);
    assert_eq!(
        s.client
            .try_update_name(&bob, &String::from_str(&s.env, "Ghost")),
        Err(Ok(Error::SubmissionNotFound))
    );
}

#[test]
fn test_submissions_close_with_voting() {
    let s = setup();
    let alice = participant(&s);
    set_time(&s.env, VOTING_END + 1);

    let result = s.client.try_create_submission(
        &alice,
        &String::from_str(&s.env, "Late"),
        &String::from_str(&s.env, ""),
        &String::from_str(&s.env, ""),
    );
    assert_eq!(result, Err(Ok(Error::SubmissionsClosed)));
}

#[test]
fn test_vote_updates_all_totals() {
    let s = setup();
    let alice = participant(&s);
    let bob = participant(&s);
    submit(&s, &alice, "Alice Project");

    assert_eq!(s.client.vote(&bob, &alice), 1);
    assert_eq!(s.client.vote(&bob, &alice), 2);

    assert_eq!(s.client.get_votes(&bob, &alice), 2);
    assert_eq!(s.client.get_participant(&bob).votes_given, 2);
    assert_eq!(s.client.get_submission(&alice).votes_received, 2);
    assert_eq!(s.client.votes_remaining(&bob), 1);
}

#[test]
fn test_vote_budget_enforced() {
    let s = setup();
    let alice = participant(&s);
    let bob = participant(&s);
    submit(&s, &alice, "Alice Project");

    for _ in 0..3 {
        s.client.vote(&bob, &alice);
    }
    assert_eq!(
        s.client.try_vote(&bob, &alice),
        Err(Ok(Error::NoVotesRemaining))
    );

    // Failed call leaves every total where it was
    assert_eq!(s.client.get_participant(&bob).votes_given, 3);
    assert_eq!(s.client.get_submission(&alice).votes_received, 3);
    assert_eq!(s.client.votes_remaining(&bob), 0);
}

#[test]
fn test_cannot_vote_for_own_submission() {
    let s = setup();
    let alice = participant(&s);
    submit(&s, &alice, "Alice Project");

    assert_eq!(
        s.client.try_vote(&alice, &alice),
        Err(Ok(Error::CannotVoteForOwnSubmission))
    );
}

#[test]
fn test_vote_requires_participant_and_submission() {
    let s = setup();
    let alice = participant(&s);
    let bob = participant(&s);
    let stranger = Address::generate(&s.env);
    submit(&s, &alice, "Alice Project");

    assert_eq!(
        s.client.try_vote(&stranger, &alice),
        Err(Ok(Error::NotParticipant))
    );
    assert_eq!(
        s.client.try_vote(&alice, &bob),
        Err(Ok(Error::SubmissionNotFound))
    );
}

#[test]
fn test_vote_outside_window() {
    let s = setup();
    let alice = participant(&s);
    let bob = participant(&s);
    submit(&s, &alice, "Alice Project");

    set_time(&s.env, VOTING_START - 1);
    assert_eq!(
        s.client.try_vote(&bob, &alice),
        Err(Ok(Error::VotingNotStarted))
    );

    set_time(&s.env, VOTING_END + 1);
    assert_eq!(s.client.try_vote(&bob, &alice), Err(Ok(Error::VotingEnded)));
}

#[test]
fn test_revoke_vote() {
    let s = setup();
    let alice = participant(&s);
    let bob = participant(&s);
    submit(&s, &alice, "Alice Project");

    s.client.vote(&bob, &alice);
    s.client.vote(&bob, &alice);
    assert_eq!(s.client.revoke_vote(&bob, &alice), 1);
    assert_eq!(s.client.get_votes(&bob, &alice), 1);
    assert_eq!(s.client.get_participant(&bob).votes_given, 1);

    assert_eq!(s.client.revoke_vote(&bob, &alice), 0);
    assert_eq!(s.client.get_votes(&bob, &alice), 0);
    assert_eq!(s.client.get_participant(&bob).votes_given, 0);
    assert_eq!(s.client.get_submission(&alice).votes_received, 0);

    assert_eq!(
        s.client.try_revoke_vote(&bob, &alice),
        Err(Ok(Error::NoVoteToRevoke))
    );
}

#[test]
fn test_leaderboard_is_stable() {
    let s = setup();
    let a = participant(&s);
    let b = participant(&s);
    let c = participant(&s);
    let voter_one = participant(&s);
    let voter_two = participant(&s);
    submit(&s, &a, "A");
    submit(&s, &b, "B");
    submit(&s, &c, "C");

    // C: 2, B: 2, A: 1
    s.client.vote(&voter_one, &c);
    s.client.vote(&voter_two, &c);
    s.client.vote(&voter_one, &b);
    s.client.vote(&voter_two, &b);
    s.client.vote(&voter_one, &a);

    let leaderboard = s.client.get_leaderboard();
    assert_eq!(leaderboard.len(), 3);
    assert_eq!(leaderboard.get_unchecked(0).creator, b);
    assert_eq!(leaderboard.get_unchecked(1).creator, c);
    assert_eq!(leaderboard.get_unchecked(2).creator, a);
}

#[test]
fn test_unregistered_participant_keeps_votes_given() {
    let s = setup();
    let alice = participant(&s);
    let bob = participant(&s);
    submit(&s, &alice, "Alice Project");
    s.client.vote(&bob, &alice);

    s.client.set_participant(&s.admin, &bob, &false);
    let record = s.client.get_participant(&bob);
    assert!(!record.is_participant);
    assert_eq!(record.votes_given, 1);
    assert_eq!(
        s.client.try_vote(&bob, &alice),
        Err(Ok(Error::NotParticipant))
    );
}

#[test]
fn test_budget_cannot_drop_below_votes_spent() {
    let s = setup();
    let alice = participant(&s);
    let bob = participant(&s);
    submit(&s, &alice, "Alice Project");
    for _ in 0..3 {
        s.client.vote(&bob, &alice);
    }

    let lowered = Config {
        voting_start_timestamp: VOTING_START,
        voting_end_timestamp: VOTING_END,
        votes_per_participant: 1,
    };
    assert_eq!(
        s.client.try_set_config(&s.admin, &lowered),
        Err(Ok(Error::InvalidConfig))
    );
    assert_eq!(s.client.get_config().votes_per_participant, 3);
    assert!(s.client.get_participant(&bob).votes_given <= s.client.get_config().votes_per_participant);

    // Raising it, or keeping it at the amount spent, is fine
    let raised = Config {
        votes_per_participant: 5,
        ..lowered.clone()
    };
    s.client.set_config(&s.admin, &raised);
    assert_eq!(s.client.votes_remaining(&bob), 2);
    let exact = Config {
        votes_per_participant: 3,
        ..lowered
    };
    s.client.set_config(&s.admin, &exact);
    assert_eq!(s.client.votes_remaining(&bob), 0);
}

// Helper: topics and decoded payload of the most recent contract event
fn last_history_event(s: &Setup) -> (Vec<Val>, VoteHistoryEntry) {
    let (contract_id, topics, data) = s.env.events().all().last().unwrap();
    assert_eq!(contract_id, s.client.address);
    (topics, VoteHistoryEntry::try_from_val(&s.env, &data).unwrap())
}

#[test]
fn test_vote_history_events() {
    let s = setup();
    let alice = participant(&s);
    let bob = participant(&s);
    submit(&s, &alice, "Alice Project");

    s.client.vote(&bob, &alice);
    let (topics, entry) = last_history_event(&s);
    let expected_topics: Vec<Val> = (
        Symbol::new(&s.env, VOTE_HISTORY_TOPIC),
        alice.clone(),
        bob.clone(),
    )
        .into_val(&s.env);
    assert_eq!(topics, expected_topics);
    assert_eq!(
        entry,
        VoteHistoryEntry {
            submission: alice.clone(),
            timestamp: VOTING_START + 10,
            voter: bob.clone(),
            diff: 1,
            total_votes: 1,
        }
    );

    s.client.vote(&bob, &alice);
    assert_eq!(last_history_event(&s).1.total_votes, 2);

    set_time(&s.env, VOTING_START + 20);
    s.client.revoke_vote(&bob, &alice);
    let (topics, entry) = last_history_event(&s);
    assert_eq!(topics, expected_topics);
    assert_eq!(
        entry,
        VoteHistoryEntry {
            submission: alice,
            timestamp: VOTING_START + 20,
            voter: bob,
            diff: -1,
            total_votes: 1,
        }
    );
}
