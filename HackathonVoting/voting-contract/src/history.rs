use crate::types::{VoteHistoryEntry, VOTE_HISTORY_TOPIC};
use soroban_sdk::{Address, Env, Symbol};

/// Off-ledger vote history. Entries only exist as events for indexers.
pub struct HistoryLog;

impl HistoryLog {
    pub fn record(env: &Env, submission: &Address, voter: &Address, diff: i32, total_votes: u32) {
        let entry = VoteHistoryEntry {
            submission: submission.clone(),
            timestamp: env.ledger().timestamp() as u32,
            voter: voter.clone(),
            diff,
            total_votes,
        };

        env.events().publish(
            (
                Symbol::new(env, VOTE_HISTORY_TOPIC),
                submission.clone(),
                voter.clone(),
            ),
            entry,
        );
    }
}
