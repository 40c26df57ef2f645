use crate::access::AccessManager;
use crate::history::HistoryLog;
use crate::submission::SubmissionManager;
use crate::types::{DataKey, Error, Vote};
use soroban_sdk::{Address, Env};

pub struct VoteManager;

impl VoteManager {
    /// Give one vote from `voter` to the submission created by `submission`.
    ///
    /// The vote row, the voter's participant total and the submission total
    /// move together; any failed check leaves all three untouched.
    ///
    /// # Returns
    /// * `u32` - The submission's new `votes_received`
    pub fn vote(env: &Env, voter: &Address, submission: &Address) -> Result<u32, Error> {
        let mut participant = AccessManager::require_participant(env, voter)?;
        let config = AccessManager::get_config(env)?;
        Self::require_voting_open(env)?;

        let mut target = SubmissionManager::get_submission(env, submission)?;
        if &target.creator == voter {
            return Err(Error::CannotVoteForOwnSubmission);
        }
        if participant.votes_given >= config.votes_per_participant {
            return Err(Error::NoVotesRemaining);
        }

        let mut vote = Self::get_vote(env, voter, submission).unwrap_or(Vote {
            voter: voter.clone(),
            submission: submission.clone(),
            votes_given: 0,
        });
        vote.votes_given += 1;
        participant.votes_given += 1;
        target.votes_received += 1;

        env.storage()
            .persistent()
            .set(&DataKey::Vote(voter.clone(), submission.clone()), &vote);
        AccessManager::save_participant(env, &participant);
        SubmissionManager::save_submission(env, &target);

        HistoryLog::record(env, submission, voter, 1, target.votes_received);
        Ok(target.votes_received)
    }

    /// Take back one vote. The vote row is removed once it reaches zero.
    ///
    /// # Returns
    /// * `u32` - The submission's new `votes_received`
    pub fn revoke_vote(env: &Env, voter: &Address, submission: &Address) -> Result<u32, Error> {
        Self::require_voting_open(env)?;

        let mut vote = Self::get_vote(env, voter, submission).ok_or(Error::NoVoteToRevoke)?;
        let mut target = SubmissionManager::get_submission(env, submission)?;
        let mut participant = AccessManager::get_participant(env, voter);

        vote.votes_given -= 1;
        participant.votes_given = participant.votes_given.saturating_sub(1);
        target.votes_received = target.votes_received.saturating_sub(1);

        let key = DataKey::Vote(voter.clone(), submission.clone());
        if vote.votes_given == 0 {
            env.storage().persistent().remove(&key);
        } else {
            env.storage().persistent().set(&key, &vote);
        }
        AccessManager::save_participant(env, &participant);
        SubmissionManager::save_submission(env, &target);

        HistoryLog::record(env, submission, voter, -1, target.votes_received);
        Ok(target.votes_received)
    }

    pub fn get_vote(env: &Env, voter: &Address, submission: &Address) -> Option<Vote> {
        env.storage()
            .persistent()
            .get(&DataKey::Vote(voter.clone(), submission.clone()))
    }

    /// Votes `voter` has given to `submission`, zero when absent
    pub fn get_votes(env: &Env, voter: &Address, submission: &Address) -> u32 {
        Self::get_vote(env, voter, submission)
            .map(|vote| vote.votes_given)
            .unwrap_or(0)
    }

    pub fn votes_remaining(env: &Env, voter: &Address) -> Result<u32, Error> {
        let config = AccessManager::get_config(env)?;
        let participant = AccessManager::get_participant(env, voter);
        Ok(config
            .votes_per_participant
            .saturating_sub(participant.votes_given))
    }

    fn require_voting_open(env: &Env) -> Result<(), Error> {
        let config = AccessManager::get_config(env)?;
        let now = env.ledger().timestamp();

        if now < config.voting_start_timestamp as u64 {
            return Err(Error::VotingNotStarted);
        }
        if now > config.voting_end_timestamp as u64 {
            return Err(Error::VotingEnded);
        }
        Ok(())
    }
}
