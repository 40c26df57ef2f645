#![no_std]
use soroban_sdk::{contract, contractimpl, Address, Env, String, Vec};

mod access;
mod history;
mod ranking;
mod submission;
pub mod types;
mod voting;

use crate::access::AccessManager;
use crate::ranking::RankingCalculator;
use crate::submission::{SubmissionField, SubmissionManager};
use crate::types::{Config, Error, Participant, Submission};
use crate::voting::VoteManager;

#[contract]
pub struct HackathonVotingContract;

#[contractimpl]
impl HackathonVotingContract {
    /// Initialize the contract with an admin and the voting config
    pub fn initialize(env: Env, admin: Address, config: Config) -> Result<(), Error> {
        admin.require_auth();
        AccessManager::init(&env, &admin, &config)?;
        SubmissionManager::init(&env);
        Ok(())
    }

    /// Replace the voting window and budget
    pub fn set_config(env: Env, admin: Address, config: Config) -> Result<(), Error> {
        admin.require_auth();
        AccessManager::set_config(&env, &admin, &config)
    }

    pub fn set_moderator(
        env: Env,
        admin: Address,
        user: Address,
        is_moderator: bool,
    ) -> Result<(), Error> {
        admin.require_auth();
        AccessManager::set_moderator(&env, &admin, &user, is_moderator)
    }

    /// Register a participant (moderators and admin)
    pub fn set_participant(
        env: Env,
        moderator: Address,
        user: Address,
        is_participant: bool,
    ) -> Result<(), Error> {
        moderator.require_auth();
        AccessManager::set_participant(&env, &moderator, &user, is_participant)
    }

    pub fn create_submission(
        env: Env,
        creator: Address,
        name: String,
        github_url: String,
        demo_video_url: String,
    ) -> Result<(), Error> {
        creator.require_auth();
        SubmissionManager::create_submission(&env, creator, name, github_url, demo_video_url)
    }

    pub fn update_name(env: Env, creator: Address, name: String) -> Result<(), Error> {
        creator.require_auth();
        SubmissionManager::update_field(&env, creator, SubmissionField::Name, name)
    }

    pub fn update_github_url(env: Env, creator: Address, github_url: String) -> Result<(), Error> {
        creator.require_auth();
        SubmissionManager::update_field(&env, creator, SubmissionField::GithubUrl, github_url)
    }

    pub fn update_demo_video_url(
        env: Env,
        creator: Address,
        demo_video_url: String,
    ) -> Result<(), Error> {
        creator.require_auth();
        SubmissionManager::update_field(
            &env,
            creator,
            SubmissionField::DemoVideoUrl,
            demo_video_url,
        )
    }

    /// Give one vote to a submission, returning its new total
    pub fn vote(env: Env, voter: Address, submission: Address) -> Result<u32, Error> {
        voter.require_auth();
        VoteManager::vote(&env, &voter, &submission)
    }

    /// Take back one vote from a submission, returning its new total
    pub fn revoke_vote(env: Env, voter: Address, submission: Address) -> Result<u32, Error> {
        voter.require_auth();
        VoteManager::revoke_vote(&env, &voter, &submission)
    }

    pub fn get_config(env: Env) -> Result<Config, Error> {
        AccessManager::get_config(&env)
    }

    pub fn is_moderator(env: Env, user: Address) -> bool {
        AccessManager::is_moderator(&env, &user)
    }

    pub fn get_participant(env: Env, user: Address) -> Participant {
        AccessManager::get_participant(&env, &user)
    }

    pub fn get_submission(env: Env, creator: Address) -> Result<Submission, Error> {
        SubmissionManager::get_submission(&env, &creator)
    }

    pub fn get_submission_creators(env: Env) -> Vec<Address> {
        SubmissionManager::get_creators(&env)
    }

    pub fn get_votes(env: Env, voter: Address, submission: Address) -> u32 {
        VoteManager::get_votes(&env, &voter, &submission)
    }

    pub fn votes_remaining(env: Env, voter: Address) -> Result<u32, Error> {
        VoteManager::votes_remaining(&env, &voter)
    }

    /// Submissions ordered by votes received, ties in submission order
    pub fn get_leaderboard(env: Env) -> Vec<Submission> {
        RankingCalculator::get_leaderboard(&env)
    }
}

#[cfg(test)]
mod test;
