use crate::submission::SubmissionManager;
use crate::types::Submission;
use soroban_sdk::{Env, Vec};

pub struct RankingCalculator;

impl RankingCalculator {
    /// All submissions by `votes_received`, highest first.
    /// Equal totals keep submission order.
    pub fn get_leaderboard(env: &Env) -> Vec<Submission> {
        let mut ranked: Vec<Submission> = Vec::new(env);

        for creator in SubmissionManager::get_creators(env).iter() {
            let submission = match SubmissionManager::get_submission(env, &creator) {
                Ok(submission) => submission,
                Err(_) => continue,
            };

            // Insert after every entry with at least as many votes
            let mut index = ranked.len();
            while index > 0 {
                let previous = ranked.get_unchecked(index - 1);
                if previous.votes_received >= submission.votes_received {
                    break;
                }
                index -= 1;
            }
            ranked.insert(index, submission);
        }

        ranked
    }
}
