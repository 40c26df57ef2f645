use std::collections::BTreeMap;

use crate::records::{SubmissionRecord, Tables};
use crate::types::Address;

/// Presentation state derived from the mirror for one user.
///
/// Pure: the same tables and user always give the same model.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReadModel {
    pub user: Option<Address>,
    /// Submissions by votes received, highest first
    pub leaderboard: Vec<SubmissionRecord>,
    pub own_submission: Option<SubmissionRecord>,
    /// Votes the user has given, by submission creator
    pub user_votes: BTreeMap<Address, u32>,
    pub is_participant: bool,
    pub votes_given: u32,
    pub votes_per_participant: u32,
    pub votes_remaining: u32,
}

impl ReadModel {
    pub fn derive(tables: &Tables, user: Option<&Address>) -> Self {
        let leaderboard = leaderboard(tables.ordered_submissions());
        let votes_per_participant = tables
            .config
            .as_ref()
            .map(|config| config.votes_per_participant)
            .unwrap_or(0);

        let Some(user) = user else {
            return Self {
                leaderboard,
                votes_per_participant,
                votes_remaining: votes_per_participant,
                ..Self::default()
            };
        };

        let participant = tables.participants.get(user);
        let is_participant = participant.map(|p| p.is_participant).unwrap_or(false);
        let votes_given = participant.map(|p| p.votes_given).unwrap_or(0);

        let user_votes = tables
            .votes
            .values()
            .filter(|vote| &vote.voter == user && vote.votes_given > 0)
            .map(|vote| (vote.submission, vote.votes_given))
            .collect();

        Self {
            user: Some(*user),
            own_submission: tables.submissions.get(user).cloned(),
            leaderboard,
            user_votes,
            is_participant,
            votes_given,
            votes_per_participant,
            votes_remaining: votes_remaining(votes_per_participant, votes_given),
        }
    }

    /// Votes the user gave `creator`'s submission, 0 if none
    pub fn user_votes_for(&self, creator: &Address) -> u32 {
        self.user_votes.get(creator).copied().unwrap_or(0)
    }

    pub fn submission(&self, creator: &Address) -> Option<&SubmissionRecord> {
        self.leaderboard.iter().find(|s| &s.creator == creator)
    }

    pub fn is_own(&self, creator: &Address) -> bool {
        self.user.as_ref() == Some(creator)
    }
}

/// Order by `votes_received` descending. The sort is stable, so equal
/// totals keep the order they came in.
pub fn leaderboard<'a>(
    submissions: impl IntoIterator<Item = &'a SubmissionRecord>,
) -> Vec<SubmissionRecord> {
    let mut ranked: Vec<SubmissionRecord> = submissions.into_iter().cloned().collect();
    ranked.sort_by(|a, b| b.votes_received.cmp(&a.votes_received));
    ranked
}

pub fn votes_remaining(votes_per_participant: u32, votes_given: u32) -> u32 {
    votes_per_participant.saturating_sub(votes_given)
}
