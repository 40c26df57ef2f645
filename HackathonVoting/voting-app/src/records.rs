use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::Address;

/// Mirrored tables, named as they are registered on-chain
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TableId {
    Config,
    Moderators,
    Submissions,
    Participants,
    Votes,
    VoteHistory,
    SubmissionCreators,
}

impl TableId {
    pub const ALL: [TableId; 7] = [
        TableId::Config,
        TableId::Moderators,
        TableId::Submissions,
        TableId::Participants,
        TableId::Votes,
        TableId::VoteHistory,
        TableId::SubmissionCreators,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TableId::Config => "Config",
            TableId::Moderators => "Moderators",
            TableId::Submissions => "Submissions",
            TableId::Participants => "Participants",
            TableId::Votes => "Votes",
            TableId::VoteHistory => "VoteHistory",
            TableId::SubmissionCreators => "SubmissionCreators",
        }
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRecord {
    pub voting_start_timestamp: u32,
    pub voting_end_timestamp: u32,
    pub votes_per_participant: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeratorRecord {
    pub user: Address,
    pub is_moderator: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub creator: Address,
    pub submitted_timestamp: u32,
    pub votes_received: u32,
    pub name: String,
    pub github_url: String,
    pub demo_video_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantRecord {
    pub user: Address,
    pub is_participant: bool,
    pub votes_given: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    pub voter: Address,
    pub submission: Address,
    pub votes_given: u32,
}

/// One vote or revoke event. Rows are appended, never rewritten.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteHistoryRecord {
    pub submission: Address,
    pub timestamp: u32,
    pub voter: Address,
    pub diff: i32,
    pub total_votes: u32,
}

/// A full copy of every mirrored table. Rows keep the order the indexer
/// delivered them in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tables {
    pub config: Option<ConfigRecord>,
    pub moderators: IndexMap<Address, ModeratorRecord>,
    pub submissions: IndexMap<Address, SubmissionRecord>,
    pub participants: IndexMap<Address, ParticipantRecord>,
    pub votes: IndexMap<(Address, Address), VoteRecord>,
    pub vote_history: Vec<VoteHistoryRecord>,
    /// Submission creators in the order they submitted
    pub submission_creators: Vec<Address>,
}

impl Tables {
    pub fn insert_submission(&mut self, record: SubmissionRecord) {
        if !self.submission_creators.contains(&record.creator) {
            self.submission_creators.push(record.creator);
        }
        self.submissions.insert(record.creator, record);
    }

    /// Submissions in submission order
    pub fn ordered_submissions(&self) -> impl Iterator<Item = &SubmissionRecord> {
        self.submission_creators
            .iter()
            .filter_map(|creator| self.submissions.get(creator))
    }

    pub fn insert_participant(&mut self, record: ParticipantRecord) {
        self.participants.insert(record.user, record);
    }

    pub fn insert_moderator(&mut self, record: ModeratorRecord) {
        self.moderators.insert(record.user, record);
    }

    pub fn insert_vote(&mut self, record: VoteRecord) {
        self.votes.insert((record.voter, record.submission), record);
    }

    /// Tables whose content differs between `self` and `other`
    pub fn changed_tables(&self, other: &Tables) -> Vec<TableId> {
        TableId::ALL
            .into_iter()
            .filter(|table| match table {
                TableId::Config => self.config != other.config,
                TableId::Moderators => self.moderators != other.moderators,
                TableId::Submissions => self.submissions != other.submissions,
                TableId::Participants => self.participants != other.participants,
                TableId::Votes => self.votes != other.votes,
                TableId::VoteHistory => self.vote_history != other.vote_history,
                TableId::SubmissionCreators => {
                    self.submission_creators != other.submission_creators
                }
            })
            .collect()
    }
}

