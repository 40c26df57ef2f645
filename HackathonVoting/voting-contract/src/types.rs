use soroban_sdk::{contracterror, contracttype, Address, String};

/// First topic of every vote history event
pub const VOTE_HISTORY_TOPIC: &str = "vote_hist";

/// Storage keys for contract data
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,                   // Contract administrator
    Config,                  // Voting window and budget
    Moderator(Address),      // User -> is moderator
    Participant(Address),    // User -> Participant
    Submission(Address),     // Creator -> Submission
    SubmissionCreators,      // Vec<Address> in creation order
    Vote(Address, Address),  // (Voter, Submission creator) -> Vote
    PeakVotesGiven,          // Highest votes_given any participant has reached
}

/// Voting window and per-participant budget
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub voting_start_timestamp: u32,
    pub voting_end_timestamp: u32,
    pub votes_per_participant: u32,
}

/// A project entry, one per creator
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Submission {
    pub creator: Address,
    pub submitted_timestamp: u32,
    pub votes_received: u32,
    pub name: String,
    pub github_url: String,
    pub demo_video_url: String,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Participant {
    pub user: Address,
    pub is_participant: bool,
    pub votes_given: u32,
}

/// Votes a single voter has placed on a single submission
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Vote {
    pub voter: Address,
    pub submission: Address,
    pub votes_given: u32,
}

/// Payload of the `vote_hist` event. Never stored on-ledger; indexers
/// append one row per event.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VoteHistoryEntry {
    pub submission: Address,
    pub timestamp: u32,
    pub voter: Address,
    pub diff: i32,
    pub total_votes: u32,
}

/// Contract error types
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    NotInitialized = 1,             // Contract not initialized
    AlreadyInitialized = 2,         // Contract already setup
    Unauthorized = 3,               // Caller lacks permission
    NotParticipant = 4,             // Caller is not a registered participant
    SubmissionExists = 5,           // Creator already submitted a project
    SubmissionNotFound = 6,         // No submission for this creator
    VotingNotStarted = 7,           // Before the voting window
    VotingEnded = 8,                // After the voting window
    SubmissionsClosed = 9,          // Submissions can no longer be created or edited
    NoVotesRemaining = 10,          // Vote budget exhausted
    CannotVoteForOwnSubmission = 11,
    NoVoteToRevoke = 12,            // Voter has no vote on this submission
    InvalidConfig = 13,             // Empty budget, inverted window or budget below votes spent
}
