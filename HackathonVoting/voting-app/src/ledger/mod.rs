use async_trait::async_trait;

use crate::errors::LedgerError;
use crate::records::Tables;
use crate::types::{Address, ResourceId};

#[cfg(any(test, feature = "local-chain"))]
pub mod local;

/// Write operations exposed by the voting system
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VotingCall {
    CreateSubmission {
        name: String,
        github_url: String,
        demo_video_url: String,
    },
    Vote {
        submission: Address,
    },
    RevokeVote {
        submission: Address,
    },
    UpdateName {
        name: String,
    },
    UpdateGithubUrl {
        github_url: String,
    },
    UpdateDemoVideoUrl {
        demo_video_url: String,
    },
}

impl VotingCall {
    /// Function name in the system ABI
    pub fn function_name(&self) -> &'static str {
        match self {
            VotingCall::CreateSubmission { .. } => "createSubmission",
            VotingCall::Vote { .. } => "vote",
            VotingCall::RevokeVote { .. } => "revokeVote",
            VotingCall::UpdateName { .. } => "updateName",
            VotingCall::UpdateGithubUrl { .. } => "updateGithubUrl",
            VotingCall::UpdateDemoVideoUrl { .. } => "updateDemoVideoUrl",
        }
    }
}

/// A named operation addressed to a system, signed by `caller`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SystemCall {
    pub system_id: ResourceId,
    pub caller: Address,
    pub call: VotingCall,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxReceipt {
    pub function_name: &'static str,
    /// New total of the voted submission, for vote and revoke
    pub votes_received: Option<u32>,
}

/// Transactional write side of the chain client
#[async_trait(?Send)]
pub trait Ledger {
    async fn submit(&self, call: SystemCall) -> Result<TxReceipt, LedgerError>;
}

/// Read side of the chain client: a full snapshot of every mirrored table
#[async_trait(?Send)]
pub trait Indexer {
    async fn fetch(&self) -> Result<Tables, LedgerError>;
}
