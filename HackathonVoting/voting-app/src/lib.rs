//! Client for the hackathon voting system: mirrors the ledger tables,
//! derives the leaderboard and vote budget for the connected user, and
//! sends the voting system's write operations.

pub mod actions;
pub mod app;
pub mod config;
pub mod errors;
pub mod ledger;
pub mod mirror;
pub mod read_model;
pub mod records;
pub mod routes;
pub mod session;
pub mod types;
pub mod views;

pub use actions::{SubmissionForm, VotingActions};
pub use app::{App, Screen, Tab, ViewState};
pub use config::AppConfig;
pub use errors::{AddressError, ClientError, ConfigError, LedgerError};
#[cfg(any(test, feature = "local-chain"))]
pub use ledger::local::LocalChain;
pub use ledger::{Indexer, Ledger, SystemCall, TxReceipt, VotingCall};
pub use mirror::{RecordMirror, SyncStatus, TableSubscription};
pub use read_model::ReadModel;
pub use records::{
    ConfigRecord, ModeratorRecord, ParticipantRecord, SubmissionRecord, TableId, Tables,
    VoteHistoryRecord, VoteRecord,
};
pub use routes::Route;
pub use session::Session;
pub use types::{Address, ResourceId};
