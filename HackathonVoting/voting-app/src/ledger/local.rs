//! In-process chain for development and tests.
//!
//! Deploys the voting contract into a sandboxed Soroban environment and maps
//! app addresses onto generated chain accounts. Vote history rows are
//! decoded from the `vote_hist` events the contract publishes.

use std::cell::RefCell;
use std::fmt::Debug;

use async_trait::async_trait;
use hackathon_voting_contract::types::{
    Config, Submission, VoteHistoryEntry, VOTE_HISTORY_TOPIC,
};
use hackathon_voting_contract::{HackathonVotingContract, HackathonVotingContractClient};
use log::{debug, info};
use soroban_sdk::testutils::{Address as _, Events as _, Ledger as _};
use soroban_sdk::{Env, Symbol, TryFromVal};

use super::{Indexer, Ledger, SystemCall, TxReceipt, VotingCall};
use crate::errors::LedgerError;
use crate::records::{
    ConfigRecord, ModeratorRecord, ParticipantRecord, SubmissionRecord, Tables, VoteHistoryRecord,
    VoteRecord,
};
use crate::types::{Address, ResourceId};

type ChainAddress = soroban_sdk::Address;

pub struct LocalChain {
    env: Env,
    contract_id: ChainAddress,
    admin: ChainAddress,
    system_id: ResourceId,
    accounts: RefCell<Vec<(Address, ChainAddress)>>,
    history: RefCell<Vec<VoteHistoryRecord>>,
}

impl LocalChain {
    /// Deploy and initialize the voting contract. The clock starts at the
    /// beginning of the voting window.
    pub fn new(system_id: ResourceId, config: &ConfigRecord) -> Result<Self, LedgerError> {
        let env = Env::default();
        env.mock_all_auths();
        env.ledger().with_mut(|ledger| {
            ledger.timestamp = config.voting_start_timestamp as u64;
        });

        let contract_id = env.register(HackathonVotingContract, ());
        let admin = ChainAddress::generate(&env);
        let chain = Self {
            env,
            contract_id,
            admin,
            system_id,
            accounts: RefCell::new(Vec::new()),
            history: RefCell::new(Vec::new()),
        };

        settle(
            "initialize",
            chain
                .client()
                .try_initialize(&chain.admin, &to_chain_config(config)),
        )?;
        info!("local chain deployed voting system {}", system_id);
        Ok(chain)
    }

    pub fn system_id(&self) -> ResourceId {
        self.system_id
    }

    pub fn set_timestamp(&self, timestamp: u32) {
        self.env.ledger().with_mut(|ledger| {
            ledger.timestamp = timestamp as u64;
        });
    }

    pub fn timestamp(&self) -> u32 {
        self.env.ledger().timestamp() as u32
    }

    pub fn set_config(&self, config: &ConfigRecord) -> Result<(), LedgerError> {
        settle(
            "setConfig",
            self.client()
                .try_set_config(&self.admin, &to_chain_config(config)),
        )
    }

    pub fn set_moderator(&self, user: &Address, is_moderator: bool) -> Result<(), LedgerError> {
        let account = self.account(user);
        settle(
            "setModerator",
            self.client()
                .try_set_moderator(&self.admin, &account, &is_moderator),
        )
    }

    /// Moderator action: grant or withdraw participation. `moderator` of
    /// `None` acts as the admin.
    pub fn set_participant(
        &self,
        moderator: Option<&Address>,
        user: &Address,
        is_participant: bool,
    ) -> Result<(), LedgerError> {
        let moderator = match moderator {
            Some(moderator) => self.account(moderator),
            None => self.admin.clone(),
        };
        let account = self.account(user);
        settle(
            "setParticipant",
            self.client()
                .try_set_participant(&moderator, &account, &is_participant),
        )
    }

    fn client(&self) -> HackathonVotingContractClient<'_> {
        HackathonVotingContractClient::new(&self.env, &self.contract_id)
    }

    /// Chain account for an app address, created on first use
    fn account(&self, user: &Address) -> ChainAddress {
        if let Some((_, account)) = self.accounts.borrow().iter().find(|(a, _)| a == user) {
            return account.clone();
        }

        let account = ChainAddress::generate(&self.env);
        self.accounts.borrow_mut().push((*user, account.clone()));
        account
    }

    fn app_address(&self, account: &ChainAddress) -> Option<Address> {
        self.accounts
            .borrow()
            .iter()
            .find(|(_, a)| a == account)
            .map(|(user, _)| *user)
    }

    fn string(&self, value: &str) -> soroban_sdk::String {
        soroban_sdk::String::from_str(&self.env, value)
    }

    fn submission_record(&self, submission: Submission) -> Result<SubmissionRecord, LedgerError> {
        let creator = self
            .app_address(&submission.creator)
            .ok_or_else(|| LedgerError::Unavailable("submission from unknown account".into()))?;

        Ok(SubmissionRecord {
            creator,
            submitted_timestamp: submission.submitted_timestamp,
            votes_received: submission.votes_received,
            name: to_std_string(&submission.name),
            github_url: to_std_string(&submission.github_url),
            demo_video_url: to_std_string(&submission.demo_video_url),
        })
    }

    /// Index the history event published by the call that just ran
    fn index_history_event(&self, function_name: &str) -> Result<(), LedgerError> {
        let missing =
            || LedgerError::Unavailable(format!("{}: no vote history event", function_name));
        let (contract_id, topics, data) =
            self.env.events().all().last().ok_or_else(missing)?;

        let topic = topics
            .get(0)
            .and_then(|topic| Symbol::try_from_val(&self.env, &topic).ok());
        if contract_id != self.contract_id
            || topic != Some(Symbol::new(&self.env, VOTE_HISTORY_TOPIC))
        {
            return Err(missing());
        }

        let entry = VoteHistoryEntry::try_from_val(&self.env, &data).map_err(|e| {
            LedgerError::Unavailable(format!(
                "{}: undecodable history event {:?}",
                function_name, e
            ))
        })?;
        let unknown = || LedgerError::Unavailable("history event for unknown account".into());
        let record = VoteHistoryRecord {
            submission: self.app_address(&entry.submission).ok_or_else(unknown)?,
            timestamp: entry.timestamp,
            voter: self.app_address(&entry.voter).ok_or_else(unknown)?,
            diff: entry.diff,
            total_votes: entry.total_votes,
        };
        debug!(
            "indexed history row: {} {:+} on {}",
            record.voter, record.diff, record.submission
        );
        self.history.borrow_mut().push(record);
        Ok(())
    }
}

#[async_trait(?Send)]
impl Ledger for LocalChain {
    async fn submit(&self, call: SystemCall) -> Result<TxReceipt, LedgerError> {
        if call.system_id != self.system_id {
            return Err(LedgerError::UnknownSystem(call.system_id));
        }

        let function_name = call.call.function_name();
        let caller = self.account(&call.caller);
        let client = self.client();

        let votes_received = match &call.call {
            VotingCall::CreateSubmission {
                name,
                github_url,
                demo_video_url,
            } => {
                settle(
                    function_name,
                    client.try_create_submission(
                        &caller,
                        &self.string(name),
                        &self.string(github_url),
                        &self.string(demo_video_url),
                    ),
                )?;
                None
            }
            VotingCall::Vote { submission } => {
                let target = self.account(submission);
                let total = settle(function_name, client.try_vote(&caller, &target))?;
                self.index_history_event(function_name)?;
                Some(total)
            }
            VotingCall::RevokeVote { submission } => {
                let target = self.account(submission);
                let total = settle(function_name, client.try_revoke_vote(&caller, &target))?;
                self.index_history_event(function_name)?;
                Some(total)
            }
            VotingCall::UpdateName { name } => {
                settle(
                    function_name,
                    client.try_update_name(&caller, &self.string(name)),
                )?;
                None
            }
            VotingCall::UpdateGithubUrl { github_url } => {
                settle(
                    function_name,
                    client.try_update_github_url(&caller, &self.string(github_url)),
                )?;
                None
            }
            VotingCall::UpdateDemoVideoUrl { demo_video_url } => {
                settle(
                    function_name,
                    client.try_update_demo_video_url(&caller, &self.string(demo_video_url)),
                )?;
                None
            }
        };

        debug!("{} by {} accepted", function_name, call.caller);
        Ok(TxReceipt {
            function_name,
            votes_received,
        })
    }
}

#[async_trait(?Send)]
impl Indexer for LocalChain {
    async fn fetch(&self) -> Result<Tables, LedgerError> {
        let client = self.client();
        let accounts = self.accounts.borrow().clone();
        let mut tables = Tables::default();

        let config = settle("getConfig", client.try_get_config())?;
        tables.config = Some(ConfigRecord {
            voting_start_timestamp: config.voting_start_timestamp,
            voting_end_timestamp: config.voting_end_timestamp,
            votes_per_participant: config.votes_per_participant,
        });

        for (user, account) in &accounts {
            if client.is_moderator(account) {
                tables.insert_moderator(ModeratorRecord {
                    user: *user,
                    is_moderator: true,
                });
            }

            let participant = client.get_participant(account);
            if participant.is_participant || participant.votes_given > 0 {
                tables.insert_participant(ParticipantRecord {
                    user: *user,
                    is_participant: participant.is_participant,
                    votes_given: participant.votes_given,
                });
            }
        }

        let mut creators = Vec::new();
        for account in client.get_submission_creators().iter() {
            let submission = settle("getSubmission", client.try_get_submission(&account))?;
            let record = self.submission_record(submission)?;
            creators.push((record.creator, account));
            tables.insert_submission(record);
        }

        for (voter, voter_account) in &accounts {
            for (creator, creator_account) in &creators {
                let votes_given = client.get_votes(voter_account, creator_account);
                if votes_given > 0 {
                    tables.insert_vote(VoteRecord {
                        voter: *voter,
                        submission: *creator,
                        votes_given,
                    });
                }
            }
        }

        tables.vote_history = self.history.borrow().clone();
        Ok(tables)
    }
}

fn to_chain_config(config: &ConfigRecord) -> Config {
    Config {
        voting_start_timestamp: config.voting_start_timestamp,
        voting_end_timestamp: config.voting_end_timestamp,
        votes_per_participant: config.votes_per_participant,
    }
}

fn to_std_string(value: &soroban_sdk::String) -> String {
    let mut bytes = vec![0u8; value.len() as usize];
    value.copy_into_slice(&mut bytes);
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Flatten the result of a `try_` contract call into a ledger result
fn settle<T, C, E, I>(
    function_name: &str,
    result: Result<Result<T, C>, Result<E, I>>,
) -> Result<T, LedgerError>
where
    C: Debug,
    E: Debug,
    I: Debug,
{
    match result {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(LedgerError::Unavailable(format!(
            "{}: undecodable result {:?}",
            function_name, e
        ))),
        Err(Ok(e)) => Err(LedgerError::Rejected {
            function: function_name.to_string(),
            reason: format!("{:?}", e),
        }),
        Err(Err(e)) => Err(LedgerError::Rejected {
            function: function_name.to_string(),
            reason: format!("{:?}", e),
        }),
    }
}
