use std::cell::Cell;
use std::rc::Rc;

use log::{debug, warn};

use crate::errors::{ClientError, LedgerError};
use crate::ledger::{Indexer, Ledger, SystemCall, TxReceipt, VotingCall};
use crate::mirror::RecordMirror;
use crate::records::SubmissionRecord;
use crate::session::Session;
use crate::types::{Address, ResourceId};

/// Editable copy of a submission's text fields
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubmissionForm {
    pub name: String,
    pub github_url: String,
    pub demo_video_url: String,
}

impl SubmissionForm {
    pub fn from_submission(submission: &SubmissionRecord) -> Self {
        Self {
            name: submission.name.clone(),
            github_url: submission.github_url.clone(),
            demo_video_url: submission.demo_video_url.clone(),
        }
    }

    /// One update call per field that differs from `current`
    pub fn changes(&self, current: &SubmissionRecord) -> Vec<VotingCall> {
        let mut calls = Vec::new();
        if self.name != current.name {
            calls.push(VotingCall::UpdateName {
                name: self.name.clone(),
            });
        }
        if self.github_url != current.github_url {
            calls.push(VotingCall::UpdateGithubUrl {
                github_url: self.github_url.clone(),
            });
        }
        if self.demo_video_url != current.demo_video_url {
            calls.push(VotingCall::UpdateDemoVideoUrl {
                demo_video_url: self.demo_video_url.clone(),
            });
        }
        calls
    }
}

/// Mutation wiring: every write goes to the ledger, and a successful write
/// re-fetches the mirror. Nothing is applied locally ahead of the ledger.
pub struct VotingActions {
    session: Session,
    system_id: ResourceId,
    ledger: Rc<dyn Ledger>,
    indexer: Rc<dyn Indexer>,
    mirror: Rc<RecordMirror>,
    pending: Cell<usize>,
}

struct PendingGuard<'a>(&'a Cell<usize>);

impl<'a> PendingGuard<'a> {
    fn new(counter: &'a Cell<usize>) -> Self {
        counter.set(counter.get() + 1);
        Self(counter)
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

impl VotingActions {
    pub fn new(
        session: Session,
        system_id: ResourceId,
        ledger: Rc<dyn Ledger>,
        indexer: Rc<dyn Indexer>,
        mirror: Rc<RecordMirror>,
    ) -> Self {
        Self {
            session,
            system_id,
            ledger,
            indexer,
            mirror,
            pending: Cell::new(0),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn mirror(&self) -> &Rc<RecordMirror> {
        &self.mirror
    }

    /// True while any write is in flight
    pub fn is_pending(&self) -> bool {
        self.pending.get() > 0
    }

    pub async fn create_submission(&self, form: &SubmissionForm) -> Result<TxReceipt, ClientError> {
        self.submit_and_refresh(VotingCall::CreateSubmission {
            name: form.name.clone(),
            github_url: form.github_url.clone(),
            demo_video_url: form.demo_video_url.clone(),
        })
        .await
    }

    pub async fn vote(&self, submission: &Address) -> Result<TxReceipt, ClientError> {
        self.submit_and_refresh(VotingCall::Vote {
            submission: *submission,
        })
        .await
    }

    pub async fn revoke_vote(&self, submission: &Address) -> Result<TxReceipt, ClientError> {
        self.submit_and_refresh(VotingCall::RevokeVote {
            submission: *submission,
        })
        .await
    }

    pub async fn update_name(&self, name: &str) -> Result<TxReceipt, ClientError> {
        self.submit_and_refresh(VotingCall::UpdateName {
            name: name.to_string(),
        })
        .await
    }

    pub async fn update_github_url(&self, github_url: &str) -> Result<TxReceipt, ClientError> {
        self.submit_and_refresh(VotingCall::UpdateGithubUrl {
            github_url: github_url.to_string(),
        })
        .await
    }

    pub async fn update_demo_video_url(
        &self,
        demo_video_url: &str,
    ) -> Result<TxReceipt, ClientError> {
        self.submit_and_refresh(VotingCall::UpdateDemoVideoUrl {
            demo_video_url: demo_video_url.to_string(),
        })
        .await
    }

    /// Send one update per changed field, all at once, and wait for every
    /// one of them. Returns how many updates were sent; the first failure
    /// wins once all have settled.
    pub async fn save_edits(
        &self,
        current: &SubmissionRecord,
        form: &SubmissionForm,
    ) -> Result<usize, ClientError> {
        self.session.require_writer()?;

        let mut calls = form.changes(current).into_iter();
        let issued = calls.len();
        if issued == 0 {
            return Ok(0);
        }

        let (first, second, third) = tokio::join!(
            self.submit_optional(calls.next()),
            self.submit_optional(calls.next()),
            self.submit_optional(calls.next()),
        );

        let mut accepted = 0;
        let mut first_error = None;
        for result in [first, second, third].into_iter().flatten() {
            match result {
                Ok(_) => accepted += 1,
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        if accepted > 0 {
            self.refresh_after("edit").await;
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(issued),
        }
    }

    /// Re-read every table from the indexer
    pub async fn refresh(&self) -> Result<(), LedgerError> {
        self.mirror.sync(self.indexer.as_ref()).await.map(|_| ())
    }

    async fn submit_and_refresh(&self, call: VotingCall) -> Result<TxReceipt, ClientError> {
        let receipt = self.submit(call).await?;
        self.refresh_after(receipt.function_name).await;
        Ok(receipt)
    }

    async fn submit_optional(
        &self,
        call: Option<VotingCall>,
    ) -> Option<Result<TxReceipt, ClientError>> {
        match call {
            Some(call) => Some(self.submit(call).await),
            None => None,
        }
    }

    async fn submit(&self, call: VotingCall) -> Result<TxReceipt, ClientError> {
        let caller = self.session.require_writer()?;
        let function_name = call.function_name();
        let call = SystemCall {
            system_id: self.system_id,
            caller,
            call,
        };

        debug!("submitting {} for {}", function_name, caller);
        let _pending = PendingGuard::new(&self.pending);
        self.ledger.submit(call).await.map_err(|e| {
            warn!("{} failed: {}", function_name, e);
            ClientError::from(e)
        })
    }

    // The write already landed; a failed re-read only delays the mirror.
    async fn refresh_after(&self, function_name: &str) {
        if let Err(e) = self.refresh().await {
            warn!("refresh after {} failed: {}", function_name, e);
        }
    }
}
