use std::sync::Arc;

use log::{debug, warn};
use tokio::sync::watch;

use crate::errors::LedgerError;
use crate::ledger::Indexer;
use crate::records::{ConfigRecord, ParticipantRecord, SubmissionRecord, TableId, Tables};
use crate::types::Address;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncStatus {
    pub percentage: u8,
    pub is_live: bool,
}

#[derive(Clone, Default)]
struct MirrorState {
    tables: Arc<Tables>,
    table_versions: [u64; TableId::ALL.len()],
    version: u64,
    sync: SyncStatus,
}

/// Local read-only copy of the ledger tables.
///
/// The mirror is only ever replaced wholesale from an indexer snapshot.
/// Every table carries its own version so subscribers can wait on the
/// tables they render.
pub struct RecordMirror {
    state: watch::Sender<MirrorState>,
}

impl Default for RecordMirror {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordMirror {
    pub fn new() -> Self {
        let (state, _) = watch::channel(MirrorState::default());
        Self { state }
    }

    pub fn tables(&self) -> Arc<Tables> {
        self.state.borrow().tables.clone()
    }

    /// Bumped whenever any table changes
    pub fn version(&self) -> u64 {
        self.state.borrow().version
    }

    pub fn table_version(&self, table: TableId) -> u64 {
        self.state.borrow().table_versions[table.index()]
    }

    pub fn sync_status(&self) -> SyncStatus {
        self.state.borrow().sync
    }

    pub fn config(&self) -> Option<ConfigRecord> {
        self.state.borrow().tables.config.clone()
    }

    pub fn submission(&self, creator: &Address) -> Option<SubmissionRecord> {
        self.state.borrow().tables.submissions.get(creator).cloned()
    }

    pub fn participant(&self, user: &Address) -> Option<ParticipantRecord> {
        self.state.borrow().tables.participants.get(user).cloned()
    }

    /// Votes `voter` gave `submission`, zero when there is no row
    pub fn votes(&self, voter: &Address, submission: &Address) -> u32 {
        self.state
            .borrow()
            .tables
            .votes
            .get(&(*voter, *submission))
            .map(|vote| vote.votes_given)
            .unwrap_or(0)
    }

    /// Progress report from an indexer that streams its initial sync
    pub fn set_progress(&self, percentage: u8) {
        self.state.send_modify(|state| {
            state.sync.percentage = percentage.min(100);
        });
    }

    /// Swap in a new snapshot and mark the mirror live.
    ///
    /// Returns the tables that changed; subscribers are only woken when
    /// something did.
    pub fn replace(&self, tables: Tables) -> Vec<TableId> {
        let mut changed = Vec::new();
        self.state.send_if_modified(|state| {
            changed = state.tables.changed_tables(&tables);
            let went_live = !state.sync.is_live;
            state.sync = SyncStatus {
                percentage: 100,
                is_live: true,
            };
            if changed.is_empty() {
                return went_live;
            }

            for table in &changed {
                state.table_versions[table.index()] += 1;
            }
            state.version += 1;
            state.tables = Arc::new(tables);
            true
        });
        changed
    }

    /// Fetch a full snapshot from the indexer and apply it. A failed fetch
    /// leaves the current tables in place.
    pub async fn sync(&self, indexer: &dyn Indexer) -> Result<Vec<TableId>, LedgerError> {
        if !self.sync_status().is_live {
            self.set_progress(0);
        }

        let tables = indexer.fetch().await.map_err(|e| {
            warn!("mirror sync failed: {}", e);
            e
        })?;

        let changed = self.replace(tables);
        debug!(
            "mirror synced to version {}, changed tables: {:?}",
            self.version(),
            changed
        );
        Ok(changed)
    }

    pub fn subscribe(&self, table: TableId) -> TableSubscription {
        let rx = self.state.subscribe();
        let seen = rx.borrow().table_versions[table.index()];
        TableSubscription { rx, table, seen }
    }
}

/// Change notification for a single table
pub struct TableSubscription {
    rx: watch::Receiver<MirrorState>,
    table: TableId,
    seen: u64,
}

impl TableSubscription {
    pub fn table(&self) -> TableId {
        self.table
    }

    pub fn has_changed(&self) -> bool {
        self.current_version() != self.seen
    }

    /// Wait until the table changes and return the new snapshot.
    /// `None` once the mirror is gone.
    pub async fn changed(&mut self) -> Option<Arc<Tables>> {
        loop {
            let (version, tables) = {
                let state = self.rx.borrow_and_update();
                (
                    state.table_versions[self.table.index()],
                    state.tables.clone(),
                )
            };
            if version != self.seen {
                self.seen = version;
                return Some(tables);
            }
            if self.rx.changed().await.is_err() {
                return None;
            }
        }
    }

    fn current_version(&self) -> u64 {
        self.rx.borrow().table_versions[self.table.index()]
    }
}
