//! One user session: the board, where it is saved, and the startup sync.

use std::path::Path;

use chrono::NaiveDate;

use crate::core::board::{Board, RealmDeletion};
use crate::core::state::AppState;
use crate::store::{StoreError, transfer};
use crate::sync::{Mirror, SyncStatus};

/// How the one-shot startup fetch settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// No remote configured.
    LocalOnly,
    /// The remote document replaced local state; views must be rebuilt.
    Replaced { tasks: usize },
    /// The fetch failed; local state stays authoritative.
    KeptLocal(String),
}

#[derive(Debug)]
pub struct Session {
    board: Board,
    mirror: Mirror,
    status: SyncStatus,
}

impl Session {
    /// Load local state. The remote is only consulted by [`Session::reconcile`].
    pub fn open(mirror: Mirror, today: NaiveDate) -> Self {
        let state = mirror.local().load(today);
        log::info!(
            "Opened {} with {} tasks, {} realms",
            mirror.local().path().display(),
            state.tasks.len(),
            state.realms.len()
        );
        Self {
            board: Board::new(state),
            mirror,
            status: SyncStatus::Idle,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> &AppState {
        self.board.state()
    }

    pub fn status(&self) -> &SyncStatus {
        &self.status
    }

    /// Run a board action and save when it succeeds.
    pub fn apply<T, E>(&mut self, action: impl FnOnce(&mut Board) -> Result<T, E>) -> Result<T, E> {
        let out = action(&mut self.board)?;
        self.commit();
        Ok(out)
    }

    pub fn delete_realm(&mut self, name: &str) -> RealmDeletion {
        let outcome = self.board.delete_realm(name);
        if matches!(outcome, RealmDeletion::Deleted { .. }) {
            self.commit();
        }
        outcome
    }

    /// Persist the current state (local now, remote in the background).
    pub fn commit(&self) {
        self.mirror.save(self.board.state());
    }

    /// Fetch the remote copy once; when it arrives it wins over local state.
    pub async fn reconcile(&mut self, today: NaiveDate) -> Reconciliation {
        match self.mirror.fetch(today).await {
            Ok(None) => Reconciliation::LocalOnly,
            Ok(Some(remote)) => {
                let tasks = remote.tasks.len();
                self.board.replace_state(remote);
                self.mirror.local().persist(self.board.state());
                self.status = SyncStatus::LastSynced(chrono::Local::now().format("%Y-%m-%d %H:%M").to_string());
                Reconciliation::Replaced { tasks }
            }
            Err(e) => {
                log::warn!("Remote fetch failed, staying on local state: {}", e);
                self.status = SyncStatus::Error(e.to_string());
                Reconciliation::KeptLocal(e.to_string())
            }
        }
    }

    /// Replace the whole state with an imported file.
    pub fn import(&mut self, path: &Path, today: NaiveDate) -> Result<(), StoreError> {
        let state = transfer::import(path, today)?;
        self.board.replace_state(state);
        self.commit();
        Ok(())
    }

    pub fn export(&self, path: &Path) -> Result<(), StoreError> {
        transfer::export(self.board.state(), path)
    }
}
