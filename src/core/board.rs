use chrono::NaiveDate;
use thiserror::Error;

use super::calendar::{enforce_calendar_link, leave_calendar};
use super::classify::{classify_task, recolor_all};
use super::realm::{DEFAULT_ICON, Realm, is_protected};
use super::state::AppState;
use super::task::{Color, Column, Task, TaskDraft, TaskId, default_added_to_board};

/// Input the board refuses before touching any state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("a decree needs a title")]
    EmptyTitle,
    #[error("no task with id {0}")]
    TaskNotFound(TaskId),
    #[error("no realm named '{0}'")]
    UnknownRealm(String),
    #[error("realm '{0}' already exists")]
    RealmExists(String),
    #[error("a realm needs a name")]
    EmptyRealmName,
}

/// Outcome of a realm deletion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RealmDeletion {
    /// Removed; `detached` tasks lost their realm.
    Deleted { detached: usize },
    /// Built-in realm, left in place.
    Protected,
    NotFound,
}

/// Owns the application state for a session and applies user actions to it.
///
/// Every mutating method keeps the calendar link and the derived colors
/// consistent, so callers only need to persist `state()` afterwards.
#[derive(Debug, Clone, Default)]
pub struct Board {
    state: AppState,
}

impl Board {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Swap in a whole new document (import, remote reconciliation).
    pub fn replace_state(&mut self, state: AppState) {
        log::info!(
            "Replacing board state: {} tasks -> {} tasks",
            self.state.tasks.len(),
            state.tasks.len()
        );
        self.state = state;
    }

    /// Create a task, or overwrite `editing` with the draft.
    pub fn save_task(
        &mut self,
        draft: TaskDraft,
        editing: Option<TaskId>,
        today: NaiveDate,
    ) -> Result<TaskId, BoardError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(BoardError::EmptyTitle);
        }

        let realm = draft
            .realm
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);
        if let Some(name) = &realm {
            if !self.state.realms.contains_key(name) {
                return Err(BoardError::UnknownRealm(name.clone()));
            }
        }

        let (id, created_at, added_to_board) = match editing {
            Some(id) => {
                let existing = self.state.task(id).ok_or(BoardError::TaskNotFound(id))?;
                (existing.id, existing.created_at, existing.added_to_board)
            }
            None => (
                self.state.next_id(),
                chrono::Utc::now().timestamp_millis(),
                default_added_to_board(realm.as_deref()),
            ),
        };

        let mut task = Task {
            id,
            title: title.to_string(),
            body: draft.body.trim().to_string(),
            tag: draft.tag.trim().to_string(),
            column: draft.column,
            realm,
            created_at,
            color: Color::Yellow,
            date: draft.date,
            priority: Some(draft.priority),
            done_in_checklist: false,
            added_to_board,
        };
        if enforce_calendar_link(&mut task, today) {
            log::debug!("Task {} pinned to the calendar on {:?}", task.id, task.date);
        }
        task.color = classify_task(&task, &self.state.realms);

        match self.state.task_mut(id) {
            Some(slot) => *slot = task,
            None => self.state.tasks.push(task),
        }
        log::info!("Saved task {}", id);
        Ok(id)
    }

    /// Drop a task into another column.
    pub fn move_task(&mut self, id: TaskId, column: Column, today: NaiveDate) -> Result<(), BoardError> {
        let AppState { tasks, realms, .. } = &mut self.state;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(BoardError::TaskNotFound(id))?;

        task.column = column;
        if column == Column::Archive {
            enforce_calendar_link(task, today);
        } else {
            leave_calendar(task);
        }
        task.color = classify_task(task, realms);
        log::debug!("Moved task {} to {}", id, column.as_key());
        Ok(())
    }

    /// Put a realm-view task on the board, in the backlog.
    pub fn promote_to_board(&mut self, id: TaskId) -> Result<(), BoardError> {
        let AppState { tasks, realms, .. } = &mut self.state;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(BoardError::TaskNotFound(id))?;

        task.column = Column::Backlog;
        task.added_to_board = true;
        leave_calendar(task);
        task.color = classify_task(task, realms);
        Ok(())
    }

    pub fn delete_task(&mut self, id: TaskId) -> Result<Task, BoardError> {
        let pos = self
            .state
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(BoardError::TaskNotFound(id))?;
        log::info!("Deleted task {}", id);
        Ok(self.state.tasks.remove(pos))
    }

    /// Tick or untick a task in the today checklist.
    pub fn set_checklist_done(&mut self, id: TaskId, done: bool) -> Result<(), BoardError> {
        let task = self.state.task_mut(id).ok_or(BoardError::TaskNotFound(id))?;
        task.done_in_checklist = done;
        Ok(())
    }

    pub fn add_realm(&mut self, name: &str, color: Color, icon: Option<&str>) -> Result<(), BoardError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BoardError::EmptyRealmName);
        }
        if self.state.realms.contains_key(name) {
            return Err(BoardError::RealmExists(name.to_string()));
        }
        let icon = icon.map(str::trim).filter(|i| !i.is_empty()).unwrap_or(DEFAULT_ICON);
        self.state.realms.insert(name.to_string(), Realm::new(color, icon));
        log::info!("Added realm '{}'", name);
        Ok(())
    }

    /// Remove a realm and detach its tasks. Built-in realms are refused.
    pub fn delete_realm(&mut self, name: &str) -> RealmDeletion {
        if is_protected(name) {
            log::info!("Refusing to delete protected realm '{}'", name);
            return RealmDeletion::Protected;
        }
        if self.state.realms.shift_remove(name).is_none() {
            return RealmDeletion::NotFound;
        }

        let mut detached = 0;
        for task in self.state.tasks.iter_mut().filter(|t| t.in_realm(name)) {
            task.realm = None;
            detached += 1;
        }
        // Removing a realm changes the fallback color of any task, not only detached ones.
        recolor_all(&mut self.state);
        log::info!("Deleted realm '{}', {} tasks detached", name, detached);
        RealmDeletion::Deleted { detached }
    }

    pub fn set_realm_color(&mut self, name: &str, color: Color) -> Result<(), BoardError> {
        let realm = self
            .state
            .realms
            .get_mut(name)
            .ok_or_else(|| BoardError::UnknownRealm(name.to_string()))?;
        realm.recolor(color);
        recolor_all(&mut self.state);
        Ok(())
    }
}
