use serde::{Deserialize, Serialize};

use super::realm::{DEFAULT_REALMS, Realms};
use super::task::{Task, TaskId};

/// Current document layout. Documents without a version field are 0.
pub const SCHEMA_VERSION: u32 = 1;

/// The single persisted document: every task, every realm and the id counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    pub version: u32,
    pub tasks: Vec<Task>,
    pub realms: Realms,
    /// Next id to hand out.
    pub counter: TaskId,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            tasks: Vec::new(),
            realms: DEFAULT_REALMS.clone(),
            counter: 1,
        }
    }
}

impl AppState {
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub(crate) fn next_id(&mut self) -> TaskId {
        let id = self.counter;
        self.counter = self.counter.saturating_add(1);
        id
    }
}
