use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::realm::WAR_ROOM;

pub type TaskId = u64;

/// Kanban stage of a task. `Archive` is the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Column {
    Backlog,
    Today,
    InProgress,
    Done,
    Archive,
}

impl Column {
    /// Columns rendered on the board. Archive lives on the calendar instead.
    pub const BOARD: [Column; 4] = [Self::Backlog, Self::Today, Self::InProgress, Self::Done];

    pub fn as_key(&self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::Today => "today",
            Self::InProgress => "in-progress",
            Self::Done => "done",
            Self::Archive => "archive",
        }
    }

    pub fn from_key(s: &str) -> Option<Self> {
        match s {
            "backlog" => Some(Self::Backlog),
            "today" => Some(Self::Today),
            "in-progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            "archive" => Some(Self::Archive),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Backlog => "Backlog",
            Self::Today => "Today",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
            Self::Archive => "Calendar",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Deadline,
    Compulsory,
    Optional,
}

impl Priority {
    pub fn from_key(s: &str) -> Option<Self> {
        match s {
            "deadline" => Some(Self::Deadline),
            "compulsory" => Some(Self::Compulsory),
            "optional" => Some(Self::Optional),
            _ => None,
        }
    }
}

/// Display color shared by tasks and realms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Yellow,
    Orange,
    Pink,
    Blue,
    Green,
    Purple,
}

impl Color {
    pub const ALL: [Color; 7] = [
        Self::Red,
        Self::Yellow,
        Self::Orange,
        Self::Pink,
        Self::Blue,
        Self::Green,
        Self::Purple,
    ];

    pub fn as_key(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Orange => "orange",
            Self::Pink => "pink",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Purple => "purple",
        }
    }

    pub fn from_key(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_key() == s)
    }

    /// Hue in degrees used for realm badges.
    pub fn hue(&self) -> u16 {
        match self {
            Self::Red => 0,
            Self::Yellow => 60,
            Self::Orange => 30,
            Self::Pink => 330,
            Self::Blue => 210,
            Self::Green => 140,
            Self::Purple => 270,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub tag: String,
    pub column: Column,
    pub realm: Option<String>,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub created_at: i64,
    /// Derived from column, realm and priority. Only renderers read it.
    pub color: Color,
    pub date: Option<NaiveDate>,
    pub priority: Option<Priority>,
    #[serde(default)]
    pub done_in_checklist: bool,
    pub added_to_board: bool,
}

impl Task {
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            body: String::new(),
            tag: String::new(),
            column: Column::Backlog,
            realm: None,
            created_at: chrono::Utc::now().timestamp_millis(),
            color: Color::Red,
            date: None,
            priority: Some(Priority::Compulsory),
            done_in_checklist: false,
            added_to_board: true,
        }
    }

    pub fn in_realm(&self, name: &str) -> bool {
        self.realm.as_deref() == Some(name)
    }

    /// War Room tasks stay off the board until promoted.
    pub fn is_on_board(&self) -> bool {
        self.column != Column::Archive && (self.added_to_board || !self.in_realm(WAR_ROOM))
    }

    pub fn matches(&self, needle: &str) -> bool {
        contains_ci(&self.title, needle)
            || contains_ci(&self.body, needle)
            || contains_ci(&self.tag, needle)
    }
}

/// Default visibility flag for a task in `realm`.
pub fn default_added_to_board(realm: Option<&str>) -> bool {
    realm != Some(WAR_ROOM)
}

/// `needle` must already be lowercase.
pub(crate) fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// User input from the task editor, before it is committed to the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub body: String,
    pub tag: String,
    pub column: Column,
    pub realm: Option<String>,
    pub date: Option<NaiveDate>,
    pub priority: Priority,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: String::new(),
            tag: String::new(),
            column: Column::Backlog,
            realm: None,
            date: None,
            priority: Priority::Compulsory,
        }
    }

    pub fn column(mut self, column: Column) -> Self {
        self.column = column;
        self
    }

    pub fn realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = Some(realm.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_keys_match_wire_names() {
        for column in [Column::Backlog, Column::Today, Column::InProgress, Column::Done, Column::Archive] {
            let json = serde_json::to_value(column).unwrap();
            assert_eq!(json, column.as_key());
            assert_eq!(Column::from_key(column.as_key()), Some(column));
        }
        assert_eq!(Column::from_key("someday"), None);
    }

    #[test]
    fn task_serializes_camel_case() {
        let mut task = Task::new(7, "Muster the guard");
        task.created_at = 1_700_000_000_000;
        task.date = NaiveDate::from_ymd_opt(2024, 1, 1);
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["createdAt"], 1_700_000_000_000i64);
        assert_eq!(json["doneInChecklist"], false);
        assert_eq!(json["addedToBoard"], true);
        assert_eq!(json["date"], "2024-01-01");
        assert_eq!(json["priority"], "compulsory");
        assert_eq!(json["realm"], serde_json::Value::Null);
    }

    #[test]
    fn war_room_tasks_hidden_until_added() {
        let mut task = Task::new(1, "Scout the pass");
        task.realm = Some(WAR_ROOM.to_string());
        task.added_to_board = false;
        assert!(!task.is_on_board());
        task.added_to_board = true;
        assert!(task.is_on_board());
    }

    #[test]
    fn default_visibility_depends_on_realm() {
        assert!(default_added_to_board(None));
        assert!(default_added_to_board(Some("Great Hall")));
        assert!(!default_added_to_board(Some(WAR_ROOM)));
    }

    #[test]
    fn matches_is_case_insensitive() {
        let mut task = Task::new(1, "Forge New Swords");
        task.body = "for the Royal guard".to_string();
        assert!(task.matches("swords"));
        assert!(task.matches("royal"));
        assert!(!task.matches("shield"));
    }
}
