//! Turns whatever was loaded from storage into a valid [`AppState`].
//!
//! Normalization never fails. Anything it cannot read falls back to a
//! default, and a document that is not a JSON object at all yields the empty
//! default state. Migrations are dispatched on the document's `version`
//! field; documents written before versioning are version 0.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde_json::{Map, Value};

use super::calendar::is_calendar_linked;
use super::classify::recolor_all;
use super::realm::{DEFAULT_ICON, DEFAULT_REALMS, LEGACY_ARCHIVES, Realm, Realms, STRATEGY_ICON, THY_STRATEGY};
use super::state::{AppState, SCHEMA_VERSION};
use super::task::{Color, Column, Priority, Task, TaskId, default_added_to_board};

type Migration = fn(&mut Map<String, Value>);

/// `MIGRATIONS[n]` upgrades a version `n` document to version `n + 1`.
const MIGRATIONS: [Migration; SCHEMA_VERSION as usize] = [rename_archives_realm];

pub fn normalize(raw: Option<Value>, today: NaiveDate) -> AppState {
    let mut doc = match raw {
        None => return AppState::default(),
        Some(Value::Object(doc)) => doc,
        Some(other) => {
            log::warn!("Ignoring stored state that is not an object: {}", kind_of(&other));
            return AppState::default();
        }
    };

    let version = doc.get("version").and_then(as_whole).unwrap_or(0);
    migrate(&mut doc, version);

    let mut state = decode(&doc, today);
    for task in &mut state.tasks {
        repair_task(task, &state.realms, today);
    }
    recolor_all(&mut state);
    state
}

/// Parse and normalize a stored document. Unparseable text yields the defaults.
pub fn normalize_json(text: &str, today: NaiveDate) -> AppState {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => normalize(Some(value), today),
        Err(e) => {
            log::warn!("Stored state is not valid JSON, starting fresh: {}", e);
            AppState::default()
        }
    }
}

fn migrate(doc: &mut Map<String, Value>, from: u64) {
    if from > u64::from(SCHEMA_VERSION) {
        log::warn!(
            "State document is version {}, newer than supported {}; reading what is known",
            from,
            SCHEMA_VERSION
        );
        return;
    }
    for (version, step) in MIGRATIONS.iter().enumerate().skip(from as usize) {
        log::info!("Migrating state document v{} -> v{}", version, version + 1);
        step(doc);
    }
}

/// v0 -> v1: the calendar realm used to be called "Archives".
fn rename_archives_realm(doc: &mut Map<String, Value>) {
    if let Some(Value::Object(realms)) = doc.get_mut("realms") {
        if let Some(archives) = realms.shift_remove(LEGACY_ARCHIVES) {
            if !realms.contains_key(THY_STRATEGY) {
                let mut entry = match archives {
                    Value::Object(entry) => entry,
                    _ => Map::new(),
                };
                if non_empty_str(entry.get("icon")).is_none() {
                    entry.insert("icon".to_string(), Value::from(STRATEGY_ICON));
                }
                realms.insert(THY_STRATEGY.to_string(), Value::Object(entry));
            }
        }
    }

    if let Some(Value::Array(tasks)) = doc.get_mut("tasks") {
        for task in tasks.iter_mut().filter_map(Value::as_object_mut) {
            if task.get("realm").and_then(Value::as_str) == Some(LEGACY_ARCHIVES) {
                task.insert("realm".to_string(), Value::from(THY_STRATEGY));
                task.insert("column".to_string(), Value::from(Column::Archive.as_key()));
            }
        }
    }
}

fn decode(doc: &Map<String, Value>, today: NaiveDate) -> AppState {
    let mut realms = DEFAULT_REALMS.clone();
    if let Some(Value::Object(raw)) = doc.get("realms") {
        for (name, value) in raw {
            if name.trim().is_empty() {
                continue;
            }
            realms.insert(name.clone(), decode_realm(value));
        }
    }

    let decoded: Vec<(Option<TaskId>, Task)> = match doc.get("tasks") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| {
                let task = decode_task(item, today);
                if task.is_none() {
                    log::warn!("Skipping stored task that is not an object: {}", kind_of(item));
                }
                task
            })
            .collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            log::warn!("Stored tasks are not a list: {}", kind_of(other));
            Vec::new()
        }
    };

    let max_id = decoded.iter().filter_map(|(id, _)| *id).max().unwrap_or(0);
    let counter = doc
        .get("counter")
        .and_then(as_whole)
        .filter(|&c| c > 0)
        .unwrap_or(decoded.len() as u64 + 1)
        .max(max_id.saturating_add(1));

    let mut state = AppState {
        version: SCHEMA_VERSION,
        tasks: Vec::with_capacity(decoded.len()),
        realms,
        counter,
    };

    let mut seen = HashSet::new();
    for (id, mut task) in decoded {
        task.id = match id {
            Some(id) if seen.insert(id) => id,
            _ => {
                let fresh = state.next_id();
                log::debug!("Assigning id {} to task '{}'", fresh, task.title);
                seen.insert(fresh);
                fresh
            }
        };
        state.tasks.push(task);
    }
    state
}

fn decode_realm(value: &Value) -> Realm {
    let color = value
        .get("color")
        .and_then(Value::as_str)
        .and_then(Color::from_key)
        .unwrap_or(Color::Yellow);
    let icon = non_empty_str(value.get("icon")).unwrap_or(DEFAULT_ICON).to_string();
    let hsl = match value.get("hsl") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => color.hue().to_string(),
    };
    Realm { color, icon, hsl }
}

fn decode_task(value: &Value, today: NaiveDate) -> Option<(Option<TaskId>, Task)> {
    let obj = value.as_object()?;
    let text = |key: &str| obj.get(key).and_then(Value::as_str).unwrap_or_default().to_string();

    let realm = non_empty_str(obj.get("realm")).map(str::to_string);
    let column = match obj.get("column").and_then(Value::as_str) {
        Some(key) => Column::from_key(key).unwrap_or_else(|| {
            log::debug!("Unknown column '{}', placing task in backlog", key);
            Column::Backlog
        }),
        None => Column::Backlog,
    };
    let added_to_board = obj
        .get("addedToBoard")
        .and_then(Value::as_bool)
        .unwrap_or_else(|| default_added_to_board(realm.as_deref()));
    let created_at = obj
        .get("createdAt")
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
        .unwrap_or(0);

    let task = Task {
        id: 0,
        title: text("title"),
        body: text("body"),
        tag: text("tag"),
        column,
        realm,
        created_at,
        color: Color::Yellow,
        date: decode_date(obj.get("date"), today),
        priority: obj.get("priority").and_then(Value::as_str).and_then(Priority::from_key),
        done_in_checklist: obj.get("doneInChecklist").and_then(Value::as_bool).unwrap_or(false),
        added_to_board,
    };
    Some((obj.get("id").and_then(as_whole), task))
}

/// A present but unreadable date still marks a calendar task; it lands on today.
fn decode_date(value: Option<&Value>, today: NaiveDate) -> Option<NaiveDate> {
    let raw = non_empty_str(value)?;
    let day = raw.get(..10).unwrap_or(raw);
    match NaiveDate::parse_from_str(day, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            log::debug!("Unreadable task date '{}', using {}", raw, today);
            Some(today)
        }
    }
}

fn repair_task(task: &mut Task, realms: &Realms, today: NaiveDate) {
    if let Some(name) = task.realm.as_deref() {
        if !realms.contains_key(name) {
            log::debug!("Task {} references missing realm '{}'", task.id, name);
            task.realm = None;
        }
    }
    if is_calendar_linked(task) {
        task.realm = Some(THY_STRATEGY.to_string());
        task.column = Column::Archive;
        task.date.get_or_insert(today);
    }
}

/// Largest whole number a stored document can carry exactly (2^53 - 1).
/// Anything above it is treated as unreadable.
const MAX_WHOLE: u64 = (1 << 53) - 1;

fn as_whole(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| {
            value
                .as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= MAX_WHOLE as f64)
                .map(|f| f as u64)
        })
        .filter(|&n| n <= MAX_WHOLE)
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.trim().is_empty())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
