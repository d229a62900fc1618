use super::realm::Realms;
use super::state::AppState;
use super::task::{Color, Column, Priority, Task};

/// Derive the display color of a task. First match wins:
///
/// 1. backlog is always red
/// 2. deadline red, optional green, compulsory yellow
/// 3. without a priority, the realm's color if the realm is known
/// 4. otherwise the column default
pub fn classify(column: Column, realm: Option<&str>, priority: Option<Priority>, realms: &Realms) -> Color {
    if column == Column::Backlog {
        return Color::Red;
    }
    match priority {
        Some(Priority::Deadline) => return Color::Red,
        Some(Priority::Optional) => return Color::Green,
        Some(Priority::Compulsory) => return Color::Yellow,
        None => {}
    }
    if let Some(realm) = realm.and_then(|name| realms.get(name)) {
        return realm.color;
    }
    column_color(column)
}

pub fn column_color(column: Column) -> Color {
    match column {
        Column::Backlog => Color::Red,
        Column::Today => Color::Blue,
        Column::InProgress => Color::Orange,
        Column::Done => Color::Pink,
        Column::Archive => Color::Yellow,
    }
}

pub fn classify_task(task: &Task, realms: &Realms) -> Color {
    classify(task.column, task.realm.as_deref(), task.priority, realms)
}

/// Recompute the stored color of every task.
pub fn recolor_all(state: &mut AppState) {
    let AppState { tasks, realms, .. } = state;
    for task in tasks.iter_mut() {
        task.color = classify_task(task, realms);
    }
}
