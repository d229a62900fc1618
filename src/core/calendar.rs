use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use super::realm::THY_STRATEGY;
use super::state::AppState;
use super::task::{Column, Task};

/// A task belongs to the calendar once any of date, archive column or the
/// Thy Strategy realm is set.
pub fn is_calendar_linked(task: &Task) -> bool {
    task.date.is_some() || task.column == Column::Archive || task.in_realm(THY_STRATEGY)
}

/// Make date, archive column and the Thy Strategy realm agree.
///
/// Called once per commit, after the user's fields are applied. Contradictory
/// input is corrected, never rejected. Returns whether the task is a calendar
/// task afterwards.
pub fn enforce_calendar_link(task: &mut Task, today: NaiveDate) -> bool {
    if !is_calendar_linked(task) {
        return false;
    }
    task.realm = Some(THY_STRATEGY.to_string());
    task.column = Column::Archive;
    task.date.get_or_insert(today);
    task.added_to_board = true;
    true
}

/// Take a task off the calendar when it is moved to a board column.
pub fn leave_calendar(task: &mut Task) {
    task.date = None;
    if task.in_realm(THY_STRATEGY) {
        task.realm = None;
    }
}

/// Calendar tasks of one month, grouped by day.
pub fn month_tasks(state: &AppState, year: i32, month: u32) -> BTreeMap<NaiveDate, Vec<&Task>> {
    let mut days: BTreeMap<NaiveDate, Vec<&Task>> = BTreeMap::new();
    for task in &state.tasks {
        if task.column != Column::Archive {
            continue;
        }
        if let Some(date) = task.date {
            if date.year() == year && date.month() == month {
                days.entry(date).or_default().push(task);
            }
        }
    }
    days
}

pub fn tasks_on(state: &AppState, date: NaiveDate) -> Vec<&Task> {
    state
        .tasks
        .iter()
        .filter(|t| t.column == Column::Archive && t.date == Some(date))
        .collect()
}

/// Which month the calendar panel is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCursor {
    /// First day of the displayed month.
    pub displayed_month: NaiveDate,
}

impl CalendarCursor {
    pub fn at(today: NaiveDate) -> Self {
        Self {
            displayed_month: today.with_day(1).unwrap_or(today),
        }
    }

    pub fn prev_month(&mut self) {
        self.displayed_month = self
            .displayed_month
            .checked_sub_months(chrono::Months::new(1))
            .unwrap_or(self.displayed_month);
    }

    pub fn next_month(&mut self) {
        self.displayed_month = self
            .displayed_month
            .checked_add_months(chrono::Months::new(1))
            .unwrap_or(self.displayed_month);
    }

    pub fn tasks<'a>(&self, state: &'a AppState) -> BTreeMap<NaiveDate, Vec<&'a Task>> {
        month_tasks(state, self.displayed_month.year(), self.displayed_month.month())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::realm::GREAT_HALL;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_pulls_task_into_archive() {
        let mut task = Task::new(1, "Feast");
        task.column = Column::Today;
        task.realm = Some(GREAT_HALL.to_string());
        task.date = Some(day(2024, 1, 1));
        task.added_to_board = false;

        assert!(enforce_calendar_link(&mut task, day(2026, 10, 15)));
        assert_eq!(task.column, Column::Archive);
        assert_eq!(task.realm.as_deref(), Some(THY_STRATEGY));
        assert_eq!(task.date, Some(day(2024, 1, 1)));
        assert!(task.added_to_board);
    }

    #[test]
    fn archive_column_backfills_today() {
        let mut task = Task::new(1, "Treaty");
        task.column = Column::Archive;
        assert!(enforce_calendar_link(&mut task, day(2026, 10, 15)));
        assert_eq!(task.date, Some(day(2026, 10, 15)));
        assert_eq!(task.realm.as_deref(), Some(THY_STRATEGY));
    }

    #[test]
    fn board_tasks_are_untouched() {
        let mut task = Task::new(1, "Sharpen blades");
        task.column = Column::InProgress;
        let before = task.clone();
        assert!(!enforce_calendar_link(&mut task, day(2026, 10, 15)));
        assert_eq!(task, before);
    }

    #[test]
    fn leaving_calendar_clears_link() {
        let mut task = Task::new(1, "Treaty");
        task.column = Column::Archive;
        enforce_calendar_link(&mut task, day(2026, 10, 15));
        task.column = Column::Backlog;
        leave_calendar(&mut task);
        assert!(!is_calendar_linked(&task));
    }

    #[test]
    fn month_groups_by_day() {
        let mut state = AppState::default();
        for (id, date) in [(1, day(2026, 10, 3)), (2, day(2026, 10, 3)), (3, day(2026, 11, 1))] {
            let mut task = Task::new(id, format!("Decree {id}"));
            task.column = Column::Archive;
            task.date = Some(date);
            state.tasks.push(task);
        }
        let october = month_tasks(&state, 2026, 10);
        assert_eq!(october.len(), 1);
        assert_eq!(october[&day(2026, 10, 3)].len(), 2);
        assert_eq!(tasks_on(&state, day(2026, 11, 1)).len(), 1);
    }

    #[test]
    fn cursor_walks_months() {
        let mut cursor = CalendarCursor::at(day(2026, 1, 31));
        assert_eq!(cursor.displayed_month, day(2026, 1, 1));
        cursor.prev_month();
        assert_eq!(cursor.displayed_month, day(2025, 12, 1));
        cursor.next_month();
        cursor.next_month();
        assert_eq!(cursor.displayed_month, day(2026, 2, 1));
    }
}
