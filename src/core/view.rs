//! Read-only projections of the state that the renderers draw from.

use chrono::NaiveDate;
use indexmap::IndexMap;

use super::realm::GREAT_HALL;
use super::state::AppState;
use super::task::{Column, Task, contains_ci};

/// Shortest query the search box reacts to.
pub const MIN_SEARCH_LEN: usize = 2;
/// Most results the search dropdown lists.
pub const MAX_SEARCH_RESULTS: usize = 8;

/// Tasks shown in a board column, in insertion order.
pub fn board_column(state: &AppState, column: Column) -> Vec<&Task> {
    state
        .tasks
        .iter()
        .filter(|t| t.column == column && t.is_on_board())
        .collect()
}

/// Unchecked tasks for today: the today column plus calendar tasks due today.
pub fn today_checklist<'a>(state: &'a AppState, today: NaiveDate, search: &str) -> Vec<&'a Task> {
    let needle = search.trim().to_lowercase();
    state
        .tasks
        .iter()
        .filter(|t| t.column == Column::Today || (t.column == Column::Archive && t.date == Some(today)))
        .filter(|t| !t.done_in_checklist)
        .filter(|t| needle.is_empty() || contains_ci(&t.title, &needle))
        .collect()
}

/// Tasks listed under a realm.
///
/// The Great Hall view lists every task regardless of its realm. This treats
/// a realm as the default view and is kept only because users rely on it.
pub fn realm_tasks<'a>(state: &'a AppState, realm: &str, search: &str) -> Vec<&'a Task> {
    let needle = search.trim().to_lowercase();
    state
        .tasks
        .iter()
        .filter(|t| realm == GREAT_HALL || t.in_realm(realm))
        .filter(|t| needle.is_empty() || t.matches(&needle))
        .collect()
}

/// Search dropdown: title, body, tag and realm name, case-insensitive.
pub fn search<'a>(state: &'a AppState, query: &str) -> Vec<&'a Task> {
    let needle = query.trim().to_lowercase();
    if needle.chars().count() < MIN_SEARCH_LEN {
        return Vec::new();
    }
    state
        .tasks
        .iter()
        .filter(|t| t.matches(&needle) || t.realm.as_deref().is_some_and(|r| contains_ci(r, &needle)))
        .take(MAX_SEARCH_RESULTS)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counts {
    pub total: usize,
    pub today: usize,
    pub calendar: usize,
    /// Board columns in display order. Counts every task in the column,
    /// including War Room tasks not yet added to the board.
    pub columns: Vec<(Column, usize)>,
    /// Every realm in display order, including empty ones.
    pub realms: IndexMap<String, usize>,
}

pub fn counts(state: &AppState) -> Counts {
    let in_column = |column: Column| state.tasks.iter().filter(|t| t.column == column).count();
    let realms = state
        .realms
        .keys()
        .map(|name| {
            let n = state.tasks.iter().filter(|t| t.in_realm(name)).count();
            (name.clone(), n)
        })
        .collect();

    Counts {
        total: state.tasks.len(),
        today: in_column(Column::Today),
        calendar: in_column(Column::Archive),
        columns: Column::BOARD.iter().map(|&c| (c, in_column(c))).collect(),
        realms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::board::Board;
    use crate::core::realm::{THY_STRATEGY, WAR_ROOM};
    use crate::core::task::{TaskDraft, TaskId};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
    }

    fn save(board: &mut Board, draft: TaskDraft) -> TaskId {
        board.save_task(draft, None, today()).unwrap()
    }

    fn ids(tasks: &[&Task]) -> Vec<TaskId> {
        tasks.iter().map(|t| t.id).collect()
    }

    fn sample() -> Board {
        let mut board = Board::default();
        save(&mut board, TaskDraft::new("Sweep the hall"));
        save(&mut board, TaskDraft::new("Train archers").column(Column::Today).tag("drill"));
        save(&mut board, TaskDraft::new("Secret plans").realm(WAR_ROOM));
        save(&mut board, TaskDraft::new("Royal audience").date(today()));
        save(
            &mut board,
            TaskDraft::new("Spring festival").date(NaiveDate::from_ymd_opt(2027, 3, 20).unwrap()),
        );
        save(&mut board, TaskDraft::new("Mend banners").column(Column::Today).body("use gold thread"));
        board
    }

    #[test]
    fn board_hides_unpromoted_war_room_tasks() {
        let mut board = sample();
        assert_eq!(ids(&board_column(board.state(), Column::Backlog)), [1]);
        board.promote_to_board(3).unwrap();
        assert_eq!(ids(&board_column(board.state(), Column::Backlog)), [1, 3]);
        assert!(board_column(board.state(), Column::Archive).is_empty());
    }

    #[test]
    fn today_checklist_includes_calendar_tasks_due_today() {
        let mut board = sample();
        assert_eq!(ids(&today_checklist(board.state(), today(), "")), [2, 4, 6]);
        board.set_checklist_done(2, true).unwrap();
        assert_eq!(ids(&today_checklist(board.state(), today(), "")), [4, 6]);
        assert_eq!(ids(&today_checklist(board.state(), today(), "BANNERS")), [6]);
    }

    #[test]
    fn realm_view_filters_by_realm_except_great_hall() {
        let board = sample();
        assert_eq!(ids(&realm_tasks(board.state(), THY_STRATEGY, "")), [4, 5]);
        assert_eq!(ids(&realm_tasks(board.state(), THY_STRATEGY, "spring")), [5]);
        assert_eq!(realm_tasks(board.state(), GREAT_HALL, "").len(), 6);
    }

    #[test]
    fn search_needs_two_characters_and_caps_results() {
        let mut board = sample();
        assert!(search(board.state(), "s").is_empty());
        assert_eq!(ids(&search(board.state(), "DRILL")), [2]);
        assert_eq!(ids(&search(board.state(), "war ro")), [3]);
        assert_eq!(ids(&search(board.state(), "gold")), [6]);

        for n in 0..10 {
            save(&mut board, TaskDraft::new(format!("Polish shield {n}")));
        }
        assert_eq!(search(board.state(), "shield").len(), MAX_SEARCH_RESULTS);
    }

    #[test]
    fn counts_cover_columns_and_realms() {
        let board = sample();
        let counts = counts(board.state());
        assert_eq!(counts.total, 6);
        assert_eq!(counts.today, 2);
        assert_eq!(counts.calendar, 2);
        assert_eq!(
            counts.columns,
            [
                (Column::Backlog, 2),
                (Column::Today, 2),
                (Column::InProgress, 0),
                (Column::Done, 0)
            ]
        );
        assert_eq!(counts.realms[WAR_ROOM], 1);
        assert_eq!(counts.realms[THY_STRATEGY], 2);
        assert_eq!(counts.realms[GREAT_HALL], 0);
    }
}
