pub mod board;
pub mod calendar;
pub mod classify;
pub mod normalize;
pub mod realm;
pub mod state;
pub mod task;
pub mod view;

use chrono::NaiveDate;

/// Today's date on the local clock.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
