//! dbstatus-history - Writing progress tracking
//!
//! Records the word count of a document over time, per calendar day, and
//! keeps optional goals: a planned end date, a total word count and a daily
//! word count.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use dbstatus_history::History;
//!
//! let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! let mut history = History::new("dbs_work.json", "book.xml", day, None, 50000, 500);
//! history.add(day.and_hms_opt(9, 0, 0).unwrap(), 1200);
//! history.add(day.and_hms_opt(17, 0, 0).unwrap(), 1750);
//!
//! let stats = history.today(day).unwrap();
//! assert_eq!(stats.written(), 550);
//! ```

pub mod error;
pub mod history;

pub use error::{HistoryError, Result};
pub use history::{DayStats, Entry, Goal, History, HISTORY_FILE};
