//! History file round trips on disk

use chrono::{Local, NaiveDate};
use dbstatus_history::{DayStats, History, HistoryError, HISTORY_FILE};
use tempfile::TempDir;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

#[test]
fn test_new_history_is_saved() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(HISTORY_FILE);

    let h = History::load_or_new(&path, "test.xml", day(1), Some(day(11)), 10000, 1000).unwrap();
    assert!(!path.exists());
    h.save().unwrap();
    assert!(path.exists());

    let loaded = History::load(&path).unwrap();
    assert_eq!(loaded.file, "test.xml");
    assert_eq!(loaded.goals().start, day(1));
    assert_eq!(loaded.goals().end, Some(day(11)));
    assert_eq!(loaded.goals().goal_total, 10000);
    assert_eq!(loaded.goals().goal_daily, 1000);
    assert_eq!(loaded.path(), path.as_path());
}

#[test]
fn test_progress_is_stored() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(HISTORY_FILE);
    let now = Local::now().naive_local();

    let mut h = History::load_or_new(&path, "test.xml", now.date(), None, 0, 0).unwrap();
    h.track(now, 100);
    h.track(now, 101);
    h.track(now, 99);
    h.save().unwrap();

    // goals of an existing history are kept
    let reloaded = History::load_or_new(&path, "other.xml", day(2), Some(day(3)), 5, 5).unwrap();
    assert_eq!(reloaded.file, "test.xml");
    assert_eq!(reloaded.goals().goal_total, 0);
    assert_eq!(
        reloaded.today(now.date()),
        Some(DayStats {
            start: 100,
            end: 99,
            min: 99,
            max: 101,
            ctr: 3
        })
    );
    assert_eq!(reloaded.current().len(), 3);
}

#[test]
fn test_corrupt_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(HISTORY_FILE);
    std::fs::write(&path, "not json").unwrap();

    let err = History::load_or_new(&path, "test.xml", day(1), None, 0, 0).unwrap_err();
    assert!(matches!(err, HistoryError::Json { .. }));
}

#[test]
fn test_unwritable_location() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join(HISTORY_FILE);
    let h = History::new(&path, "test.xml", day(1), None, 0, 0);
    assert!(matches!(h.save(), Err(HistoryError::Io { .. })));
}
