//! Writing progress history
//!
//! A [`History`] keeps the word count goals for a document together with
//! per-day statistics of the measured word counts. It is stored as JSON next
//! to the document, in [`HISTORY_FILE`] by default.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{HistoryError, Result};

/// Default history file name
pub const HISTORY_FILE: &str = "dbs_work.json";

/// Writing goals. Word targets of 0 mean "no goal".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    /// Day the history was created
    pub start: NaiveDate,
    /// Planned completion day
    #[serde(default)]
    pub end: Option<NaiveDate>,
    /// Target word count for the whole document
    #[serde(default)]
    pub goal_total: usize,
    /// Target number of words written per day
    #[serde(default)]
    pub goal_daily: usize,
}

/// A single measurement that has not been archived yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub timestamp: NaiveDateTime,
    pub words: usize,
}

/// Word count statistics of one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStats {
    /// Word count of the first measurement
    pub start: usize,
    /// Word count of the last measurement
    pub end: usize,
    pub min: usize,
    pub max: usize,
    /// Number of measurements
    pub ctr: usize,
}

impl DayStats {
    /// Statistics for a day with a single measurement
    pub fn first(words: usize) -> Self {
        Self {
            start: words,
            end: words,
            min: words,
            max: words,
            ctr: 1,
        }
    }

    /// Words written on this day, negative if text was removed
    pub fn written(&self) -> i64 {
        self.end as i64 - self.start as i64
    }

    fn record(&mut self, words: usize) {
        self.min = self.min.min(words);
        self.max = self.max.max(words);
        self.end = words;
        self.ctr += 1;
    }
}

/// Writing progress history of one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    /// The document the history belongs to
    pub file: String,
    goal: Goal,
    #[serde(default)]
    current: Vec<Entry>,
    #[serde(default)]
    archive: BTreeMap<NaiveDate, DayStats>,
    #[serde(skip)]
    path: PathBuf,
}

impl History {
    /// Create an empty history starting on `start`
    pub fn new(
        path: impl Into<PathBuf>,
        file: impl Into<String>,
        start: NaiveDate,
        end: Option<NaiveDate>,
        goal_total: usize,
        goal_daily: usize,
    ) -> Self {
        Self {
            file: file.into(),
            goal: Goal {
                start,
                end,
                goal_total,
                goal_daily,
            },
            current: Vec::new(),
            archive: BTreeMap::new(),
            path: path.into(),
        }
    }

    /// Load an existing history file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| HistoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut history = Self::from_json(&json).map_err(|source| HistoryError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        history.path = path.to_path_buf();
        debug!("Loaded history of {} from {}", history.file, path.display());
        Ok(history)
    }

    /// Load the history at `path`, or start a new one if there is none.
    ///
    /// The goal arguments only apply to a new history; an existing file
    /// keeps its stored goals.
    pub fn load_or_new(
        path: impl AsRef<Path>,
        file: impl Into<String>,
        today: NaiveDate,
        end: Option<NaiveDate>,
        goal_total: usize,
        goal_daily: usize,
    ) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            debug!("Starting new history at {}", path.display());
            Ok(Self::new(path, file, today, end, goal_total, goal_daily))
        }
    }

    /// Deserialize a history from JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serialize the history to JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write the history back to its file
    pub fn save(&self) -> Result<()> {
        let json = self.to_json().map_err(|source| HistoryError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(|source| HistoryError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!("Saved history to {}", self.path.display());
        Ok(())
    }

    /// Location of the history file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Set the planned completion day
    pub fn planned_end(&mut self, date: NaiveDate) {
        self.goal.end = Some(date);
    }

    /// Set the total word count goal
    pub fn total_words(&mut self, words: usize) {
        self.goal.goal_total = words;
    }

    /// Set the daily word count goal
    pub fn daily_words(&mut self, words: usize) {
        self.goal.goal_daily = words;
    }

    /// The writing goals
    pub fn goals(&self) -> &Goal {
        &self.goal
    }

    /// Record a word count measurement in the day statistics
    pub fn add(&mut self, timestamp: NaiveDateTime, words: usize) {
        self.archive
            .entry(timestamp.date())
            .and_modify(|day| day.record(words))
            .or_insert_with(|| DayStats::first(words));
    }

    /// Record a measurement without archiving it yet
    pub fn track(&mut self, timestamp: NaiveDateTime, words: usize) {
        self.current.push(Entry { timestamp, words });
    }

    /// Measurements that are not archived yet
    pub fn current(&self) -> &[Entry] {
        &self.current
    }

    /// Fold the tracked measurements from before `today` into the day
    /// statistics. Measurements of `today` stay tracked.
    pub fn archive(&mut self, today: NaiveDate) {
        let split = self
            .current
            .iter()
            .position(|entry| entry.timestamp.date() >= today)
            .unwrap_or(self.current.len());
        if split == 0 {
            return;
        }

        debug!("Archiving {} measurements before {}", split, today);
        let older: Vec<Entry> = self.current.drain(..split).collect();
        for entry in older {
            self.add(entry.timestamp, entry.words);
        }
    }

    /// Whether any measurement was recorded
    pub fn has_history(&self) -> bool {
        !self.archive.is_empty() || !self.current.is_empty()
    }

    /// Statistics of the given day, archived and tracked measurements combined
    pub fn today(&self, date: NaiveDate) -> Option<DayStats> {
        self.current
            .iter()
            .filter(|entry| entry.timestamp.date() == date)
            .fold(self.archive.get(&date).copied(), |stats, entry| {
                Some(match stats {
                    Some(mut day) => {
                        day.record(entry.words);
                        day
                    }
                    None => DayStats::first(entry.words),
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        date(day).and_hms_opt(hour, 0, 0).unwrap()
    }

    fn history() -> History {
        History::new(HISTORY_FILE, "test.xml", date(1), None, 0, 0)
    }

    #[test]
    fn test_minimal_values() {
        let h = history();
        assert_eq!(h.file, "test.xml");
        assert_eq!(
            h.goals(),
            &Goal {
                start: date(1),
                end: None,
                goal_total: 0,
                goal_daily: 0
            }
        );
        assert!(!h.has_history());
    }

    #[test]
    fn test_goal_setters() {
        let mut h = history();
        h.planned_end(date(11));
        h.total_words(10000);
        h.daily_words(1000);
        assert_eq!(h.goals().end, Some(date(11)));
        assert_eq!(h.goals().goal_total, 10000);
        assert_eq!(h.goals().goal_daily, 1000);
    }

    #[test]
    fn test_progress_can_be_added() {
        let mut h = history();
        h.add(at(2, 9), 100);
        assert!(h.has_history());
        assert_eq!(h.today(date(2)), Some(DayStats::first(100)));

        h.add(at(2, 10), 101);
        h.add(at(2, 11), 99);
        assert_eq!(
            h.today(date(2)),
            Some(DayStats {
                start: 100,
                end: 99,
                min: 99,
                max: 101,
                ctr: 3
            })
        );

        // an entry of another day does not touch today's statistics
        h.add(at(1, 23), 10);
        assert_eq!(h.today(date(2)).map(|d| d.ctr), Some(3));
        assert_eq!(h.today(date(1)), Some(DayStats::first(10)));
    }

    #[test]
    fn test_written_can_be_negative() {
        let mut h = history();
        h.add(at(2, 9), 100);
        h.add(at(2, 10), 90);
        assert_eq!(h.today(date(2)).map(|d| d.written()), Some(-10));
    }

    #[test]
    fn test_archive_keeps_today() {
        let mut h = history();
        h.track(at(1, 8), 50);
        h.track(at(1, 9), 40);
        h.track(at(1, 10), 60);
        h.track(at(2, 8), 70);
        h.archive(date(2));

        assert_eq!(h.current().len(), 1);
        assert_eq!(h.current()[0].words, 70);
        assert_eq!(
            h.today(date(1)),
            Some(DayStats {
                start: 50,
                end: 60,
                min: 40,
                max: 60,
                ctr: 3
            })
        );
        assert_eq!(h.today(date(2)), Some(DayStats::first(70)));
        assert_eq!(h.today(date(3)), None);
    }

    #[test]
    fn test_tracked_measurements_count_for_today() {
        let mut h = history();
        h.track(at(2, 9), 100);
        assert!(h.has_history());
        h.track(at(2, 10), 120);
        h.archive(date(2));

        assert_eq!(h.current().len(), 2);
        assert_eq!(
            h.today(date(2)),
            Some(DayStats {
                start: 100,
                end: 120,
                min: 100,
                max: 120,
                ctr: 2
            })
        );
        let value: serde_json::Value = serde_json::from_str(&h.to_json().unwrap()).unwrap();
        assert_eq!(value["current"][1]["words"], 120);
        assert!(value["archive"]["2024-03-02"].is_null());
    }

    #[test]
    fn test_archive_merges_existing_day() {
        let mut h = history();
        h.add(at(1, 8), 50);
        h.track(at(1, 12), 30);
        h.track(at(1, 13), 80);
        h.archive(date(2));

        assert_eq!(
            h.today(date(1)),
            Some(DayStats {
                start: 50,
                end: 80,
                min: 30,
                max: 80,
                ctr: 3
            })
        );
        assert!(h.current().is_empty());
    }

    #[test]
    fn test_json_shape() {
        let mut h = history();
        h.add(at(2, 9), 100);
        let value: serde_json::Value = serde_json::from_str(&h.to_json().unwrap()).unwrap();
        assert_eq!(value["file"], "test.xml");
        assert_eq!(value["goal"]["start"], "2024-03-01");
        assert_eq!(value["archive"]["2024-03-02"]["ctr"], 1);
        assert!(value.get("path").is_none());
    }

    #[test]
    fn test_malformed_json() {
        assert!(History::from_json("{\"file\": 1}").is_err());
    }
}
