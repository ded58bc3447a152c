//! Integration tests for the dbstatus CLI library
//!
//! These tests run the report builders against a small book split over
//! several files.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use dbstatus_cli::{
    collect_remarks, format_includes, load_settings, record_progress, sections_report,
    ProgressOptions,
};
use dbstatus_core::StatusAnalyzer;
use tempfile::TempDir;

const BOOK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<book xmlns="http://docbook.org/ns/docbook" xmlns:xi="http://www.w3.org/2001/XInclude" version="5.0">
  <info><title>Handbuch</title></info>
  <preface><title>Vorwort</title><para>Ein kurzes Vorwort.</para></preface>
  <xi:include href="chapters/one.xml"/>
  <xi:include href="chapters/two.xml"/>
</book>
"#;

const CHAPTER_ONE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<chapter xmlns="http://docbook.org/ns/docbook" version="5.0">
  <title>Eins</title>
  <para>Erstes Kapitel mit <remark>TODO: Beispiele</remark> Text.</para>
</chapter>
"#;

const CHAPTER_TWO: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<chapter xmlns="http://docbook.org/ns/docbook" xmlns:xi="http://www.w3.org/2001/XInclude" version="5.0">
  <title>Zwei</title>
  <para>Zweites Kapitel.</para>
  <xi:include href="listing.txt" parse="text"/>
</chapter>
"#;

fn write_project() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("chapters")).unwrap();
    fs::write(root.join("book.xml"), BOOK).unwrap();
    fs::write(root.join("chapters/one.xml"), CHAPTER_ONE).unwrap();
    fs::write(root.join("chapters/two.xml"), CHAPTER_TWO).unwrap();
    fs::write(root.join("chapters/listing.txt"), "let x = 1;").unwrap();
    let book = root.join("book.xml");
    (dir, book)
}

fn settings() -> dbstatus_core::Settings {
    load_settings(Some(Path::new(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/dbstatus.toml"
    ))))
    .unwrap()
}

#[test]
fn test_sections_of_split_book() {
    let (_dir, book) = write_project();
    let report = sections_report(&book, Some(1), &settings()).unwrap();

    let summary: Vec<(&str, usize, usize)> = report
        .sections
        .iter()
        .map(|s| (s.title.as_str(), s.words, s.level))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Handbuch", 9, 0),
            ("Vorwort", 3, 1),
            ("Eins", 4, 1),
            ("Zwei", 2, 1),
        ]
    );
    assert_eq!(report.sections[0].subtree_words, Some(9));
}

#[test]
fn test_text_inclusion_is_not_counted_outside_content() {
    // the listing lands directly in the chapter, not inside a paragraph
    let (_dir, book) = write_project();
    let sections = StatusAnalyzer::for_file(&book).analyze_file().unwrap();
    assert_eq!(sections[3].words, 2);
}

#[test]
fn test_remarks_with_configured_keywords() {
    let (_dir, book) = write_project();
    let remarks = collect_remarks(&book, &[], &settings()).unwrap();
    assert_eq!(remarks.len(), 1);
    assert_eq!(remarks[0].file, "chapters/one.xml");
    assert_eq!(remarks[0].keyword, "TODO");
    assert_eq!(remarks[0].text, "Beispiele");
    assert_eq!(remarks[0].line, 4);
}

#[test]
fn test_includes_listing() {
    let (_dir, book) = write_project();
    let targets = StatusAnalyzer::for_file(&book).includes().unwrap();
    let hrefs: Vec<&str> = targets.iter().map(|t| t.href.as_str()).collect();
    assert_eq!(hrefs, vec!["chapters/one.xml", "chapters/two.xml", "listing.txt"]);
    assert!(format_includes(&targets).ends_with("(text)"));
}

#[test]
fn test_progress_over_two_days() {
    let (dir, book) = write_project();
    let history = dir.path().join("dbs_work.json");
    let options = ProgressOptions {
        total: Some(1000),
        history: Some(history.clone()),
        ..ProgressOptions::default()
    };
    let day1 = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
    let day2 = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();

    let first = record_progress(&book, &options, &settings(), day1.and_hms_opt(9, 0, 0).unwrap())
        .unwrap();
    assert_eq!(first.words, 9);
    assert_eq!(first.remaining_words, Some(991));

    fs::write(
        dir.path().join("chapters/one.xml"),
        CHAPTER_ONE.replace("mit", "mit noch mehr"),
    )
    .unwrap();
    let second = record_progress(&book, &options, &settings(), day2.and_hms_opt(9, 0, 0).unwrap())
        .unwrap();
    assert_eq!(second.words, 11);
    assert_eq!(second.today.ctr, 1);
    assert_eq!(second.goal.start, day1);

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&history).unwrap()).unwrap();
    assert_eq!(saved["archive"]["2024-04-01"]["end"], 9);
    assert!(saved["archive"]["2024-04-02"].is_null());
    assert_eq!(saved["current"][0]["words"], 11);
    assert_eq!(saved["current"].as_array().map(Vec::len), Some(1));
}
