//! dbstatus CLI - Command-line interface library
//!
//! This library provides the CLI functionality for dbstatus:
//! - Sections: structure and word counts of a DocBook 5 document
//! - Remarks: editorial remarks, optionally filtered by keyword
//! - Includes: files pulled in through XInclude
//! - Progress: word count history against writing goals
//!
//! # Library Usage
//!
//! ```ignore
//! use dbstatus_cli::{load_settings, sections_report, format_sections};
//!
//! let settings = load_settings(None)?;
//! let report = sections_report(Path::new("book.xml"), Some(2), &settings)?;
//! println!("{}", format_sections(&report));
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Word counts per section, with subsection rollups two levels deep
//! dbstatus sections book.xml --depth 2
//!
//! # FIXME and TODO remarks as JSON
//! dbstatus remarks book.xml -k FIXME -k TODO --format json
//!
//! # Record today's progress towards 50000 words
//! dbstatus progress book.xml --total 50000 --end 2025-06-30
//! ```

pub mod app;

// Re-export main entry point and types
pub use app::{
    collect_remarks, format_includes, format_progress, format_remarks, format_sections,
    includes_command, load_settings, progress_command, progress_report, record_progress,
    remarks_command, sections_command, sections_report,
};
pub use app::{run_cli, OutputFormat, ProgressOptions, ProgressReport, SectionsReport};
