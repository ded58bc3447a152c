//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, warn, Level};
use tracing_subscriber::EnvFilter;

use dbstatus_core::{
    docbook_version, sum_sections, IncludeTarget, ParseMode, Remark, Section, Settings,
    StatusAnalyzer,
};
use dbstatus_history::{DayStats, Goal, History};

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for tool consumption
    Json,
}

#[derive(Parser)]
#[command(name = "dbstatus")]
#[command(author, version, about = "Writing progress for DocBook 5 documents", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log more (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the sections of a document with their word counts
    Sections {
        /// Input DocBook file
        input: PathBuf,

        /// Roll subsection word counts up to this nesting level
        #[arg(short, long)]
        depth: Option<usize>,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List the remarks of a document and the files it includes
    Remarks {
        /// Input DocBook file
        input: PathBuf,

        /// Only show remarks with this keyword (repeatable)
        #[arg(short, long)]
        keyword: Vec<String>,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List the files a document includes, recursively
    Includes {
        /// Input DocBook file
        input: PathBuf,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Record the current word count and report progress against goals
    Progress {
        /// Input DocBook file
        input: PathBuf,

        /// Planned completion date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Total word count goal
        #[arg(long)]
        total: Option<usize>,

        /// Daily word count goal
        #[arg(long)]
        daily: Option<usize>,

        /// History file path
        #[arg(long)]
        history: Option<PathBuf>,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Sections {
            input,
            depth,
            format,
        } => {
            sections_command(&input, depth, format, &settings)?;
        }
        Commands::Remarks {
            input,
            keyword,
            format,
        } => {
            remarks_command(&input, &keyword, format, &settings)?;
        }
        Commands::Includes { input, format } => {
            includes_command(&input, format, &settings)?;
        }
        Commands::Progress {
            input,
            end,
            total,
            daily,
            history,
            format,
        } => {
            let options = ProgressOptions {
                end,
                total,
                daily,
                history,
            };
            progress_command(&input, &options, format, &settings)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

/// Section report of a single document
#[derive(Debug, Clone, Serialize)]
pub struct SectionsReport {
    /// The analyzed file
    pub file: String,
    /// Value of the root `version` attribute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub sections: Vec<Section>,
}

/// Goal overrides and history location for the progress command
#[derive(Debug, Clone, Default)]
pub struct ProgressOptions {
    pub end: Option<NaiveDate>,
    pub total: Option<usize>,
    pub daily: Option<usize>,
    pub history: Option<PathBuf>,
}

/// Progress of a document on one day
#[derive(Debug, Clone, Serialize)]
pub struct ProgressReport {
    pub file: String,
    pub date: NaiveDate,
    /// Current word count of the whole document
    pub words: usize,
    pub today: DayStats,
    pub goal: Goal,
    /// Words missing to the total goal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_words: Option<usize>,
    /// Days until the planned end, negative when overdue
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_days: Option<i64>,
}

fn require_input(input: &Path) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }
    Ok(())
}

fn file_label(input: &Path) -> String {
    input
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| input.display().to_string())
}

fn analyzer_for(input: &Path, settings: &Settings) -> StatusAnalyzer {
    StatusAnalyzer::for_file(input).with_tags(settings.tag_sets())
}

fn emit<T: Serialize>(value: &T, format: OutputFormat, text: impl FnOnce(&T) -> String) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value)
                .context("Failed to serialize report to JSON")?;
            println!("{}", json);
        }
        OutputFormat::Text => println!("{}", text(value)),
    }
    Ok(())
}

/// Build the section report of a document.
///
/// `depth` overrides the configured rollup depth; without either no
/// rollups are computed.
pub fn sections_report(input: &Path, depth: Option<usize>, settings: &Settings) -> Result<SectionsReport> {
    require_input(input)?;

    let analyzer = analyzer_for(input, settings);
    let doc = analyzer
        .load()
        .with_context(|| format!("Failed to load document: {}", input.display()))?;

    let mut sections = analyzer.analyze_document(&doc);
    if let Some(depth) = depth.or(settings.structure.rollup_depth) {
        debug!("Rolling up word counts to level {}", depth);
        sum_sections(&mut sections, depth);
    }

    Ok(SectionsReport {
        file: file_label(input),
        version: docbook_version(&doc),
        sections,
    })
}

/// Render a section report as indented text
pub fn format_sections(report: &SectionsReport) -> String {
    let mut lines = vec![match &report.version {
        Some(version) => format!("{} (DocBook {})", report.file, version),
        None => report.file.clone(),
    }];

    for section in &report.sections {
        let title = if section.title.is_empty() {
            "(untitled)"
        } else {
            section.title.as_str()
        };
        let mut line = format!(
            "{}{} [{}]: {} words",
            "  ".repeat(section.level),
            title,
            section.tag,
            section.words
        );
        if let Some(subtree) = section.subtree_words.filter(|words| *words > 0) {
            line.push_str(&format!(", {} in subsections", subtree));
        }
        lines.push(line);
    }

    lines.join("\n")
}

/// Execute the sections command
pub fn sections_command(
    input: &Path,
    depth: Option<usize>,
    format: OutputFormat,
    settings: &Settings,
) -> Result<()> {
    let report = sections_report(input, depth, settings)?;
    emit(&report, format, format_sections)
}

/// Find the remarks of a document.
///
/// Without explicit keywords the configured keywords apply.
pub fn collect_remarks(input: &Path, keywords: &[String], settings: &Settings) -> Result<Vec<Remark>> {
    require_input(input)?;

    let keywords = if keywords.is_empty() {
        settings.remarks.keywords.as_slice()
    } else {
        keywords
    };
    analyzer_for(input, settings)
        .find_remarks(keywords)
        .with_context(|| format!("Failed to collect remarks: {}", input.display()))
}

/// Render remarks one per line as `file:line: KEYWORD: text`
pub fn format_remarks(remarks: &[Remark]) -> String {
    if remarks.is_empty() {
        return "No remarks found".to_string();
    }
    let mut lines: Vec<String> = remarks
        .iter()
        .map(|r| format!("{}:{}: {}: {}", r.file, r.line, r.keyword, r.text))
        .collect();
    lines.push(format!("{} remark(s)", remarks.len()));
    lines.join("\n")
}

/// Execute the remarks command
pub fn remarks_command(
    input: &Path,
    keywords: &[String],
    format: OutputFormat,
    settings: &Settings,
) -> Result<()> {
    let remarks = collect_remarks(input, keywords, settings)?;
    emit(&remarks, format, |remarks| format_remarks(remarks))
}

/// Render inclusion targets one per line
pub fn format_includes(targets: &[IncludeTarget]) -> String {
    if targets.is_empty() {
        return "No inclusions".to_string();
    }
    targets
        .iter()
        .map(|target| match (&target.path, target.parse) {
            (None, _) => format!("{} (remote, not followed)", target.href),
            (Some(path), ParseMode::Text) => format!("{} -> {} (text)", target.href, path.display()),
            (Some(path), ParseMode::Xml) => format!("{} -> {}", target.href, path.display()),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Execute the includes command
pub fn includes_command(input: &Path, format: OutputFormat, settings: &Settings) -> Result<()> {
    require_input(input)?;

    let targets = analyzer_for(input, settings)
        .includes()
        .with_context(|| format!("Failed to resolve inclusions: {}", input.display()))?;
    emit(&targets, format, |targets| format_includes(targets))
}

/// Summarize a history for the given day
pub fn progress_report(history: &History, words: usize, date: NaiveDate) -> Option<ProgressReport> {
    let today = history.today(date)?;
    let goal = history.goals().clone();
    let remaining_words = (goal.goal_total > 0).then(|| goal.goal_total.saturating_sub(words));
    let remaining_days = goal.end.map(|end| (end - date).num_days());

    Some(ProgressReport {
        file: history.file.clone(),
        date,
        words,
        today,
        goal,
        remaining_words,
        remaining_days,
    })
}

/// Measure a document and record the word count in its history.
///
/// Explicit goals in `options` replace the stored ones.
pub fn record_progress(
    input: &Path,
    options: &ProgressOptions,
    settings: &Settings,
    now: NaiveDateTime,
) -> Result<ProgressReport> {
    let report = sections_report(input, None, settings)?;
    let words = report.sections.first().map_or(0, |section| section.words);
    let today = now.date();

    let history_path = options
        .history
        .clone()
        .unwrap_or_else(|| PathBuf::from(&settings.history.file));
    let mut history = History::load_or_new(
        &history_path,
        file_label(input),
        today,
        options.end,
        options.total.unwrap_or(0),
        options.daily.unwrap_or(0),
    )
    .with_context(|| format!("Failed to load history: {}", history_path.display()))?;

    if history.file != report.file {
        warn!(
            "History {} belongs to {}, not {}",
            history_path.display(),
            history.file,
            report.file
        );
    }
    if let Some(end) = options.end {
        history.planned_end(end);
    }
    if let Some(total) = options.total {
        history.total_words(total);
    }
    if let Some(daily) = options.daily {
        history.daily_words(daily);
    }

    history.archive(today);
    history.track(now, words);
    history
        .save()
        .with_context(|| format!("Failed to save history: {}", history_path.display()))?;
    debug!("Recorded {} words in {}", words, history_path.display());

    progress_report(&history, words, today).context("No progress recorded for today")
}

/// Render a progress report as text
pub fn format_progress(report: &ProgressReport) -> String {
    let today = &report.today;
    let mut lines = vec![
        format!("{}: {} words", report.file, report.words),
        format!(
            "Today: {:+} words ({} measurement(s), min {}, max {})",
            today.written(),
            today.ctr,
            today.min,
            today.max
        ),
    ];

    if let Some(remaining) = report.remaining_words {
        lines.push(format!(
            "Total goal: {} words, {} to go",
            report.goal.goal_total, remaining
        ));
    }
    if report.goal.goal_daily > 0 {
        let written = today.written().max(0) as usize;
        lines.push(format!(
            "Daily goal: {} words, {} to go",
            report.goal.goal_daily,
            report.goal.goal_daily.saturating_sub(written)
        ));
    }
    if let (Some(end), Some(days)) = (report.goal.end, report.remaining_days) {
        lines.push(format!("Planned end: {} ({} day(s) left)", end, days));
    }

    lines.join("\n")
}

/// Execute the progress command
pub fn progress_command(
    input: &Path,
    options: &ProgressOptions,
    format: OutputFormat,
    settings: &Settings,
) -> Result<()> {
    let report = record_progress(input, options, settings, Local::now().naive_local())?;
    emit(&report, format, format_progress)
}

/// Load settings from a config file or use defaults
pub fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            Settings::from_toml_str(&content)
                .with_context(|| format!("Failed to parse config: {}", path.display()))
        }
        None => {
            // Try to find dbstatus.toml in the working directory
            let candidates = ["dbstatus.toml", ".dbstatus.toml"];
            for candidate in candidates {
                if Path::new(candidate).exists() {
                    let content = fs::read_to_string(candidate)?;
                    match Settings::from_toml_str(&content) {
                        Ok(settings) => return Ok(settings),
                        Err(e) => warn!("Ignoring {}: {}", candidate, e),
                    }
                }
            }
            Ok(Settings::default())
        }
    }
}
