//! Configuration settings
//!
//! Settings are read from a `dbstatus.toml` file. Every field is optional
//! and defaults to the DocBook 5 element names.

use serde::{Deserialize, Serialize};

use crate::tags::{TagSets, CONTENT_TAGS, REMARK_TAG, SECTION_TAGS};

/// Default name of the writing history file
pub const DEFAULT_HISTORY_FILE: &str = "dbs_work.json";

/// Top-level settings structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Structure analysis settings
    pub structure: StructureSettings,
    /// Remark extraction settings
    pub remarks: RemarkSettings,
    /// Writing history settings
    pub history: HistorySettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Element names for the analyzer
    pub fn tag_sets(&self) -> TagSets {
        TagSets::new(
            self.structure.content_tags.iter().cloned(),
            self.structure.section_tags.iter().cloned(),
            self.remarks.remark_tag.clone(),
        )
    }
}

/// Structure analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureSettings {
    /// Elements whose text is counted
    pub content_tags: Vec<String>,
    /// Section-like elements
    pub section_tags: Vec<String>,
    /// Depth for hierarchical word count rollups, none by default
    pub rollup_depth: Option<usize>,
}

impl Default for StructureSettings {
    fn default() -> Self {
        Self {
            content_tags: CONTENT_TAGS.iter().map(|t| t.to_string()).collect(),
            section_tags: SECTION_TAGS.iter().map(|t| t.to_string()).collect(),
            rollup_depth: None,
        }
    }
}

/// Remark extraction configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemarkSettings {
    /// The annotation element
    pub remark_tag: String,
    /// Keywords to report when none are given on the command line
    pub keywords: Vec<String>,
}

impl Default for RemarkSettings {
    fn default() -> Self {
        Self {
            remark_tag: REMARK_TAG.to_string(),
            keywords: Vec::new(),
        }
    }
}

/// Writing history configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// History file path
    pub file: String,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            file: DEFAULT_HISTORY_FILE.to_string(),
        }
    }
}
