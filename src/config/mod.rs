// wpsync/src/config/mod.rs
pub mod settings;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::AppError;

/// Direction label accepted on the command line.
///
/// Both modes drive the same configuration session; the label is only validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Pull,
    Push,
}

impl FromStr for Mode {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_lowercase().as_str() {
            "pull" => Ok(Mode::Pull),
            "push" => Ok(Mode::Push),
            _ => Err(AppError::UnknownMode(raw.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Pull => write!(f, "pull"),
            Mode::Push => write!(f, "push"),
        }
    }
}

// Structure persisted in the per-site cache file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    pub base_dir: String,
    pub base_url: String,
    pub base_db: String,
    pub dest_dir: String,
    pub dest_url: String,
    pub dest_db: String,
    pub dest_server: String,
}

/// The six fields collected interactively, in prompt order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptedField {
    BaseUrl,
    BaseDb,
    DestDir,
    DestUrl,
    DestDb,
    DestServer,
}

impl PromptedField {
    pub const ALL: [PromptedField; 6] = [
        PromptedField::BaseUrl,
        PromptedField::BaseDb,
        PromptedField::DestDir,
        PromptedField::DestUrl,
        PromptedField::DestDb,
        PromptedField::DestServer,
    ];

    pub fn question(self) -> &'static str {
        match self {
            PromptedField::BaseUrl => "What is the current WordPress base url?",
            PromptedField::BaseDb => "What is the current WordPress database name?",
            PromptedField::DestDir => "What is the destination path for WordPress?",
            PromptedField::DestUrl => "What is the destination WordPress base url?",
            PromptedField::DestDb => "What is the destination WordPress database name?",
            PromptedField::DestServer => "What is the destination server hostname?",
        }
    }
}

impl SiteConfig {
    /// Blank record for `base_dir`; every other field is filled in later.
    pub fn for_base_dir(base_dir: impl Into<String>) -> Self {
        SiteConfig {
            base_dir: base_dir.into(),
            ..Default::default()
        }
    }

    pub fn set(&mut self, field: PromptedField, value: String) {
        let slot = match field {
            PromptedField::BaseUrl => &mut self.base_url,
            PromptedField::BaseDb => &mut self.base_db,
            PromptedField::DestDir => &mut self.dest_dir,
            PromptedField::DestUrl => &mut self.dest_url,
            PromptedField::DestDb => &mut self.dest_db,
            PromptedField::DestServer => &mut self.dest_server,
        };
        *slot = value;
    }

    /// Labelled lines shown to the user before confirmation.
    pub fn summary_lines(&self) -> Vec<String> {
        [
            ("Base directory", &self.base_dir),
            ("Base WP URL", &self.base_url),
            ("Base database", &self.base_db),
            ("Dest directory", &self.dest_dir),
            ("Dest WP URL", &self.dest_url),
            ("Dest database", &self.dest_db),
            ("Dest server", &self.dest_server),
        ]
        .iter()
        .map(|(label, value)| format!("{}: {}", label, value))
        .collect()
    }
}
