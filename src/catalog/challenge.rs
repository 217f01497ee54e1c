use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Javascript,
    Typescript,
    Python,
    Go,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::Javascript,
        Language::Typescript,
        Language::Python,
        Language::Go,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Language::Javascript => "javascript",
            Language::Typescript => "typescript",
            Language::Python => "python",
            Language::Go => "go",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.as_str().eq_ignore_ascii_case(key.trim()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Junior,
    Senior,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Junior, Difficulty::Senior, Difficulty::Expert];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Junior => "JUNIOR",
            Difficulty::Senior => "SENIOR",
            Difficulty::Expert => "EXPERT",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(key.trim()))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selectable line range inside a challenge's code. Lines are 1-based and
/// inclusive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub start_line: u32,
    pub end_line: u32,
    #[serde(default)]
    pub is_bug: bool,
    /// Informational only; nesting is resolved by stacking order, not here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl Section {
    pub fn line_count(&self) -> u32 {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    pub fn contains_line(&self, line: u32) -> bool {
        line >= self.start_line && line <= self.end_line
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub language: Language,
    pub code: String,
    pub sections: Vec<Section>,
    pub explanation: String,
    /// Whole seconds, always > 0 once validated.
    pub time_limit: u32,
    pub difficulty: Difficulty,
}

impl Challenge {
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn bug_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| s.is_bug)
    }

    pub fn bug_count(&self) -> usize {
        self.bug_sections().count()
    }

    pub fn line_count(&self) -> usize {
        self.code.lines().count()
    }
}
