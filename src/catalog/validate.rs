use std::collections::HashSet;

use thiserror::Error;

use crate::catalog::challenge::Challenge;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{file}: {source}")]
    Toml {
        file: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("{file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{file}: unsupported challenge file extension")]
    UnsupportedFormat { file: String },
    #[error("{file}: not valid UTF-8")]
    Encoding { file: String },
    #[error("{file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
    #[error("challenge {challenge}: time limit must be greater than zero")]
    ZeroTimeLimit { challenge: String },
    #[error("challenge {challenge}: has no sections")]
    NoSections { challenge: String },
    #[error("challenge {challenge}: has no bug sections")]
    NoBugs { challenge: String },
    #[error("challenge {challenge}: duplicate section id {section}")]
    DuplicateSection { challenge: String, section: String },
    #[error("challenge {challenge}: section {section} has invalid range {start}-{end}")]
    InvalidRange {
        challenge: String,
        section: String,
        start: u32,
        end: u32,
    },
    #[error("challenge {challenge}: section {section} ends at line {end} but code has {lines} lines")]
    OutOfRange {
        challenge: String,
        section: String,
        end: u32,
        lines: usize,
    },
    #[error("challenge {challenge}: section {section} names unknown parent {parent}")]
    UnknownParent {
        challenge: String,
        section: String,
        parent: String,
    },
    #[error("duplicate challenge id {0}")]
    DuplicateChallenge(String),
    #[error("catalog contains no challenges")]
    Empty,
}

/// Check the data-contract invariants the session relies on. The session
/// itself never re-checks these.
pub fn validate_challenge(challenge: &Challenge) -> Result<(), CatalogError> {
    let id = || challenge.id.clone();

    if challenge.time_limit == 0 {
        return Err(CatalogError::ZeroTimeLimit { challenge: id() });
    }
    if challenge.sections.is_empty() {
        return Err(CatalogError::NoSections { challenge: id() });
    }
    if challenge.bug_count() == 0 {
        return Err(CatalogError::NoBugs { challenge: id() });
    }

    let lines = challenge.line_count();
    let mut seen: HashSet<&str> = HashSet::new();
    for section in &challenge.sections {
        if !seen.insert(section.id.as_str()) {
            return Err(CatalogError::DuplicateSection {
                challenge: id(),
                section: section.id.clone(),
            });
        }
        if section.start_line == 0 || section.end_line < section.start_line {
            return Err(CatalogError::InvalidRange {
                challenge: id(),
                section: section.id.clone(),
                start: section.start_line,
                end: section.end_line,
            });
        }
        if section.end_line as usize > lines {
            return Err(CatalogError::OutOfRange {
                challenge: id(),
                section: section.id.clone(),
                end: section.end_line,
                lines,
            });
        }
    }

    for section in &challenge.sections {
        if let Some(ref parent) = section.parent_id {
            if !seen.contains(parent.as_str()) {
                return Err(CatalogError::UnknownParent {
                    challenge: id(),
                    section: section.id.clone(),
                    parent: parent.clone(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::challenge::{Difficulty, Language, Section};

    fn section(id: &str, start: u32, end: u32, is_bug: bool) -> Section {
        Section {
            id: id.to_string(),
            start_line: start,
            end_line: end,
            is_bug,
            parent_id: None,
        }
    }

    fn challenge(sections: Vec<Section>) -> Challenge {
        Challenge {
            id: "c1".to_string(),
            title: "Test".to_string(),
            description: None,
            language: Language::Go,
            code: "a\nb\nc\nd".to_string(),
            sections,
            explanation: String::new(),
            time_limit: 60,
            difficulty: Difficulty::Junior,
        }
    }

    #[test]
    fn test_valid_challenge_passes() {
        let c = challenge(vec![section("a", 1, 2, true), section("b", 2, 4, false)]);
        assert!(validate_challenge(&c).is_ok());
    }

    #[test]
    fn test_zero_time_limit_rejected() {
        let mut c = challenge(vec![section("a", 1, 1, true)]);
        c.time_limit = 0;
        assert!(matches!(
            validate_challenge(&c),
            Err(CatalogError::ZeroTimeLimit { .. })
        ));
    }

    #[test]
    fn test_empty_sections_rejected() {
        let c = challenge(Vec::new());
        assert!(matches!(
            validate_challenge(&c),
            Err(CatalogError::NoSections { .. })
        ));
    }

    #[test]
    fn test_challenge_without_bugs_rejected() {
        let c = challenge(vec![section("a", 1, 1, false)]);
        assert!(matches!(validate_challenge(&c), Err(CatalogError::NoBugs { .. })));
    }

    #[test]
    fn test_duplicate_section_id_rejected() {
        let c = challenge(vec![section("a", 1, 1, true), section("a", 2, 2, false)]);
        assert!(matches!(
            validate_challenge(&c),
            Err(CatalogError::DuplicateSection { ref section, .. }) if section == "a"
        ));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let c = challenge(vec![section("a", 3, 2, true)]);
        assert!(matches!(
            validate_challenge(&c),
            Err(CatalogError::InvalidRange { start: 3, end: 2, .. })
        ));
    }

    #[test]
    fn test_zero_start_line_rejected() {
        let c = challenge(vec![section("a", 0, 1, true)]);
        assert!(matches!(
            validate_challenge(&c),
            Err(CatalogError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_range_past_end_of_code_rejected() {
        let c = challenge(vec![section("a", 3, 9, true)]);
        assert!(matches!(
            validate_challenge(&c),
            Err(CatalogError::OutOfRange { end: 9, lines: 4, .. })
        ));
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let mut child = section("b", 2, 2, false);
        child.parent_id = Some("missing".to_string());
        let c = challenge(vec![section("a", 1, 3, true), child]);
        assert!(matches!(
            validate_challenge(&c),
            Err(CatalogError::UnknownParent { .. })
        ));
    }

    #[test]
    fn test_known_parent_accepted() {
        let mut child = section("b", 2, 2, false);
        child.parent_id = Some("a".to_string());
        let c = challenge(vec![section("a", 1, 3, true), child]);
        assert!(validate_challenge(&c).is_ok());
    }
}
