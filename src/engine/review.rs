use serde::{Deserialize, Serialize};

use crate::catalog::challenge::{Challenge, Section};
use crate::engine::scoring;

/// Verdict for one submission.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub correct: bool,
    pub missed_bugs: Vec<String>,
    pub false_positives: Vec<String>,
    pub time_spent: u32,
    /// Points this submission added to the session score.
    #[serde(default)]
    pub points: u32,
    /// Produced by the countdown running out rather than by a submit.
    #[serde(default)]
    pub timed_out: bool,
}

impl GameResult {
    /// Returned when there is nothing to review.
    pub fn neutral() -> Self {
        Self::default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionStatus {
    Found,
    Missed,
    FalsePositive,
    Neutral,
}

/// Compare the selection against the challenge's bug set. Pure: no score or
/// state is touched here.
pub fn evaluate(challenge: &Challenge, selected: &[String], timer: u32) -> GameResult {
    let bug_sections: Vec<&Section> = challenge.bug_sections().collect();
    let is_selected = |id: &str| selected.iter().any(|s| s == id);

    let correct_selections = bug_sections.iter().filter(|s| is_selected(&s.id)).count();
    let missed_bugs: Vec<String> = bug_sections
        .iter()
        .filter(|s| !is_selected(&s.id))
        .map(|s| s.id.clone())
        .collect();
    let false_positives: Vec<String> = selected
        .iter()
        .filter(|id| !bug_sections.iter().any(|s| &s.id == *id))
        .cloned()
        .collect();

    let correct =
        correct_selections == bug_sections.len() && selected.len() == bug_sections.len();

    let points = if correct {
        scoring::points_for_correct(timer, challenge.time_limit)
    } else {
        0
    };

    GameResult {
        correct,
        missed_bugs,
        false_positives,
        time_spent: challenge.time_limit.saturating_sub(timer),
        points,
        timed_out: false,
    }
}

pub fn section_status(section: &Section, selected: &[String]) -> SectionStatus {
    let picked = selected.iter().any(|id| *id == section.id);
    match (section.is_bug, picked) {
        (true, true) => SectionStatus::Found,
        (true, false) => SectionStatus::Missed,
        (false, true) => SectionStatus::FalsePositive,
        (false, false) => SectionStatus::Neutral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::challenge::{Difficulty, Language};

    fn section(id: &str, line: u32, is_bug: bool) -> Section {
        Section {
            id: id.to_string(),
            start_line: line,
            end_line: line,
            is_bug,
            parent_id: None,
        }
    }

    fn challenge() -> Challenge {
        Challenge {
            id: "eval".to_string(),
            title: "Eval".to_string(),
            description: None,
            language: Language::Python,
            code: "a\nb\nc\nd".to_string(),
            sections: vec![
                section("A", 1, true),
                section("B", 2, true),
                section("C", 3, false),
                section("D", 4, false),
            ],
            explanation: String::new(),
            time_limit: 100,
            difficulty: Difficulty::Senior,
        }
    }

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_selection_is_correct_in_any_order() {
        for sel in [ids(&["A", "B"]), ids(&["B", "A"])] {
            let r = evaluate(&challenge(), &sel, 40);
            assert!(r.correct);
            assert!(r.missed_bugs.is_empty());
            assert!(r.false_positives.is_empty());
            assert_eq!(r.time_spent, 60);
            assert_eq!(r.points, 120);
        }
    }

    #[test]
    fn test_partial_selection_reports_missed() {
        let r = evaluate(&challenge(), &ids(&["A"]), 40);
        assert!(!r.correct);
        assert_eq!(r.missed_bugs, ids(&["B"]));
        assert!(r.false_positives.is_empty());
        assert_eq!(r.points, 0);
    }

    #[test]
    fn test_extra_selection_reports_false_positive() {
        let r = evaluate(&challenge(), &ids(&["A", "B", "C"]), 40);
        assert!(!r.correct);
        assert!(r.missed_bugs.is_empty());
        assert_eq!(r.false_positives, ids(&["C"]));
    }

    #[test]
    fn test_false_positives_keep_selection_order() {
        let r = evaluate(&challenge(), &ids(&["D", "A", "C"]), 0);
        assert_eq!(r.false_positives, ids(&["D", "C"]));
        assert_eq!(r.missed_bugs, ids(&["B"]));
    }

    #[test]
    fn test_empty_selection_misses_everything() {
        let r = evaluate(&challenge(), &[], 100);
        assert!(!r.correct);
        assert_eq!(r.missed_bugs, ids(&["A", "B"]));
        assert_eq!(r.time_spent, 0);
    }

    #[test]
    fn test_unknown_id_counts_as_false_positive() {
        let r = evaluate(&challenge(), &ids(&["A", "B", "zzz"]), 10);
        assert!(!r.correct);
        assert_eq!(r.false_positives, ids(&["zzz"]));
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let sel = ids(&["B", "C"]);
        assert_eq!(evaluate(&challenge(), &sel, 7), evaluate(&challenge(), &sel, 7));
    }

    #[test]
    fn test_section_status_classification() {
        let c = challenge();
        let sel = ids(&["A", "C"]);
        let statuses: Vec<SectionStatus> =
            c.sections.iter().map(|s| section_status(s, &sel)).collect();
        assert_eq!(
            statuses,
            vec![
                SectionStatus::Found,
                SectionStatus::Missed,
                SectionStatus::FalsePositive,
                SectionStatus::Neutral,
            ]
        );
    }

    #[test]
    fn test_neutral_result() {
        let r = GameResult::neutral();
        assert!(!r.correct);
        assert!(r.missed_bugs.is_empty());
        assert!(r.false_positives.is_empty());
        assert_eq!(r.time_spent, 0);
        assert_eq!(r.points, 0);
    }
}
