use std::fs;
use std::rc::Rc;

use pocketpr::catalog::Catalog;
use pocketpr::catalog::challenge::{Challenge, Difficulty, Language, Section};
use pocketpr::session::{GameSession, GameState, TickOutcome};

fn section(id: &str, start: u32, end: u32, is_bug: bool) -> Section {
    Section {
        id: id.to_string(),
        start_line: start,
        end_line: end,
        is_bug,
        parent_id: None,
    }
}

fn two_bug_challenge() -> Rc<Challenge> {
    Rc::new(Challenge {
        id: "flow-001".to_string(),
        title: "Flow".to_string(),
        description: Some("Two bugs, one decoy".to_string()),
        language: Language::Python,
        code: "a = 1\nb = 2\nc = 3\nd = 4".to_string(),
        sections: vec![
            section("B1", 1, 1, true),
            section("B2", 2, 3, true),
            section("N1", 4, 4, false),
        ],
        explanation: "Both assignments are wrong.".to_string(),
        time_limit: 120,
        difficulty: Difficulty::Junior,
    })
}

#[test]
fn test_full_round_scores_time_bonus() {
    let mut session = GameSession::new();
    session.start_challenge(two_bug_challenge());
    assert_eq!(session.state(), GameState::Playing);
    assert_eq!(session.timer(), 120);
    assert!(session.selection().is_empty());

    for _ in 0..10 {
        assert_eq!(session.tick(), TickOutcome::Counted);
    }
    session.toggle_section("B1");
    session.toggle_section("B2");
    let result = session.submit_review();

    assert!(result.correct);
    assert_eq!(result.time_spent, 10);
    assert_eq!(result.points, 145);
    assert_eq!(session.score(), 145);
    assert_eq!(session.state(), GameState::Result);
    assert!(session.take_celebration());
}

#[test]
fn test_partial_selection_reports_missed_bug() {
    let mut session = GameSession::new();
    session.start_challenge(two_bug_challenge());
    for _ in 0..10 {
        session.tick();
    }
    session.toggle_section("B1");
    let result = session.submit_review();

    assert!(!result.correct);
    assert_eq!(result.missed_bugs, vec!["B2".to_string()]);
    assert_eq!(result.time_spent, 10);
    assert_eq!(session.score(), 0);
    assert!(!session.take_celebration());
}

#[test]
fn test_timeout_then_reset() {
    let mut session = GameSession::new();
    session.start_challenge(two_bug_challenge());
    session.toggle_section("N1");
    for _ in 0..120 {
        session.tick();
    }
    assert_eq!(session.timer(), 0);
    assert_eq!(session.state(), GameState::Playing);
    assert_eq!(session.tick(), TickOutcome::Expired);
    assert_eq!(session.state(), GameState::Result);

    let result = session.expire().unwrap();
    assert!(result.timed_out);
    assert_eq!(result.false_positives, vec!["N1".to_string()]);
    assert_eq!(result.points, 0);

    session.reset_game();
    assert_eq!(session.state(), GameState::Idle);
    assert_eq!(session.score(), 0);
    assert!(session.current_challenge().is_none());
}

#[test]
fn test_scores_accumulate_across_challenges() {
    let catalog = Catalog::bundled().unwrap();
    let mut session = GameSession::new();

    session.start_challenge(catalog.get("py-mutable-001").unwrap());
    session.toggle_section("mutable-default");
    let first = session.submit_review();
    assert_eq!(first.points, 150);

    session.next_challenge(two_bug_challenge());
    assert_eq!(session.score(), 150);
    assert!(session.selection().is_empty());
    session.toggle_section("B1");
    session.toggle_section("B2");
    let second = session.submit_review();
    assert_eq!(session.score(), 150 + second.points);
}

#[test]
fn test_user_directory_merges_valid_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("rust-lock.toml"),
        r#"
id = "user-go-001"
title = "Forgotten unlock"
language = "go"
difficulty = "SENIOR"
time_limit = 60
code = '''
mu.Lock()
if done {
    return
}
mu.Unlock()
'''
explanation = "The early return leaves the mutex locked."

[[sections]]
id = "early-return"
start_line = 2
end_line = 4
is_bug = true

[[sections]]
id = "unlock"
start_line = 5
end_line = 5
"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("user-js.json"),
        r#"{
  "id": "user-js-001",
  "title": "Loose equality",
  "language": "javascript",
  "difficulty": "JUNIOR",
  "time_limit": 45,
  "code": "if (a == null) {\n  return 0;\n}",
  "explanation": "== null also matches undefined.",
  "sections": [
    { "id": "loose-eq", "start_line": 1, "end_line": 1, "is_bug": true }
  ]
}"#,
    )
    .unwrap();
    fs::write(dir.path().join("broken.toml"), "id = \"half-written\"\n").unwrap();
    fs::write(dir.path().join("notes.txt"), "not a challenge").unwrap();

    let mut catalog = Catalog::bundled().unwrap();
    let before = catalog.len();
    let added = catalog.load_dir(dir.path());

    assert_eq!(added, 2);
    assert_eq!(catalog.len(), before + 2);
    let go = catalog.get("user-go-001").unwrap();
    assert_eq!(go.bug_count(), 1);
    assert!(catalog.get("half-written").is_none());
    assert_eq!(catalog.by_language(Language::Javascript).len(), 2);
}
