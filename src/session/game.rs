use std::rc::Rc;

use tracing::debug;

use crate::catalog::challenge::Challenge;
use crate::engine::review::{self, GameResult};
use crate::session::selection::SelectionTracker;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GameState {
    #[default]
    Idle,
    Playing,
    Result,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing; nothing changed.
    Ignored,
    Counted,
    /// Tick arrived with no time left; the session is now in `Result`.
    Expired,
}

/// Read-only view handed to the renderer.
#[derive(Clone, Copy, Debug)]
pub struct SessionSnapshot<'a> {
    pub current_challenge: Option<&'a Challenge>,
    pub selection: &'a SelectionTracker,
    pub timer: u32,
    pub score: u32,
    pub state: GameState,
    pub hints_used: u32,
}

/// One game instance. Owned by whoever drives the UI loop; every mutation
/// goes through the methods below and applies completely or not at all.
#[derive(Debug, Default)]
pub struct GameSession {
    current: Option<Rc<Challenge>>,
    selection: SelectionTracker,
    timer: u32,
    score: u32,
    state: GameState,
    hints_used: u32,
    celebrate: bool,
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        SessionSnapshot {
            current_challenge: self.current.as_deref(),
            selection: &self.selection,
            timer: self.timer,
            score: self.score,
            state: self.state,
            hints_used: self.hints_used,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }

    pub fn hints_used(&self) -> u32 {
        self.hints_used
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    pub fn current_challenge(&self) -> Option<&Rc<Challenge>> {
        self.current.as_ref()
    }

    /// Valid from any state.
    pub fn start_challenge(&mut self, challenge: Rc<Challenge>) {
        debug!(target: "session", id = %challenge.id, time_limit = challenge.time_limit, "Starting challenge");
        self.timer = challenge.time_limit;
        self.current = Some(challenge);
        self.selection.clear();
        self.hints_used = 0;
        self.celebrate = false;
        self.state = GameState::Playing;
    }

    pub fn next_challenge(&mut self, challenge: Rc<Challenge>) {
        self.start_challenge(challenge);
    }

    /// Restart the current challenge. Returns false when there is none.
    pub fn retry(&mut self) -> bool {
        match self.current.clone() {
            Some(challenge) => {
                self.start_challenge(challenge);
                true
            }
            None => false,
        }
    }

    /// Ignored outside `Playing`.
    pub fn toggle_section(&mut self, section_id: &str) {
        if self.state != GameState::Playing {
            return;
        }
        let selected = self.selection.toggle(section_id);
        debug!(target: "session", section = section_id, selected, "Toggled section");
    }

    /// Advance the countdown by one second. The tick that finds the timer
    /// already at zero ends the attempt without evaluating it.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != GameState::Playing {
            return TickOutcome::Ignored;
        }
        if self.timer == 0 {
            debug!(target: "session", "Timer expired");
            self.state = GameState::Result;
            return TickOutcome::Expired;
        }
        self.timer -= 1;
        TickOutcome::Counted
    }

    pub fn submit_review(&mut self) -> GameResult {
        let Some(ref challenge) = self.current else {
            return GameResult::neutral();
        };

        let result = review::evaluate(challenge, self.selection.as_slice(), self.timer);
        if result.correct {
            self.score += result.points;
            self.celebrate = true;
        }
        self.state = GameState::Result;
        debug!(
            target: "session",
            id = %challenge.id,
            correct = result.correct,
            points = result.points,
            score = self.score,
            "Review submitted"
        );
        result
    }

    /// Result for an attempt that ran out of time: the selection at expiry is
    /// evaluated for display, marked timed out, and never scores. `None` if
    /// the session did not just expire.
    pub fn expire(&mut self) -> Option<GameResult> {
        if self.state != GameState::Result || self.timer != 0 {
            return None;
        }
        let challenge = self.current.as_ref()?;
        let mut result = review::evaluate(challenge, self.selection.as_slice(), 0);
        result.correct = false;
        result.points = 0;
        result.timed_out = true;
        Some(result)
    }

    pub fn reset_game(&mut self) {
        debug!(target: "session", score = self.score, "Resetting game");
        self.current = None;
        self.selection.clear();
        self.timer = 0;
        self.score = 0;
        self.hints_used = 0;
        self.celebrate = false;
        self.state = GameState::Idle;
    }

    /// Bypasses all transition guards.
    pub fn set_game_state(&mut self, state: GameState) {
        self.state = state;
    }

    /// True once after a correct submission.
    pub fn take_celebration(&mut self) -> bool {
        std::mem::take(&mut self.celebrate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::challenge::{Difficulty, Language, Section};

    fn section(id: &str, line: u32, is_bug: bool) -> Section {
        Section {
            id: id.to_string(),
            start_line: line,
            end_line: line,
            is_bug,
            parent_id: None,
        }
    }

    fn challenge(time_limit: u32) -> Rc<Challenge> {
        Rc::new(Challenge {
            id: "session-test".to_string(),
            title: "Session".to_string(),
            description: Some("unit".to_string()),
            language: Language::Typescript,
            code: "a\nb\nc".to_string(),
            sections: vec![section("A", 1, true), section("B", 2, true), section("C", 3, false)],
            explanation: "x".to_string(),
            time_limit,
            difficulty: Difficulty::Junior,
        })
    }

    #[test]
    fn test_new_session_is_idle() {
        let s = GameSession::new();
        let snap = s.snapshot();
        assert_eq!(snap.state, GameState::Idle);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.timer, 0);
        assert!(snap.current_challenge.is_none());
    }

    #[test]
    fn test_start_sets_playing_state() {
        let mut s = GameSession::new();
        s.start_challenge(challenge(90));
        let snap = s.snapshot();
        assert_eq!(snap.state, GameState::Playing);
        assert_eq!(snap.timer, 90);
        assert!(snap.selection.is_empty());
        assert_eq!(snap.hints_used, 0);
    }

    #[test]
    fn test_toggle_ignored_outside_playing() {
        let mut s = GameSession::new();
        s.toggle_section("A");
        assert!(s.selection().is_empty());

        s.start_challenge(challenge(30));
        s.submit_review();
        s.toggle_section("A");
        assert!(s.selection().is_empty());
    }

    #[test]
    fn test_tick_boundary() {
        let mut s = GameSession::new();
        s.start_challenge(challenge(5));
        assert_eq!(s.tick(), TickOutcome::Counted);
        assert_eq!(s.timer(), 4);
        for _ in 0..4 {
            assert_eq!(s.tick(), TickOutcome::Counted);
        }
        assert_eq!(s.timer(), 0);
        assert_eq!(s.state(), GameState::Playing);
        assert_eq!(s.tick(), TickOutcome::Expired);
        assert_eq!(s.state(), GameState::Result);
        assert_eq!(s.tick(), TickOutcome::Ignored);
    }

    #[test]
    fn test_tick_ignored_when_idle() {
        let mut s = GameSession::new();
        assert_eq!(s.tick(), TickOutcome::Ignored);
        assert_eq!(s.state(), GameState::Idle);
    }

    #[test]
    fn test_correct_submit_scores_and_celebrates() {
        let mut s = GameSession::new();
        s.start_challenge(challenge(100));
        for _ in 0..20 {
            s.tick();
        }
        s.toggle_section("B");
        s.toggle_section("A");
        let r = s.submit_review();
        assert!(r.correct);
        assert_eq!(r.time_spent, 20);
        // 100 + floor(80/100 * 50)
        assert_eq!(s.score(), 140);
        assert_eq!(s.state(), GameState::Result);
        assert!(s.take_celebration());
        assert!(!s.take_celebration());
    }

    #[test]
    fn test_incorrect_submit_keeps_score() {
        let mut s = GameSession::new();
        s.start_challenge(challenge(100));
        s.toggle_section("A");
        s.toggle_section("C");
        let r = s.submit_review();
        assert!(!r.correct);
        assert_eq!(r.missed_bugs, vec!["B".to_string()]);
        assert_eq!(r.false_positives, vec!["C".to_string()]);
        assert_eq!(s.score(), 0);
        assert!(!s.take_celebration());
    }

    #[test]
    fn test_submit_without_challenge_is_neutral() {
        let mut s = GameSession::new();
        let r = s.submit_review();
        assert_eq!(r, GameResult::neutral());
        assert_eq!(s.state(), GameState::Idle);
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn test_score_accumulates_across_challenges() {
        let mut s = GameSession::new();
        for _ in 0..3 {
            s.next_challenge(challenge(50));
            s.toggle_section("A");
            s.toggle_section("B");
            s.submit_review();
        }
        assert_eq!(s.score(), 450);
    }

    #[test]
    fn test_retry_restarts_current() {
        let mut s = GameSession::new();
        assert!(!s.retry());
        s.start_challenge(challenge(40));
        s.tick();
        s.toggle_section("C");
        s.submit_review();
        assert!(s.retry());
        assert_eq!(s.state(), GameState::Playing);
        assert_eq!(s.timer(), 40);
        assert!(s.selection().is_empty());
    }

    #[test]
    fn test_expire_evaluates_without_scoring() {
        let mut s = GameSession::new();
        s.start_challenge(challenge(1));
        s.toggle_section("A");
        s.toggle_section("B");
        assert_eq!(s.expire(), None);
        s.tick();
        assert_eq!(s.tick(), TickOutcome::Expired);
        let r = s.expire().unwrap();
        assert!(r.timed_out);
        assert!(!r.correct);
        assert_eq!(r.points, 0);
        assert_eq!(r.time_spent, 1);
        assert_eq!(s.score(), 0);
        assert!(!s.take_celebration());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut s = GameSession::new();
        s.start_challenge(challenge(10));
        s.toggle_section("A");
        s.toggle_section("B");
        s.submit_review();
        assert!(s.score() > 0);
        s.reset_game();
        let snap = s.snapshot();
        assert_eq!(snap.score, 0);
        assert_eq!(snap.state, GameState::Idle);
        assert!(snap.current_challenge.is_none());
        assert!(snap.selection.is_empty());
        assert_eq!(snap.timer, 0);
    }

    #[test]
    fn test_set_game_state_bypasses_guards() {
        let mut s = GameSession::new();
        s.set_game_state(GameState::Playing);
        assert_eq!(s.state(), GameState::Playing);
        assert_eq!(s.tick(), TickOutcome::Expired);
    }
}
