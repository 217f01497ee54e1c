use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::SmallRng;
use ratatui::layout::Rect;
use tracing::{info, warn};

use crate::catalog::challenge::{Challenge, Difficulty, Language, Section};
use crate::catalog::{Catalog, ChallengeFilter};
use crate::config::Config;
use crate::engine::geometry::Geometry;
use crate::engine::review::GameResult;
use crate::session::timer::Countdown;
use crate::session::{GameSession, GameState, TickOutcome};
use crate::ui::components::menu::Menu;
use crate::ui::theme::Theme;

const CELEBRATION: Duration = Duration::from_millis(1500);
const SESSION_TICK: Duration = Duration::from_secs(1);

pub struct App {
    pub session: GameSession,
    pub catalog: Catalog,
    pub filter: ChallengeFilter,
    pub countdown: Countdown,
    pub last_result: Option<GameResult>,
    /// Index into `nav_order()` of the keyboard-focused section.
    pub focused: usize,
    pub scroll: u32,
    /// Explanation offset on the result screen.
    pub explanation_scroll: u16,
    /// Last rendered limit for `explanation_scroll`.
    pub explanation_max: Cell<u16>,
    pub celebration_until: Option<Instant>,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub config: Config,
    pub geometry: Geometry,
    pub should_quit: bool,
    /// Where the code viewer's content was last drawn, for mouse hits.
    pub code_viewport: Cell<Rect>,
    rng: SmallRng,
}

impl App {
    pub fn new(config: Config, catalog: Catalog, theme: &'static Theme) -> Self {
        let filter = config.challenge_filter();
        let geometry = config.geometry();
        Self {
            session: GameSession::new(),
            catalog,
            filter,
            countdown: Countdown::new(SESSION_TICK),
            last_result: None,
            focused: 0,
            scroll: 0,
            explanation_scroll: 0,
            explanation_max: Cell::new(0),
            celebration_until: None,
            menu: Menu::new(theme),
            theme,
            config,
            geometry,
            should_quit: false,
            code_viewport: Cell::new(Rect::default()),
            rng: SmallRng::from_entropy(),
        }
    }

    #[allow(dead_code)] // Used by tests
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    fn pick_challenge(&mut self) -> Option<Rc<Challenge>> {
        if let Some(c) = self.catalog.random_challenge(&mut self.rng, &self.filter) {
            return Some(c);
        }
        warn!(target: "app", filter = ?self.filter, "No challenge matches filter; picking from full catalog");
        self.catalog
            .random_challenge(&mut self.rng, &ChallengeFilter::default())
    }

    fn begin_attempt(&mut self, now: Instant) {
        self.last_result = None;
        self.focused = 0;
        self.scroll = 0;
        self.explanation_scroll = 0;
        self.celebration_until = None;
        self.countdown.arm(now);
    }

    pub fn start_game(&mut self, now: Instant) {
        if let Some(challenge) = self.pick_challenge() {
            info!(target: "app", id = %challenge.id, "Start game");
            self.session.start_challenge(challenge);
            self.begin_attempt(now);
        }
    }

    pub fn next_challenge(&mut self, now: Instant) {
        if let Some(challenge) = self.pick_challenge() {
            info!(target: "app", id = %challenge.id, "Next challenge");
            self.session.next_challenge(challenge);
            self.begin_attempt(now);
        }
    }

    /// Only offered after a miss; a solved challenge moves on instead.
    pub fn retry(&mut self, now: Instant) {
        if self.last_result.as_ref().is_some_and(|r| r.correct) {
            return;
        }
        if self.session.retry() {
            self.begin_attempt(now);
        }
    }

    pub fn go_to_menu(&mut self) {
        self.countdown.disarm();
        self.session.reset_game();
        self.last_result = None;
        self.explanation_scroll = 0;
        self.celebration_until = None;
    }

    /// Submitting with nothing selected is not offered.
    pub fn submit(&mut self, now: Instant) {
        if self.session.state() != GameState::Playing || self.session.selection().is_empty() {
            return;
        }
        let result = self.session.submit_review();
        self.countdown.disarm();
        if self.session.take_celebration() {
            self.celebration_until = Some(now + CELEBRATION);
        }
        info!(target: "app", correct = result.correct, points = result.points, score = self.session.score(), "Review result");
        self.last_result = Some(result);
    }

    /// Feed elapsed whole seconds to the session.
    pub fn advance_clock(&mut self, now: Instant) {
        let due = self.countdown.due(now);
        for _ in 0..due {
            match self.session.tick() {
                TickOutcome::Counted => {}
                TickOutcome::Expired => {
                    self.countdown.disarm();
                    self.last_result = self.session.expire();
                    info!(target: "app", "Time is up");
                    break;
                }
                TickOutcome::Ignored => {
                    self.countdown.disarm();
                    break;
                }
            }
        }
        if self.celebration_until.is_some_and(|until| now >= until) {
            self.celebration_until = None;
        }
    }

    pub fn is_celebrating(&self, now: Instant) -> bool {
        self.celebration_until.is_some_and(|until| now < until)
    }

    /// Sections in keyboard navigation order: by first line, enclosing
    /// blocks before the sections nested in them.
    pub fn nav_order(&self) -> Vec<&Section> {
        let Some(challenge) = self.session.current_challenge() else {
            return Vec::new();
        };
        let mut sections: Vec<&Section> = challenge.sections.iter().collect();
        sections.sort_by_key(|s| (s.start_line, std::cmp::Reverse(s.end_line)));
        sections
    }

    pub fn focused_section_id(&self) -> Option<String> {
        self.nav_order().get(self.focused).map(|s| s.id.clone())
    }

    pub fn focus_next(&mut self) {
        let count = self.nav_order().len();
        if count > 0 {
            self.focused = (self.focused + 1) % count;
            self.scroll_to_focus();
        }
    }

    pub fn focus_prev(&mut self) {
        let count = self.nav_order().len();
        if count > 0 {
            self.focused = if self.focused == 0 { count - 1 } else { self.focused - 1 };
            self.scroll_to_focus();
        }
    }

    pub fn toggle_focused(&mut self) {
        if let Some(id) = self.focused_section_id() {
            self.session.toggle_section(&id);
        }
    }

    /// Toggle the section under a terminal cell, if the click landed in the
    /// code viewer.
    pub fn click(&mut self, column: u16, row: u16) {
        if self.session.state() != GameState::Playing {
            return;
        }
        let viewport = self.code_viewport.get();
        let inside = column >= viewport.x
            && column < viewport.x + viewport.width
            && row >= viewport.y
            && row < viewport.y + viewport.height;
        if !inside {
            return;
        }
        let y = self.scroll + u32::from(row - viewport.y);

        let hit = self.session.current_challenge().and_then(|c| {
            self.geometry
                .hit_test(&c.sections, y)
                .map(|id| id.to_string())
        });
        if let Some(id) = hit {
            let pos = self.nav_order().iter().position(|s| s.id == id);
            if let Some(pos) = pos {
                self.focused = pos;
            }
            self.session.toggle_section(&id);
        }
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let max = self.content_height().saturating_sub(self.viewport_height());
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
    }

    pub fn scroll_explanation(&mut self, delta: i32) {
        let max = i32::from(self.explanation_max.get());
        let next = (i32::from(self.explanation_scroll) + delta).clamp(0, max);
        self.explanation_scroll = u16::try_from(next).unwrap_or(0);
    }

    fn content_height(&self) -> u32 {
        self.session
            .current_challenge()
            .map(|c| c.line_count() as u32 * self.geometry.line_height)
            .unwrap_or(0)
    }

    fn viewport_height(&self) -> u32 {
        u32::from(self.code_viewport.get().height)
    }

    fn scroll_to_focus(&mut self) {
        let region = match self.nav_order().get(self.focused) {
            Some(section) => self.geometry.region(section),
            None => return,
        };
        let height = self.viewport_height();
        if height == 0 {
            return;
        }
        if region.top < self.scroll {
            self.scroll = region.top;
        } else if region.top >= self.scroll + height {
            self.scroll = region.top + 1 - height;
        }
    }

    pub fn cycle_difficulty(&mut self) {
        self.filter.difficulty = cycle(&Difficulty::ALL, self.filter.difficulty);
    }

    pub fn cycle_language(&mut self) {
        self.filter.language = cycle(&Language::ALL, self.filter.language);
    }
}

/// any -> first -> ... -> last -> any
fn cycle<T: Copy + PartialEq>(all: &[T], current: Option<T>) -> Option<T> {
    match current {
        None => all.first().copied(),
        Some(value) => {
            let idx = all.iter().position(|v| *v == value)?;
            all.get(idx + 1).copied()
        }
    }
}
