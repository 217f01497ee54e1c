use std::rc::Rc;

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::catalog::challenge::Challenge;
use crate::engine::review::GameResult;
use crate::ui::theme::Theme;

pub struct ResultScreen<'a> {
    pub result: &'a GameResult,
    pub challenge: &'a Challenge,
    pub theme: &'a Theme,
    /// First explanation line shown; clamped to the wrapped text on render.
    pub scroll: u16,
}

impl<'a> ResultScreen<'a> {
    pub fn new(result: &'a GameResult, challenge: &'a Challenge, theme: &'a Theme) -> Self {
        Self {
            result,
            challenge,
            theme,
            scroll: 0,
        }
    }

    pub fn scroll(mut self, scroll: u16) -> Self {
        self.scroll = scroll;
        self
    }

    fn regions(area: Rect) -> Rc<[Rect]> {
        let inner = Block::bordered().inner(area);
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
            ])
            .split(inner)
    }

    fn explanation_area(area: Rect) -> Rect {
        Block::bordered().inner(Self::regions(area)[3])
    }

    fn explanation_lines(&self, width: u16) -> Vec<String> {
        wrap_text(&self.challenge.explanation, width as usize)
    }

    /// Largest useful scroll offset when drawn into `area`.
    pub fn max_scroll(&self, area: Rect) -> u16 {
        let inner = Self::explanation_area(area);
        let total = self.explanation_lines(inner.width).len();
        u16::try_from(total.saturating_sub(inner.height as usize)).unwrap_or(u16::MAX)
    }
}

/// Greedy word wrap that keeps the text's own line breaks and blank lines.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for line in text.lines() {
        if width == 0 || line.trim().is_empty() {
            out.push(line.trim().to_string());
            continue;
        }
        let mut current = String::new();
        for word in line.split_whitespace() {
            if current.is_empty() {
                current = word.to_string();
            } else if current.chars().count() + 1 + word.chars().count() <= width {
                current.push(' ');
                current.push_str(word);
            } else {
                out.push(current);
                current = word.to_string();
            }
        }
        if !current.is_empty() {
            out.push(current);
        }
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out
}

pub fn headline(result: &GameResult) -> &'static str {
    if result.timed_out {
        "Time's Up"
    } else if result.correct {
        "Perfect!"
    } else {
        "Not Quite"
    }
}

pub fn summary(result: &GameResult) -> String {
    if result.correct {
        return format!("All bugs found in {}s", result.time_spent);
    }
    let mut parts = Vec::new();
    if !result.missed_bugs.is_empty() {
        parts.push(format!("Missed {} bug(s)", result.missed_bugs.len()));
    }
    if !result.false_positives.is_empty() {
        parts.push(format!("{} false positive(s)", result.false_positives.len()));
    }
    if parts.is_empty() && result.timed_out {
        parts.push("Submit before the clock runs out".to_string());
    }
    parts.join(", ")
}

impl Widget for ResultScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Review Results ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        block.render(area, buf);
        let layout = Self::regions(area);

        let verdict_color = if self.result.correct {
            colors.success()
        } else {
            colors.error()
        };
        let heading = Paragraph::new(vec![
            Line::from(Span::styled(
                headline(self.result),
                Style::default()
                    .fg(verdict_color)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                summary(self.result),
                Style::default().fg(verdict_color),
            )),
            Line::from(Span::styled(
                format!("+{} points", self.result.points),
                Style::default().fg(colors.text_dim()),
            )),
        ])
        .alignment(Alignment::Center);
        heading.render(layout[0], buf);

        let mut detail_lines = Vec::new();
        if !self.result.missed_bugs.is_empty() {
            detail_lines.push(Line::from(vec![
                Span::styled("  Missed:          ", Style::default().fg(colors.fg())),
                Span::styled(
                    self.result.missed_bugs.join(", "),
                    Style::default().fg(colors.missed()),
                ),
            ]));
        }
        if !self.result.false_positives.is_empty() {
            detail_lines.push(Line::from(vec![
                Span::styled("  False positives: ", Style::default().fg(colors.fg())),
                Span::styled(
                    self.result.false_positives.join(", "),
                    Style::default().fg(colors.false_positive()),
                ),
            ]));
        }
        Paragraph::new(detail_lines).render(layout[1], buf);

        let title = Line::from(vec![
            Span::styled(
                format!("  {}", self.challenge.title),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({})", self.challenge.difficulty),
                Style::default().fg(colors.text_dim()),
            ),
        ]);
        Paragraph::new(title).render(layout[2], buf);

        let text_area = Self::explanation_area(area);
        let lines: Vec<Line> = self
            .explanation_lines(text_area.width)
            .into_iter()
            .map(Line::from)
            .collect();
        let max_scroll = self.max_scroll(area);
        let scroll = self.scroll.min(max_scroll);
        let title = if max_scroll > 0 {
            " Explanation [j/k] "
        } else {
            " Explanation "
        };
        let explanation = Paragraph::new(lines)
            .style(Style::default().fg(colors.fg()))
            .block(
                Block::bordered()
                    .title(title)
                    .border_style(Style::default().fg(colors.border())),
            )
            .scroll((scroll, 0));
        explanation.render(layout[3], buf);
    }
}
