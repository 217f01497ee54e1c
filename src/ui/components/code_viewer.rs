use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Widget};

use crate::catalog::challenge::{Challenge, Section};
use crate::engine::geometry::{Geometry, paint_order};
use crate::engine::review::{SectionStatus, section_status};
use crate::session::selection::SelectionTracker;
use crate::ui::theme::Theme;

const BADGE_WIDTH: u16 = 5;
const TAB: &str = "    ";

#[derive(Clone, Copy, Debug)]
pub enum ViewerMode<'a> {
    /// Playing: selected regions are shaded and numbered.
    Select { focused: Option<&'a str> },
    /// Result: every section shows its review status.
    Review,
}

/// Code listing with the section overlay drawn on top. Row `y` of the
/// content is the same `y` the geometry mapper and hit test use.
pub struct CodeViewer<'a> {
    challenge: &'a Challenge,
    selection: &'a SelectionTracker,
    mode: ViewerMode<'a>,
    geometry: Geometry,
    scroll: u32,
    theme: &'a Theme,
}

impl<'a> CodeViewer<'a> {
    pub fn new(
        challenge: &'a Challenge,
        selection: &'a SelectionTracker,
        mode: ViewerMode<'a>,
        geometry: Geometry,
        theme: &'a Theme,
    ) -> Self {
        Self {
            challenge,
            selection,
            mode,
            geometry,
            scroll: 0,
            theme,
        }
    }

    pub fn scroll(mut self, scroll: u32) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn content_area(area: Rect) -> Rect {
        Block::bordered().inner(area)
    }

    /// Sections whose region covers `y`, bottom-most first.
    fn covering(&self, y: u32) -> Vec<&'a Section> {
        paint_order(&self.challenge.sections)
            .into_iter()
            .filter(|s| self.geometry.region(s).contains(y))
            .collect()
    }

    fn status(&self, section: &Section) -> SectionStatus {
        section_status(section, self.selection.as_slice())
    }

    fn row_style(&self, y: u32) -> Style {
        let colors = &self.theme.colors;
        let mut style = Style::default().fg(colors.fg());
        for section in self.covering(y) {
            match self.mode {
                ViewerMode::Select { .. } => {
                    if self.selection.contains(&section.id) {
                        style = style.bg(colors.selected_bg());
                    }
                }
                ViewerMode::Review => match self.status(section) {
                    SectionStatus::Found => style = style.fg(colors.found()),
                    SectionStatus::Missed => style = style.fg(colors.missed()),
                    SectionStatus::FalsePositive => style = style.fg(colors.false_positive()),
                    SectionStatus::Neutral => {}
                },
            }
        }
        if let ViewerMode::Select { focused: Some(id) } = self.mode {
            let focused_here = self.covering(y).iter().any(|s| s.id == id);
            if focused_here && !self.selection.contains(id) {
                style = style.bg(colors.focus_bg());
            }
        }
        style
    }

    /// Marker shown in the gutter on the first row of a region.
    fn badge(&self, y: u32) -> Option<(String, Style)> {
        let colors = &self.theme.colors;
        let starting: Vec<&Section> = self
            .covering(y)
            .into_iter()
            .filter(|s| self.geometry.region(s).top == y)
            .collect();

        starting.iter().rev().find_map(|section| match self.mode {
            ViewerMode::Select { .. } => self.selection.ordinal(&section.id).map(|n| {
                (
                    format!("[{n}]"),
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                )
            }),
            ViewerMode::Review => {
                let (glyph, color) = match self.status(section) {
                    SectionStatus::Found => ("\u{2713}", colors.found()), // ✓
                    SectionStatus::Missed => ("\u{2717}", colors.missed()), // ✗
                    SectionStatus::FalsePositive => ("!", colors.false_positive()),
                    SectionStatus::Neutral => return None,
                };
                Some((
                    format!(" {glyph}"),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ))
            }
        })
    }

    fn is_focused_row(&self, y: u32) -> bool {
        match self.mode {
            ViewerMode::Select { focused: Some(id) } => self
                .challenge
                .section(id)
                .is_some_and(|s| self.geometry.region(s).contains(y)),
            _ => false,
        }
    }
}

impl Widget for CodeViewer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.challenge.language))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let lines: Vec<&str> = self.challenge.code.lines().collect();
        let number_width = lines.len().to_string().len() as u16;
        let gutter = BADGE_WIDTH + number_width + 3;
        let line_height = self.geometry.line_height;
        let total_rows = lines.len() as u32 * line_height;

        for row in 0..inner.height {
            let y = self.scroll + u32::from(row);
            if y >= total_rows {
                break;
            }
            let screen_y = inner.y + row;
            let row_rect = Rect::new(inner.x, screen_y, inner.width, 1);
            let style = self.row_style(y);
            buf.set_style(row_rect, Style::default().bg(colors.bg()).patch(style));

            if self.is_focused_row(y) {
                buf.set_string(
                    inner.x,
                    screen_y,
                    "\u{258c}", // ▌
                    Style::default().fg(colors.accent()),
                );
            }

            if let Some((badge, badge_style)) = self.badge(y) {
                buf.set_stringn(inner.x + 1, screen_y, &badge, BADGE_WIDTH as usize - 1, badge_style);
            }

            if y % line_height != 0 {
                continue;
            }
            let idx = (y / line_height) as usize;
            let number = format!("{:>width$} \u{2502} ", idx + 1, width = number_width as usize);
            buf.set_string(
                inner.x + BADGE_WIDTH,
                screen_y,
                &number,
                Style::default().fg(colors.line_number()),
            );

            if inner.width > gutter {
                let text = lines[idx].replace('\t', TAB);
                buf.set_stringn(
                    inner.x + gutter,
                    screen_y,
                    &text,
                    (inner.width - gutter) as usize,
                    style,
                );
            }
        }
    }
}
