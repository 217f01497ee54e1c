use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Urgency {
    Calm,
    Warning,
    Urgent,
}

impl Urgency {
    pub fn from_remaining(secs: u32) -> Self {
        if secs < 10 {
            Urgency::Urgent
        } else if secs < 30 {
            Urgency::Warning
        } else {
            Urgency::Calm
        }
    }
}

/// `m:ss`
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Remaining-time bar that shifts color as the deadline approaches.
pub struct TimerBar<'a> {
    pub remaining: u32,
    pub limit: u32,
    pub theme: &'a Theme,
}

impl<'a> TimerBar<'a> {
    pub fn new(remaining: u32, limit: u32, theme: &'a Theme) -> Self {
        Self {
            remaining,
            limit,
            theme,
        }
    }

    fn ratio(&self) -> f64 {
        if self.limit == 0 {
            return 0.0;
        }
        (self.remaining as f64 / self.limit as f64).clamp(0.0, 1.0)
    }

    fn fill_color(&self) -> Color {
        let colors = &self.theme.colors;
        match Urgency::from_remaining(self.remaining) {
            Urgency::Calm => colors.accent(),
            Urgency::Warning => colors.warning(),
            Urgency::Urgent => colors.error(),
        }
    }
}

impl Widget for TimerBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Time ")
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled_width = (self.ratio() * inner.width as f64) as u16;
        let fill = self.fill_color();
        let label = format_clock(self.remaining);

        for x in inner.x..inner.x + inner.width {
            let style = if x < inner.x + filled_width {
                Style::default().fg(colors.bg()).bg(fill)
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, inner.y)].set_style(style);
        }

        let label_x = inner.x + (inner.width.saturating_sub(label.len() as u16)) / 2;
        buf.set_string(
            label_x,
            inner.y,
            &label,
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        );
    }
}
