use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

use crate::catalog::challenge::Difficulty;
use crate::ui::theme::ThemeColors;

pub fn difficulty_color(difficulty: Difficulty, colors: &ThemeColors) -> Color {
    match difficulty {
        Difficulty::Junior => colors.success(),
        Difficulty::Senior => colors.warning(),
        Difficulty::Expert => colors.error(),
    }
}

/// Header spans: score, then the difficulty badge when a challenge is active.
pub fn scoreboard_spans(
    score: u32,
    difficulty: Option<Difficulty>,
    colors: &ThemeColors,
) -> Vec<Span<'static>> {
    let mut spans = vec![
        Span::styled(
            " Score ",
            Style::default().fg(colors.text_dim()).bg(colors.header_bg()),
        ),
        Span::styled(
            format!("{score} "),
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(d) = difficulty {
        spans.push(Span::styled(
            format!(" {d} "),
            Style::default()
                .fg(colors.bg())
                .bg(difficulty_color(d, colors))
                .add_modifier(Modifier::BOLD),
        ));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spans_without_difficulty() {
        let colors = ThemeColors::default();
        let spans = scoreboard_spans(145, None, &colors);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[1].content, "145 ");
    }

    #[test]
    fn test_spans_with_difficulty_badge() {
        let colors = ThemeColors::default();
        let spans = scoreboard_spans(0, Some(Difficulty::Expert), &colors);
        assert_eq!(spans[2].content, " EXPERT ");
        assert_eq!(spans[2].style.bg, Some(colors.error()));
    }
}
