use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::catalog::ChallengeFilter;
use crate::ui::theme::Theme;

pub struct MenuItem {
    pub key: String,
    pub label: String,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Start,
    CycleDifficulty,
    CycleLanguage,
    Quit,
}

const ACTIONS: [MenuAction; 4] = [
    MenuAction::Start,
    MenuAction::CycleDifficulty,
    MenuAction::CycleLanguage,
    MenuAction::Quit,
];

pub struct Menu<'a> {
    pub selected: usize,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { selected: 0, theme }
    }

    pub fn items(filter: &ChallengeFilter) -> Vec<MenuItem> {
        let difficulty = filter.difficulty.map_or("any", |d| d.as_str());
        let language = filter.language.map_or("any", |l| l.as_str());
        vec![
            MenuItem {
                key: "Enter".to_string(),
                label: "Start Game".to_string(),
                description: "Find the bugs before the clock runs out".to_string(),
            },
            MenuItem {
                key: "d".to_string(),
                label: format!("Difficulty: {difficulty}"),
                description: "Restrict challenges to one difficulty".to_string(),
            },
            MenuItem {
                key: "l".to_string(),
                label: format!("Language: {language}"),
                description: "Restrict challenges to one language".to_string(),
            },
            MenuItem {
                key: "q".to_string(),
                label: "Quit".to_string(),
                description: String::new(),
            },
        ]
    }

    pub fn action(&self) -> MenuAction {
        ACTIONS[self.selected.min(ACTIONS.len() - 1)]
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % ACTIONS.len();
    }

    pub fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = ACTIONS.len() - 1;
        }
    }
}

/// Idle screen: title, challenge count and the menu.
pub struct MenuView<'a> {
    pub menu: &'a Menu<'a>,
    pub filter: ChallengeFilter,
    pub challenge_count: usize,
}

impl Widget for MenuView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.menu.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "POCKET.PR",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Debug with your thumb.",
                Style::default().fg(colors.fg()),
            )),
            Line::from(Span::styled(
                format!("{} challenges available", self.challenge_count),
                Style::default().fg(colors.text_dim()),
            )),
            Line::from(""),
        ];

        let title = Paragraph::new(title_lines).alignment(Alignment::Center);
        title.render(layout[0], buf);

        let items = Menu::items(&self.filter);
        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(items.iter().map(|_| Constraint::Length(3)).collect::<Vec<_>>())
            .split(layout[2]);

        for (i, item) in items.iter().enumerate() {
            let is_selected = i == self.menu.selected;
            let indicator = if is_selected { ">" } else { " " };

            let label_text = format!(" {indicator} [{key}] {label}", key = item.key, label = item.label);
            let desc_text = format!("     {}", item.description);

            let lines = vec![
                Line::from(Span::styled(
                    &*label_text,
                    Style::default()
                        .fg(if is_selected { colors.accent() } else { colors.fg() })
                        .add_modifier(if is_selected {
                            Modifier::BOLD
                        } else {
                            Modifier::empty()
                        }),
                )),
                Line::from(Span::styled(
                    &*desc_text,
                    Style::default().fg(colors.text_dim()),
                )),
            ];

            let p = Paragraph::new(lines);
            if i < menu_layout.len() {
                p.render(menu_layout[i], buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::challenge::Difficulty;

    #[test]
    fn test_menu_wraps_both_ways() {
        let theme = Theme::default();
        let mut menu = Menu::new(&theme);
        menu.prev();
        assert_eq!(menu.action(), MenuAction::Quit);
        menu.next();
        assert_eq!(menu.action(), MenuAction::Start);
        menu.next();
        assert_eq!(menu.action(), MenuAction::CycleDifficulty);
    }

    #[test]
    fn test_items_show_filter() {
        let filter = ChallengeFilter {
            difficulty: Some(Difficulty::Senior),
            language: None,
        };
        let items = Menu::items(&filter);
        assert_eq!(items[1].label, "Difficulty: SENIOR");
        assert_eq!(items[2].label, "Language: any");
    }
}
