mod app;
mod catalog;
mod config;
mod engine;
mod event;
mod session;
mod telemetry;
mod ui;

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing::{info, warn};

use app::App;
use catalog::Catalog;
use catalog::challenge::{Difficulty, Language};
use config::Config;
use event::{AppEvent, EventHandler};
use session::GameState;
use ui::components::code_viewer::{CodeViewer, ViewerMode};
use ui::components::menu::{MenuAction, MenuView};
use ui::components::result_screen::ResultScreen;
use ui::components::scoreboard::scoreboard_spans;
use ui::components::timer_bar::TimerBar;
use ui::layout::{AppLayout, pack_hint_lines};
use ui::theme::Theme;

const SCROLL_STEP: i32 = 3;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Plain,
    Json,
}

#[derive(Parser)]
#[command(name = "pocketpr", version, about = "Spot the bug before the clock runs out")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Only pick challenges of this difficulty (junior, senior, expert)")]
    difficulty: Option<String>,

    #[arg(short, long, help = "Only pick challenges in this language (javascript, typescript, python, go)")]
    language: Option<String>,

    #[arg(short, long, help = "Extra directory of challenge files (.toml or .json)")]
    challenges: Option<PathBuf>,

    #[arg(long, help = "Print the challenge catalog and exit")]
    list: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Plain, help = "Log file format")]
    log_format: LogFormat,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(difficulty) = cli.difficulty {
        if Difficulty::from_key(&difficulty).is_none() {
            bail!("unknown difficulty '{difficulty}'");
        }
        config.difficulty = Some(difficulty);
    }
    if let Some(language) = cli.language {
        if Language::from_key(&language).is_none() {
            bail!("unknown language '{language}'");
        }
        config.language = Some(language);
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }

    telemetry::init_tracing(&config.log_level, matches!(cli.log_format, LogFormat::Json));

    let mut catalog = Catalog::bundled()?;
    load_user_challenges(&mut catalog, Path::new(&config.challenge_dir));
    if let Some(dir) = cli.challenges.as_deref() {
        if !dir.is_dir() {
            bail!("challenge directory '{}' does not exist", dir.display());
        }
        load_user_challenges(&mut catalog, dir);
    }

    if cli.list {
        print_catalog(&catalog);
        return Ok(());
    }

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        warn!(target: "app", theme = %config.theme, "Unknown theme, using default");
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));

    let tick_rate = Duration::from_millis(config.tick_rate_ms.max(10));
    let mut app = App::new(config, catalog, theme);
    info!(target: "app", challenges = app.catalog.len(), "Starting");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(tick_rate);

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn load_user_challenges(catalog: &mut Catalog, dir: &Path) {
    if !dir.is_dir() {
        return;
    }
    let added = catalog.load_dir(dir);
    info!(target: "catalog", dir = %dir.display(), added, "Loaded user challenges");
}

fn print_catalog(catalog: &Catalog) {
    for challenge in catalog.challenges() {
        println!(
            "{:<20} {:<7} {:<11} {:>4}s  {} bug(s)  {}",
            challenge.id,
            challenge.difficulty,
            challenge.language,
            challenge.time_limit,
            challenge.bug_count(),
            challenge.title,
        );
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
            AppEvent::Tick | AppEvent::Resize(_, _) => {}
        }
        app.advance_clock(Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.session.state() {
        GameState::Idle => handle_menu_key(app, key),
        GameState::Playing => handle_playing_key(app, key),
        GameState::Result => handle_result_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    let now = Instant::now();
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('d') => app.cycle_difficulty(),
        KeyCode::Char('l') => app.cycle_language(),
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => match app.menu.action() {
            MenuAction::Start => app.start_game(now),
            MenuAction::CycleDifficulty => app.cycle_difficulty(),
            MenuAction::CycleLanguage => app.cycle_language(),
            MenuAction::Quit => app.should_quit = true,
        },
        _ => {}
    }
}

fn handle_playing_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.go_to_menu(),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => app.focus_next(),
        KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => app.focus_prev(),
        KeyCode::Char(' ') | KeyCode::Char('x') => app.toggle_focused(),
        KeyCode::Enter | KeyCode::Char('s') => app.submit(Instant::now()),
        KeyCode::PageDown => app.scroll_by(SCROLL_STEP * 3),
        KeyCode::PageUp => app.scroll_by(-SCROLL_STEP * 3),
        _ => {}
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    let now = Instant::now();
    match key.code {
        KeyCode::Char('n') | KeyCode::Enter => app.next_challenge(now),
        KeyCode::Char('r') => app.retry(now),
        KeyCode::Char('q') | KeyCode::Esc => app.go_to_menu(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_explanation(1),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_explanation(-1),
        KeyCode::PageDown => app.scroll_explanation(SCROLL_STEP * 3),
        KeyCode::PageUp => app.scroll_explanation(-SCROLL_STEP * 3),
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => app.click(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.scroll_by(SCROLL_STEP),
        MouseEventKind::ScrollUp => app.scroll_by(-SCROLL_STEP),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.session.state() {
        GameState::Idle => render_menu(frame, app),
        GameState::Playing => render_playing(frame, app),
        GameState::Result => render_result(frame, app),
    }
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Paragraph::new(Line::from(
        scoreboard_spans(app.session.score(), None, colors),
    ))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout[0]);

    let menu_area = ui::layout::centered_rect(50, 80, layout[1]);
    let view = MenuView {
        menu: &app.menu,
        filter: app.filter,
        challenge_count: app.catalog.len(),
    };
    frame.render_widget(view, menu_area);

    let footer = Paragraph::new(Line::from(vec![Span::styled(
        " [Enter] Start  [d] Difficulty  [l] Language  [q] Quit ",
        Style::default().fg(colors.text_dim()),
    )]));
    frame.render_widget(footer, layout[2]);
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let snapshot = app.session.snapshot();
    let Some(challenge) = snapshot.current_challenge else {
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Percentage(40)])
        .split(area);

    let mut spans = scoreboard_spans(snapshot.score, Some(challenge.difficulty), colors);
    if app.is_celebrating(Instant::now()) {
        spans.push(Span::styled(
            "  \u{2713} BUG SQUASHED! ",
            Style::default()
                .fg(colors.success())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ));
    }
    let score = Paragraph::new(vec![Line::from(""), Line::from(spans)])
        .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(score, columns[0]);

    let timer = TimerBar::new(snapshot.timer, challenge.time_limit, app.theme);
    frame.render_widget(timer, columns[1]);
}

fn render_info(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let Some(challenge) = app.session.current_challenge() else {
        return;
    };
    let description = challenge.description.as_deref().unwrap_or("");
    let info = Paragraph::new(vec![
        Line::from(Span::styled(
            format!(" {}", challenge.title),
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(" {description}"),
            Style::default().fg(colors.text_dim()),
        )),
    ]);
    frame.render_widget(info, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: Rect, hints: &[&str]) {
    let colors = &app.theme.colors;
    let lines: Vec<Line> = pack_hint_lines(hints, area.width as usize)
        .into_iter()
        .map(|line| Line::from(Span::styled(line, Style::default().fg(colors.text_dim()))))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_playing(frame: &mut ratatui::Frame, app: &App) {
    let colors = &app.theme.colors;
    let Some(challenge) = app.session.current_challenge() else {
        return;
    };
    let app_layout = AppLayout::new(frame.area());

    render_header(frame, app, app_layout.header);
    render_info(frame, app, app_layout.info);

    let focused = app.focused_section_id();
    app.code_viewport.set(CodeViewer::content_area(app_layout.main));
    let viewer = CodeViewer::new(
        challenge,
        app.session.selection(),
        ViewerMode::Select {
            focused: focused.as_deref(),
        },
        app.geometry,
        app.theme,
    )
    .scroll(app.scroll);
    frame.render_widget(viewer, app_layout.main);

    if let Some(sidebar) = app_layout.sidebar {
        let mut lines = vec![Line::from(Span::styled(
            " Suspected bugs",
            Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
        ))];
        if app.session.selection().is_empty() {
            lines.push(Line::from(Span::styled(
                " Click a block or press Space to mark it",
                Style::default().fg(colors.text_dim()),
            )));
        }
        for (i, id) in app.session.selection().iter().enumerate() {
            let range = challenge
                .section(id)
                .map(|s| format!("lines {}-{}", s.start_line, s.end_line))
                .unwrap_or_default();
            lines.push(Line::from(vec![
                Span::styled(
                    format!(" [{}] ", i + 1),
                    Style::default().fg(colors.accent()),
                ),
                Span::styled(range, Style::default().fg(colors.fg())),
            ]));
        }
        let panel = Paragraph::new(lines).block(
            Block::bordered()
                .title(" Selection ")
                .border_style(Style::default().fg(colors.border())),
        );
        frame.render_widget(panel, sidebar);
    }

    let selected = format!("{} section(s) selected", app.session.selection().len());
    render_footer(
        frame,
        app,
        app_layout.footer,
        &[
            selected.as_str(),
            "[j/k] Move",
            "[Space] Toggle",
            "[Enter] Submit",
            "[PgUp/PgDn] Scroll",
            "[Esc] Menu",
        ],
    );
}

fn render_result(frame: &mut ratatui::Frame, app: &App) {
    let (Some(challenge), Some(result)) =
        (app.session.current_challenge(), app.last_result.as_ref())
    else {
        return;
    };
    let app_layout = AppLayout::new(frame.area());

    render_header(frame, app, app_layout.header);
    render_info(frame, app, app_layout.info);

    let review = ResultScreen::new(result, challenge, app.theme).scroll(app.explanation_scroll);
    let review_area = app_layout.sidebar.unwrap_or(app_layout.main);
    app.explanation_max.set(review.max_scroll(review_area));
    match app_layout.sidebar {
        Some(sidebar) => {
            app.code_viewport.set(CodeViewer::content_area(app_layout.main));
            let viewer = CodeViewer::new(
                challenge,
                app.session.selection(),
                ViewerMode::Review,
                app.geometry,
                app.theme,
            )
            .scroll(app.scroll);
            frame.render_widget(viewer, app_layout.main);
            frame.render_widget(review, sidebar);
        }
        None => frame.render_widget(review, app_layout.main),
    }

    let mut hints = vec!["[n/Enter] Next", "[j/k] Explanation"];
    if !result.correct {
        hints.push("[r] Retry");
    }
    hints.push("[q] Menu");
    render_footer(frame, app, app_layout.footer, &hints);
}
