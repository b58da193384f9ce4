use crate::catalog::Park;
use crate::filter::numbered;
use crate::shell::{Effect, Shell, ShellState};
use crate::views::{map_bounds, map_points, visitor_ranking, UrlOpener};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Map, MapResolution, Points},
        Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph,
    },
    Frame, Terminal,
};
use std::io;

/// Point labels are only drawn when the map is this sparse
const MAX_MAP_LABELS: usize = 12;

#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    None,
    Map(Vec<Park>),
    Chart(Vec<Park>),
}

pub struct App {
    pub shell: Shell,
    pub transcript: Vec<Line<'static>>,
    pub input: String,
    pub overlay: Overlay,
    /// Lines scrolled up from the bottom of the transcript
    pub scroll: u16,
    opener: Box<dyn UrlOpener>,
}

impl App {
    pub fn new(shell: Shell, opener: Box<dyn UrlOpener>) -> Self {
        let mut app = Self {
            shell,
            transcript: Vec::new(),
            input: String::new(),
            overlay: Overlay::None,
            scroll: 0,
            opener,
        };

        let effects = app.shell.start();
        app.apply(effects);
        app
    }

    /// Send the input line to the shell and show what comes back
    pub fn submit(&mut self) {
        let line = std::mem::take(&mut self.input);
        self.transcript.push(Line::from(Span::styled(
            format!("> {}", line),
            Style::default().fg(Color::Yellow),
        )));

        let effects = self.shell.handle(&line);
        self.apply(effects);
        self.scroll = 0;
    }

    pub fn close_overlay(&mut self) {
        self.overlay = Overlay::None;
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Message(text) => {
                    self.transcript.push(Line::raw(""));
                    self.transcript.push(Line::raw(text));
                }
                Effect::Notice(text) => {
                    self.transcript.push(Line::raw(""));
                    self.transcript.push(Line::from(Span::styled(
                        text,
                        Style::default()
                            .fg(Color::Magenta)
                            .add_modifier(Modifier::BOLD),
                    )));
                }
                Effect::Invalid(text) => {
                    self.transcript.push(Line::from(Span::styled(
                        text,
                        Style::default().fg(Color::Red),
                    )));
                }
                Effect::Parks { title, names } | Effect::Options { title, items: names } => {
                    self.transcript.push(Line::raw(""));
                    self.transcript.push(Line::from(Span::styled(
                        title,
                        Style::default().add_modifier(Modifier::BOLD),
                    )));
                    for (n, name) in numbered(&names) {
                        self.transcript.push(Line::from(vec![
                            Span::styled(format!("{:>3}. ", n), Style::default().fg(Color::Cyan)),
                            Span::raw(name.to_string()),
                        ]));
                    }
                }
                Effect::Tree(rows) => {
                    for (depth, text) in rows {
                        self.transcript.push(Line::from(vec![
                            Span::styled(
                                format!("{}└─ ", "   ".repeat(depth)),
                                Style::default().fg(Color::DarkGray),
                            ),
                            Span::styled(text, Style::default().fg(Color::Green)),
                        ]));
                    }
                }
                Effect::OpenUrl(url) => {
                    if let Err(e) = self.opener.open(&url) {
                        self.transcript.push(Line::from(Span::styled(
                            format!("{:#}", e),
                            Style::default().fg(Color::Red),
                        )));
                    }
                }
                Effect::DrawMap(parks) => self.overlay = Overlay::Map(parks),
                Effect::DrawChart(parks) => self.overlay = Overlay::Chart(parks),
            }
        }
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    while !app.shell.is_finished() {
        terminal.draw(|f| ui(f, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(());
        }

        if app.overlay != Overlay::None {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                app.close_overlay();
            }
            continue;
        }

        match key.code {
            KeyCode::Enter => app.submit(),
            KeyCode::Backspace => {
                app.input.pop();
            }
            KeyCode::Esc => app.input.clear(),
            KeyCode::Char(c) => app.input.push(c),
            KeyCode::Up => app.scroll_up(1),
            KeyCode::Down => app.scroll_down(1),
            KeyCode::PageUp => app.scroll_up(10),
            KeyCode::PageDown => app.scroll_down(10),
            _ => {}
        }
    }

    Ok(())
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Transcript
            Constraint::Length(3), // Input line
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_transcript(f, chunks[1], app);
    render_input(f, chunks[2], app);

    let area = overlay_area(f.size());
    match &app.overlay {
        Overlay::None => {}
        Overlay::Map(parks) => render_map(f, area, parks),
        Overlay::Chart(parks) => render_chart(f, area, parks),
    }
}

fn stage_title(state: ShellState) -> &'static str {
    match state {
        ShellState::MainMenu => "Main Menu",
        ShellState::StateSelect => "State",
        ShellState::ContinuePrompt(_) => "Continue?",
        ShellState::TopicSelect => "Topics",
        ShellState::ActivitySelect => "Activities",
        ShellState::FinalInteraction => "Results",
        ShellState::Exit => "Goodbye",
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let catalog = app.shell.catalog();
    let mut spans = vec![
        Span::styled(
            "National Park Explorer",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            stage_title(app.shell.state()),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::UNDERLINED),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Parks: {}", catalog.len()),
            Style::default().fg(Color::White),
        ),
    ];

    if let Some(candidates) = app.shell.candidates() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("→ {}", candidates.len()),
            Style::default().fg(Color::Cyan),
        ));
    }

    let header = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_transcript(f: &mut Frame, area: Rect, app: &App) {
    let visible = area.height.saturating_sub(2) as usize;
    let bottom = app.transcript.len().saturating_sub(visible);
    let offset = bottom.saturating_sub(app.scroll as usize);

    let transcript = Paragraph::new(app.transcript.clone())
        .scroll((offset.min(u16::MAX as usize) as u16, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" Park Selection "),
        );

    f.render_widget(transcript, area);
}

fn render_input(f: &mut Frame, area: Rect, app: &App) {
    let input = Paragraph::new(Line::from(vec![
        Span::styled("› ", Style::default().fg(Color::Yellow)),
        Span::raw(app.input.as_str()),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" {} ", app.shell.prompt())),
    );

    f.render_widget(input, area);
    f.set_cursor(area.x + 3 + app.input.chars().count() as u16, area.y + 1);
}

fn overlay_area(area: Rect) -> Rect {
    let margin_x = area.width / 20;
    let margin_y = area.height / 20;
    Rect {
        x: area.x + margin_x,
        y: area.y + margin_y,
        width: area.width.saturating_sub(margin_x * 2),
        height: area.height.saturating_sub(margin_y * 2),
    }
}

fn render_map(f: &mut Frame, area: Rect, parks: &[Park]) {
    let (x_bounds, y_bounds) = map_bounds(parks);
    let points = map_points(parks);
    let coords: Vec<(f64, f64)> = points.iter().map(|(_, x, y)| (*x, *y)).collect();

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(format!(" Locations Map ({} parks) - Esc to close ", parks.len())),
        )
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            ctx.draw(&Map {
                color: Color::DarkGray,
                resolution: MapResolution::High,
            });
            ctx.layer();
            ctx.draw(&Points {
                coords: &coords,
                color: Color::Green,
            });
            if points.len() <= MAX_MAP_LABELS {
                for (name, x, y) in &points {
                    ctx.print(*x, *y, Span::styled(name.clone(), Style::default().fg(Color::Yellow)));
                }
            }
        });

    f.render_widget(Clear, area);
    f.render_widget(canvas, area);
}

fn render_chart(f: &mut Frame, area: Rect, parks: &[Park]) {
    let ranking = visitor_ranking(parks);
    let bars: Vec<Bar> = ranking
        .iter()
        .map(|(name, visitors)| {
            Bar::default()
                .value(*visitors)
                .label(Line::from(truncate(name, 40)))
                .text_value(format!("{}", visitors))
                .style(Style::default().fg(Color::Blue))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Number of Visitors in 2022 by Park - Esc to close "),
        )
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .value_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
        .data(BarGroup::default().bars(&bars));

    f.render_widget(Clear, area);
    f.render_widget(chart, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Location};

    struct NoBrowser;

    impl UrlOpener for NoBrowser {
        fn open(&self, url: &str) -> Result<()> {
            anyhow::bail!("cannot open {}", url)
        }
    }

    fn app() -> App {
        let park = |name: &str| Park {
            name: name.to_string(),
            url: format!("https://www.nps.gov/{}/", name),
            location: Location {
                latitude: 44.0,
                longitude: -110.0,
            },
            activities: Default::default(),
            topics: Default::default(),
            state: "WY".to_string(),
            visitor_count_2022: 10,
        };
        App::new(
            Shell::new(Catalog::new(vec![park("yell"), park("grte")])),
            Box::new(NoBrowser),
        )
    }

    fn typed(app: &mut App, text: &str) {
        app.input = text.to_string();
        app.submit();
    }

    #[test]
    fn test_overlays_open_and_close() {
        let mut app = app();
        typed(&mut app, "1");
        assert!(matches!(&app.overlay, Overlay::Map(p) if p.len() == 2));

        app.close_overlay();
        typed(&mut app, "2");
        typed(&mut app, "wy");
        typed(&mut app, "no");
        typed(&mut app, "bar");

        assert!(matches!(&app.overlay, Overlay::Chart(p) if p.len() == 2));
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_open_failure_is_shown() {
        let mut app = app();
        typed(&mut app, "2");
        typed(&mut app, "WY");
        typed(&mut app, "NO");
        typed(&mut app, "1");

        let last: String = app
            .transcript
            .last()
            .unwrap()
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert!(last.contains("cannot open https://www.nps.gov/yell/"));
        assert_eq!(app.shell.state(), ShellState::FinalInteraction);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Short", 10), "Short");
        assert_eq!(truncate("Yukon - Charley Rivers National Preserve", 10), "Yukon -...");
    }
}
