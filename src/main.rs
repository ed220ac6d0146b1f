use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use roster_terminal::api::ReqwestTransport;
use roster_terminal::config::RosterConfig;
use roster_terminal::form::FormField;
use roster_terminal::provider::spawn_provider;
use roster_terminal::state::{AppState, Delta, ProviderCommand, Screen, apply_delta};
use roster_terminal::telemetry::init_telemetry;
use roster_terminal::view::{CardAction, Notice};

const CARD_HEIGHT: u16 = 4;

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
}

impl App {
    fn new(cmd_tx: mpsc::Sender<ProviderCommand>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.dismiss_notice() {
            return;
        }
        if self.state.help_overlay {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
                self.state.help_overlay = false;
            }
            return;
        }
        if self.state.form_open {
            self.on_form_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('d') | KeyCode::Enter => {
                if let Some(action) = self.state.selected_action(0) {
                    self.send(ProviderCommand::Act(action));
                }
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                if let Some(action) = self.state.selected_action(1) {
                    self.send(ProviderCommand::Act(action));
                }
            }
            KeyCode::Char('b') | KeyCode::Esc => {
                if self.state.screen == Screen::Detail {
                    self.send(ProviderCommand::Act(CardAction::Back));
                }
            }
            KeyCode::Char('r') => {
                self.state.loading = true;
                self.send(ProviderCommand::Refresh);
            }
            KeyCode::Char('n') => self.state.open_form(),
            KeyCode::Char('?') => self.state.help_overlay = true,
            _ => {}
        }
    }

    fn on_form_key(&mut self, key: KeyEvent) {
        let Some(form) = self.state.form.as_mut() else {
            self.state.close_form();
            return;
        };
        match key.code {
            KeyCode::Esc => self.state.close_form(),
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
            KeyCode::Left | KeyCode::Right if form.focus == FormField::Status => {
                form.toggle_status()
            }
            KeyCode::Char(' ') if form.focus == FormField::Status => form.toggle_status(),
            KeyCode::Backspace => form.pop_char(),
            KeyCode::Char(ch) => form.push_char(ch),
            KeyCode::Enter => {
                let snapshot = form.clone();
                self.send(ProviderCommand::Submit(snapshot));
            }
            _ => {}
        }
    }

    fn send(&mut self, cmd: ProviderCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Roster worker is not running");
        }
    }
}

fn main() -> io::Result<()> {
    let config = RosterConfig::load();
    if let Err(err) = init_telemetry(&config) {
        eprintln!("warning: logging disabled: {err:#}");
    }
    let transport = match ReqwestTransport::new(&config) {
        Ok(transport) => transport,
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    // Detached: a request stalled on the network must not block quitting.
    let _provider = spawn_provider(transport, config.base_url.clone(), tx, cmd_rx);

    let mut app = App::new(cmd_tx);
    app.state
        .push_log(format!("[INFO] Roster API {}", config.base_url));
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::List => render_list(frame, chunks[1], &app.state),
        Screen::Detail => render_detail(frame, chunks[1], &app.state),
    }

    let console = Paragraph::new(console_text(&app.state))
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().title("Console").borders(Borders::TOP));
    frame.render_widget(console, chunks[2]);

    frame.render_widget(Paragraph::new(footer_text(&app.state)), chunks[3]);

    if app.state.form_open {
        render_form(frame, frame.size(), &app.state);
    }
    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
    if let Some(notice) = app.state.notice.as_ref() {
        render_notice(frame, frame.size(), notice);
    }
}

fn header_text(state: &AppState) -> String {
    let title = match state.screen {
        Screen::List => format!("ROSTER | {} players", state.cards.len()),
        Screen::Detail => "ROSTER | Player detail".to_string(),
    };
    if state.loading {
        format!("{title} | loading...")
    } else {
        title
    }
}

fn footer_text(state: &AppState) -> String {
    if state.form_open {
        return "Tab/↑/↓ Field | ←/→/Space Status | Enter Add | Esc Close".to_string();
    }
    match state.screen {
        Screen::List => concat!(
            "j/k/↑/↓ Move | Enter/d Details | x Remove | n New player | ",
            "r Refresh | ? Help | q Quit"
        )
        .to_string(),
        Screen::Detail => "b/Esc Back to all players | n New player | ? Help | q Quit".to_string(),
    }
}

fn render_list(frame: &mut Frame, area: Rect, state: &AppState) {
    if state.cards.is_empty() {
        let text = if state.loading {
            "Fetching players..."
        } else {
            "No players on the roster"
        };
        let empty = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    if area.height < CARD_HEIGHT {
        let empty = Paragraph::new("Roster list needs more height")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let visible = (area.height / CARD_HEIGHT) as usize;
    let (start, end) = visible_range(state.selected, state.cards.len(), visible);

    for (i, idx) in (start..end).enumerate() {
        let card_area = Rect {
            x: area.x,
            y: area.y + (i as u16) * CARD_HEIGHT,
            width: area.width,
            height: CARD_HEIGHT,
        };
        let card = &state.cards[idx];
        let selected = idx == state.selected;
        let style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        let text = format!(
            "{}  {}\n{}\nStatus: {}",
            card.name,
            card.id_label(),
            card.image_url,
            card.status.label()
        );
        let paragraph = Paragraph::new(text)
            .style(style)
            .block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(paragraph, card_area);
    }
}

fn render_detail(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(card) = state.detail.as_ref() else {
        return;
    };
    let text = [
        Line::from(Span::styled(
            card.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("ID: {}", card.id)),
        Line::from(format!("Breed: {}", card.breed)),
        Line::from(format!("Image: {}", card.image_url)),
        Line::from(format!("Team: {}", card.team)),
        Line::from(""),
        Line::from(Span::styled(
            "[b] Back to All Players",
            Style::default().fg(Color::Cyan),
        )),
    ];
    let paragraph = Paragraph::new(text.to_vec())
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_form(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(form) = state.form.as_ref() else {
        return;
    };
    let popup_area = centered_rect(60, 50, area);
    frame.render_widget(Clear, popup_area);

    let mut lines = vec![Line::from("Add new players here"), Line::from("")];
    for field in FormField::ALL {
        let marker = if field.required() { "*" } else { " " };
        let value = match field {
            FormField::Status => format!("< {} >", form.status.label()),
            _ => form.field_value(field).to_string(),
        };
        let style = if field == form.focus {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::raw(format!("{marker}{:<12}", format!("{}:", field.label()))),
            Span::styled(value, style),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("[Enter] Add Player"));

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title("New player").borders(Borders::ALL));
    frame.render_widget(paragraph, popup_area);
}

fn render_notice(frame: &mut Frame, area: Rect, notice: &Notice) {
    let popup_area = centered_rect(50, 20, area);
    frame.render_widget(Clear, popup_area);
    let (title, msg, color) = match notice {
        Notice::Info(msg) => ("Notice", msg, Color::Green),
        Notice::Error(msg) => ("Error", msg, Color::Red),
    };
    let paragraph = Paragraph::new(format!("{msg}\n\n(press any key)"))
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(color))
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(paragraph, popup_area);
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Roster Terminal - Help",
        "",
        "List:",
        "  j/k or ↑/↓   Move",
        "  Enter / d    See details",
        "  x / Delete   Remove from roster",
        "  r            Refresh",
        "",
        "Detail:",
        "  b / Esc      Back to all players",
        "",
        "Anywhere:",
        "  n            New player form",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
