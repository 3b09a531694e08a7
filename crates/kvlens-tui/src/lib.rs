// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use kvlens_app::{
    ControllerEvent, DataAccess, FocusState, HASH_HEADER, InteractionController, KeyInput,
    KeyKind, ModalSession, Outcome, ValuePane,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState,
    Wrap,
};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const KEY_LIST_WIDTH: u16 = 28;
const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);
const MULTILINE_MARK: &str = "…";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    status_token: u64,
}

pub fn run_app<S: DataAccess>(controller: &mut InteractionController<S>) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    // Startup may already carry a failed value load.
    if controller.status_line().is_some() {
        bump_status_token(&mut view_data, &internal_tx);
    }

    let mut result = Ok(());
    loop {
        process_internal_events(controller, &view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, controller)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if !has_event {
            continue;
        }
        match event::read().context("read event") {
            Ok(Event::Key(key)) => {
                if handle_key_event(controller, &mut view_data, &internal_tx, key) {
                    tracing::info!("quit requested");
                    break;
                }
            }
            Ok(_) => {}
            Err(error) => {
                result = Err(error);
                break;
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events<S: DataAccess>(
    controller: &mut InteractionController<S>,
    view_data: &ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                controller.clear_status();
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn bump_status_token(view_data: &mut ViewData, internal_tx: &Sender<InternalEvent>) {
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

/// Translates a terminal key into the controller's input vocabulary.
/// Chords with Control or Alt are left to the global shortcuts.
pub fn key_input_for(key: KeyEvent) -> Option<KeyInput> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }
    let input = match key.code {
        KeyCode::Up => KeyInput::Up,
        KeyCode::Down => KeyInput::Down,
        KeyCode::Left => KeyInput::Left,
        KeyCode::Right => KeyInput::Right,
        KeyCode::Enter => KeyInput::Enter,
        KeyCode::Esc => KeyInput::Escape,
        KeyCode::Backspace => KeyInput::Backspace,
        KeyCode::Delete => KeyInput::Delete,
        KeyCode::Home => KeyInput::Home,
        KeyCode::End => KeyInput::End,
        KeyCode::PageUp => KeyInput::PageUp,
        KeyCode::PageDown => KeyInput::PageDown,
        KeyCode::F(2) => KeyInput::Edit,
        KeyCode::F(5) => KeyInput::Refresh,
        KeyCode::Char(ch) => KeyInput::Char(ch),
        _ => return None,
    };
    Some(input)
}

fn is_quit_key(key: KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
}

/// Returns `true` when the session should end.
fn handle_key_event<S: DataAccess>(
    controller: &mut InteractionController<S>,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    let outcome = match key_input_for(key) {
        Some(input) => controller.handle_key(input),
        None => Outcome::Passthrough,
    };

    match outcome {
        Outcome::Handled(events) => {
            let touches_status = events.iter().any(|event| {
                matches!(
                    event,
                    ControllerEvent::StatusUpdated(_) | ControllerEvent::Failed(_)
                )
            });
            if touches_status {
                bump_status_token(view_data, internal_tx);
            }
            false
        }
        Outcome::Passthrough => is_quit_key(key),
    }
}

fn render<S: DataAccess>(frame: &mut ratatui::Frame<'_>, controller: &InteractionController<S>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let breadcrumb = Paragraph::new(controller.title().replace('\n', " "))
        .block(Block::default().title("kvlens").borders(Borders::ALL));
    frame.render_widget(breadcrumb, layout[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(KEY_LIST_WIDTH), Constraint::Min(1)])
        .split(layout[1]);
    render_key_list(frame, body[0], controller);
    render_value_table(frame, body[1], controller);

    let status = Paragraph::new(status_text(controller))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    if let Some(session) = controller.modal() {
        render_modal(frame, controller.focus(), controller.pane().kind(), session);
    }
}

fn region_block(title: String, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border)
}

fn render_key_list<S: DataAccess>(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    controller: &InteractionController<S>,
) {
    let focused = controller.focus() == FocusState::List;
    let items = controller
        .catalog()
        .entries()
        .iter()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::raw(entry.name.clone()),
                Span::styled(
                    format!(" {}", kind_tag(entry.kind)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect::<Vec<_>>();

    let highlight = if focused {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(Color::DarkGray)
    };
    let list = List::new(items)
        .block(region_block(
            format!("keys ({})", controller.catalog().len()),
            focused,
        ))
        .highlight_style(highlight);

    let mut state = ListState::default();
    if !controller.catalog().is_empty() {
        state.select(Some(controller.selection().key_index));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn kind_tag(kind: KeyKind) -> &'static str {
    match kind {
        KeyKind::Scalar => "str",
        KeyKind::Hash => "hash",
        KeyKind::List => "list",
        KeyKind::Set => "set",
        KeyKind::SortedSet => "zset",
    }
}

fn render_value_table<S: DataAccess>(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    controller: &InteractionController<S>,
) {
    let focused = controller.focus() == FocusState::Table;
    let pane = controller.pane();
    let title = match controller.selected_key() {
        Some(entry) => format!("{} ({})", entry.name, pane.kind().as_str()),
        None => "value".to_owned(),
    };
    let block = region_block(title, focused);

    if pane.is_empty() {
        frame.render_widget(Paragraph::new(String::new()).block(block), area);
        return;
    }

    let header_rows = usize::from(pane.kind() == KeyKind::Hash);
    let selection = controller.selection();
    let active_row = if controller.focus() == FocusState::List {
        None
    } else {
        selection.table_row.checked_sub(header_rows)
    };

    let rows = table_rows(pane, header_rows, active_row, selection.table_col);
    let widths = match pane.column_count() {
        2 => vec![Constraint::Percentage(35), Constraint::Percentage(65)],
        _ => vec![Constraint::Min(1)],
    };
    let mut table = Table::new(rows, widths)
        .column_spacing(1)
        .block(block)
        .row_highlight_style(Style::default().bg(Color::DarkGray));
    if header_rows > 0 {
        let header = Row::new(HASH_HEADER.map(|label| {
            Cell::from(label).style(
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
        }));
        table = table.header(header);
    }

    let mut state = TableState::default();
    state.select(active_row);
    frame.render_stateful_widget(table, area, &mut state);
}

fn table_rows(
    pane: &ValuePane,
    header_rows: usize,
    active_row: Option<usize>,
    active_col: usize,
) -> Vec<Row<'static>> {
    (header_rows..pane.len())
        .map(|row_index| {
            let selected = active_row == Some(row_index - header_rows);
            let cells = (0..pane.column_count())
                .map(|col| {
                    let text = cell_preview(pane.cell_text(row_index, col).unwrap_or_default());
                    let style = if selected && col == active_col {
                        Style::default()
                            .fg(Color::Black)
                            .bg(Color::Cyan)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };
                    Cell::from(text).style(style)
                })
                .collect::<Vec<_>>();
            Row::new(cells)
        })
        .collect()
}

/// First line of `text`, marked when more lines follow.
fn cell_preview(text: &str) -> String {
    let mut lines = text.lines();
    let first = lines.next().unwrap_or_default();
    if lines.next().is_some() {
        format!("{first}{MULTILINE_MARK}")
    } else {
        first.to_owned()
    }
}

fn render_modal(
    frame: &mut ratatui::Frame<'_>,
    focus: FocusState,
    kind: KeyKind,
    session: &ModalSession,
) {
    let area = centered_rect(70, 60, frame.area());
    frame.render_widget(Clear, area);
    let title = match (&session.field, kind) {
        (Some(field), KeyKind::Hash) => format!("{} ({field})", focus.label()),
        _ => focus.label().to_owned(),
    };

    let Some(buffer) = &session.edit else {
        let view = Paragraph::new(session.text.clone())
            .wrap(Wrap { trim: false })
            .scroll((session.scroll, 0))
            .block(region_block(title, true));
        frame.render_widget(view, area);
        return;
    };

    let outer = region_block(title, true);
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Min(3)])
        .split(inner);

    let old = Paragraph::new(session.text.clone())
        .wrap(Wrap { trim: false })
        .block(Block::default().title("Old").borders(Borders::ALL));
    frame.render_widget(old, parts[0]);

    let input_block = Block::default()
        .title("New")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let input_area = input_block.inner(parts[1]);
    let viewport = EditViewport::new(
        buffer.text(),
        buffer.cursor(),
        input_area.width,
        input_area.height,
    );
    let input = Paragraph::new(buffer.text().to_owned())
        .scroll((viewport.top, viewport.left))
        .block(input_block);
    frame.render_widget(input, parts[1]);
    frame.set_cursor_position((
        input_area.x.saturating_add(viewport.cursor_x),
        input_area.y.saturating_add(viewport.cursor_y),
    ));
}

/// Scroll offsets that keep the edit cursor inside the input box, and the
/// cursor's position relative to the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EditViewport {
    top: u16,
    left: u16,
    cursor_x: u16,
    cursor_y: u16,
}

impl EditViewport {
    fn new(text: &str, cursor: usize, width: u16, height: u16) -> Self {
        let (line, column) = cursor_line_column(text, cursor);
        let top = line.saturating_sub(usize::from(height.saturating_sub(1)));
        let left = column.saturating_sub(usize::from(width.saturating_sub(1)));
        let clamp = |value: usize| u16::try_from(value).unwrap_or(u16::MAX);
        Self {
            top: clamp(top),
            left: clamp(left),
            cursor_x: clamp(column - left),
            cursor_y: clamp(line - top),
        }
    }
}

/// Zero-based line and column of the char index `cursor`.
fn cursor_line_column(text: &str, cursor: usize) -> (usize, usize) {
    text.chars()
        .take(cursor)
        .fold((0, 0), |(line, column), ch| match ch {
            '\n' => (line + 1, 0),
            _ => (line, column + 1),
        })
}

fn status_text<S: DataAccess>(controller: &InteractionController<S>) -> String {
    let focus = controller.focus();
    let hints = match focus {
        FocusState::List => "up/down keys | right open | type to filter | F5 refresh | ctrl+q",
        FocusState::Table => "up/down rows | enter view | F2 edit | left keys | ctrl+q",
        FocusState::ModalView => "up/down pgup/pgdn scroll | enter/esc close | ctrl+q",
        FocusState::ModalEdit => "enter save | esc cancel | ctrl+q",
    };
    let mode = focus.label().to_uppercase();
    match controller.status_line() {
        Some(status) => format!("{mode} | {status} | {hints}"),
        None => format!("{mode} | {hints}"),
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
