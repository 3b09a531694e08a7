// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    DataAccess, Direction, FilterBuffer, FilterScope, FocusController, FocusState, FocusTrigger,
    KeyCatalog, KeyDescriptor, KeyInput, KeyKind, ModalSession, NavPath, Selection, ValuePane,
    next_focus,
};
use anyhow::{Context, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Fetch,
    Write,
}

impl FailureKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fetch => "fetch failed",
            Self::Write => "write failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: FailureKind,
    pub message: String,
}

impl Notice {
    fn from_error(kind: FailureKind, error: &anyhow::Error) -> Self {
        Self {
            kind,
            message: format!("{}: {error:#}", kind.label()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    FocusChanged(FocusState),
    KeySelected(usize),
    RowSelected(usize),
    FilterUpdated(String),
    CatalogRefreshed(usize),
    ValueCommitted { key: String, field: Option<String> },
    StatusUpdated(String),
    Failed(Notice),
}

/// Result of offering a key to the controller. `Passthrough` hands the key
/// back untouched so global shortcuts can still see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Handled(Vec<ControllerEvent>),
    Passthrough,
}

impl Outcome {
    pub fn events(&self) -> &[ControllerEvent] {
        match self {
            Self::Handled(events) => events,
            Self::Passthrough => &[],
        }
    }

    pub fn is_passthrough(&self) -> bool {
        matches!(self, Self::Passthrough)
    }
}

pub struct InteractionController<S> {
    store: S,
    title_base: String,
    title: String,
    catalog: KeyCatalog,
    pane: ValuePane,
    focus: FocusController,
    filter: FilterBuffer,
    selection: Selection,
    modal: Option<ModalSession>,
    status_line: Option<String>,
}

impl<S: DataAccess> InteractionController<S> {
    /// Builds the controller and performs the initial key listing. A listing
    /// failure here is fatal to the caller; later failures are not.
    pub fn load(store: S, title_base: impl Into<String>) -> Result<Self> {
        let title_base = title_base.into();
        let mut controller = Self {
            store,
            title: title_base.clone(),
            title_base,
            catalog: KeyCatalog::new(),
            pane: ValuePane::empty(),
            focus: FocusController::new(),
            filter: FilterBuffer::new(FilterScope::List),
            selection: Selection::default(),
            modal: None,
            status_line: None,
        };

        let keys = fetch_catalog(&mut controller.store).context("initial key listing")?;
        controller.selection.key_index = controller.catalog.refresh(keys, "");
        tracing::info!(keys = controller.catalog.len(), "catalog loaded");

        let mut events = Vec::new();
        controller.reload_pane(&mut events);
        Ok(controller)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn focus(&self) -> FocusState {
        self.focus.current()
    }

    pub fn catalog(&self) -> &KeyCatalog {
        &self.catalog
    }

    pub fn pane(&self) -> &ValuePane {
        &self.pane
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn filter(&self) -> &FilterBuffer {
        &self.filter
    }

    pub fn modal(&self) -> Option<&ModalSession> {
        self.modal.as_ref()
    }

    pub fn status_line(&self) -> Option<&str> {
        self.status_line.as_deref()
    }

    pub fn clear_status(&mut self) {
        self.status_line = None;
    }

    pub fn selected_key(&self) -> Option<&KeyDescriptor> {
        self.catalog.get(self.selection.key_index)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn handle_key(&mut self, input: KeyInput) -> Outcome {
        match self.focus.current() {
            FocusState::List => self.handle_list_key(input),
            FocusState::Table => self.handle_table_key(input),
            FocusState::ModalView => self.handle_view_key(input),
            FocusState::ModalEdit => self.handle_edit_key(input),
        }
    }

    fn handle_list_key(&mut self, input: KeyInput) -> Outcome {
        let mut events = Vec::new();
        match input {
            KeyInput::Refresh => {
                self.refresh_catalog(&mut events);
            }
            KeyInput::Up | KeyInput::Down => {
                let direction = if input == KeyInput::Up {
                    Direction::Up
                } else {
                    Direction::Down
                };
                if !self.catalog.is_empty() {
                    let index = self.catalog.navigate(self.selection.key_index, direction);
                    self.select_key(index, &mut events);
                }
                self.clear_filter(&mut events);
                self.retitle(true);
            }
            KeyInput::Right | KeyInput::Enter => {
                let trigger = if input == KeyInput::Right {
                    FocusTrigger::Right
                } else {
                    FocusTrigger::Enter
                };
                if let Some(next) = next_focus(FocusState::List, trigger, self.catalog.is_empty())
                {
                    self.selection.table_row = usize::from(self.pane.kind() == KeyKind::Hash);
                    self.selection.table_col = 0;
                    self.move_focus(next, &mut events);
                    self.retitle(true);
                }
            }
            KeyInput::Left => {}
            KeyInput::Escape => {
                self.clear_filter(&mut events);
                self.retitle(false);
            }
            KeyInput::Char(ch) => {
                let matched = self
                    .filter
                    .on_printable(ch, self.catalog.labels().enumerate());
                if let Some(index) = matched {
                    self.select_key(index, &mut events);
                }
                events.push(ControllerEvent::FilterUpdated(self.filter.text().to_owned()));
                self.retitle(true);
            }
            _ => return Outcome::Passthrough,
        }
        Outcome::Handled(events)
    }

    fn handle_table_key(&mut self, input: KeyInput) -> Outcome {
        let mut events = Vec::new();
        match input {
            KeyInput::Left => {
                self.selection.table_row = 0;
                self.selection.table_col = 0;
                self.move_focus(FocusState::List, &mut events);
                self.retitle(true);
            }
            KeyInput::Right => {}
            KeyInput::Enter => self.open_modal(FocusTrigger::Enter, &mut events),
            KeyInput::Edit => self.open_modal(FocusTrigger::EditCommand, &mut events),
            KeyInput::Up | KeyInput::Down | KeyInput::Home | KeyInput::End => {
                let row = match input {
                    KeyInput::Up => self.pane.step(self.selection.table_row, Direction::Up),
                    KeyInput::Down => self.pane.step(self.selection.table_row, Direction::Down),
                    KeyInput::Home => self
                        .pane
                        .first_selectable()
                        .unwrap_or(self.selection.table_row),
                    _ => self
                        .pane
                        .last_selectable()
                        .unwrap_or(self.selection.table_row),
                };
                if row != self.selection.table_row {
                    self.selection.table_row = row;
                    events.push(ControllerEvent::RowSelected(row));
                }
                self.clear_filter(&mut events);
                self.retitle(true);
            }
            KeyInput::Escape => {
                self.clear_filter(&mut events);
                self.retitle(true);
            }
            KeyInput::Char(ch) => {
                if self.pane.len() < 2 {
                    return Outcome::Passthrough;
                }
                let matched = self.filter.on_printable(ch, self.pane.filter_candidates());
                if let Some(row) = matched {
                    self.selection.table_row = row;
                    self.selection.table_col = 0;
                    events.push(ControllerEvent::RowSelected(row));
                }
                events.push(ControllerEvent::FilterUpdated(self.filter.text().to_owned()));
                self.retitle(true);
            }
            _ => return Outcome::Passthrough,
        }
        Outcome::Handled(events)
    }

    fn handle_view_key(&mut self, input: KeyInput) -> Outcome {
        let mut events = Vec::new();
        let Some(session) = self.modal.as_mut() else {
            return Outcome::Passthrough;
        };
        match input {
            KeyInput::Enter | KeyInput::Escape => self.close_modal(&mut events),
            KeyInput::Up => session.scroll_by(-1),
            KeyInput::Down => session.scroll_by(1),
            KeyInput::PageUp => session.scroll_page(false),
            KeyInput::PageDown => session.scroll_page(true),
            KeyInput::Home => session.scroll = 0,
            KeyInput::End => session.scroll_by(i32::from(u16::MAX)),
            _ => return Outcome::Passthrough,
        }
        Outcome::Handled(events)
    }

    fn handle_edit_key(&mut self, input: KeyInput) -> Outcome {
        let mut events = Vec::new();
        let Some(buffer) = self.modal.as_mut().and_then(|session| session.edit.as_mut()) else {
            return Outcome::Passthrough;
        };
        match input {
            KeyInput::Enter => self.commit_edit(&mut events),
            KeyInput::Escape => self.close_modal(&mut events),
            KeyInput::Char(ch) => buffer.insert(ch),
            KeyInput::Backspace => buffer.backspace(),
            KeyInput::Delete => buffer.delete(),
            KeyInput::Left => buffer.move_left(),
            KeyInput::Right => buffer.move_right(),
            KeyInput::Home => buffer.move_home(),
            KeyInput::End => buffer.move_end(),
            _ => return Outcome::Passthrough,
        }
        Outcome::Handled(events)
    }

    fn open_modal(&mut self, trigger: FocusTrigger, events: &mut Vec<ControllerEvent>) {
        let row = self.selection.table_row;
        let Some(entry) = self.pane.row(row).filter(|entry| entry.selectable) else {
            return;
        };
        if trigger == FocusTrigger::EditCommand && !entry.editable {
            let kind = self.pane.kind().as_str();
            self.set_status(format!("{kind} members are read-only"), events);
            return;
        }
        let Some(next) = next_focus(FocusState::Table, trigger, self.catalog.is_empty()) else {
            return;
        };

        let column = self.pane.kind().value_column();
        let text = self.pane.cell_text(row, column).unwrap_or_default().to_owned();
        let field = self.pane.cell_text(row, 0).map(str::to_owned);

        self.move_focus(next, events);
        self.modal = Some(match next {
            FocusState::ModalEdit => ModalSession::edit(row, column, field, text),
            _ => ModalSession::view(row, column, field, text),
        });
        self.retitle(true);
    }

    fn close_modal(&mut self, events: &mut Vec<ControllerEvent>) {
        self.modal = None;
        self.move_focus(FocusState::Table, events);
        self.retitle(true);
    }

    fn commit_edit(&mut self, events: &mut Vec<ControllerEvent>) {
        let Some(session) = self.modal.as_ref() else {
            return;
        };
        let Some(buffer) = session.edit.as_ref() else {
            return;
        };
        let Some(key) = self.selected_key().map(|entry| entry.name.clone()) else {
            return;
        };
        let value = buffer.committed_value();
        let row = session.row;
        let field = session
            .field
            .clone()
            .filter(|_| self.pane.kind() == KeyKind::Hash);

        let written = match &field {
            Some(field) => self
                .store
                .set_hash_field(&key, field, &value)
                .with_context(|| format!("set field {field:?} of {key:?}")),
            None => self
                .store
                .set_scalar(&key, &value)
                .with_context(|| format!("set {key:?}")),
        };

        match written {
            Ok(()) => {
                tracing::info!(key = %key, field = ?field, "value committed");
                self.pane.update_value(row, value);
                events.push(ControllerEvent::ValueCommitted {
                    key: key.clone(),
                    field: field.clone(),
                });
                self.close_modal(events);
                let saved = match &field {
                    Some(field) => format!("saved {key} ({field})"),
                    None => format!("saved {key}"),
                };
                self.set_status(saved, events);
            }
            Err(error) => self.fail(FailureKind::Write, &error, events),
        }
    }

    fn refresh_catalog(&mut self, events: &mut Vec<ControllerEvent>) {
        let keys = match fetch_catalog(&mut self.store).context("refresh key listing") {
            Ok(keys) => keys,
            Err(error) => {
                self.fail(FailureKind::Fetch, &error, events);
                return;
            }
        };

        let index = self.catalog.refresh(keys, self.filter.text());
        tracing::info!(keys = self.catalog.len(), "catalog refreshed");
        self.selection = Selection {
            key_index: index,
            ..Selection::default()
        };
        events.push(ControllerEvent::CatalogRefreshed(self.catalog.len()));
        self.reload_pane(events);
        self.clear_filter(events);
        self.retitle(false);
    }

    fn select_key(&mut self, index: usize, events: &mut Vec<ControllerEvent>) {
        self.selection.key_index = index;
        events.push(ControllerEvent::KeySelected(index));
        self.reload_pane(events);
    }

    fn reload_pane(&mut self, events: &mut Vec<ControllerEvent>) {
        let Some(entry) = self.catalog.get(self.selection.key_index).cloned() else {
            self.pane = ValuePane::empty();
            return;
        };
        match load_pane(&mut self.store, &entry) {
            Ok(pane) => self.pane = pane,
            Err(error) => {
                self.pane = ValuePane::empty();
                self.fail(FailureKind::Fetch, &error, events);
            }
        }
    }

    fn move_focus(&mut self, next: FocusState, events: &mut Vec<ControllerEvent>) {
        self.focus.set_focus(next, &mut self.filter);
        events.push(ControllerEvent::FocusChanged(next));
    }

    fn clear_filter(&mut self, events: &mut Vec<ControllerEvent>) {
        if !self.filter.is_empty() {
            self.filter.reset();
            events.push(ControllerEvent::FilterUpdated(String::new()));
        }
    }

    fn retitle(&mut self, with_key: bool) {
        let key = if with_key {
            self.catalog
                .get(self.selection.key_index)
                .map(|entry| entry.name.as_str())
        } else {
            None
        };
        let path = NavPath {
            key,
            field: self.modal.as_ref().and_then(|session| session.field.as_deref()),
            filter: self.filter.text(),
        };
        self.title = path.render(&self.title_base);
    }

    fn set_status(&mut self, message: String, events: &mut Vec<ControllerEvent>) {
        self.status_line = Some(message.clone());
        events.push(ControllerEvent::StatusUpdated(message));
    }

    fn fail(
        &mut self,
        kind: FailureKind,
        error: &anyhow::Error,
        events: &mut Vec<ControllerEvent>,
    ) {
        tracing::warn!(kind = ?kind, error = %format!("{error:#}"), "store call failed");
        let notice = Notice::from_error(kind, error);
        self.status_line = Some(notice.message.clone());
        events.push(ControllerEvent::Failed(notice));
    }
}

fn fetch_catalog<S: DataAccess>(store: &mut S) -> Result<Vec<KeyDescriptor>> {
    let names = store.list_all_keys()?;
    names
        .into_iter()
        .map(|name| {
            let kind = store
                .type_of(&name)
                .with_context(|| format!("resolve type of {name:?}"))?;
            Ok(KeyDescriptor { name, kind })
        })
        .collect()
}

fn load_pane<S: DataAccess>(store: &mut S, entry: &KeyDescriptor) -> Result<ValuePane> {
    let key = entry.name.as_str();
    let pane = match entry.kind {
        KeyKind::Hash => ValuePane::hash(store.get_hash_fields(key)?),
        KeyKind::Scalar => ValuePane::scalar(store.get_scalar(key)?),
        kind => ValuePane::members(kind, store.get_members(key, kind)?),
    };
    Ok(pane)
}
