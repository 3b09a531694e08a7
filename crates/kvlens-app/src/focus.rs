// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{FilterBuffer, FilterScope};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusState {
    #[default]
    List,
    Table,
    ModalView,
    ModalEdit,
}

impl FocusState {
    pub const fn filter_scope(self) -> Option<FilterScope> {
        match self {
            Self::List => Some(FilterScope::List),
            Self::Table => Some(FilterScope::Table),
            Self::ModalView | Self::ModalEdit => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::List => "keys",
            Self::Table => "value",
            Self::ModalView => "view",
            Self::ModalEdit => "edit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTrigger {
    Right,
    Left,
    Enter,
    EditCommand,
    Escape,
    Commit,
}

/// The complete transition table. `None` means the trigger is not a focus
/// change in `current`.
pub fn next_focus(
    current: FocusState,
    trigger: FocusTrigger,
    catalog_empty: bool,
) -> Option<FocusState> {
    match (current, trigger) {
        (FocusState::List, FocusTrigger::Right | FocusTrigger::Enter) if !catalog_empty => {
            Some(FocusState::Table)
        }
        (FocusState::Table, FocusTrigger::Left) => Some(FocusState::List),
        (FocusState::Table, FocusTrigger::Enter) => Some(FocusState::ModalView),
        (FocusState::Table, FocusTrigger::EditCommand) => Some(FocusState::ModalEdit),
        (FocusState::ModalView, FocusTrigger::Enter | FocusTrigger::Escape) => {
            Some(FocusState::Table)
        }
        (FocusState::ModalEdit, FocusTrigger::Commit | FocusTrigger::Escape) => {
            Some(FocusState::Table)
        }
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FocusController {
    state: FocusState,
}

impl FocusController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> FocusState {
        self.state
    }

    /// Moves input ownership. The filter always starts over in the new region.
    pub fn set_focus(&mut self, next: FocusState, filter: &mut FilterBuffer) {
        tracing::debug!(from = ?self.state, to = ?next, "focus changed");
        self.state = next;
        match next.filter_scope() {
            Some(scope) => filter.rescope(scope),
            None => filter.reset(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FocusController, FocusState, FocusTrigger, next_focus};
    use crate::{FilterBuffer, FilterScope};

    const ALL_STATES: [FocusState; 4] = [
        FocusState::List,
        FocusState::Table,
        FocusState::ModalView,
        FocusState::ModalEdit,
    ];
    const ALL_TRIGGERS: [FocusTrigger; 6] = [
        FocusTrigger::Right,
        FocusTrigger::Left,
        FocusTrigger::Enter,
        FocusTrigger::EditCommand,
        FocusTrigger::Escape,
        FocusTrigger::Commit,
    ];

    #[test]
    fn legal_transitions_match_the_table() {
        let mut legal = Vec::new();
        for state in ALL_STATES {
            for trigger in ALL_TRIGGERS {
                if let Some(next) = next_focus(state, trigger, false) {
                    legal.push((state, trigger, next));
                }
            }
        }

        assert_eq!(
            legal,
            vec![
                (FocusState::List, FocusTrigger::Right, FocusState::Table),
                (FocusState::List, FocusTrigger::Enter, FocusState::Table),
                (FocusState::Table, FocusTrigger::Left, FocusState::List),
                (FocusState::Table, FocusTrigger::Enter, FocusState::ModalView),
                (FocusState::Table, FocusTrigger::EditCommand, FocusState::ModalEdit),
                (FocusState::ModalView, FocusTrigger::Enter, FocusState::Table),
                (FocusState::ModalView, FocusTrigger::Escape, FocusState::Table),
                (FocusState::ModalEdit, FocusTrigger::Escape, FocusState::Table),
                (FocusState::ModalEdit, FocusTrigger::Commit, FocusState::Table),
            ]
        );
    }

    #[test]
    fn empty_catalog_blocks_entering_the_table() {
        assert_eq!(next_focus(FocusState::List, FocusTrigger::Right, true), None);
        assert_eq!(next_focus(FocusState::List, FocusTrigger::Enter, true), None);
    }

    #[test]
    fn set_focus_always_resets_the_filter() {
        let mut focus = FocusController::new();
        let mut filter = FilterBuffer::new(FilterScope::List);

        for next in [
            FocusState::Table,
            FocusState::ModalView,
            FocusState::Table,
            FocusState::List,
        ] {
            filter.on_printable('a', [(0, "alpha")]);
            focus.set_focus(next, &mut filter);
            assert!(filter.is_empty(), "filter survived move to {next:?}");
            assert_eq!(focus.current(), next);
        }
        assert_eq!(filter.scope(), FilterScope::List);
    }
}
