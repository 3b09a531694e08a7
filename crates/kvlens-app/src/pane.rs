// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Direction, KeyKind, ValueRow};
use std::collections::BTreeMap;

pub const HASH_HEADER: [&str; 2] = ["Field", "Value"];

/// Tabular view of one key's contents. Rebuilt wholesale on selection
/// change; only commits patch a single cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuePane {
    kind: KeyKind,
    rows: Vec<ValueRow>,
}

impl Default for ValuePane {
    fn default() -> Self {
        Self::empty()
    }
}

impl ValuePane {
    pub fn empty() -> Self {
        Self {
            kind: KeyKind::Scalar,
            rows: Vec::new(),
        }
    }

    pub fn scalar(value: impl Into<String>) -> Self {
        Self {
            kind: KeyKind::Scalar,
            rows: vec![ValueRow {
                label: String::new(),
                value: value.into(),
                editable: true,
                selectable: true,
            }],
        }
    }

    pub fn hash(fields: BTreeMap<String, String>) -> Self {
        let mut rows = Vec::with_capacity(fields.len() + 1);
        rows.push(ValueRow {
            label: HASH_HEADER[0].to_owned(),
            value: HASH_HEADER[1].to_owned(),
            editable: false,
            selectable: false,
        });
        rows.extend(fields.into_iter().map(|(label, value)| ValueRow {
            label,
            value,
            editable: true,
            selectable: true,
        }));
        Self {
            kind: KeyKind::Hash,
            rows,
        }
    }

    pub fn members(kind: KeyKind, members: Vec<String>) -> Self {
        let rows = members
            .into_iter()
            .map(|value| ValueRow {
                label: String::new(),
                value,
                editable: false,
                selectable: true,
            })
            .collect();
        Self { kind, rows }
    }

    pub fn kind(&self) -> KeyKind {
        self.kind
    }

    pub fn rows(&self) -> &[ValueRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&ValueRow> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_count(&self) -> usize {
        match self.kind {
            KeyKind::Hash => 2,
            _ => 1,
        }
    }

    pub fn cell_text(&self, row: usize, col: usize) -> Option<&str> {
        let row = self.rows.get(row)?;
        match (self.kind, col) {
            (KeyKind::Hash, 0) => Some(&row.label),
            (KeyKind::Hash, 1) => Some(&row.value),
            (_, 0) => Some(&row.value),
            _ => None,
        }
    }

    /// Rows eligible for table-scope filtering, keyed by their column-0 text.
    pub fn filter_candidates(&self) -> impl Iterator<Item = (usize, &str)> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.selectable)
            .map(|(index, row)| match self.kind {
                KeyKind::Hash => (index, row.label.as_str()),
                _ => (index, row.value.as_str()),
            })
    }

    pub fn first_selectable(&self) -> Option<usize> {
        self.rows.iter().position(|row| row.selectable)
    }

    pub fn last_selectable(&self) -> Option<usize> {
        self.rows.iter().rposition(|row| row.selectable)
    }

    /// Next selectable row in `direction`, clamped at either end.
    pub fn step(&self, row: usize, direction: Direction) -> usize {
        let found = match direction {
            Direction::Down => self
                .rows
                .iter()
                .enumerate()
                .skip(row.saturating_add(1))
                .find(|(_, candidate)| candidate.selectable)
                .map(|(index, _)| index),
            Direction::Up => self.rows[..row.min(self.rows.len())]
                .iter()
                .rposition(|candidate| candidate.selectable),
        };
        found.unwrap_or(row)
    }

    /// Replaces the value cell of one row in place.
    pub fn update_value(&mut self, row: usize, value: impl Into<String>) -> bool {
        match self.rows.get_mut(row) {
            Some(entry) if entry.editable => {
                entry.value = value.into();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ValuePane;
    use crate::{Direction, KeyKind};
    use std::collections::BTreeMap;

    fn user_hash() -> ValuePane {
        ValuePane::hash(BTreeMap::from([
            ("name".to_owned(), "Ada".to_owned()),
            ("city".to_owned(), "London".to_owned()),
        ]))
    }

    #[test]
    fn hash_pane_has_header_then_sorted_fields() {
        let pane = user_hash();
        assert_eq!(pane.len(), 3);
        assert_eq!(pane.cell_text(0, 0), Some("Field"));
        assert_eq!(pane.cell_text(1, 0), Some("city"));
        assert_eq!(pane.cell_text(1, 1), Some("London"));
        assert_eq!(pane.cell_text(2, 1), Some("Ada"));
        assert_eq!(pane.first_selectable(), Some(1));
    }

    #[test]
    fn scalar_pane_uses_first_column_only() {
        let pane = ValuePane::scalar("hello");
        assert_eq!(pane.cell_text(0, 0), Some("hello"));
        assert_eq!(pane.cell_text(0, 1), None);
        assert_eq!(pane.column_count(), 1);
    }

    #[test]
    fn step_skips_header_and_clamps() {
        let pane = user_hash();
        assert_eq!(pane.step(1, Direction::Up), 1);
        assert_eq!(pane.step(1, Direction::Down), 2);
        assert_eq!(pane.step(2, Direction::Down), 2);
        assert_eq!(pane.step(0, Direction::Up), 0);
    }

    #[test]
    fn filter_candidates_exclude_header() {
        let pane = user_hash();
        let candidates = pane.filter_candidates().collect::<Vec<_>>();
        assert_eq!(candidates, vec![(1, "city"), (2, "name")]);

        let list = ValuePane::members(KeyKind::List, vec!["a".to_owned(), "b".to_owned()]);
        assert_eq!(list.filter_candidates().collect::<Vec<_>>(), vec![(0, "a"), (1, "b")]);
    }

    #[test]
    fn update_value_touches_one_editable_row() {
        let mut pane = user_hash();
        assert!(pane.update_value(1, "Paris"));
        assert_eq!(pane.cell_text(1, 1), Some("Paris"));
        assert_eq!(pane.cell_text(2, 1), Some("Ada"));
        assert!(!pane.update_value(0, "nope"));

        let mut set = ValuePane::members(KeyKind::Set, vec!["x".to_owned()]);
        assert!(!set.update_value(0, "y"));
    }
}
