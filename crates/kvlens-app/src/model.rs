// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyKind {
    Scalar,
    Hash,
    List,
    Set,
    SortedSet,
}

impl KeyKind {
    pub const ALL: [Self; 5] = [
        Self::Scalar,
        Self::Hash,
        Self::List,
        Self::Set,
        Self::SortedSet,
    ];

    /// Store-side type name, as reported by `TYPE`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scalar => "string",
            Self::Hash => "hash",
            Self::List => "list",
            Self::Set => "set",
            Self::SortedSet => "zset",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "string" => Some(Self::Scalar),
            "hash" => Some(Self::Hash),
            "list" => Some(Self::List),
            "set" => Some(Self::Set),
            "zset" => Some(Self::SortedSet),
            _ => None,
        }
    }

    /// Column holding the value text in the value pane.
    pub const fn value_column(self) -> usize {
        match self {
            Self::Hash => 1,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDescriptor {
    pub name: String,
    pub kind: KeyKind,
}

impl KeyDescriptor {
    pub fn new(name: impl Into<String>, kind: KeyKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueRow {
    pub label: String,
    pub value: String,
    pub editable: bool,
    pub selectable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub key_index: usize,
    pub table_row: usize,
    pub table_col: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Terminal-agnostic key event fed to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Escape,
    Backspace,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Edit,
    Refresh,
    Char(char),
}

/// Synchronous, independently fallible access to the backing key-value store.
pub trait DataAccess {
    fn list_all_keys(&mut self) -> Result<Vec<String>>;
    fn type_of(&mut self, key: &str) -> Result<KeyKind>;
    fn get_scalar(&mut self, key: &str) -> Result<String>;
    fn get_hash_fields(&mut self, key: &str) -> Result<BTreeMap<String, String>>;
    fn get_members(&mut self, key: &str, kind: KeyKind) -> Result<Vec<String>>;
    fn set_scalar(&mut self, key: &str, value: &str) -> Result<()>;
    fn set_hash_field(&mut self, key: &str, field: &str, value: &str) -> Result<()>;
}

impl<T: DataAccess + ?Sized> DataAccess for &mut T {
    fn list_all_keys(&mut self) -> Result<Vec<String>> {
        (**self).list_all_keys()
    }

    fn type_of(&mut self, key: &str) -> Result<KeyKind> {
        (**self).type_of(key)
    }

    fn get_scalar(&mut self, key: &str) -> Result<String> {
        (**self).get_scalar(key)
    }

    fn get_hash_fields(&mut self, key: &str) -> Result<BTreeMap<String, String>> {
        (**self).get_hash_fields(key)
    }

    fn get_members(&mut self, key: &str, kind: KeyKind) -> Result<Vec<String>> {
        (**self).get_members(key, kind)
    }

    fn set_scalar(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set_scalar(key, value)
    }

    fn set_hash_field(&mut self, key: &str, field: &str, value: &str) -> Result<()> {
        (**self).set_hash_field(key, field, value)
    }
}

#[cfg(test)]
mod tests {
    use super::KeyKind;

    #[test]
    fn parse_accepts_store_type_names() {
        for kind in KeyKind::ALL {
            assert_eq!(KeyKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(KeyKind::parse(" HASH\n"), Some(KeyKind::Hash));
        assert_eq!(KeyKind::parse("stream"), None);
        assert_eq!(KeyKind::parse("none"), None);
    }

    #[test]
    fn only_hash_values_live_in_the_second_column() {
        assert_eq!(KeyKind::Hash.value_column(), 1);
        assert_eq!(KeyKind::Scalar.value_column(), 0);
        assert_eq!(KeyKind::SortedSet.value_column(), 0);
    }
}
