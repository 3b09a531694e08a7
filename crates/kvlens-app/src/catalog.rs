// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::filter::first_match;
use crate::{Direction, KeyDescriptor};

/// Ordered snapshot of the keys currently known to the browser.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyCatalog {
    entries: Vec<KeyDescriptor>,
}

impl KeyCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the snapshot wholesale and returns the index to select:
    /// the first entry matching `filter`, or 0.
    pub fn refresh(&mut self, mut keys: Vec<KeyDescriptor>, filter: &str) -> usize {
        keys.sort_by(|left, right| left.name.cmp(&right.name));
        keys.dedup_by(|next, prev| next.name == prev.name);
        self.entries = keys;

        if filter.is_empty() {
            return 0;
        }
        first_match(self.labels(), filter).unwrap_or(0)
    }

    pub fn entries(&self) -> &[KeyDescriptor] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&KeyDescriptor> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Circular step: Down past the last entry lands on 0, Up from 0 lands
    /// on the last entry.
    pub fn navigate(&self, index: usize, direction: Direction) -> usize {
        let len = self.entries.len();
        if len == 0 {
            return 0;
        }
        let delta = match direction {
            Direction::Up => -1,
            Direction::Down => 1,
        };
        (index.min(len - 1) as isize + delta).rem_euclid(len as isize) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::KeyCatalog;
    use crate::{Direction, KeyDescriptor, KeyKind};

    fn catalog_of(count: usize) -> KeyCatalog {
        let mut catalog = KeyCatalog::new();
        let keys = (0..count)
            .map(|index| KeyDescriptor::new(format!("key:{index:03}"), KeyKind::Scalar))
            .collect();
        catalog.refresh(keys, "");
        catalog
    }

    #[test]
    fn navigation_wraps_in_both_directions() {
        for count in [1, 2, 50] {
            let catalog = catalog_of(count);
            assert_eq!(catalog.navigate(count - 1, Direction::Down), 0, "n={count}");
            assert_eq!(catalog.navigate(0, Direction::Up), count - 1, "n={count}");
        }
    }

    #[test]
    fn navigation_steps_inside_the_range() {
        let catalog = catalog_of(3);
        assert_eq!(catalog.navigate(0, Direction::Down), 1);
        assert_eq!(catalog.navigate(2, Direction::Up), 1);
    }

    #[test]
    fn navigation_on_empty_catalog_stays_at_zero() {
        let catalog = KeyCatalog::new();
        assert_eq!(catalog.navigate(0, Direction::Down), 0);
        assert_eq!(catalog.navigate(0, Direction::Up), 0);
    }

    #[test]
    fn refresh_sorts_and_drops_duplicate_names() {
        let mut catalog = KeyCatalog::new();
        let index = catalog.refresh(
            vec![
                KeyDescriptor::new("zeta", KeyKind::Scalar),
                KeyDescriptor::new("alpha", KeyKind::Hash),
                KeyDescriptor::new("zeta", KeyKind::Scalar),
                KeyDescriptor::new("mid", KeyKind::List),
            ],
            "",
        );

        assert_eq!(index, 0);
        assert_eq!(catalog.labels().collect::<Vec<_>>(), ["alpha", "mid", "zeta"]);
    }

    #[test]
    fn refresh_selects_first_filter_match() {
        let mut catalog = KeyCatalog::new();
        let keys = ["grape", "banana", "apple"]
            .into_iter()
            .map(|name| KeyDescriptor::new(name, KeyKind::Scalar))
            .collect();

        assert_eq!(catalog.refresh(keys, "AN"), 1);
        assert_eq!(catalog.get(1).map(|entry| entry.name.as_str()), Some("banana"));
    }

    #[test]
    fn refresh_without_match_selects_first_entry() {
        let mut catalog = KeyCatalog::new();
        let keys = vec![KeyDescriptor::new("apple", KeyKind::Scalar)];
        assert_eq!(catalog.refresh(keys, "zz"), 0);
    }
}
