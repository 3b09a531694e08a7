// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterScope {
    List,
    Table,
}

/// Incremental type-ahead text for the focused region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterBuffer {
    text: String,
    scope: FilterScope,
}

impl FilterBuffer {
    pub fn new(scope: FilterScope) -> Self {
        Self {
            text: String::new(),
            scope,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn scope(&self) -> FilterScope {
        self.scope
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn reset(&mut self) {
        self.text.clear();
    }

    pub fn rescope(&mut self, scope: FilterScope) {
        self.text.clear();
        self.scope = scope;
    }

    /// Appends `ch` and scans `candidates` once from the start. The buffer
    /// keeps unmatched text; the caller moves its selection only on `Some`.
    pub fn on_printable<'a, I>(&mut self, ch: char, candidates: I) -> Option<usize>
    where
        I: IntoIterator<Item = (usize, &'a str)>,
    {
        self.text.push(ch);
        let needle = self.text.to_uppercase();
        candidates
            .into_iter()
            .find(|(_, label)| label.to_uppercase().contains(&needle))
            .map(|(index, _)| index)
    }
}

impl Default for FilterBuffer {
    fn default() -> Self {
        Self::new(FilterScope::List)
    }
}

pub fn first_match<'a, I>(labels: I, needle: &str) -> Option<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let needle = needle.to_uppercase();
    labels
        .into_iter()
        .position(|label| label.to_uppercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::{FilterBuffer, FilterScope, first_match};

    const FRUIT: [&str; 3] = ["apple", "banana", "grape"];

    fn indexed(labels: &[&'static str]) -> Vec<(usize, &'static str)> {
        labels.iter().copied().enumerate().collect()
    }

    #[test]
    fn first_substring_match_wins() {
        let mut buffer = FilterBuffer::new(FilterScope::List);
        assert_eq!(buffer.on_printable('a', indexed(&FRUIT)), Some(0));
        assert_eq!(buffer.on_printable('n', indexed(&FRUIT)), Some(1));
        assert_eq!(buffer.text(), "an");
    }

    #[test]
    fn matching_ignores_case() {
        let mut buffer = FilterBuffer::new(FilterScope::List);
        buffer.on_printable('G', indexed(&FRUIT));
        assert_eq!(buffer.on_printable('R', indexed(&FRUIT)), Some(2));
        assert_eq!(first_match(["User:1", "order:9"], "USER"), Some(0));
    }

    #[test]
    fn unmatched_text_is_retained() {
        let mut buffer = FilterBuffer::new(FilterScope::Table);
        assert_eq!(buffer.on_printable('x', indexed(&FRUIT)), None);
        assert_eq!(buffer.on_printable('y', indexed(&FRUIT)), None);
        assert_eq!(buffer.text(), "xy");
    }

    #[test]
    fn candidate_indexes_are_reported_verbatim() {
        let mut buffer = FilterBuffer::new(FilterScope::Table);
        let rows = vec![(1, "name"), (2, "city"), (3, "country")];
        assert_eq!(buffer.on_printable('c', rows), Some(2));
    }

    #[test]
    fn rescope_clears_text() {
        let mut buffer = FilterBuffer::new(FilterScope::List);
        buffer.on_printable('a', indexed(&FRUIT));
        buffer.rescope(FilterScope::Table);
        assert!(buffer.is_empty());
        assert_eq!(buffer.scope(), FilterScope::Table);
    }
}
