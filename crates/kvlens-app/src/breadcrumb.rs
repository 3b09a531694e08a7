// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub const BREADCRUMB_SEPARATOR: &str = " --> ";

/// Joins the non-empty segments after `base`.
pub fn render_breadcrumb<'a, I>(base: &'a str, path: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut parts = vec![base];
    parts.extend(path.into_iter().filter(|segment| !segment.is_empty()));
    parts.join(BREADCRUMB_SEPARATOR)
}

/// Navigation path the title is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavPath<'a> {
    pub key: Option<&'a str>,
    pub field: Option<&'a str>,
    pub filter: &'a str,
}

impl NavPath<'_> {
    /// An active filter replaces the key/field path rather than extending it.
    pub fn render(&self, base: &str) -> String {
        if !self.filter.is_empty() {
            return render_breadcrumb(base, [self.filter]);
        }
        match (self.key, self.field) {
            (Some(key), Some(field)) => {
                let segment = format!("{key} ==> ({field})");
                render_breadcrumb(base, [segment.as_str()])
            }
            (Some(key), None) => render_breadcrumb(base, [key]),
            (None, _) => base.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NavPath, render_breadcrumb};

    const BASE: &str = "Store(h:p)";

    #[test]
    fn base_only_when_path_is_empty() {
        assert_eq!(render_breadcrumb(BASE, []), BASE);
        assert_eq!(NavPath::default().render(BASE), BASE);
    }

    #[test]
    fn empty_segments_are_skipped() {
        assert_eq!(
            render_breadcrumb(BASE, ["user:1", "", "extra"]),
            "Store(h:p) --> user:1 --> extra"
        );
    }

    #[test]
    fn key_then_field_marker() {
        let path = NavPath {
            key: Some("user:1"),
            field: Some("city"),
            filter: "",
        };
        assert_eq!(path.render(BASE), "Store(h:p) --> user:1 ==> (city)");
    }

    #[test]
    fn filter_replaces_key_segment() {
        let path = NavPath {
            key: Some("user:1"),
            field: None,
            filter: "na",
        };
        assert_eq!(path.render(BASE), "Store(h:p) --> na");
    }

    #[test]
    fn base_and_segments_may_be_borrowed_from_owned_strings() {
        let base = format!("Redis({}:{})", "cache", 6379);
        let segments = vec!["user:1".to_owned(), String::new()];
        let title = render_breadcrumb(&base, segments.iter().map(String::as_str));
        assert_eq!(title, "Redis(cache:6379) --> user:1");
    }
}
