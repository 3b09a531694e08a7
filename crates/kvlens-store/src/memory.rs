// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow, bail};
use crate::scored_member;
use kvlens_app::{DataAccess, KeyKind};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    Scalar(String),
    Hash(BTreeMap<String, String>),
    List(Vec<String>),
    Set(BTreeSet<String>),
    /// Members with their scores; kept ordered by score, then member.
    SortedSet(Vec<(String, f64)>),
}

impl StoredValue {
    pub fn kind(&self) -> KeyKind {
        match self {
            Self::Scalar(_) => KeyKind::Scalar,
            Self::Hash(_) => KeyKind::Hash,
            Self::List(_) => KeyKind::List,
            Self::Set(_) => KeyKind::Set,
            Self::SortedSet(_) => KeyKind::SortedSet,
        }
    }

    pub fn hash<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Hash(
            fields
                .into_iter()
                .map(|(field, value)| (field.into(), value.into()))
                .collect(),
        )
    }

    pub fn sorted_set<I, M>(members: I) -> Self
    where
        I: IntoIterator<Item = (M, f64)>,
        M: Into<String>,
    {
        let mut members = members
            .into_iter()
            .map(|(member, score)| (member.into(), score))
            .collect::<Vec<_>>();
        members.sort_by(|left, right| {
            left.1
                .total_cmp(&right.1)
                .then_with(|| left.0.cmp(&right.0))
        });
        Self::SortedSet(members)
    }
}

/// In-process store with the same observable behaviour as the network
/// backend. Backs `--demo` and the test fixtures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    entries: BTreeMap<String, StoredValue>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: StoredValue) {
        self.entries.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&StoredValue> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn seed_demo_data(&mut self) {
        self.insert("config:motd", StoredValue::Scalar("welcome back".to_owned()));
        self.insert("counter:visits", StoredValue::Scalar("1024".to_owned()));
        self.insert(
            "user:1",
            StoredValue::hash([
                ("name", "Ada Lovelace"),
                ("city", "London"),
                ("role", "admin"),
            ]),
        );
        self.insert(
            "user:2",
            StoredValue::hash([
                ("name", "Alan Turing"),
                ("city", "Wilmslow"),
                ("role", "viewer"),
            ]),
        );
        self.insert(
            "queue:jobs",
            StoredValue::List(
                ["resize:42", "email:7", "resize:43"]
                    .map(str::to_owned)
                    .to_vec(),
            ),
        );
        self.insert(
            "tags:featured",
            StoredValue::Set(["rust", "terminal", "cache"].map(str::to_owned).into()),
        );
        self.insert(
            "leaderboard",
            StoredValue::sorted_set([("carol", 31.0), ("alice", 42.0), ("bob", 17.5)]),
        );
        self.insert(
            "notes:long",
            StoredValue::Scalar(
                (1..=40)
                    .map(|line| format!("line {line} of a long multi-line value"))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
        );
    }

    fn lookup(&self, key: &str) -> Result<&StoredValue> {
        self.entries
            .get(key)
            .ok_or_else(|| anyhow!("key {key:?} not found"))
    }
}

impl DataAccess for MemoryStore {
    fn list_all_keys(&mut self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }

    fn type_of(&mut self, key: &str) -> Result<KeyKind> {
        Ok(self.lookup(key)?.kind())
    }

    fn get_scalar(&mut self, key: &str) -> Result<String> {
        match self.lookup(key)? {
            StoredValue::Scalar(value) => Ok(value.clone()),
            other => bail!(wrong_type(key, other.kind())),
        }
    }

    fn get_hash_fields(&mut self, key: &str) -> Result<BTreeMap<String, String>> {
        match self.lookup(key)? {
            StoredValue::Hash(fields) => Ok(fields.clone()),
            other => bail!(wrong_type(key, other.kind())),
        }
    }

    fn get_members(&mut self, key: &str, kind: KeyKind) -> Result<Vec<String>> {
        match (self.lookup(key)?, kind) {
            (StoredValue::List(items), KeyKind::List) => Ok(items.clone()),
            (StoredValue::Set(items), KeyKind::Set) => Ok(items.iter().cloned().collect()),
            (StoredValue::SortedSet(items), KeyKind::SortedSet) => {
                Ok(items
                    .iter()
                    .map(|(member, score)| scored_member(member, *score))
                    .collect())
            }
            (other, _) => bail!(wrong_type(key, other.kind())),
        }
    }

    fn set_scalar(&mut self, key: &str, value: &str) -> Result<()> {
        self.insert(key, StoredValue::Scalar(value.to_owned()));
        Ok(())
    }

    fn set_hash_field(&mut self, key: &str, field: &str, value: &str) -> Result<()> {
        let entry = self
            .entries
            .entry(key.to_owned())
            .or_insert_with(|| StoredValue::Hash(BTreeMap::new()));
        match entry {
            StoredValue::Hash(fields) => {
                fields.insert(field.to_owned(), value.to_owned());
                Ok(())
            }
            other => bail!(wrong_type(key, other.kind())),
        }
    }
}

fn wrong_type(key: &str, actual: KeyKind) -> String {
    format!(
        "WRONGTYPE operation against {key:?} holding a {}",
        actual.as_str()
    )
}
