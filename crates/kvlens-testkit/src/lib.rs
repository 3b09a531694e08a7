// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use kvlens_app::{DataAccess, KeyKind};
use kvlens_store::{MemoryStore, StoredValue};
use std::collections::{BTreeMap, BTreeSet};

pub const TEST_TITLE: &str = "Store(h:p)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    ListAllKeys,
    TypeOf(String),
    GetScalar(String),
    GetHashFields(String),
    GetMembers(String),
    SetScalar { key: String, value: String },
    SetHashField { key: String, field: String, value: String },
}

impl StoreCall {
    pub fn is_write(&self) -> bool {
        matches!(self, Self::SetScalar { .. } | Self::SetHashField { .. })
    }
}

/// Memory-backed store that logs every call and can be told to fail.
#[derive(Debug, Clone, Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    calls: Vec<StoreCall>,
    failing_reads: BTreeSet<String>,
    fail_listing: bool,
    fail_writes: bool,
}

impl RecordingStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> &[StoreCall] {
        &self.calls
    }

    pub fn write_calls(&self) -> Vec<&StoreCall> {
        self.calls.iter().filter(|call| call.is_write()).collect()
    }

    pub fn value_reads(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| {
                matches!(
                    call,
                    StoreCall::GetScalar(_) | StoreCall::GetHashFields(_) | StoreCall::GetMembers(_)
                )
            })
            .count()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn fail_reads_of(&mut self, key: impl Into<String>) {
        self.failing_reads.insert(key.into());
    }

    pub fn set_fail_listing(&mut self, fail: bool) {
        self.fail_listing = fail;
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn inner_mut(&mut self) -> &mut MemoryStore {
        &mut self.inner
    }

    fn check_read(&self, key: &str) -> Result<()> {
        if self.failing_reads.contains(key) {
            return Err(anyhow!("simulated read failure for {key:?}"));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<()> {
        if self.fail_writes {
            return Err(anyhow!("simulated write failure"));
        }
        Ok(())
    }
}

impl DataAccess for RecordingStore {
    fn list_all_keys(&mut self) -> Result<Vec<String>> {
        self.calls.push(StoreCall::ListAllKeys);
        if self.fail_listing {
            return Err(anyhow!("simulated listing failure"));
        }
        self.inner.list_all_keys()
    }

    fn type_of(&mut self, key: &str) -> Result<KeyKind> {
        self.calls.push(StoreCall::TypeOf(key.to_owned()));
        self.inner.type_of(key)
    }

    fn get_scalar(&mut self, key: &str) -> Result<String> {
        self.calls.push(StoreCall::GetScalar(key.to_owned()));
        self.check_read(key)?;
        self.inner.get_scalar(key)
    }

    fn get_hash_fields(&mut self, key: &str) -> Result<BTreeMap<String, String>> {
        self.calls.push(StoreCall::GetHashFields(key.to_owned()));
        self.check_read(key)?;
        self.inner.get_hash_fields(key)
    }

    fn get_members(&mut self, key: &str, kind: KeyKind) -> Result<Vec<String>> {
        self.calls.push(StoreCall::GetMembers(key.to_owned()));
        self.check_read(key)?;
        self.inner.get_members(key, kind)
    }

    fn set_scalar(&mut self, key: &str, value: &str) -> Result<()> {
        self.calls.push(StoreCall::SetScalar {
            key: key.to_owned(),
            value: value.to_owned(),
        });
        self.check_write()?;
        self.inner.set_scalar(key, value)
    }

    fn set_hash_field(&mut self, key: &str, field: &str, value: &str) -> Result<()> {
        self.calls.push(StoreCall::SetHashField {
            key: key.to_owned(),
            field: field.to_owned(),
            value: value.to_owned(),
        });
        self.check_write()?;
        self.inner.set_hash_field(key, field, value)
    }
}

/// Scalar keys named `names`, each holding `value of <name>`.
pub fn scalar_catalog<I, S>(names: I) -> RecordingStore
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut store = MemoryStore::new();
    for name in names {
        let name = name.into();
        let value = format!("value of {name}");
        store.insert(name, StoredValue::Scalar(value));
    }
    RecordingStore::new(store)
}

/// `counter` (scalar), `queue` (list) and `user:1` (hash with city, country, name).
pub fn mixed_catalog() -> RecordingStore {
    let mut store = MemoryStore::new();
    store.insert("counter", StoredValue::Scalar("41".to_owned()));
    store.insert(
        "queue",
        StoredValue::List(vec!["first".to_owned(), "second".to_owned()]),
    );
    store.insert(
        "user:1",
        StoredValue::hash([("name", "Ada"), ("city", "London"), ("country", "UK")]),
    );
    RecordingStore::new(store)
}
