// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod memory;
mod redis_store;

pub use memory::{MemoryStore, StoredValue};
pub use redis_store::{ConnectOptions, RedisStore, connection_url};

pub const APP_NAME: &str = "kvlens";
pub const DEFAULT_PORT: u16 = 3978;

/// Display form of a sorted-set member, e.g. `alice (42)`.
pub(crate) fn scored_member(member: &str, score: f64) -> String {
    format!("{member} ({score})")
}
