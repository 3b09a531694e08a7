// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::scored_member;
use anyhow::{Context, Result, anyhow};
use kvlens_app::{DataAccess, KeyKind};
use std::collections::BTreeMap;
use std::time::Duration;

const SCAN_COUNT: usize = 100;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub database: Option<u32>,
}

impl ConnectOptions {
    pub fn address(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

pub fn connection_url(options: &ConnectOptions) -> String {
    format!("redis://{}/", options.address())
}

pub struct RedisStore {
    connection: redis::Connection,
}

impl RedisStore {
    /// Opens the connection, authenticates and selects the database, then
    /// verifies it with `PING`.
    pub fn connect(options: &ConnectOptions) -> Result<Self> {
        let address = options.address();
        let client = redis::Client::open(connection_url(options))
            .with_context(|| format!("invalid store address {address}"))?;
        let mut connection = client
            .get_connection_with_timeout(CONNECT_TIMEOUT)
            .with_context(|| format!("connect to {address}"))?;

        if let Some(password) = &options.password {
            redis::cmd("AUTH")
                .arg(password)
                .query::<String>(&mut connection)
                .with_context(|| format!("authenticate with {address}"))?;
        }
        if let Some(database) = options.database {
            redis::cmd("SELECT")
                .arg(database)
                .query::<String>(&mut connection)
                .with_context(|| format!("select database {database} on {address}"))?;
        }
        redis::cmd("PING")
            .query::<String>(&mut connection)
            .with_context(|| format!("ping {address}"))?;

        tracing::info!(address = %address, database = ?options.database, "connected");
        Ok(Self { connection })
    }
}

impl DataAccess for RedisStore {
    fn list_all_keys(&mut self) -> Result<Vec<String>> {
        let mut cursor = 0_u64;
        let mut keys = Vec::new();
        loop {
            let reply = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg("*")
                .arg("COUNT")
                .arg(SCAN_COUNT)
                .query::<redis::Value>(&mut self.connection)
                .context("scan keys")?;
            let (next, batch) = decode_scan_reply(&reply)?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }
        tracing::debug!(count = keys.len(), "scanned keys");
        Ok(keys)
    }

    fn type_of(&mut self, key: &str) -> Result<KeyKind> {
        let name = redis::cmd("TYPE")
            .arg(key)
            .query::<String>(&mut self.connection)
            .with_context(|| format!("type of {key:?}"))?;
        Ok(KeyKind::parse(&name).unwrap_or_else(|| {
            tracing::debug!(key, type_name = %name, "unsupported type shown as scalar");
            KeyKind::Scalar
        }))
    }

    fn get_scalar(&mut self, key: &str) -> Result<String> {
        let bytes = redis::cmd("GET")
            .arg(key)
            .query::<Option<Vec<u8>>>(&mut self.connection)
            .with_context(|| format!("get {key:?}"))?
            .ok_or_else(|| anyhow!("key {key:?} not found"))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn get_hash_fields(&mut self, key: &str) -> Result<BTreeMap<String, String>> {
        let flat = redis::cmd("HGETALL")
            .arg(key)
            .query::<Vec<Vec<u8>>>(&mut self.connection)
            .with_context(|| format!("read hash {key:?}"))?;
        Ok(pair_up(lossy_strings(flat)))
    }

    fn get_members(&mut self, key: &str, kind: KeyKind) -> Result<Vec<String>> {
        let command = match kind {
            KeyKind::List => {
                let mut command = redis::cmd("LRANGE");
                command.arg(key).arg(0).arg(-1);
                command
            }
            KeyKind::Set => {
                let mut command = redis::cmd("SMEMBERS");
                command.arg(key);
                command
            }
            KeyKind::SortedSet => {
                let mut command = redis::cmd("ZRANGE");
                command.arg(key).arg(0).arg(-1).arg("WITHSCORES");
                command
            }
            KeyKind::Scalar | KeyKind::Hash => {
                return Err(anyhow!("{key:?} is a {}, not a collection", kind.as_str()));
            }
        };
        let flat = command
            .query::<Vec<Vec<u8>>>(&mut self.connection)
            .with_context(|| format!("read {} {key:?}", kind.as_str()))?;
        let mut members = lossy_strings(flat);
        match kind {
            KeyKind::Set => members.sort(),
            KeyKind::SortedSet => members = pair_scores(members)?,
            _ => {}
        }
        Ok(members)
    }

    fn set_scalar(&mut self, key: &str, value: &str) -> Result<()> {
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .query::<String>(&mut self.connection)
            .with_context(|| format!("set {key:?}"))?;
        tracing::debug!(key, "scalar written");
        Ok(())
    }

    fn set_hash_field(&mut self, key: &str, field: &str, value: &str) -> Result<()> {
        redis::cmd("HSET")
            .arg(key)
            .arg(field)
            .arg(value)
            .query::<i64>(&mut self.connection)
            .with_context(|| format!("set field {field:?} of {key:?}"))?;
        tracing::debug!(key, field, "hash field written");
        Ok(())
    }
}

/// Splits a `SCAN` reply into the next cursor and the batch of keys. Keys
/// that are not valid UTF-8 are decoded lossily.
fn decode_scan_reply(reply: &redis::Value) -> Result<(u64, Vec<String>)> {
    let (next, batch) = redis::from_redis_value::<(u64, Vec<Vec<u8>>)>(reply)
        .context("decode scan reply")?;
    Ok((next, lossy_strings(batch)))
}

fn lossy_strings(replies: Vec<Vec<u8>>) -> Vec<String> {
    replies
        .iter()
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        .collect()
}

/// Folds a flat `ZRANGE .. WITHSCORES` reply into `member (score)` rows.
fn pair_scores(flat: Vec<String>) -> Result<Vec<String>> {
    let mut members = Vec::with_capacity(flat.len() / 2);
    let mut iter = flat.into_iter();
    while let (Some(member), Some(score)) = (iter.next(), iter.next()) {
        let score = score
            .parse::<f64>()
            .with_context(|| format!("invalid score {score:?} for member {member:?}"))?;
        members.push(scored_member(&member, score));
    }
    Ok(members)
}

fn pair_up(flat: Vec<String>) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    let mut iter = flat.into_iter();
    while let (Some(field), Some(value)) = (iter.next(), iter.next()) {
        fields.insert(field, value);
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::{ConnectOptions, connection_url, decode_scan_reply, pair_scores, pair_up};
    use anyhow::Result;
    use redis::Value;

    fn options(host: &str) -> ConnectOptions {
        ConnectOptions {
            host: host.to_owned(),
            port: 6380,
            password: None,
            database: None,
        }
    }

    #[test]
    fn connection_url_uses_host_and_port() {
        assert_eq!(connection_url(&options("cache.local")), "redis://cache.local:6380/");
    }

    #[test]
    fn ipv6_hosts_are_bracketed() {
        assert_eq!(options("::1").address(), "[::1]:6380");
        assert_eq!(connection_url(&options("::1")), "redis://[::1]:6380/");
    }

    #[test]
    fn hgetall_reply_pairs_into_sorted_fields() {
        let fields = pair_up(
            ["name", "Ada", "city", "London", "dangling"]
                .map(str::to_owned)
                .to_vec(),
        );
        assert_eq!(
            fields.into_iter().collect::<Vec<_>>(),
            vec![
                ("city".to_owned(), "London".to_owned()),
                ("name".to_owned(), "Ada".to_owned()),
            ]
        );
    }

    #[test]
    fn scan_reply_with_binary_key_keeps_the_other_keys() -> Result<()> {
        let reply = Value::Array(vec![
            Value::BulkString(b"17".to_vec()),
            Value::Array(vec![
                Value::BulkString(b"good".to_vec()),
                Value::BulkString(b"bin\xff\xfe".to_vec()),
                Value::BulkString(b"also:good".to_vec()),
            ]),
        ]);

        let (next, keys) = decode_scan_reply(&reply)?;

        assert_eq!(next, 17);
        assert_eq!(keys, vec!["good", "bin\u{fffd}\u{fffd}", "also:good"]);
        Ok(())
    }

    #[test]
    fn malformed_scan_reply_is_an_error() {
        let reply = Value::BulkString(b"oops".to_vec());
        assert!(decode_scan_reply(&reply).is_err());
    }

    #[test]
    fn zrange_scores_are_shown_beside_members() -> Result<()> {
        let members = pair_scores(
            ["bob", "17.5", "alice", "42"].map(str::to_owned).to_vec(),
        )?;
        assert_eq!(members, vec!["bob (17.5)", "alice (42)"]);

        let error = pair_scores(["bob", "high"].map(str::to_owned).to_vec())
            .expect_err("non-numeric score should fail");
        assert!(format!("{error:#}").contains("invalid score"));
        Ok(())
    }
}
