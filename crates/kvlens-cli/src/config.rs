// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use kvlens_store::{APP_NAME, ConnectOptions};
use std::env;
use std::path::PathBuf;

pub const PASSWORD_ENV: &str = "KVLENS_PASSWORD";
pub const DATABASE_ENV: &str = "KVLENS_DB";
pub const LOG_PATH_ENV: &str = "KVLENS_LOG_PATH";

const FALLBACK_HOST: &str = "localhost";
const LOG_FILE_NAME: &str = "kvlens.log";

pub fn default_host() -> String {
    env::var("HOSTNAME")
        .ok()
        .map(|host| host.trim().to_owned())
        .filter(|host| !host.is_empty())
        .unwrap_or_else(|| FALLBACK_HOST.to_owned())
}

/// Connection settings from the parsed flags plus `KVLENS_PASSWORD` and
/// `KVLENS_DB`.
pub fn connect_options(host: String, port: u16) -> Result<ConnectOptions> {
    let password = env::var(PASSWORD_ENV).ok();
    let database = env::var(DATABASE_ENV).ok();
    build_connect_options(host, port, password, database.as_deref())
}

fn build_connect_options(
    host: String,
    port: u16,
    password: Option<String>,
    database: Option<&str>,
) -> Result<ConnectOptions> {
    let database = database
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(parse_database)
        .transpose()?;
    Ok(ConnectOptions {
        host,
        port,
        password: password.filter(|value| !value.is_empty()),
        database,
    })
}

fn parse_database(raw: &str) -> Result<u32> {
    raw.parse::<u32>().map_err(|_| {
        anyhow!("{DATABASE_ENV}={raw:?} is not a database index; use a non-negative integer")
    })
}

pub fn log_path() -> Result<PathBuf> {
    if let Some(path) = env::var_os(LOG_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }

    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve local data directory; set {LOG_PATH_ENV} to the log file")
    })?;
    Ok(data_root.join(APP_NAME).join(LOG_FILE_NAME))
}

pub fn title_base(options: &ConnectOptions) -> String {
    format!("Redis({}:{})", options.host, options.port)
}

#[cfg(test)]
mod tests {
    use super::{LOG_PATH_ENV, build_connect_options, default_host, log_path, title_base};
    use anyhow::Result;
    use std::sync::{Mutex, OnceLock};

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn database_index_is_parsed_and_blank_is_ignored() -> Result<()> {
        let options = build_connect_options("h".to_owned(), 1, None, Some(" 3 "))?;
        assert_eq!(options.database, Some(3));

        let options = build_connect_options("h".to_owned(), 1, None, Some(""))?;
        assert_eq!(options.database, None);
        Ok(())
    }

    #[test]
    fn malformed_database_index_is_actionable() {
        let error = build_connect_options("h".to_owned(), 1, None, Some("-1"))
            .expect_err("negative index should fail");
        let message = error.to_string();
        assert!(message.contains("KVLENS_DB"));
        assert!(message.contains("non-negative integer"));
    }

    #[test]
    fn empty_password_means_no_auth() -> Result<()> {
        let options = build_connect_options("h".to_owned(), 1, Some(String::new()), None)?;
        assert_eq!(options.password, None);

        let options = build_connect_options("h".to_owned(), 1, Some("pw".to_owned()), None)?;
        assert_eq!(options.password.as_deref(), Some("pw"));
        Ok(())
    }

    #[test]
    fn title_base_names_the_server() -> Result<()> {
        let options = build_connect_options("cache".to_owned(), 3978, None, None)?;
        assert_eq!(title_base(&options), "Redis(cache:3978)");
        Ok(())
    }

    #[test]
    fn log_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom.log");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var(LOG_PATH_ENV, &override_path);
        }
        let resolved = log_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var(LOG_PATH_ENV);
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn log_path_defaults_under_app_directory() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var(LOG_PATH_ENV);
        }
        let path = log_path()?;
        assert!(path.ends_with("kvlens/kvlens.log"));
        Ok(())
    }

    #[test]
    fn default_host_is_never_empty() {
        let _guard = env_lock();
        assert!(!default_host().is_empty());
    }
}
