// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;

use anyhow::{Context, Result, anyhow};
use kvlens_app::{DataAccess, InteractionController};
use kvlens_store::{DEFAULT_PORT, MemoryStore, RedisStore};
use std::env;

const DEMO_TITLE: &str = "Demo(memory)";

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), config::default_host())?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    let log_path = config::log_path()?;
    if options.print_log_path {
        println!("{}", log_path.display());
        return Ok(());
    }
    logging::init_logging(&log_path)?;

    if options.demo {
        let mut store = MemoryStore::new();
        store.seed_demo_data();
        tracing::info!(keys = store.len(), "demo store seeded");
        return launch(store, DEMO_TITLE.to_owned(), options.check_only);
    }

    let connect = config::connect_options(options.host, options.port)?;
    let store = RedisStore::connect(&connect).with_context(|| {
        format!(
            "open store at {} -- check -m/-p, or set {} and {} for protected servers",
            connect.address(),
            config::PASSWORD_ENV,
            config::DATABASE_ENV
        )
    })?;
    launch(store, config::title_base(&connect), options.check_only)
}

fn launch<S: DataAccess>(store: S, title_base: String, check_only: bool) -> Result<()> {
    let mut controller = InteractionController::load(store, title_base)?;
    if check_only {
        tracing::info!(keys = controller.catalog().len(), "startup check passed");
        return Ok(());
    }
    kvlens_tui::run_app(&mut controller)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    host: String,
    port: u16,
    demo: bool,
    check_only: bool,
    print_log_path: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_host: String) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        host: default_host,
        port: DEFAULT_PORT,
        demo: false,
        check_only: false,
        print_log_path: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--host" | "-m" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--host requires a host name"))?;
                let host = value.as_ref().trim();
                if host.is_empty() {
                    return Err(anyhow!("--host requires a non-empty host name"));
                }
                options.host = host.to_owned();
            }
            "--port" | "-p" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--port requires a port number"))?;
                options.port = parse_port(value.as_ref())?;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--print-log-path" => {
                options.print_log_path = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn parse_port(raw: &str) -> Result<u16> {
    match raw.parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(anyhow!("invalid port {raw:?}; expected a number from 1 to 65535")),
    }
}

fn print_help() {
    println!("kvlens");
    println!("  -m, --host <host>    Server host (default: $HOSTNAME or localhost)");
    println!("  -p, --port <port>    Server port (default: {DEFAULT_PORT})");
    println!("  --demo               Browse a seeded in-memory store");
    println!("  --check              Connect, list keys, and exit");
    println!("  --print-log-path     Print resolved log file path");
    println!("  --help               Show this help");
    println!();
    println!("Environment: KVLENS_PASSWORD, KVLENS_DB, KVLENS_LOG_PATH, RUST_LOG");
}
