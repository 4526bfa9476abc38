//! Tracing setup
//!
//! Events always go to stdout: pretty in development, JSON in production.
//! With `logging.file` set they are also appended to that file, uncolored.

use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const PRODUCTION_FILTER: &str = "movie_accounts_backend=info,tower_http=info";
const DEVELOPMENT_FILTER: &str = "movie_accounts_backend=debug,tower_http=debug,sqlx=warn";

/// Install the global subscriber
///
/// `RUST_LOG` overrides the default filter.
pub fn init(logging: &LoggingConfig, production: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if production {
            PRODUCTION_FILTER
        } else {
            DEVELOPMENT_FILTER
        })
    });

    let file_layer = logging
        .file
        .as_deref()
        .map(open_log_file)
        .transpose()?
        .map(|file| fmt::layer().with_ansi(false).with_writer(Mutex::new(file)));

    let (json, pretty) = if production {
        (Some(fmt::layer().json()), None)
    } else {
        (None, Some(fmt::layer().pretty()))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(json)
        .with(pretty)
        .try_init()
        .context("tracing subscriber already installed")
}

fn open_log_file(path: &str) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path))
}
