//! Tracing setup for the CLI.
//!
//! The subscriber is only installed when `PROP_SHAPE_LOG` (or `RUST_LOG`) is
//! set, e.g. `PROP_SHAPE_LOG=prop_shape=trace`. `PROP_SHAPE_LOG_FORMAT=json`
//! switches to one JSON object per event. Output goes to stderr so stdout
//! stays clean for emitted code.
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn from_env() -> Self {
        match std::env::var("PROP_SHAPE_LOG_FORMAT")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// `PROP_SHAPE_LOG` takes precedence over `RUST_LOG`.
fn build_filter() -> EnvFilter {
    match std::env::var("PROP_SHAPE_LOG") {
        Ok(val) => EnvFilter::builder().parse_lossy(val),
        Err(_) => EnvFilter::from_default_env(),
    }
}

pub fn init_tracing() {
    if std::env::var_os("PROP_SHAPE_LOG").is_none() && std::env::var_os("RUST_LOG").is_none() {
        return;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            // a subscriber may already be installed (tests, embedding)
            let _ = Registry::default().with(filter).with(json_layer).try_init();
        }
        LogFormat::Text => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}
