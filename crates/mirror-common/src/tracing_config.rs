//! Tracing configuration for embedders and test harnesses.
//!
//! `MIRROR_LOG` selects what is logged. It accepts either a preset name or
//! a `RUST_LOG`-style directive list:
//!
//! | Preset | Directives |
//! |--------|------------|
//! | `cache` | `mirror_types=debug` |
//! | `queries` | `mirror::query_json=trace` |
//! | `all` | `mirror_types=trace,mirror::query_json=trace` |
//!
//! `MIRROR_LOG_FORMAT` picks `text` (default), `tree` (via `tracing-tree`)
//! or `json` output.
//!
//! ```bash
//! # Declarations and specializations, as a tree
//! MIRROR_LOG=cache MIRROR_LOG_FORMAT=tree cargo test -p mirror-types
//!
//! # Structured query events only, one JSON object per line
//! MIRROR_LOG=queries MIRROR_LOG_FORMAT=json my-tool
//!
//! # Presets do not mix with directives; spell them out instead
//! MIRROR_LOG="mirror_types::relations=trace,mirror::query_json=trace" my-tool
//! ```
//!
//! Nothing is installed unless `MIRROR_LOG` (or `RUST_LOG`) is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Target of the structured query events emitted by `mirror-types`.
pub const QUERY_TARGET: &str = "mirror::query_json";

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Flat text lines (default).
    Text,
    /// Hierarchical indented tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    /// Parse a format name; unknown names fall back to [`LogFormat::Text`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Named filter shorthands accepted by `MIRROR_LOG`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogPreset {
    /// Cache activity: declarations, specializations, global slot changes.
    Cache,
    /// Only the structured query events.
    Queries,
    /// Everything the engine emits.
    All,
}

impl LogPreset {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cache" => Some(Self::Cache),
            "queries" => Some(Self::Queries),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    pub fn directives(self) -> String {
        match self {
            Self::Cache => "mirror_types=debug".to_string(),
            Self::Queries => format!("{QUERY_TARGET}=trace"),
            Self::All => format!("mirror_types=trace,{QUERY_TARGET}=trace"),
        }
    }
}

/// What [`init_tracing`] installs, resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    pub directives: String,
    pub format: LogFormat,
}

impl TracingConfig {
    /// `MIRROR_LOG` takes precedence over `RUST_LOG`. Presets are expanded
    /// only in `MIRROR_LOG`. `None` when neither is set.
    pub fn resolve(
        mirror_log: Option<&str>,
        rust_log: Option<&str>,
        format: Option<&str>,
    ) -> Option<Self> {
        let directives = match (mirror_log, rust_log) {
            (Some(value), _) => match LogPreset::parse(value) {
                Some(preset) => preset.directives(),
                None => value.to_string(),
            },
            (None, Some(value)) => value.to_string(),
            (None, None) => return None,
        };
        Some(Self {
            directives,
            format: LogFormat::parse(format.unwrap_or_default()),
        })
    }

    pub fn from_env() -> Option<Self> {
        let mirror_log = std::env::var("MIRROR_LOG").ok();
        let rust_log = std::env::var("RUST_LOG").ok();
        let format = std::env::var("MIRROR_LOG_FORMAT").ok();
        Self::resolve(mirror_log.as_deref(), rust_log.as_deref(), format.as_deref())
    }

    /// Malformed directives are skipped rather than rejected.
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::builder().parse_lossy(&self.directives)
    }

    /// Install this configuration as the global subscriber, writing to
    /// stderr. Returns false when a subscriber is already installed.
    pub fn install(&self) -> bool {
        let filter = self.filter();
        let installed = match self.format {
            LogFormat::Tree => {
                let tree_layer = tracing_tree::HierarchicalLayer::default()
                    .with_indent_amount(2)
                    .with_indent_lines(true)
                    .with_deferred_spans(true)
                    .with_span_retrace(true)
                    .with_targets(true);
                Registry::default().with(filter).with(tree_layer).try_init()
            }
            LogFormat::Json => {
                let json_layer = fmt::layer().json().with_writer(std::io::stderr);
                Registry::default().with(filter).with(json_layer).try_init()
            }
            LogFormat::Text => {
                let text_layer = fmt::layer().with_writer(std::io::stderr);
                Registry::default().with(filter).with(text_layer).try_init()
            }
        };
        installed.is_ok()
    }
}

/// Initialise the global tracing subscriber from the environment.
///
/// Does nothing when neither `MIRROR_LOG` nor `RUST_LOG` is set, or when a
/// global subscriber is already installed.
pub fn init_tracing() {
    if let Some(config) = TracingConfig::from_env() {
        // Test binaries call this from many tests.
        config.install();
    }
}

#[cfg(test)]
#[path = "../tests/tracing_config_tests.rs"]
mod tests;
