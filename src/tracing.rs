//! Tracing setup and selection-state diagnostics
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=selection=trace,event_bus=debug` - scoped filtering
//! - `RUST_LOG=emote_input::editable=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/emote-input/logs/emote-input.log` with daily
//! rotation. File logging uses debug level by default.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::editable::Composer;

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG (default `warn`). File logging writes to
/// the config directory's `logs/` with daily rotation.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console layer - respects RUST_LOG; stderr keeps stdout for script output
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "emote-input.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    // A host may already have installed a subscriber
    let _ = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

/// Lightweight snapshot of the composer's caret state for diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSnapshot {
    pub segment_count: usize,
    pub len_units: usize,
    /// `(anchor, head)` in unit offsets
    pub selection: Option<(usize, usize)>,
    pub revision: u64,
}

impl SelectionSnapshot {
    pub fn from_composer(composer: &Composer) -> Self {
        Self {
            segment_count: composer.document().segment_count(),
            len_units: composer.document().len_units(),
            selection: composer.selection().map(|s| (s.anchor, s.head)),
            revision: composer.revision(),
        }
    }

    /// Describe what changed between two snapshots
    pub fn diff(&self, other: &SelectionSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        if self.segment_count != other.segment_count || self.len_units != other.len_units {
            changes.push(format!(
                "segments {} → {} ({} → {} units)",
                self.segment_count, other.segment_count, self.len_units, other.len_units
            ));
        }

        match (self.selection, other.selection) {
            (Some(before), Some(after)) if before != after => {
                let status = if after.0 == after.1 { "caret" } else { "range" };
                changes.push(format!(
                    "{} ({},{}) → ({},{})",
                    status, before.0, before.1, after.0, after.1
                ));
            }
            (None, Some(after)) => changes.push(format!("caret placed at {}", after.1)),
            (Some(_), None) => changes.push("selection dropped".to_string()),
            _ => {}
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
