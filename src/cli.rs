//! Command-line argument parsing for the script runner
//!
//! Supports:
//! - Replaying a YAML session script
//! - Overriding the config file and emote catalog
//! - JSON output of the final draft state

use clap::Parser;
use std::path::PathBuf;

use crate::config::{ComposerConfig, ConfigError};

/// Replay a chat-input session against the composer
#[derive(Parser, Debug)]
#[command(
    name = "emote-input",
    version,
    about = "Replay a chat-input session against the emote composer"
)]
pub struct CliArgs {
    /// Session script (YAML list of steps)
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Config file to use instead of the user config
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Emote catalog YAML; overrides `emotes_file` from the config
    #[arg(short, long, value_name = "PATH")]
    pub emotes: Option<PathBuf>,

    /// Print the final state as JSON
    #[arg(long)]
    pub json: bool,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub script: PathBuf,
    pub composer: ComposerConfig,
    /// Catalog to load, if any
    pub emotes: Option<PathBuf>,
    pub json: bool,
}

impl CliArgs {
    /// Resolve the composer config and catalog path.
    ///
    /// An explicit `--config` must load; the user config falls back to
    /// defaults.
    pub fn into_config(self) -> Result<RunConfig, ConfigError> {
        let composer = match &self.config {
            Some(path) => ComposerConfig::load_from(path)?,
            None => ComposerConfig::load(),
        };
        let emotes = self.emotes.or_else(|| composer.emotes_path());

        Ok(RunConfig {
            script: self.script,
            composer,
            emotes,
            json: self.json,
        })
    }
}
