//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--hidden`, `--files`, `--depth`, etc.)
//! 2. Explicit `--config` file
//! 3. `$DTS_CONFIG` environment variable (path to config file)
//! 4. Project-local `.dts.toml` in the current working directory
//! 5. Global `~/.config/dts/config.toml`
//! 6. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::fs::watcher::{DEFAULT_DEBOUNCE_MS, DEFAULT_FLOOD_THRESHOLD, DEFAULT_IGNORE_PATTERNS};

// ── Section configs ──────────────────────────────────────────────────────────

/// Tree contents.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// List dot-files.
    pub show_hidden: Option<bool>,
    /// Only list directories.
    pub dirs_only: Option<bool>,
    /// Directories shallower than this are expanded on load (root is 0).
    pub expand_depth: Option<usize>,
}

/// Filesystem watcher settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct WatcherConfig {
    /// Enable filesystem watcher in `--watch` mode.
    pub enabled: Option<bool>,
    /// Debounce interval in milliseconds.
    pub debounce_ms: Option<u64>,
    /// Events per debounce window above which the whole root is refreshed.
    pub flood_threshold: Option<usize>,
    /// Path components whose changes are ignored.
    pub ignore: Option<Vec<String>>,
}

/// Log output.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive, e.g. `"info"` or `"dirtree_sync=debug"`.
    pub level: Option<String>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub watcher: WatcherConfig,
    pub log: LogConfig,
}

/// Default expansion depth: only the root's own listing.
pub const DEFAULT_EXPAND_DEPTH: usize = 1;

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path — that is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("DTS_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".dts.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("dts").join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning logged).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to parse config file");
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self` — `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                show_hidden: other.general.show_hidden.or(self.general.show_hidden),
                dirs_only: other.general.dirs_only.or(self.general.dirs_only),
                expand_depth: other.general.expand_depth.or(self.general.expand_depth),
            },
            watcher: WatcherConfig {
                enabled: other.watcher.enabled.or(self.watcher.enabled),
                debounce_ms: other.watcher.debounce_ms.or(self.watcher.debounce_ms),
                flood_threshold: other
                    .watcher
                    .flood_threshold
                    .or(self.watcher.flood_threshold),
                ignore: other.watcher.ignore.clone().or(self.watcher.ignore),
            },
            log: LogConfig {
                level: other.log.level.clone().or(self.log.level),
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Lowest priority first so that higher ones overwrite.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            match load_file(cli_path) {
                Some(file_cfg) => config = config.merge(&file_cfg),
                None => warn!(path = %cli_path.display(), "config file not loaded"),
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    pub fn show_hidden(&self) -> bool {
        self.general.show_hidden.unwrap_or(false)
    }

    pub fn dirs_only(&self) -> bool {
        self.general.dirs_only.unwrap_or(true)
    }

    pub fn expand_depth(&self) -> usize {
        self.general.expand_depth.unwrap_or(DEFAULT_EXPAND_DEPTH)
    }

    pub fn watcher_enabled(&self) -> bool {
        self.watcher.enabled.unwrap_or(true)
    }

    pub fn debounce_ms(&self) -> u64 {
        self.watcher.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS)
    }

    pub fn flood_threshold(&self) -> usize {
        self.watcher.flood_threshold.unwrap_or(DEFAULT_FLOOD_THRESHOLD)
    }

    /// Ignore patterns, falling back to the built-in list.
    pub fn ignore_patterns(&self) -> Vec<String> {
        match &self.watcher.ignore {
            Some(patterns) => patterns.clone(),
            None => DEFAULT_IGNORE_PATTERNS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or("info")
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
