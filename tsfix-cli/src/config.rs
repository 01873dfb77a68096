//! Configuration file loading for tsfix.
//!
//! Discovers `tsfix.toml` in the project directory or any ancestor and merges it with command-line
//! arguments (arguments take precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use tsfix_core::settings::{CheckerSettings, ResolveSettings, default_exclude};
use tsfix_session::{DEFAULT_CACHE_DIR, StopSettings};

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "tsfix.toml";

/// Top-level configuration from tsfix.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TsfixConfig {
    pub checker: CheckerConfig,
    pub resolver: ResolverConfig,
    pub session: SessionConfig,
}

/// `[checker]`: how to run the type-checker. Unset fields use the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    pub program: Option<String>,
    pub args: Option<Vec<String>>,
    pub timeout_secs: Option<u64>,
}

/// `[resolver]`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// When false the stop hook does nothing.
    pub enabled: bool,
    pub dry_run: bool,
    /// Replaces the default exclude globs when set.
    pub exclude: Option<Vec<String>>,
    pub disabled_codes: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dry_run: false,
            exclude: None,
            disabled_codes: Vec::new(),
        }
    }
}

/// `[session]`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Relative paths are resolved against the project directory.
    pub cache_dir: Utf8PathBuf,
    pub keep_sessions: usize,
    pub keep_session_cache: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cache_dir: Utf8PathBuf::from(DEFAULT_CACHE_DIR),
            keep_sessions: 3,
            keep_session_cache: false,
        }
    }
}

/// Find `tsfix.toml` in `project_dir` or the nearest ancestor that has one.
pub fn discover_config(project_dir: &Utf8Path) -> Option<Utf8PathBuf> {
    for dir in project_dir.ancestors() {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            debug!("found config file at {}", candidate);
            return Some(candidate);
        }
    }
    debug!("no {} above {}", CONFIG_FILE_NAME, project_dir);
    None
}

pub fn load_config(path: &Utf8Path) -> anyhow::Result<TsfixConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

pub fn parse_config(contents: &str) -> anyhow::Result<TsfixConfig> {
    let config: TsfixConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

pub fn load_or_default(project_dir: &Utf8Path) -> anyhow::Result<TsfixConfig> {
    match discover_config(project_dir) {
        Some(path) => load_config(&path),
        None => Ok(TsfixConfig::default()),
    }
}

/// Command-line values that can override the config file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub dry_run: bool,
    pub exclude: Vec<String>,
    pub disabled_codes: Vec<String>,
    pub checker: Option<String>,
    pub checker_args: Vec<String>,
    pub timeout_secs: Option<u64>,
    pub cache_dir: Option<Utf8PathBuf>,
}

/// Settings for one invocation after merging file and arguments.
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub enabled: bool,
    pub checker: CheckerSettings,
    pub resolve: ResolveSettings,
    /// Absolute session cache root.
    pub cache_dir: Utf8PathBuf,
    pub stop: StopSettings,
}

pub struct ConfigMerger {
    config: TsfixConfig,
}

impl ConfigMerger {
    pub fn new(config: TsfixConfig) -> Self {
        Self { config }
    }

    /// Merge for a project. Argument lists extend the file's lists; scalar arguments replace
    /// file values.
    pub fn merge(self, project_dir: &Utf8Path, cli: &CliOverrides) -> MergedConfig {
        let TsfixConfig {
            checker,
            resolver,
            session,
        } = self.config;

        let mut checker_settings = CheckerSettings::for_project(project_dir);
        let program_from_cli = cli.checker.is_some();
        let program_from_file = checker.program.is_some();
        if let Some(program) = cli.checker.clone().or(checker.program) {
            checker_settings.program = program;
        }
        checker_settings.args = if !cli.checker_args.is_empty() {
            cli.checker_args.clone()
        } else if program_from_cli {
            Vec::new()
        } else if let Some(args) = checker.args {
            args
        } else if program_from_file {
            Vec::new()
        } else {
            checker_settings.args
        };
        if let Some(secs) = cli.timeout_secs.or(checker.timeout_secs) {
            checker_settings.timeout = Duration::from_secs(secs);
        }

        let mut exclude = resolver.exclude.unwrap_or_else(default_exclude);
        extend_unique(&mut exclude, &cli.exclude);
        let mut disabled_codes: Vec<String> = Vec::new();
        let codes = resolver.disabled_codes.iter().chain(&cli.disabled_codes);
        for code in codes.map(|c| normalize_code(c)) {
            if !disabled_codes.contains(&code) {
                disabled_codes.push(code);
            }
        }

        let mut resolve = ResolveSettings::new(project_dir);
        resolve.dry_run = cli.dry_run || resolver.dry_run;
        resolve.exclude = exclude.clone();
        resolve.disabled_codes = disabled_codes;

        let cache_dir = cli.cache_dir.clone().unwrap_or(session.cache_dir);
        let cache_dir = if cache_dir.is_absolute() {
            cache_dir
        } else {
            project_dir.join(cache_dir)
        };

        MergedConfig {
            enabled: resolver.enabled,
            checker: checker_settings,
            resolve,
            cache_dir,
            stop: StopSettings {
                enabled: resolver.enabled,
                exclude,
                keep_sessions: session.keep_sessions,
                keep_session_cache: session.keep_session_cache,
            },
        }
    }
}

fn extend_unique(into: &mut Vec<String>, extra: &[String]) {
    for item in extra {
        if !into.contains(item) {
            into.push(item.clone());
        }
    }
}

/// `TS6133` and `6133` name the same code.
fn normalize_code(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix("TS")
        .or_else(|| trimmed.strip_prefix("ts"))
        .unwrap_or(trimmed)
        .to_string()
}
