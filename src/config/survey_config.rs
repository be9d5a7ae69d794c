//! Survey configuration support
//!
//! Loads optional settings from `survey.toml` in the working directory, or
//! from an explicit `--config` path.
//!
//! # Configuration Format
//!
//! ```toml
//! # survey.toml
//!
//! [analysis]
//! include_tests = false
//! use_resolver = true
//! exclude = ["**/hack/**"]
//! skip_default_excludes = false
//!
//! [clone]
//! work_dir = "/tmp/controller-survey"
//! keep_clones = false
//!
//! [defaults]
//! workers = 8
//! top = 10
//! ```
//!
//! CLI flags override these values; these values override built-in defaults.

use crate::error::{SurveyError, SurveyResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const CONFIG_FILE_NAME: &str = "survey.toml";

/// Built-in exclusion patterns for vendored and generated Go code.
/// Applied unless `skip_default_excludes = true`.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    "**/vendor/**",
    "**/third_party/**",
    "**/testdata/**",
    "**/zz_generated*.go",
];

pub const DEFAULT_WORKERS: usize = 8;
pub const DEFAULT_TOP: usize = 10;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SurveyConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub clone: CloneConfig,

    #[serde(default)]
    pub defaults: CliDefaults,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Analyse `_test.go` files as well
    #[serde(default)]
    pub include_tests: bool,

    /// Fall back to package-level type resolution for signatures
    #[serde(default = "default_true")]
    pub use_resolver: bool,

    /// Extra globs to exclude
    #[serde(default)]
    pub exclude: Vec<String>,

    /// If true, disable built-in default exclusion patterns
    #[serde(default)]
    pub skip_default_excludes: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            include_tests: false,
            use_resolver: true,
            exclude: Vec::new(),
            skip_default_excludes: false,
        }
    }
}

fn default_true() -> bool {
    true
}

impl AnalysisConfig {
    /// Defaults (unless skipped) followed by user patterns, without duplicates
    pub fn effective_excludes(&self) -> Vec<String> {
        let mut patterns = Vec::new();

        if !self.skip_default_excludes {
            patterns.extend(DEFAULT_EXCLUDE_PATTERNS.iter().map(|s| s.to_string()));
        }

        for p in &self.exclude {
            if !patterns.contains(p) {
                patterns.push(p.clone());
            }
        }

        patterns
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CloneConfig {
    /// Where repositories are cloned; defaults to a directory under the system temp dir
    #[serde(default)]
    pub work_dir: Option<PathBuf>,

    #[serde(default)]
    pub keep_clones: bool,
}

impl CloneConfig {
    pub fn effective_work_dir(&self) -> PathBuf {
        self.work_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("controller-survey"))
    }
}

/// Default CLI values that can be set in the config
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CliDefaults {
    #[serde(default)]
    pub workers: Option<usize>,

    /// Entries in each top list of the report
    #[serde(default)]
    pub top: Option<usize>,
}

impl CliDefaults {
    pub fn workers(&self) -> usize {
        self.workers.unwrap_or(DEFAULT_WORKERS)
    }

    pub fn top(&self) -> usize {
        self.top.unwrap_or(DEFAULT_TOP)
    }
}

/// Load `survey.toml` from `dir`.
///
/// A missing file gives defaults; an unreadable or invalid one is logged
/// and also gives defaults.
pub fn load_survey_config(dir: &Path) -> SurveyConfig {
    let toml_path = dir.join(CONFIG_FILE_NAME);
    if !toml_path.exists() {
        debug!("No survey config found, using defaults");
        return SurveyConfig::default();
    }

    match load_config_file(&toml_path) {
        Ok(config) => {
            debug!("Loaded survey config from {}", toml_path.display());
            config
        }
        Err(e) => {
            warn!("{}", e);
            SurveyConfig::default()
        }
    }
}

/// Load an explicitly named config file. Errors are returned, not swallowed.
pub fn load_config_file(path: &Path) -> SurveyResult<SurveyConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| SurveyError::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
