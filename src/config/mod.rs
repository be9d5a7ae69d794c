//! Configuration module for controller-survey
//!
//! This module handles:
//! - Survey configuration (survey.toml)
//! - Exclusion patterns for the file walk
//! - CLI defaults

mod survey_config;

pub use survey_config::{
    load_config_file, load_survey_config, AnalysisConfig, CliDefaults, CloneConfig, SurveyConfig,
    CONFIG_FILE_NAME, DEFAULT_EXCLUDE_PATTERNS, DEFAULT_TOP, DEFAULT_WORKERS,
};
