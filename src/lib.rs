//! Static survey of Kubernetes controller Reconcile methods
//!
//! Parses Go sources with tree-sitter, finds controller-runtime style
//! `Reconcile(ctx, req) (Result, error)` methods and scores each one by the
//! patterns in its body: request-scoped reads lean edge-triggered, while
//! unscoped lists and writes in loops lean state-of-the-world.
//!
//! ```no_run
//! use controller_survey::analyzer::{Analyzer, AnalyzerOptions};
//! use std::path::Path;
//!
//! let analyzer = Analyzer::new(AnalyzerOptions::default())?;
//! for result in analyzer.analyze_dir(Path::new("./my-operator"), "my-operator")? {
//!     println!("{} {} {}", result.id, result.score, result.classification);
//! }
//! # Ok::<(), controller_survey::error::SurveyError>(())
//! ```

pub mod analyzer;
pub mod config;
pub mod error;
pub mod git;
pub mod models;
pub mod parsers;
pub mod reporters;
pub mod syntax;
