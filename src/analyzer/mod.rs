//! Reconcile analysis
//!
//! The core (`signature`, `patterns`, `scoring`, `snippet`) is pure: it
//! takes parsed files and returns results, with no I/O and no shared
//! state. [`Analyzer`] is the outer driver that walks a checkout, parses
//! files in parallel, groups them into packages and fans the core out
//! over packages.

pub mod matchers;
pub mod patterns;
pub mod scoring;
pub mod signature;
pub mod snippet;

pub use patterns::PatternDetector;
pub use scoring::{classify, score};
pub use signature::{find_candidates, request_param_name, CandidateFunction};
pub use snippet::extract_snippet;

use crate::error::{SurveyError, SurveyResult};
use crate::models::AnalysisResult;
use crate::parsers::{self, slash_path, GoModule};
use crate::syntax::{PackageIndex, SourceFile, TypeResolver};
use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Analyze every Reconcile method in one package.
///
/// `files` should be all files of the package in a stable order; results
/// follow file order, then declaration order.
pub fn analyze_package(
    files: &[SourceFile],
    resolver: Option<&dyn TypeResolver>,
    repo: &str,
) -> Vec<AnalysisResult> {
    find_candidates(files, resolver)
        .iter()
        .map(|candidate| analyze_candidate(candidate, repo))
        .collect()
}

/// Detect, score and classify one matched method
pub fn analyze_candidate(candidate: &CandidateFunction<'_>, repo: &str) -> AnalysisResult {
    let signals = candidate
        .body()
        .map(|body| {
            PatternDetector::new(candidate.request_name(), candidate.file.source_bytes())
                .detect(body)
        })
        .unwrap_or_default();

    let score = score(&signals);
    let file = slash_path(&candidate.file.path);
    let line = candidate.line();

    trace!(
        "{}#{}: {} signals, score {}",
        candidate.receiver_type,
        line,
        signals.len(),
        score
    );

    AnalysisResult {
        id: format!("{repo}#{file}#{line}"),
        repo: repo.to_string(),
        file,
        line,
        end_line: candidate.end_line(),
        receiver_type: candidate.receiver_type.clone(),
        receiver_package: candidate.receiver_package.clone(),
        score,
        classification: classify(score),
        signals,
    }
}

/// Driver settings, normally taken from `survey.toml` and CLI flags
#[derive(Debug, Clone)]
pub struct AnalyzerOptions {
    /// Analyse `_test.go` files and `_test` packages too
    pub include_tests: bool,
    /// Build a per-package type index for signature fallback
    pub use_resolver: bool,
    /// Globs (relative to the analysed root) to leave out
    pub exclude: Vec<String>,
    pub workers: usize,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            include_tests: false,
            use_resolver: true,
            exclude: crate::config::DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            workers: 8,
        }
    }
}

/// Files of one Go package, keyed by directory and package clause
type PackageKey = (PathBuf, String);

/// Worker stack size; lowering recursion scales with syntax depth
const WORKER_STACK_SIZE: usize = 16 * 1024 * 1024;

pub struct Analyzer {
    options: AnalyzerOptions,
    pool: rayon::ThreadPool,
}

impl Analyzer {
    pub fn new(options: AnalyzerOptions) -> SurveyResult<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.workers.max(1))
            .stack_size(WORKER_STACK_SIZE)
            .build()?;
        Ok(Self { options, pool })
    }

    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    /// Analyze every Go package under `root`. Files that cannot be read or
    /// parsed are logged and skipped.
    pub fn analyze_dir(&self, root: &Path, repo: &str) -> SurveyResult<Vec<AnalysisResult>> {
        let (paths, modules) = self.collect_files(root)?;
        debug!(
            "{}: {} Go files, {} modules",
            repo,
            paths.len(),
            modules.len()
        );

        let parsed: Vec<SourceFile> = self.pool.install(|| {
            paths
                .par_iter()
                .filter_map(|path| match parse_go_file(path, root) {
                    Ok(file) => Some(file),
                    Err(e) => {
                        warn!("{}", e);
                        None
                    }
                })
                .collect()
        });

        let packages = self.group_packages(parsed, &modules);
        let use_resolver = self.options.use_resolver;

        let results: Vec<Vec<AnalysisResult>> = self.pool.install(|| {
            packages
                .par_iter()
                .map(|((dir, _), files)| {
                    let index = use_resolver.then(|| PackageIndex::build(files));
                    let resolver = index.as_ref().map(|i| i as &dyn TypeResolver);
                    let found = analyze_package(files, resolver, repo);
                    if !found.is_empty() {
                        debug!("{}: {} reconcilers", dir.display(), found.len());
                    }
                    found
                })
                .collect()
        });

        Ok(results.into_iter().flatten().collect())
    }

    /// Go files to parse (sorted) and the `go.mod` modules found on the way
    pub fn collect_files(&self, root: &Path) -> SurveyResult<(Vec<PathBuf>, Vec<GoModule>)> {
        let mut overrides = OverrideBuilder::new(root);
        for glob in &self.options.exclude {
            overrides.add(&format!("!{glob}"))?;
        }

        let mut builder = WalkBuilder::new(root);
        builder
            .hidden(true)
            .parents(false)
            .git_ignore(true)
            .git_global(false)
            .git_exclude(true)
            .require_git(false)
            .overrides(overrides.build()?);

        let mut files = Vec::new();
        let mut modules = Vec::new();

        for entry in builder.build().flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            if name == "go.mod" {
                if let Some(module) = parsers::read_go_mod(path, root) {
                    modules.push(module);
                }
                continue;
            }
            if !name.ends_with(".go") {
                continue;
            }
            if !self.options.include_tests && name.ends_with("_test.go") {
                continue;
            }
            files.push(path.to_path_buf());
        }

        files.sort();
        Ok((files, modules))
    }

    fn group_packages(
        &self,
        files: Vec<SourceFile>,
        modules: &[GoModule],
    ) -> Vec<(PackageKey, Vec<SourceFile>)> {
        let mut packages: BTreeMap<PackageKey, Vec<SourceFile>> = BTreeMap::new();

        for mut file in files {
            if !self.options.include_tests && file.package.ends_with("_test") {
                continue;
            }
            let dir = file
                .path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            file.package_path = parsers::package_path_for(&dir, modules, &file.package);
            packages
                .entry((dir, file.package.clone()))
                .or_default()
                .push(file);
        }

        packages
            .into_iter()
            .map(|(key, mut files)| {
                files.sort_by(|a, b| a.path.cmp(&b.path));
                (key, files)
            })
            .collect()
    }
}

fn parse_go_file(path: &Path, root: &Path) -> SurveyResult<SourceFile> {
    parsers::parse_file(path, root).map_err(|e| SurveyError::Parse {
        path: path.to_path_buf(),
        message: format!("{e:#}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Classification, SignalKind};
    use crate::parsers::parse_source;
    use std::fs;
    use tempfile::TempDir;

    const EDGE: &str = r#"
package controllers

func (r *WidgetReconciler) Reconcile(ctx context.Context, req ctrl.Request) (ctrl.Result, error) {
    var w Widget
    err := r.Client.Get(ctx, req.NamespacedName, &w)
    if apierrors.IsNotFound(err) {
        return ctrl.Result{}, nil
    }
    return ctrl.Result{}, nil
}
"#;

    const SOTW: &str = r#"
package controllers

func (r *SweepReconciler) Reconcile(ctx context.Context, req ctrl.Request) (ctrl.Result, error) {
    var list WidgetList
    r.Client.List(ctx, &list)
    for _, item := range list.Items {
        r.Client.Update(ctx, &item)
    }
    return ctrl.Result{}, nil
}
"#;

    fn file(src: &str, path: &str) -> SourceFile {
        let mut f = parse_source(src, Path::new(path)).unwrap();
        f.package_path = "example.com/op/controllers".into();
        f
    }

    #[test]
    fn test_analyze_package_edge() {
        let files = vec![file(EDGE, "controllers/widget.go")];
        let results = analyze_package(&files, None, "acme/op");
        assert_eq!(results.len(), 1);
        let r = &results[0];
        assert_eq!(r.id, "acme/op#controllers/widget.go#4");
        assert_eq!(r.repo, "acme/op");
        assert_eq!(r.line, 4);
        assert_eq!(r.end_line, 11);
        assert_eq!(r.receiver_type, "WidgetReconciler");
        assert_eq!(r.receiver_package, "example.com/op/controllers");
        assert_eq!(r.score, -2);
        assert_eq!(r.classification, Classification::MostlyEdge);
    }

    #[test]
    fn test_analyze_package_sotw_is_additive() {
        let files = vec![file(SOTW, "controllers/sweep.go")];
        let results = analyze_package(&files, None, "acme/op");
        let kinds: Vec<_> = results[0].signals.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SignalKind::UnscopedList,
                SignalKind::LoopWrite,
                SignalKind::SingleWrite
            ]
        );
        assert_eq!(results[0].score, 5);
        assert_eq!(results[0].classification, Classification::Sotw);
    }

    #[test]
    fn test_analyze_package_is_idempotent() {
        let files = vec![
            file(EDGE, "controllers/widget.go"),
            file(SOTW, "controllers/sweep.go"),
        ];
        let first = serde_json::to_string(&analyze_package(&files, None, "x/y")).unwrap();
        let second = serde_json::to_string(&analyze_package(&files, None, "x/y")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_analyze_dir_groups_and_filters() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join("go.mod"), "module example.com/op\n\ngo 1.22\n").unwrap();
        fs::create_dir_all(root.join("controllers")).unwrap();
        fs::create_dir_all(root.join("vendor/other")).unwrap();
        fs::write(root.join("controllers/widget.go"), EDGE).unwrap();
        fs::write(root.join("controllers/sweep.go"), SOTW).unwrap();
        fs::write(root.join("controllers/widget_test.go"), EDGE).unwrap();
        fs::write(root.join("vendor/other/x.go"), SOTW).unwrap();

        let analyzer = Analyzer::new(AnalyzerOptions::default()).unwrap();
        let results = analyzer.analyze_dir(root, "acme/op").unwrap();

        let files: Vec<_> = results.iter().map(|r| r.file.as_str()).collect();
        assert_eq!(files, vec!["controllers/sweep.go", "controllers/widget.go"]);
        assert!(results
            .iter()
            .all(|r| r.receiver_package == "example.com/op/controllers"));
    }

    #[test]
    fn test_analyze_dir_include_tests() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join("widget.go"), EDGE).unwrap();
        fs::write(root.join("widget_test.go"), EDGE).unwrap();

        let options = AnalyzerOptions {
            include_tests: true,
            exclude: vec![],
            ..Default::default()
        };
        let analyzer = Analyzer::new(options).unwrap();
        let results = analyzer.analyze_dir(root, "local").unwrap();
        assert_eq!(results.len(), 2);
        // no go.mod: package clause name stands in
        assert_eq!(results[0].receiver_package, "controllers");
    }

    #[test]
    fn test_broken_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join("widget.go"), EDGE).unwrap();
        fs::write(root.join("broken.go"), [0xff, 0xfe, 0x00]).unwrap();

        let analyzer = Analyzer::new(AnalyzerOptions::default()).unwrap();
        let results = analyzer.analyze_dir(root, "local").unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_deeply_nested_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join("widget.go"), EDGE).unwrap();
        let deep = format!(
            "package controllers\n\nvar total = {}\n",
            vec!["n"; 10_000].join(" + ")
        );
        fs::write(root.join("generated_sum.go"), deep).unwrap();

        let analyzer = Analyzer::new(AnalyzerOptions::default()).unwrap();
        let results = analyzer.analyze_dir(root, "local").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].receiver_type, "WidgetReconciler");
    }
}
