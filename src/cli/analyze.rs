//! `analyze` command: clone, analyze, and write JSONL records

use anyhow::{bail, Context, Result};
use console::style;
use controller_survey::analyzer::{Analyzer, AnalyzerOptions};
use controller_survey::config::SurveyConfig;
use controller_survey::git::{
    clone_repo, load_repo_list, local_repository, remove_clone, repo_label, repository_from_url,
};
use controller_survey::models::{AnalysisResult, Repository};
use controller_survey::reporters::{report_with_format, JsonlWriter, OutputFormat, Summary};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Flags of the `analyze` subcommand
#[derive(Debug, Default)]
pub struct AnalyzeArgs {
    pub repos_file: Option<PathBuf>,
    pub repo_urls: Vec<String>,
    pub paths: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub work_dir: Option<PathBuf>,
    pub keep_clones: bool,
    pub include_tests: bool,
    pub no_resolver: bool,
    pub workers: Option<usize>,
}

/// Flags win over `survey.toml`
fn analyzer_options(args: &AnalyzeArgs, config: &SurveyConfig) -> AnalyzerOptions {
    AnalyzerOptions {
        include_tests: args.include_tests || config.analysis.include_tests,
        use_resolver: !args.no_resolver && config.analysis.use_resolver,
        exclude: config.analysis.effective_excludes(),
        workers: args.workers.unwrap_or_else(|| config.defaults.workers()),
    }
}

/// Repositories from the list file, then `--repo` URLs, then `--path` dirs
fn collect_repositories(args: &AnalyzeArgs) -> Result<Vec<Repository>> {
    let mut repos = Vec::new();

    if let Some(file) = &args.repos_file {
        let listed = load_repo_list(file)
            .with_context(|| format!("Failed to load repos from {}", file.display()))?;
        debug!("{} repositories listed in {}", listed.len(), file.display());
        repos.extend(listed);
    }

    for url in &args.repo_urls {
        repos.push(repository_from_url(url, "cli")?);
    }

    for path in &args.paths {
        if !path.is_dir() {
            bail!("Not a directory: {}", path.display());
        }
        repos.push(local_repository(path));
    }

    if repos.is_empty() {
        bail!("No repositories specified (use --repos, --repo or --path)");
    }
    Ok(repos)
}

fn progress_bar(len: usize) -> Result<ProgressBar> {
    let bar = ProgressBar::new(len as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓▒░  "),
    );
    Ok(bar)
}

pub fn run(args: AnalyzeArgs, config: &SurveyConfig) -> Result<()> {
    let start = Instant::now();
    let repos = collect_repositories(&args)?;

    let work_dir = args
        .work_dir
        .clone()
        .unwrap_or_else(|| config.clone.effective_work_dir());
    let keep_clones = args.keep_clones || config.clone.keep_clones;

    let analyzer = Analyzer::new(analyzer_options(&args, config))?;
    let mut writer = JsonlWriter::create(args.output.as_deref())?;

    eprintln!(
        "{}Surveying {} repositories with {} workers",
        style("🔍 ").bold(),
        style(repos.len()).cyan(),
        style(analyzer.options().workers).cyan()
    );

    let bar = progress_bar(repos.len())?;
    let mut all: Vec<AnalysisResult> = Vec::new();
    let mut failed = 0usize;

    for repo in &repos {
        let label = repo_label(repo);
        bar.set_message(label.clone());
        info!("Processing repository: {}", repo.url);

        match survey_one(&analyzer, repo, &label, &work_dir, keep_clones) {
            Ok(results) => {
                info!("Found {} reconcilers in {}", results.len(), label);
                writer.write_results(&results)?;
                all.extend(results);
            }
            Err(e) => {
                failed += 1;
                bar.suspend(|| {
                    eprintln!("{}{}: {:#}", style("⚠ ").yellow(), label, e);
                });
                warn!("Skipping {}: {:#}", label, e);
            }
        }
        bar.inc(1);
    }

    let written = writer.written();
    writer.finish()?;
    bar.finish_and_clear();

    eprintln!(
        "{}Found {} reconcilers in {} repositories ({} failed) in {:.1}s",
        style("✓ ").green(),
        style(written).cyan(),
        style(repos.len() - failed).cyan(),
        failed,
        start.elapsed().as_secs_f64()
    );
    if let Some(path) = &args.output {
        eprintln!("{}Results written to {}", style("→ ").dim(), path.display());
    }

    let summary = Summary::generate(&all, config.defaults.top());
    eprint!(
        "\n{}",
        report_with_format(&summary, OutputFormat::Text)?
    );

    Ok(())
}

/// Analyze one repository; clones are removed afterwards unless kept
fn survey_one(
    analyzer: &Analyzer,
    repo: &Repository,
    label: &str,
    work_dir: &Path,
    keep_clones: bool,
) -> Result<Vec<AnalysisResult>> {
    if let Some(path) = &repo.local_path {
        return Ok(analyzer.analyze_dir(path, label)?);
    }

    let checkout = clone_repo(&repo.url, work_dir)?;
    let results = analyzer.analyze_dir(&checkout, label);

    if !keep_clones {
        if let Err(e) = remove_clone(&checkout) {
            warn!("Failed to remove {}: {}", checkout.display(), e);
        }
    }

    Ok(results?)
}
