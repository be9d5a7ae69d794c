//! CLI command definitions and handlers

mod analyze;
mod report;

use anyhow::Result;
use clap::{Parser, Subcommand};
use controller_survey::config::{load_config_file, load_survey_config, SurveyConfig};
use std::path::{Path, PathBuf};

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// Controller survey - classify Kubernetes Reconcile methods
#[derive(Parser, Debug)]
#[command(name = "controller-survey")]
#[command(
    version,
    about = "Classify Kubernetes controllers as state-of-the-world or edge-triggered",
    long_about = "Statically analyzes Go repositories for controller-runtime Reconcile \
methods and scores each one by its reconciliation pattern: whether it re-reads the \
whole world on every event or only touches the object named in the request.",
    after_help = "\
Examples:
  controller-survey analyze --repos repos.txt -o results.jsonl
  controller-survey analyze --repo https://github.com/cert-manager/cert-manager
  controller-survey analyze --path ./my-operator
  controller-survey report -i results.jsonl --top 20"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Config file (default: ./survey.toml when present)
    #[arg(long, global = true, env = "CONTROLLER_SURVEY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// `--verbose` on `analyze` raises the level to at least debug
    pub fn effective_log_level(&self) -> &str {
        match &self.command {
            Commands::Analyze { verbose: true, .. }
                if matches!(self.log_level.as_str(), "error" | "warn" | "info") =>
            {
                "debug"
            }
            _ => &self.log_level,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze repositories and write one JSON record per Reconcile method
    #[command(after_help = "\
Examples:
  controller-survey analyze --repos repos.txt --output results.jsonl
  controller-survey analyze --repo https://github.com/fluxcd/kustomize-controller -v
  controller-survey analyze --path . --include-tests")]
    Analyze {
        /// File with repository URLs (one per line, # comments allowed)
        #[arg(long, short = 'r')]
        repos: Option<PathBuf>,

        /// Repository URL to clone and analyze (repeatable)
        #[arg(long = "repo", value_name = "URL")]
        repo_urls: Vec<String>,

        /// Local directory to analyze in place (repeatable)
        #[arg(long = "path", value_name = "DIR")]
        paths: Vec<PathBuf>,

        /// Output file (JSONL; default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Directory for clones
        #[arg(long)]
        work_dir: Option<PathBuf>,

        /// Keep clones after analysis
        #[arg(long)]
        keep_clones: bool,

        /// Also analyze _test.go files
        #[arg(long)]
        include_tests: bool,

        /// Match Reconcile signatures by type name only
        #[arg(long)]
        no_resolver: bool,

        /// Number of parallel workers (1-64)
        #[arg(long, value_parser = parse_workers)]
        workers: Option<usize>,

        /// Verbose output
        #[arg(long, short = 'v')]
        verbose: bool,
    },

    /// Summarize a JSONL results file
    #[command(after_help = "\
Examples:
  controller-survey report --input results.jsonl
  controller-survey report -i results.jsonl --format json | jq .by_classification")]
    Report {
        /// JSONL results written by `analyze`
        #[arg(long, short = 'i')]
        input: PathBuf,

        /// Entries in each top list
        #[arg(long)]
        top: Option<usize>,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text")]
        format: String,
    },
}

/// Explicit `--config` must load; the implicit one falls back to defaults
fn load_config(explicit: Option<&Path>) -> Result<SurveyConfig> {
    match explicit {
        Some(path) => Ok(load_config_file(path)?),
        None => {
            let cwd = std::env::current_dir()?;
            Ok(load_survey_config(&cwd))
        }
    }
}

/// Run the CLI
pub fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            repos,
            repo_urls,
            paths,
            output,
            work_dir,
            keep_clones,
            include_tests,
            no_resolver,
            workers,
            verbose: _,
        } => analyze::run(
            analyze::AnalyzeArgs {
                repos_file: repos,
                repo_urls,
                paths,
                output,
                work_dir,
                keep_clones,
                include_tests,
                no_resolver,
                workers,
            },
            &config,
        ),

        Commands::Report { input, top, format } => {
            let top = top.unwrap_or_else(|| config.defaults.top());
            report::run(&input, top, &format)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_workers_bounds() {
        assert_eq!(parse_workers("1"), Ok(1));
        assert_eq!(parse_workers("64"), Ok(64));
        assert!(parse_workers("0").is_err());
        assert!(parse_workers("65").is_err());
        assert!(parse_workers("many").unwrap_err().contains("not a valid number"));
    }

    #[test]
    fn test_analyze_args() {
        let cli = Cli::try_parse_from([
            "controller-survey",
            "analyze",
            "--repo",
            "https://github.com/a/b",
            "--repo",
            "https://github.com/c/d",
            "--path",
            "local",
            "-o",
            "out.jsonl",
            "--workers",
            "4",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze {
                repo_urls,
                paths,
                output,
                workers,
                ..
            } => {
                assert_eq!(repo_urls.len(), 2);
                assert_eq!(paths, vec![PathBuf::from("local")]);
                assert_eq!(output, Some(PathBuf::from("out.jsonl")));
                assert_eq!(workers, Some(4));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_report_requires_input() {
        assert!(Cli::try_parse_from(["controller-survey", "report"]).is_err());
        let cli =
            Cli::try_parse_from(["controller-survey", "report", "-i", "r.jsonl", "--top", "3"])
                .unwrap();
        assert!(matches!(cli.command, Commands::Report { top: Some(3), .. }));
    }

    #[test]
    fn test_verbose_raises_log_level() {
        let cli = Cli::try_parse_from(["controller-survey", "analyze", "--path", ".", "-v"]).unwrap();
        assert_eq!(cli.effective_log_level(), "debug");

        let cli = Cli::try_parse_from([
            "controller-survey",
            "--log-level",
            "trace",
            "analyze",
            "--path",
            ".",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.effective_log_level(), "trace");

        let cli = Cli::try_parse_from(["controller-survey", "report", "-i", "x"]).unwrap();
        assert_eq!(cli.effective_log_level(), "info");
    }
}
