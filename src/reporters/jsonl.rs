//! JSON Lines persistence
//!
//! One `AnalysisResult` per line. The writer targets a file or stdout; the
//! loader tolerates malformed lines so that partially written files from an
//! interrupted survey can still be reported on.

use crate::error::SurveyResult;
use crate::models::AnalysisResult;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::warn;

pub struct JsonlWriter {
    out: Box<dyn Write>,
    written: usize,
}

impl JsonlWriter {
    /// Write to `path`, or to stdout when it is absent or `-`
    pub fn create(path: Option<&Path>) -> SurveyResult<Self> {
        let out: Box<dyn Write> = match path {
            Some(p) if p != Path::new("-") => Box::new(BufWriter::new(File::create(p)?)),
            _ => Box::new(io::stdout()),
        };
        Ok(Self::from_writer(out))
    }

    pub fn from_writer(out: Box<dyn Write>) -> Self {
        Self { out, written: 0 }
    }

    pub fn write_result(&mut self, result: &AnalysisResult) -> SurveyResult<()> {
        serde_json::to_writer(&mut self.out, result)?;
        self.out.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    pub fn write_results(&mut self, results: &[AnalysisResult]) -> SurveyResult<()> {
        for result in results {
            self.write_result(result)?;
        }
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn finish(mut self) -> SurveyResult<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// Read results back; malformed lines are logged and skipped
pub fn load_results(path: &Path) -> SurveyResult<Vec<AnalysisResult>> {
    let reader = BufReader::new(File::open(path)?);
    let mut results = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<AnalysisResult>(&line) {
            Ok(result) => results.push(result),
            Err(e) => warn!("{}:{}: skipping malformed record: {}", path.display(), idx + 1, e),
        }
    }

    Ok(results)
}
