//! Shallow clones of surveyed repositories

use super::repos::parse_repo_url;
use crate::error::{SurveyError, SurveyResult};
use git2::build::RepoBuilder;
use git2::FetchOptions;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where `url` is cloned under `work_dir`: `work_dir/owner/name`
pub fn clone_path(url: &str, work_dir: &Path) -> SurveyResult<PathBuf> {
    let (owner, name) =
        parse_repo_url(url).ok_or_else(|| SurveyError::InvalidUrl(url.to_string()))?;
    Ok(work_dir.join(owner).join(name))
}

/// Clone `url` with depth 1, reusing an existing checkout.
pub fn clone_repo(url: &str, work_dir: &Path) -> SurveyResult<PathBuf> {
    let dest = clone_path(url, work_dir)?;

    if dest.exists() {
        debug!("Repository already exists at {}, skipping clone", dest.display());
        return Ok(dest);
    }

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }

    info!("Cloning {} to {}", url, dest.display());

    let mut fetch = FetchOptions::new();
    fetch.depth(1);

    let result = RepoBuilder::new().fetch_options(fetch).clone(url, &dest);
    if let Err(source) = result {
        // a partial checkout must not be reused
        let _ = std::fs::remove_dir_all(&dest);
        return Err(SurveyError::Clone {
            url: url.to_string(),
            source,
        });
    }

    Ok(dest)
}

/// Delete a clone made by [`clone_repo`]
pub fn remove_clone(path: &Path) -> SurveyResult<()> {
    if path.exists() {
        debug!("Removing clone {}", path.display());
        std::fs::remove_dir_all(path)?;
    }
    Ok(())
}
