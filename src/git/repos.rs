//! Repository lists and GitHub URL handling

use crate::error::{SurveyError, SurveyResult};
use crate::models::Repository;
use std::path::Path;

const GITHUB_PREFIXES: &[&str] = &["https://github.com/", "http://github.com/"];

/// `owner/name` of a GitHub URL, or `None` when the URL has no such pair
pub fn parse_repo_url(url: &str) -> Option<(String, String)> {
    let mut rest = url.trim();
    for prefix in GITHUB_PREFIXES {
        if let Some(stripped) = rest.strip_prefix(prefix) {
            rest = stripped;
            break;
        }
    }
    let rest = rest.trim_end_matches('/');
    let rest = rest.strip_suffix(".git").unwrap_or(rest);

    let mut parts = rest.split('/');
    match (parts.next(), parts.next()) {
        (Some(owner), Some(name)) if is_path_segment(owner) && is_path_segment(name) => {
            Some((owner.to_string(), name.to_string()))
        }
        _ => None,
    }
}

/// GitHub owner/repo characters only; `.` and `..` are never a name
fn is_path_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// Build a repository entry from a URL
pub fn repository_from_url(url: &str, source: &str) -> SurveyResult<Repository> {
    let (owner, name) =
        parse_repo_url(url).ok_or_else(|| SurveyError::InvalidUrl(url.to_string()))?;
    Ok(Repository {
        url: url.trim().to_string(),
        name,
        owner,
        source: source.to_string(),
        ..Default::default()
    })
}

/// Entry for a directory analysed in place; named after the directory
pub fn local_repository(path: &Path) -> Repository {
    let name = path
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .or_else(|| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| path.display().to_string());

    Repository {
        url: path.display().to_string(),
        name,
        source: "local".to_string(),
        local_path: Some(path.to_path_buf()),
        ..Default::default()
    }
}

/// Label used in record ids: `owner/name` for remote repositories, the
/// directory name for local ones
pub fn repo_label(repo: &Repository) -> String {
    if repo.owner.is_empty() {
        repo.name.clone()
    } else {
        format!("{}/{}", repo.owner, repo.name)
    }
}

/// One URL per line; blank lines and `#` comments are skipped
pub fn load_repo_list(path: &Path) -> SurveyResult<Vec<Repository>> {
    let content = std::fs::read_to_string(path)?;
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| repository_from_url(line, "file"))
        .collect()
}
