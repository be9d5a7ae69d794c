//! Repository acquisition
//!
//! Parses repository lists and GitHub URLs, and makes shallow clones with
//! git2 so that each repository can be analysed from a local checkout.

pub mod clone;
pub mod repos;

pub use clone::{clone_path, clone_repo, remove_clone};
pub use repos::{
    load_repo_list, local_repository, parse_repo_url, repo_label, repository_from_url,
};
