use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use git2::{Repository, Sort};
use tracing::debug;

use crate::log::{Commit, Hash};

/// Reads commit history out of a git repository, children before parents
pub struct GitWalker {
    repo: Repository,
}

impl GitWalker {
    pub fn new(repo_path: Option<&str>) -> Result<Self> {
        let repo = match repo_path {
            Some(path) => Repository::open(path),
            None => Repository::open_from_env(),
        }
        .context("Failed to open repository")?;

        Ok(Self { repo })
    }

    /// Commits reachable from HEAD and every local branch, in topological
    /// order (newest first)
    pub fn commits(&self, limit: Option<usize>) -> Result<Vec<Commit>> {
        let mut revwalk = self.repo.revwalk()?;

        if self.repo.head().is_ok() {
            revwalk.push_head()?;
        }
        for branch in self.repo.branches(None)? {
            let (branch, _) = branch?;
            if let Some(target) = branch.get().target() {
                revwalk.push(target)?;
            }
        }
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;

        let mut commits = Vec::new();
        for oid in revwalk {
            if limit.is_some_and(|limit| commits.len() >= limit) {
                break;
            }
            let commit = self.repo.find_commit(oid?)?;
            commits.push(convert(&commit)?);
        }

        debug!(count = commits.len(), "read commits from repository");
        Ok(commits)
    }

    /// History as log text, one `hash|-parents|-author|-timestamp|-message`
    /// line per commit
    pub fn log_text(&self, limit: Option<usize>) -> Result<String> {
        let mut text = String::new();
        for commit in self.commits(limit)? {
            text.push_str(&commit.to_log_line());
            text.push('\n');
        }
        Ok(text)
    }
}

fn convert(commit: &git2::Commit) -> Result<Commit> {
    let timestamp = Utc
        .timestamp_opt(commit.time().seconds(), 0)
        .single()
        .context("Invalid commit timestamp")?;
    let author = commit.author().name().unwrap_or("Unknown").to_string();
    // the log format is line based
    let message = commit.summary().unwrap_or("").replace(['\r', '\n'], " ");

    Ok(Commit::new(
        Hash::new(commit.id().to_string()),
        commit.parent_ids().map(|oid| Hash::new(oid.to_string())),
        author,
        timestamp,
        message,
    ))
}
