//! Git backend: subprocess execution, repository discovery, and the
//! branch/worktree reconciliation engine.
//!
//! All repository truth comes from the git CLI; this module never touches
//! the object store directly. Module organization:
//!
//! - `mod.rs` - [`Repository`] (command execution, discovery) and the
//!   [`WorktreeDirCache`] membership cache
//! - `refs.rs` - ref collection via `for-each-ref`
//! - `worktrees.rs` - worktree listing (porcelain) and add/remove execution
//! - `divergence.rs` - ahead/behind counts for upstream-linked pairs
//! - `reconcile.rs` - deduplicated, worktree-annotated branch list
//! - `plan.rs` - argument derivation and input validation for `worktree add`
//! - `error.rs` - the [`GitError`] taxonomy

mod divergence;
mod error;
mod plan;
mod reconcile;
mod refs;
mod worktrees;

pub use divergence::load_divergence;
pub use error::GitError;
pub use plan::{
    AddTarget, Base, PlanOutcome, plan_add, suggest_worktree_path, validate_branch_name,
    validate_commit,
};
pub use reconcile::{branch_list, reconcile};
pub use refs::{Ref, RefSource, list_refs};
pub use worktrees::{Worktree, add_worktree, list_worktrees, remove_worktree};

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use dashmap::DashSet;

/// Directories already confirmed to be inside a git worktree.
///
/// Lives for the whole process and only ever grows; concurrent flows may
/// probe the same directory, so membership is an atomic check-or-insert.
/// Injectable so tests can substitute a fresh instance.
#[derive(Debug, Default)]
pub struct WorktreeDirCache {
    confirmed: DashSet<PathBuf>,
}

impl WorktreeDirCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `dir` is inside a git worktree, probing git on a cache miss.
    ///
    /// A failed probe just means "no"; it is never an error.
    pub fn is_inside_worktree(&self, dir: &Path) -> bool {
        if self.confirmed.contains(dir) {
            return true;
        }
        let inside = raw_git_output(dir, &["rev-parse", "--is-inside-work-tree"])
            .map(|stdout| stdout.trim() == "true")
            .unwrap_or(false);
        if inside {
            self.confirmed.insert(dir.to_path_buf());
        }
        inside
    }
}

/// Run a git command before a [`Repository`] exists (discovery probes).
fn raw_git_output(dir: &Path, args: &[&str]) -> anyhow::Result<String> {
    log::debug!("git {} (in {})", args.join(" "), dir.display());
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|err| GitError::CommandFailed {
            command: args.join(" "),
            stderr: err.to_string(),
        })?;
    if !output.status.success() {
        return Err(GitError::CommandFailed {
            command: args.join(" "),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into());
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// A discovered git repository, addressed through one of its worktrees.
///
/// All commands run with the discovery directory as their working directory,
/// so relative worktree paths behave exactly as they would in a shell there.
#[derive(Debug, Clone)]
pub struct Repository {
    workdir: PathBuf,
    git_common_dir: PathBuf,
}

impl Repository {
    /// Discover the repository containing `dir`.
    ///
    /// Fails with [`GitError::NotInRepository`] when `dir` is not inside a
    /// worktree; nothing else is probed in that case.
    pub fn discover(dir: impl Into<PathBuf>, cache: &WorktreeDirCache) -> anyhow::Result<Self> {
        let workdir = dir.into();
        if !cache.is_inside_worktree(&workdir) {
            return Err(GitError::NotInRepository { path: workdir }.into());
        }
        let stdout = raw_git_output(
            &workdir,
            &["rev-parse", "--path-format=absolute", "--git-common-dir"],
        )?;
        Ok(Self {
            workdir,
            git_common_dir: PathBuf::from(stdout.trim()),
        })
    }

    /// The directory commands run in.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// The shared `.git` directory (absolute).
    pub fn git_common_dir(&self) -> &Path {
        &self.git_common_dir
    }

    /// Run a git command, returning stdout.
    ///
    /// Non-zero exit becomes [`GitError::CommandFailed`] carrying the full
    /// stderr text; callers decide whether that is fatal or informational.
    pub fn run_command(&self, args: &[&str]) -> anyhow::Result<String> {
        let output = self.run_command_output(args)?;
        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run a git command and report success by exit code alone.
    pub fn run_command_check(&self, args: &[&str]) -> anyhow::Result<bool> {
        Ok(self.run_command_output(args)?.status.success())
    }

    /// Run a git command and return the raw [`Output`] for probes that
    /// interpret exit codes or stdout themselves.
    pub(crate) fn run_command_output(&self, args: &[&str]) -> anyhow::Result<Output> {
        log::debug!("git {}", args.join(" "));
        Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|err| {
                GitError::CommandFailed {
                    command: args.join(" "),
                    stderr: err.to_string(),
                }
                .into()
            })
    }

    /// Refresh all remote-tracking refs. Runs to completion; not cancelable.
    pub fn fetch_all(&self) -> anyhow::Result<()> {
        self.run_command(&["fetch", "--all"])?;
        Ok(())
    }
}
