//! Worktree listing and mutation.
//!
//! Listing goes through `git worktree list --porcelain`, whose record format
//! is blank-line separated `key value` blocks. Parsing is lenient: unknown
//! keys are skipped so newer git versions (locked, prunable, bare markers)
//! keep working without changes here.

use std::path::{Path, PathBuf};

use anyhow::bail;

use super::Repository;

/// One registered worktree of a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worktree {
    pub path: PathBuf,
    /// Checked-out commit; absent for bare entries.
    pub head: Option<String>,
    /// Short branch name; `None` for detached or bare worktrees.
    pub branch: Option<String>,
}

/// Parse `worktree list --porcelain` output.
///
/// Records without a `worktree <path>` line are discarded; a missing
/// trailing blank line still terminates the final record.
pub(crate) fn parse_porcelain_list(output: &str) -> Vec<Worktree> {
    let mut worktrees = Vec::new();
    let mut current: Option<Worktree> = None;

    for line in output.lines() {
        if line.is_empty() {
            if let Some(worktree) = current.take() {
                worktrees.push(worktree);
            }
            continue;
        }

        if let Some(path) = line.strip_prefix("worktree ") {
            if let Some(worktree) = current.take() {
                worktrees.push(worktree);
            }
            current = Some(Worktree {
                path: PathBuf::from(path),
                head: None,
                branch: None,
            });
            continue;
        }

        let Some(worktree) = current.as_mut() else {
            // Attribute line before any path line; nothing to attach it to.
            continue;
        };
        if let Some(head) = line.strip_prefix("HEAD ") {
            worktree.head = Some(head.to_string());
        } else if let Some(branch) = line.strip_prefix("branch ") {
            worktree.branch = Some(
                branch
                    .strip_prefix("refs/heads/")
                    .unwrap_or(branch)
                    .to_string(),
            );
        }
    }

    if let Some(worktree) = current.take() {
        worktrees.push(worktree);
    }
    worktrees
}

/// List all worktrees registered with the repository, main worktree first.
pub fn list_worktrees(repo: &Repository) -> anyhow::Result<Vec<Worktree>> {
    let stdout = repo.run_command(&["worktree", "list", "--porcelain"])?;
    Ok(parse_porcelain_list(&stdout))
}

/// Execute `git worktree add` with a planned argument suffix.
pub fn add_worktree(repo: &Repository, plan_args: &[String]) -> anyhow::Result<()> {
    let mut args = vec!["worktree", "add"];
    args.extend(plan_args.iter().map(String::as_str));
    repo.run_command(&args)?;
    Ok(())
}

/// Remove a worktree by path. Never forces: git refuses to remove dirty or
/// locked worktrees and that refusal surfaces as a command failure.
pub fn remove_worktree(repo: &Repository, path: &Path) -> anyhow::Result<()> {
    let Some(path_str) = path.to_str() else {
        bail!("worktree path is not valid UTF-8: {}", path.display());
    };
    repo.run_command(&["worktree", "remove", path_str])?;
    Ok(())
}
