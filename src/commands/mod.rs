//! Interactive command flows.
//!
//! Each flow composes the git engine with a [`Prompt`]: gather state, ask,
//! derive a plan, execute. Cancelling any prompt ends the flow without an
//! error.

pub mod add;
pub mod open;
pub mod remove;

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::git::{Repository, Worktree, list_worktrees};
use crate::ui::{PickItem, Prompt};

/// Pick one of the repository's worktrees.
pub(crate) fn choose_worktree(
    repo: &Repository,
    prompt: &dyn Prompt,
    title: &str,
) -> anyhow::Result<Option<Worktree>> {
    let worktrees = list_worktrees(repo)?;
    choose_from(prompt, title, worktrees)
}

/// Pick one of the repository's linked worktrees (the main worktree cannot
/// be removed, so removal flows exclude it).
pub(crate) fn choose_linked_worktree(
    repo: &Repository,
    prompt: &dyn Prompt,
    title: &str,
) -> anyhow::Result<Option<Worktree>> {
    // `worktree list` always reports the main worktree first.
    let worktrees: Vec<Worktree> = list_worktrees(repo)?.into_iter().skip(1).collect();
    choose_from(prompt, title, worktrees)
}

fn choose_from(
    prompt: &dyn Prompt,
    title: &str,
    worktrees: Vec<Worktree>,
) -> anyhow::Result<Option<Worktree>> {
    if worktrees.is_empty() {
        crate::styling::println!("No worktrees to choose from.");
        return Ok(None);
    }
    let items: Vec<PickItem> = worktrees.iter().map(PickItem::for_worktree).collect();
    let Some(index) = prompt.select(title, &items)? else {
        return Ok(None);
    };
    Ok(worktrees.into_iter().nth(index))
}

/// What to open for a worktree: its configured workspace file when one
/// exists inside it, otherwise the worktree directory itself.
pub(crate) fn open_target(config: &Config, worktree_path: &Path) -> PathBuf {
    if let Some(workspace_file) = &config.open.workspace_file {
        let candidate = worktree_path.join(workspace_file);
        if candidate.exists() {
            return candidate;
        }
    }
    worktree_path.to_path_buf()
}
