//! The `remove` flow: pick a linked worktree and remove it.

use crate::git::{Repository, remove_worktree};
use crate::styling::println;
use crate::ui::Prompt;

/// Remove one linked worktree. Never forces; git's refusal to remove a
/// dirty or locked worktree surfaces as the command error.
pub fn run(repo: &Repository, prompt: &dyn Prompt) -> anyhow::Result<()> {
    let Some(worktree) =
        super::choose_linked_worktree(repo, prompt, "Remove which worktree?")?
    else {
        return Ok(());
    };

    let title = format!("Remove the worktree at {}?", worktree.path.display());
    if prompt.confirm(&title, false)? != Some(true) {
        return Ok(());
    }

    remove_worktree(repo, &worktree.path)?;
    println!("Removed {}", worktree.path.display());
    Ok(())
}
