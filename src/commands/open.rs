//! The `switch` and `open` flows: pick a worktree and print where to go.
//!
//! Printing (rather than spawning an editor or shell) keeps the binary
//! composable: shell wrappers do `cd "$(wta switch)"` and editor wrappers
//! pass the open target along.

use crate::config::Config;
use crate::git::Repository;
use crate::styling::println;
use crate::ui::Prompt;

/// Print the chosen worktree's directory.
pub fn switch(repo: &Repository, prompt: &dyn Prompt) -> anyhow::Result<()> {
    if let Some(worktree) = super::choose_worktree(repo, prompt, "Switch to which worktree?")? {
        println!("{}", worktree.path.display());
    }
    Ok(())
}

/// Print the chosen worktree's open target: its configured workspace file
/// when present, otherwise the directory.
pub fn open(repo: &Repository, config: &Config, prompt: &dyn Prompt) -> anyhow::Result<()> {
    if let Some(worktree) = super::choose_worktree(repo, prompt, "Open which worktree?")? {
        println!("{}", super::open_target(config, &worktree.path).display());
    }
    Ok(())
}
