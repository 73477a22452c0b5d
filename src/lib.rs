//! Interactive assistant for managing git worktrees.
//!
//! The `git` module is the reconciliation engine: it shells out to the git
//! CLI for refs, worktrees, and divergence counts, and derives the argument
//! sequences for `git worktree add`/`remove`. The `commands` module drives
//! the interactive flows on top of it, with all prompt I/O behind the
//! [`ui::Prompt`] trait so the sequencing is testable.

pub mod commands;
pub mod config;
pub mod git;
pub mod styling;
pub mod ui;
