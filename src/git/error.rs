//! Typed domain errors for git and worktree operations.
//!
//! Errors convert into `anyhow::Error` with `.into()` while preserving the
//! type, so `main.rs` can downcast for styled display and tests can pattern
//! match on variants.

use std::path::PathBuf;

use crate::styling::{ERROR, ERROR_BOLD, ERROR_EMOJI, HINT, HINT_EMOJI, format_with_gutter};

/// Domain errors for git and worktree operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GitError {
    /// An external git command exited non-zero or failed to spawn.
    #[error("git {command} failed")]
    CommandFailed { command: String, stderr: String },

    /// No git repository could be resolved for the starting directory.
    #[error("not inside a git repository: {}", path.display())]
    NotInRepository { path: PathBuf },

    /// A user-supplied branch name failed `check-ref-format --branch`.
    #[error("'{name}' is not a valid branch name")]
    InvalidBranchName { name: String },

    /// A user-supplied revision does not resolve to a commit object.
    #[error("'{hash}' does not resolve to a commit")]
    InvalidCommit { hash: String },

    /// Host-generated git output did not match the expected shape.
    #[error("{message}")]
    ParseError { message: String },
}

impl GitError {
    /// Styled, emoji-prefixed message for terminal display.
    pub fn styled(&self) -> String {
        match self {
            GitError::CommandFailed { command, stderr } => {
                let header = format!(
                    "{ERROR_EMOJI} {ERROR}git {ERROR_BOLD}{command}{ERROR_BOLD:#}{ERROR} failed{ERROR:#}"
                );
                let trimmed = stderr.trim();
                if trimmed.is_empty() {
                    header
                } else {
                    format!("{header}\n{}", format_with_gutter(trimmed))
                }
            }

            GitError::NotInRepository { path } => {
                format!(
                    "{ERROR_EMOJI} {ERROR}Not inside a git repository: {ERROR_BOLD}{}{ERROR_BOLD:#}{ERROR:#}\n\n{HINT_EMOJI} {HINT}Run this from a directory inside a git worktree{HINT:#}",
                    path.display()
                )
            }

            GitError::InvalidBranchName { name } => {
                format!(
                    "{ERROR_EMOJI} {ERROR}{ERROR_BOLD}{name}{ERROR_BOLD:#}{ERROR} is not a valid branch name{ERROR:#}\n\n{HINT_EMOJI} {HINT}See 'git check-ref-format' for the naming rules{HINT:#}"
                )
            }

            GitError::InvalidCommit { hash } => {
                format!(
                    "{ERROR_EMOJI} {ERROR}The commit {ERROR_BOLD}{hash}{ERROR_BOLD:#}{ERROR} is invalid{ERROR:#}\n\n{HINT_EMOJI} {HINT}Use a commit hash that exists in this repository{HINT:#}"
                )
            }

            GitError::ParseError { message } => {
                format!("{ERROR_EMOJI} {ERROR}{message}{ERROR:#}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_plain() {
        let err = GitError::InvalidBranchName {
            name: "bad name".into(),
        };
        assert_eq!(err.to_string(), "'bad name' is not a valid branch name");

        let err = GitError::CommandFailed {
            command: "worktree remove /x".into(),
            stderr: "fatal: not a working tree".into(),
        };
        assert_eq!(err.to_string(), "git worktree remove /x failed");
    }

    #[test]
    fn styled_includes_stderr_gutter() {
        let err = GitError::CommandFailed {
            command: "fetch --all".into(),
            stderr: "fatal: could not read from remote".into(),
        };
        let styled = err.styled();
        assert!(styled.contains(ERROR_EMOJI));
        assert!(styled.contains("could not read from remote"));
    }

    #[test]
    fn into_preserves_type_for_downcast() {
        let err: anyhow::Error = GitError::InvalidCommit {
            hash: "deadbeef".into(),
        }
        .into();

        match err.downcast_ref::<GitError>() {
            Some(GitError::InvalidCommit { hash }) => assert_eq!(hash, "deadbeef"),
            other => panic!("unexpected downcast: {other:?}"),
        }
    }
}
