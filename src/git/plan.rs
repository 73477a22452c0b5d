//! Argument derivation and input validation for `git worktree add`.
//!
//! Planning is pure: given a validated target and a destination path it
//! returns the exact argument suffix to append after `worktree add`, or a
//! refusal when the target is already checked out somewhere. Validation
//! happens at construction so a built [`AddTarget`] or [`Base`] is always
//! safe to plan with.

use std::path::{Path, PathBuf};

use super::{GitError, Ref, RefSource, Repository};

/// The starting point for a new branch or detached worktree.
#[derive(Debug, Clone)]
pub enum Base {
    Branch(String),
    Commit(String),
}

impl Base {
    pub fn branch(name: impl Into<String>) -> Self {
        Base::Branch(name.into())
    }

    /// A commit base, validated against the repository's object store.
    pub fn commit(repo: &Repository, hash: &str) -> anyhow::Result<Self> {
        let hash = hash.trim();
        validate_commit(repo, hash)?;
        Ok(Base::Commit(hash.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Base::Branch(name) => name,
            Base::Commit(hash) => hash,
        }
    }
}

/// What the new worktree should check out.
#[derive(Debug, Clone)]
pub enum AddTarget {
    /// An existing branch, local or remote-tracking.
    Existing(Ref),
    /// A branch to be created at `base`.
    NewBranch { name: String, base: Base },
    /// A detached HEAD at `base`.
    Detached { base: Base },
}

impl AddTarget {
    /// A new-branch target with the name validated up front.
    pub fn new_branch(repo: &Repository, name: &str, base: Base) -> anyhow::Result<Self> {
        let name = name.trim();
        validate_branch_name(repo, name)?;
        Ok(AddTarget::NewBranch {
            name: name.to_string(),
            base,
        })
    }

    /// The branch name the target resolves to, if it has one.
    pub fn branch_name(&self) -> Option<&str> {
        match self {
            AddTarget::Existing(r) => Some(r.short_name()),
            AddTarget::NewBranch { name, .. } => Some(name),
            AddTarget::Detached { .. } => None,
        }
    }
}

/// Result of planning a worktree addition.
#[derive(Debug, Clone)]
pub enum PlanOutcome {
    /// Argument suffix for `git worktree add`.
    Args(Vec<String>),
    /// The target branch is already checked out in this worktree.
    AlreadyCheckedOut { path: PathBuf },
}

/// Derive the `worktree add` arguments for a target and destination.
///
/// An existing local branch already attached to a worktree is refused; every
/// other shape maps to one fixed argument layout.
pub fn plan_add(target: &AddTarget, worktree_path: &Path) -> PlanOutcome {
    let path = worktree_path.display().to_string();

    let args = match target {
        AddTarget::Existing(r) => {
            if let Some(worktree) = &r.worktree {
                return PlanOutcome::AlreadyCheckedOut {
                    path: worktree.path.clone(),
                };
            }
            match r.source {
                RefSource::Local => vec![path, r.name.clone()],
                // Create a local branch tracking the remote ref.
                RefSource::Remote => vec![
                    "--track".to_string(),
                    "-b".to_string(),
                    r.short_name().to_string(),
                    path,
                    r.name.clone(),
                ],
            }
        }
        AddTarget::NewBranch { name, base } => vec![
            "-b".to_string(),
            name.clone(),
            path,
            base.as_str().to_string(),
        ],
        AddTarget::Detached { base } => {
            vec!["--detach".to_string(), path, base.as_str().to_string()]
        }
    };
    PlanOutcome::Args(args)
}

/// Check a proposed branch name with `check-ref-format --branch`.
pub fn validate_branch_name(repo: &Repository, name: &str) -> anyhow::Result<()> {
    if name.is_empty() || !repo.run_command_check(&["check-ref-format", "--branch", name])? {
        return Err(GitError::InvalidBranchName {
            name: name.to_string(),
        }
        .into());
    }
    Ok(())
}

/// Check that a revision resolves to a commit object via `cat-file -t`.
pub fn validate_commit(repo: &Repository, hash: &str) -> anyhow::Result<()> {
    let output = repo.run_command_output(&["cat-file", "-t", hash])?;
    let object_type = String::from_utf8_lossy(&output.stdout);
    if !output.status.success() || object_type.trim() != "commit" {
        return Err(GitError::InvalidCommit {
            hash: hash.to_string(),
        }
        .into());
    }
    Ok(())
}

/// Default destination: a sibling of `parent` named after the target.
///
/// `feature/x` under `/work` suggests `/work/feature/x`; a detached target
/// suggests `/work/detached-<hash>`.
pub fn suggest_worktree_path(parent: &str, target: &AddTarget) -> PathBuf {
    let leaf = match target {
        AddTarget::Detached { base } => format!("detached-{}", base.as_str()),
        other => other
            .branch_name()
            .unwrap_or_default()
            .to_string(),
    };
    let parent = parent.trim_end_matches('/');
    if parent.is_empty() {
        PathBuf::from(leaf)
    } else {
        PathBuf::from(format!("{parent}/{leaf}"))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::git::Worktree;

    fn existing(source: RefSource, name: &str, worktree: Option<Worktree>) -> AddTarget {
        AddTarget::Existing(Ref {
            source,
            id: "abc123".into(),
            name: name.into(),
            upstream: None,
            is_head: false,
            author: "Alice".into(),
            message: "msg".into(),
            date: None,
            ahead: None,
            behind: None,
            worktree,
        })
    }

    fn args(outcome: PlanOutcome) -> Vec<String> {
        match outcome {
            PlanOutcome::Args(args) => args,
            PlanOutcome::AlreadyCheckedOut { path } => {
                panic!("unexpected refusal: {}", path.display())
            }
        }
    }

    #[test]
    fn local_branch_args() {
        let target = existing(RefSource::Local, "topic", None);
        assert_eq!(
            args(plan_add(&target, Path::new("/work/topic"))),
            vec!["/work/topic", "topic"]
        );
    }

    #[test]
    fn remote_branch_args_track_and_create() {
        let target = existing(RefSource::Remote, "origin/feature/x", None);
        assert_eq!(
            args(plan_add(&target, Path::new("/work/feature/x"))),
            vec![
                "--track",
                "-b",
                "feature/x",
                "/work/feature/x",
                "origin/feature/x"
            ]
        );
    }

    #[test]
    fn new_branch_args() {
        let target = AddTarget::NewBranch {
            name: "spike".into(),
            base: Base::branch("main"),
        };
        assert_eq!(
            args(plan_add(&target, Path::new("/work/spike"))),
            vec!["-b", "spike", "/work/spike", "main"]
        );
    }

    #[test]
    fn detached_args() {
        let target = AddTarget::Detached {
            base: Base::Commit("abc123".into()),
        };
        assert_eq!(
            args(plan_add(&target, Path::new("/work/detached-abc123"))),
            vec!["--detach", "/work/detached-abc123", "abc123"]
        );
    }

    #[test]
    fn checked_out_branch_is_refused() {
        let worktree = Worktree {
            path: PathBuf::from("/work/topic"),
            head: Some("abc123".into()),
            branch: Some("topic".into()),
        };
        let target = existing(RefSource::Local, "topic", Some(worktree));
        match plan_add(&target, Path::new("/elsewhere")) {
            PlanOutcome::AlreadyCheckedOut { path } => {
                assert_eq!(path, PathBuf::from("/work/topic"));
            }
            PlanOutcome::Args(args) => panic!("expected refusal, got {args:?}"),
        }
    }

    #[rstest]
    #[case("/work", "/work/feature/x")]
    #[case("/work/", "/work/feature/x")]
    #[case("", "feature/x")]
    fn suggested_path_joins_parent_and_branch(#[case] parent: &str, #[case] expected: &str) {
        let target = existing(RefSource::Remote, "origin/feature/x", None);
        assert_eq!(
            suggest_worktree_path(parent, &target),
            PathBuf::from(expected)
        );
    }

    #[test]
    fn suggested_path_for_detached_target() {
        let target = AddTarget::Detached {
            base: Base::Commit("abc123".into()),
        };
        assert_eq!(
            suggest_worktree_path("/work", &target),
            PathBuf::from("/work/detached-abc123")
        );
    }
}
