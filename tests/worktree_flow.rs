//! End-to-end tests against real git repositories in temp directories.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use worktree_assistant::config::Config;
use worktree_assistant::git::{
    AddTarget, Base, GitError, PlanOutcome, Repository, WorktreeDirCache, add_worktree,
    branch_list, list_refs, list_worktrees, plan_add, remove_worktree, validate_branch_name,
    validate_commit,
};
use worktree_assistant::ui::{PickItem, Prompt};

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args([
            "-c",
            "user.name=Test",
            "-c",
            "user.email=test@example.com",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .current_dir(dir)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("GIT_CONFIG_GLOBAL", "/dev/null")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn init_repo(dir: &Path) {
    git(dir, &["init", "-b", "main"]);
    git(dir, &["commit", "--allow-empty", "-m", "initial commit"]);
}

fn discover(dir: &Path) -> Repository {
    let cache = WorktreeDirCache::new();
    Repository::discover(dir, &cache).unwrap()
}

#[test]
fn discover_fails_outside_a_repository() {
    let tmp = TempDir::new().unwrap();
    let cache = WorktreeDirCache::new();

    let err = Repository::discover(tmp.path(), &cache).unwrap_err();
    match err.downcast_ref::<GitError>() {
        Some(GitError::NotInRepository { path }) => assert_eq!(path, tmp.path()),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn worktree_dir_cache_remembers_confirmed_directories() {
    let tmp = TempDir::new().unwrap();
    let repo_dir = tmp.path().join("repo");
    std::fs::create_dir(&repo_dir).unwrap();
    init_repo(&repo_dir);

    let cache = WorktreeDirCache::new();
    assert!(cache.is_inside_worktree(&repo_dir));
    assert!(cache.is_inside_worktree(&repo_dir));
    assert!(!cache.is_inside_worktree(tmp.path()));
}

#[test]
fn list_refs_reports_branches_and_head() {
    let tmp = TempDir::new().unwrap();
    init_repo(tmp.path());
    git(tmp.path(), &["branch", "topic"]);

    let repo = discover(tmp.path());
    let refs = list_refs(&repo).unwrap();

    let main = refs.iter().find(|r| r.name == "main").unwrap();
    assert!(main.is_head);
    assert!(main.date.is_some());
    assert_eq!(main.message, "initial commit");
    assert_eq!(main.upstream, None);

    let topic = refs.iter().find(|r| r.name == "topic").unwrap();
    assert!(!topic.is_head);
    assert_eq!(topic.id, main.id);
}

#[test]
fn add_and_remove_worktree_round_trip() {
    let tmp = TempDir::new().unwrap();
    let repo_dir = tmp.path().join("repo");
    std::fs::create_dir(&repo_dir).unwrap();
    init_repo(&repo_dir);
    let repo = discover(&repo_dir);

    let target = AddTarget::new_branch(&repo, "wt-x", Base::branch("main")).unwrap();
    let worktree_path = tmp.path().join("wt-x");
    let PlanOutcome::Args(args) = plan_add(&target, &worktree_path) else {
        panic!("expected plan args");
    };
    add_worktree(&repo, &args).unwrap();

    let worktrees = list_worktrees(&repo).unwrap();
    assert_eq!(worktrees.len(), 2);
    let linked = &worktrees[1];
    assert_eq!(linked.branch.as_deref(), Some("wt-x"));
    assert_eq!(linked.path.canonicalize().unwrap(), worktree_path.canonicalize().unwrap());

    remove_worktree(&repo, &linked.path).unwrap();
    assert_eq!(list_worktrees(&repo).unwrap().len(), 1);
}

#[test]
fn checked_out_branch_is_refused_by_planning() {
    let tmp = TempDir::new().unwrap();
    init_repo(tmp.path());
    let repo = discover(tmp.path());

    let refs = branch_list(&repo).unwrap();
    let main = refs.iter().find(|r| r.name == "main").unwrap();
    assert!(main.worktree.is_some());

    let target = AddTarget::Existing(main.clone());
    match plan_add(&target, &tmp.path().join("elsewhere")) {
        PlanOutcome::AlreadyCheckedOut { path } => {
            assert_eq!(
                path.canonicalize().unwrap(),
                tmp.path().canonicalize().unwrap()
            );
        }
        PlanOutcome::Args(args) => panic!("expected refusal, got {args:?}"),
    }
}

#[test]
fn validation_accepts_good_and_rejects_bad_inputs() {
    let tmp = TempDir::new().unwrap();
    init_repo(tmp.path());
    let repo = discover(tmp.path());

    validate_branch_name(&repo, "feature/x").unwrap();
    let err = validate_branch_name(&repo, "bad name").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<GitError>(),
        Some(GitError::InvalidBranchName { .. })
    ));

    let head = git(tmp.path(), &["rev-parse", "HEAD"]);
    validate_commit(&repo, head.trim()).unwrap();
    let err = validate_commit(&repo, "deadbeef").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<GitError>(),
        Some(GitError::InvalidCommit { .. })
    ));
}

#[test]
fn divergence_counts_against_a_cloned_origin() {
    let tmp = TempDir::new().unwrap();
    let origin = tmp.path().join("origin");
    std::fs::create_dir(&origin).unwrap();
    init_repo(&origin);
    git(tmp.path(), &["clone", "origin", "clone"]);
    let clone = tmp.path().join("clone");
    git(&clone, &["commit", "--allow-empty", "-m", "local work"]);

    let repo = discover(&clone);
    let refs = branch_list(&repo).unwrap();

    // One reconciled entry: origin/main collapses into the tracking local,
    // origin/HEAD is filtered out entirely.
    let mains: Vec<_> = refs.iter().filter(|r| r.short_name() == "main").collect();
    assert_eq!(mains.len(), 1);
    let main = mains[0];
    assert_eq!(main.upstream.as_deref(), Some("origin/main"));
    assert_eq!(main.ahead, Some(1));
    assert_eq!(main.behind, Some(0));
}

#[test]
fn in_sync_pair_gets_explicit_zero_counts() {
    let tmp = TempDir::new().unwrap();
    let origin = tmp.path().join("origin");
    std::fs::create_dir(&origin).unwrap();
    init_repo(&origin);
    git(tmp.path(), &["clone", "origin", "clone"]);

    let repo = discover(&tmp.path().join("clone"));
    let refs = branch_list(&repo).unwrap();
    let main = refs.iter().find(|r| r.short_name() == "main").unwrap();
    assert_eq!(main.ahead, Some(0));
    assert_eq!(main.behind, Some(0));
}

#[test]
fn removing_an_unregistered_path_is_a_command_failure() {
    let tmp = TempDir::new().unwrap();
    init_repo(tmp.path());
    let repo = discover(tmp.path());

    let err = remove_worktree(&repo, &tmp.path().join("not-a-worktree")).unwrap_err();
    match err.downcast_ref::<GitError>() {
        Some(GitError::CommandFailed { command, stderr }) => {
            assert!(command.starts_with("worktree remove"));
            assert!(!stderr.is_empty());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

/// Scripted prompt for driving a full command flow.
struct FakePrompt {
    selects: std::cell::RefCell<Vec<Option<usize>>>,
    inputs: std::cell::RefCell<Vec<Option<String>>>,
    confirms: std::cell::RefCell<Vec<Option<bool>>>,
}

impl FakePrompt {
    fn new(
        selects: Vec<Option<usize>>,
        inputs: Vec<Option<String>>,
        confirms: Vec<Option<bool>>,
    ) -> Self {
        // Stored reversed so pop() yields answers in script order.
        fn reverse<T>(mut v: Vec<T>) -> Vec<T> {
            v.reverse();
            v
        }
        Self {
            selects: std::cell::RefCell::new(reverse(selects)),
            inputs: std::cell::RefCell::new(reverse(inputs)),
            confirms: std::cell::RefCell::new(reverse(confirms)),
        }
    }
}

impl Prompt for FakePrompt {
    fn select(&self, _title: &str, _items: &[PickItem]) -> anyhow::Result<Option<usize>> {
        Ok(self.selects.borrow_mut().pop().expect("unscripted select"))
    }

    fn input(&self, _title: &str, _initial: &str) -> anyhow::Result<Option<String>> {
        Ok(self.inputs.borrow_mut().pop().expect("unscripted input"))
    }

    fn confirm(&self, _title: &str, _default: bool) -> anyhow::Result<Option<bool>> {
        Ok(self.confirms.borrow_mut().pop().expect("unscripted confirm"))
    }
}

#[test]
fn add_flow_creates_a_new_branch_worktree() {
    let tmp = TempDir::new().unwrap();
    let repo_dir = tmp.path().join("repo");
    std::fs::create_dir(&repo_dir).unwrap();
    init_repo(&repo_dir);
    let repo = discover(&repo_dir);
    let config = Config::default();

    let worktree_path: PathBuf = tmp.path().join("topic-wt");
    let prompt = FakePrompt::new(
        // destination: new branch; base: first ref row (HEAD); epilogue: finish
        vec![Some(0), Some(1), Some(0)],
        // branch name; worktree path
        vec![
            Some("topic".to_string()),
            Some(worktree_path.display().to_string()),
        ],
        // skip fetching (no remotes configured)
        vec![Some(false)],
    );

    worktree_assistant::commands::add::run(&repo, &config, &prompt).unwrap();

    let worktrees = list_worktrees(&repo).unwrap();
    assert_eq!(worktrees.len(), 2);
    assert_eq!(worktrees[1].branch.as_deref(), Some("topic"));
}

#[test]
fn add_flow_stops_cleanly_on_cancellation() {
    let tmp = TempDir::new().unwrap();
    init_repo(tmp.path());
    let repo = discover(tmp.path());
    let config = Config::default();

    let prompt = FakePrompt::new(vec![None], vec![], vec![Some(false)]);
    worktree_assistant::commands::add::run(&repo, &config, &prompt).unwrap();
    assert_eq!(list_worktrees(&repo).unwrap().len(), 1);
}
