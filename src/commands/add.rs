//! The `add` flow: pick or create a branch, pick a path, add a worktree.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::git::{
    AddTarget, Base, PlanOutcome, Ref, Repository, add_worktree, branch_list, plan_add,
    suggest_worktree_path,
};
use crate::styling::println;
use crate::ui::{PickItem, Prompt};

/// What the user picked as the worktree's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Destination {
    NewBranch,
    Detached,
    /// Index into the reconciled branch list.
    Existing(usize),
}

/// The two fixed action rows shown before the branch entries.
const ACTION_ROWS: usize = 2;

pub(crate) fn choose_destination(
    prompt: &dyn Prompt,
    refs: &[Ref],
) -> anyhow::Result<Option<Destination>> {
    let mut items = vec![
        PickItem::action("Create a new branch", "branch off an existing ref"),
        PickItem::action("Detached HEAD", "check out a commit without a branch"),
    ];
    items.extend(refs.iter().map(PickItem::for_ref));

    let destination = prompt
        .select("What should the worktree contain?", &items)?
        .map(|index| match index {
            0 => Destination::NewBranch,
            1 => Destination::Detached,
            picked => Destination::Existing(picked - ACTION_ROWS),
        });
    Ok(destination)
}

/// The starting point picked for a new branch or detached worktree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BaseChoice {
    CustomCommit,
    /// Index into the reconciled branch list.
    Ref(usize),
}

/// Pick a base ref, with the current HEAD listed first since branching off
/// it is the common case.
pub(crate) fn choose_base(
    prompt: &dyn Prompt,
    refs: &[Ref],
) -> anyhow::Result<Option<BaseChoice>> {
    let mut order: Vec<usize> = (0..refs.len()).collect();
    order.sort_by_key(|&i| !refs[i].is_head);

    let mut items = vec![PickItem::action(
        "Enter a commit hash",
        "base the worktree on an arbitrary commit",
    )];
    items.extend(order.iter().map(|&i| PickItem::for_ref(&refs[i])));

    let choice = prompt.select("Base it on", &items)?.map(|index| {
        if index == 0 {
            BaseChoice::CustomCommit
        } else {
            BaseChoice::Ref(order[index - 1])
        }
    });
    Ok(choice)
}

fn resolve_base(
    repo: &Repository,
    prompt: &dyn Prompt,
    refs: &[Ref],
) -> anyhow::Result<Option<Base>> {
    let base = match choose_base(prompt, refs)? {
        None => None,
        Some(BaseChoice::Ref(index)) => Some(Base::branch(refs[index].name.clone())),
        Some(BaseChoice::CustomCommit) => match prompt.input("Commit hash", "")? {
            Some(hash) => Some(Base::commit(repo, &hash)?),
            None => None,
        },
    };
    Ok(base)
}

fn default_parent(repo: &Repository) -> String {
    repo.workdir()
        .parent()
        .map(|parent| parent.display().to_string())
        .unwrap_or_else(|| ".".to_string())
}

fn offer_open(
    config: &Config,
    prompt: &dyn Prompt,
    worktree_path: &Path,
    title: &str,
) -> anyhow::Result<()> {
    let items = [
        PickItem::action("Finish", ""),
        PickItem::action("Show path", "print it for cd"),
        PickItem::action("Show open target", "workspace file if configured"),
    ];
    match prompt.select(title, &items)? {
        Some(1) => println!("{}", worktree_path.display()),
        Some(2) => println!(
            "{}",
            super::open_target(config, worktree_path).display()
        ),
        _ => {}
    }
    Ok(())
}

pub fn run(repo: &Repository, config: &Config, prompt: &dyn Prompt) -> anyhow::Result<()> {
    match prompt.confirm("Fetch all remotes first?", true)? {
        Some(true) => {
            println!("Fetching...");
            repo.fetch_all()?;
        }
        Some(false) => {}
        None => return Ok(()),
    }

    let refs = branch_list(repo)?;
    let Some(destination) = choose_destination(prompt, &refs)? else {
        return Ok(());
    };

    let target = match destination {
        Destination::Existing(index) => AddTarget::Existing(refs[index].clone()),
        Destination::NewBranch => {
            let Some(base) = resolve_base(repo, prompt, &refs)? else {
                return Ok(());
            };
            let Some(name) = prompt.input("New branch name", "")? else {
                return Ok(());
            };
            AddTarget::new_branch(repo, &name, base)?
        }
        Destination::Detached => {
            let Some(base) = resolve_base(repo, prompt, &refs)? else {
                return Ok(());
            };
            AddTarget::Detached { base }
        }
    };

    let parent = config.parent_dir(&default_parent(repo));
    let suggestion = suggest_worktree_path(&parent, &target);
    let Some(path) = prompt.input("Worktree path", &suggestion.display().to_string())? else {
        return Ok(());
    };
    let worktree_path = PathBuf::from(path);

    match plan_add(&target, &worktree_path) {
        PlanOutcome::AlreadyCheckedOut { path } => {
            println!("That branch is already checked out at {}", path.display());
            offer_open(config, prompt, &path, "Use the existing worktree?")?;
        }
        PlanOutcome::Args(args) => {
            add_worktree(repo, &args)?;
            println!("Worktree added at {}", worktree_path.display());
            offer_open(config, prompt, &worktree_path, "Open the new worktree?")?;
        }
    }
    Ok(())
}
