//! Deduplicated, worktree-annotated branch list.
//!
//! Reconciliation folds the raw ref listing and the worktree listing into
//! the entries a picker should show: each local branch carries its worktree
//! (if checked out anywhere), and remote refs that some local already tracks
//! are dropped so a branch appears once. Name collisions between a local and
//! an unrelated remote resolve in favor of the local.

use std::collections::{HashMap, HashSet};

use super::{Ref, RefSource, Repository, Worktree, list_refs, list_worktrees, load_divergence};

/// Attach worktrees and drop shadowed remotes. Pure; ordering of the input
/// is preserved for the survivors.
pub fn reconcile(refs: Vec<Ref>, worktrees: &[Worktree]) -> Vec<Ref> {
    let by_branch: HashMap<&str, &Worktree> = worktrees
        .iter()
        .filter_map(|wt| wt.branch.as_deref().map(|branch| (branch, wt)))
        .collect();

    // Remote names already represented by some local's upstream.
    let tracked: HashSet<String> = refs
        .iter()
        .filter(|r| r.source == RefSource::Local)
        .filter_map(|r| r.upstream.clone())
        .collect();

    let mut seen_names: HashSet<String> = HashSet::new();
    let mut reconciled = Vec::with_capacity(refs.len());

    // Locals first so they win short-name collisions against remotes.
    let (locals, remotes): (Vec<_>, Vec<_>) = refs
        .into_iter()
        .partition(|r| r.source == RefSource::Local);

    for mut r in locals {
        r.worktree = by_branch.get(r.name.as_str()).map(|&wt| wt.clone());
        if seen_names.insert(r.short_name().to_string()) {
            reconciled.push(r);
        }
    }

    for r in remotes {
        if tracked.contains(&r.name) {
            continue;
        }
        if seen_names.insert(r.short_name().to_string()) {
            reconciled.push(r);
        }
    }

    reconciled
}

/// Produce the full reconciled branch list for one picker cycle.
///
/// Ref and worktree listings run concurrently, then divergence counting
/// fans out per pair; everything joins before reconciliation so the result
/// is a consistent snapshot.
pub fn branch_list(repo: &Repository) -> anyhow::Result<Vec<Ref>> {
    let (refs, worktrees) = rayon::join(|| list_refs(repo), || list_worktrees(repo));
    let mut refs = refs?;
    let worktrees = worktrees?;
    load_divergence(repo, &mut refs);
    Ok(reconcile(refs, &worktrees))
}
