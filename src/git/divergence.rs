//! Ahead/behind counts for upstream-linked branch pairs.
//!
//! A pair is a local ref plus the remote ref named by its upstream. Counts
//! come from `rev-list --left-only/--right-only --count L...R` and are
//! assigned symmetrically: the local's ahead is the remote's behind and vice
//! versa. Pairs whose two sides share an object id skip the subprocess and
//! get explicit zeros.

use rayon::prelude::*;
use std::collections::HashMap;

use super::{Ref, RefSource, Repository};

/// Indexes of (local, remote) refs joined by the local's upstream name.
pub(crate) fn linked_pairs(refs: &[Ref]) -> Vec<(usize, usize)> {
    let remote_index: HashMap<&str, usize> = refs
        .iter()
        .enumerate()
        .filter(|(_, r)| r.source == RefSource::Remote)
        .map(|(i, r)| (r.name.as_str(), i))
        .collect();

    refs.iter()
        .enumerate()
        .filter(|(_, r)| r.source == RefSource::Local)
        .filter_map(|(local, r)| {
            let upstream = r.upstream.as_deref()?;
            remote_index.get(upstream).map(|&remote| (local, remote))
        })
        .collect()
}

fn count(repo: &Repository, side: &str, local: &str, remote: &str) -> Option<usize> {
    let range = format!("{local}...{remote}");
    let stdout = match repo.run_command(&["rev-list", side, "--count", &range]) {
        Ok(stdout) => stdout,
        Err(err) => {
            log::debug!("rev-list {side} --count {range} failed: {err:#}");
            return None;
        }
    };
    match stdout.trim().parse() {
        Ok(n) => Some(n),
        Err(err) => {
            log::debug!("unparseable rev-list count {:?}: {err}", stdout.trim());
            None
        }
    }
}

/// Counts are only ever recorded as a pair. A ref deleted between the two
/// probes can fail one side; the surviving count is discarded so a pair is
/// either fully counted or fully absent.
fn paired_counts(
    ahead: Option<usize>,
    behind: Option<usize>,
) -> (Option<usize>, Option<usize>) {
    match ahead.zip(behind) {
        Some((ahead, behind)) => (Some(ahead), Some(behind)),
        None => (None, None),
    }
}

fn apply_counts(
    refs: &mut [Ref],
    local: usize,
    remote: usize,
    ahead: Option<usize>,
    behind: Option<usize>,
) {
    refs[local].ahead = ahead;
    refs[local].behind = behind;
    refs[remote].ahead = behind;
    refs[remote].behind = ahead;
}

/// The linked pairs whose two sides point at different commits.
pub(crate) fn divergence_pairs(refs: &[Ref]) -> Vec<(usize, usize)> {
    linked_pairs(refs)
        .into_iter()
        .filter(|&(local, remote)| refs[local].id != refs[remote].id)
        .collect()
}

/// Fill in ahead/behind counts for every upstream-linked pair.
///
/// Counting runs one rev-list per side per diverged pair; pairs fan out
/// across the rayon pool and results are applied after all probes return.
/// A failed probe leaves that pair's counts absent rather than erroring.
pub fn load_divergence(repo: &Repository, refs: &mut [Ref]) {
    let diverged = divergence_pairs(refs);

    // Everything linked but not diverged is in sync.
    for (local, remote) in linked_pairs(refs) {
        if refs[local].id == refs[remote].id {
            apply_counts(refs, local, remote, Some(0), Some(0));
        }
    }

    let counted: Vec<(usize, usize, Option<usize>, Option<usize>)> = diverged
        .par_iter()
        .map(|&(local, remote)| {
            let local_name = refs[local].name.as_str();
            let remote_name = refs[remote].name.as_str();
            let ahead = count(repo, "--left-only", local_name, remote_name);
            let behind = count(repo, "--right-only", local_name, remote_name);
            let (ahead, behind) = paired_counts(ahead, behind);
            (local, remote, ahead, behind)
        })
        .collect();

    for (local, remote, ahead, behind) in counted {
        apply_counts(refs, local, remote, ahead, behind);
    }
}
