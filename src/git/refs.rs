//! Ref collection via `for-each-ref`.
//!
//! Local heads and remote-tracking refs are listed with a fixed field
//! template and a `::` delimiter. The subject is the last field and may
//! itself contain `::`, so parsing splits into exactly seven pieces and the
//! final piece absorbs the rest of the line.

use chrono::{DateTime, FixedOffset};

use super::{GitError, Repository, Worktree};

const FIELD_SEPARATOR: &str = "::";

/// Field order: object id, short ref name, short upstream name, is-HEAD,
/// author date (strict ISO 8601), author name, subject.
const REF_FORMAT: &str = "%(objectname:short)::%(refname:lstrip=2)::%(upstream:lstrip=2)::%(if)%(HEAD)%(then)true%(else)false%(end)::%(authordate:iso8601-strict)::%(authorname)::%(subject)";

/// Which namespace a ref was enumerated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefSource {
    Local,
    Remote,
}

/// A named pointer into history, as reported by one listing cycle.
///
/// `ahead`/`behind` and `worktree` start empty and are filled in by
/// divergence loading and reconciliation.
#[derive(Debug, Clone)]
pub struct Ref {
    pub source: RefSource,
    /// Short object id, immutable once read.
    pub id: String,
    /// Short name: `main` for locals, `origin/feature-x` for remotes.
    pub name: String,
    /// Remote-tracking ref this local branch follows; `None` means untracked.
    pub upstream: Option<String>,
    /// Whether this is the checked-out branch of the primary working copy.
    pub is_head: bool,
    pub author: String,
    pub message: String,
    /// Last-commit author date; invalid dates are normalized to `None`.
    pub date: Option<DateTime<FixedOffset>>,
    /// Commits reachable from this ref but not its paired ref.
    pub ahead: Option<usize>,
    /// Commits reachable from the paired ref but not this one.
    pub behind: Option<usize>,
    /// Worktree whose checked-out branch matches this ref (local refs only).
    pub worktree: Option<Worktree>,
}

impl Ref {
    pub(crate) fn parse_line(line: &str, source: RefSource) -> anyhow::Result<Self> {
        let fields: Vec<&str> = line.splitn(7, FIELD_SEPARATOR).collect();
        if fields.len() != 7 {
            return Err(GitError::ParseError {
                message: format!(
                    "expected 7 ref fields, got {}: {line:?}",
                    fields.len()
                ),
            }
            .into());
        }

        let date = match DateTime::parse_from_rfc3339(fields[4]) {
            Ok(date) => Some(date),
            Err(err) => {
                log::warn!("unparseable author date {:?}: {err}", fields[4]);
                None
            }
        };

        Ok(Self {
            source,
            id: fields[0].to_string(),
            name: fields[1].to_string(),
            upstream: (!fields[2].is_empty()).then(|| fields[2].to_string()),
            is_head: fields[3] == "true",
            date,
            author: fields[5].to_string(),
            message: fields[6].to_string(),
            ahead: None,
            behind: None,
            worktree: None,
        })
    }

    /// Branch name with the remote prefix (up to the first `/`) stripped.
    ///
    /// `origin/feature/x` becomes `feature/x`; local names pass through.
    pub fn short_name(&self) -> &str {
        match self.source {
            RefSource::Local => &self.name,
            RefSource::Remote => self
                .name
                .split_once('/')
                .map(|(_, rest)| rest)
                .unwrap_or(&self.name),
        }
    }
}

/// Whether a short remote name is the `<remote>/HEAD` symref. The suffix
/// after the remote component must be exactly `HEAD`; a nested branch like
/// `origin/release/HEAD` is a real branch and is kept.
fn is_remote_head(name: &str) -> bool {
    name.split_once('/')
        .is_some_and(|(_, rest)| rest == "HEAD")
}

fn list_namespace(
    repo: &Repository,
    namespace: &str,
    source: RefSource,
) -> anyhow::Result<Vec<Ref>> {
    let format_arg = format!("--format={REF_FORMAT}");
    let stdout = repo.run_command(&["for-each-ref", "--sort=-authordate", &format_arg, namespace])?;

    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        // Skip <remote>/HEAD symrefs; they duplicate the default branch.
        .filter(|line| {
            source == RefSource::Local
                || line
                    .splitn(7, FIELD_SEPARATOR)
                    .nth(1)
                    .is_none_or(|name| !is_remote_head(name))
        })
        .map(|line| Ref::parse_line(line, source))
        .collect()
}

/// List local and remote refs, most recent author date first within each
/// namespace, locals before remotes. This ordering propagates to pickers.
pub fn list_refs(repo: &Repository) -> anyhow::Result<Vec<Ref>> {
    let (local, remote) = rayon::join(
        || list_namespace(repo, "refs/heads", RefSource::Local),
        || list_namespace(repo, "refs/remotes", RefSource::Remote),
    );
    let mut refs = local?;
    refs.extend(remote?);
    Ok(refs)
}
