//! Interactive prompts and their display items.
//!
//! All prompt I/O goes through the [`Prompt`] trait so command flows can be
//! driven by a scripted implementation in tests. The terminal implementation
//! wraps dialoguer. Cancellation surfaces as `None`, which flows treat as
//! "stop here, no error": selects and confirms cancel on `Esc`/`q`, text
//! input cancels by submitting nothing.

use chrono::{DateTime, FixedOffset, Utc};
use dialoguer::{Confirm, FuzzySelect, Input, theme::ColorfulTheme};

use crate::git::{Ref, Worktree};

/// One selectable row: a primary label plus dimmed context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickItem {
    pub label: String,
    pub description: String,
    pub detail: String,
}

impl PickItem {
    /// A plain action row (no git metadata).
    pub fn action(label: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: String::new(),
            detail: detail.into(),
        }
    }

    /// Row for a reconciled branch entry.
    pub fn for_ref(r: &Ref) -> Self {
        let mut parts: Vec<String> = Vec::new();
        if r.worktree.is_some() {
            parts.push("already exists".to_string());
        }
        if r.is_head {
            parts.push("(HEAD)".to_string());
        }
        if let Some(ahead) = r.ahead.filter(|&n| n > 0) {
            parts.push(format!("↑{ahead}"));
        }
        if let Some(behind) = r.behind.filter(|&n| n > 0) {
            parts.push(format!("↓{behind}"));
        }
        if let Some(upstream) = &r.upstream {
            parts.push(format!("[{upstream}]"));
        }
        parts.push(r.id.clone());

        let detail = match r.date {
            Some(date) => format!("{}: {} ({})", r.author, r.message, time_ago(date)),
            None => format!("{}: {}", r.author, r.message),
        };

        Self {
            label: r.name.clone(),
            description: parts.join(" "),
            detail,
        }
    }

    /// Row for a worktree entry.
    pub fn for_worktree(wt: &Worktree) -> Self {
        let label = match &wt.branch {
            Some(branch) => branch.clone(),
            None => format!("detached @ {}", wt.head.as_deref().unwrap_or("?")),
        };
        Self {
            label,
            description: String::new(),
            detail: wt.path.display().to_string(),
        }
    }

    fn render(&self) -> String {
        let mut line = self.label.clone();
        if !self.description.is_empty() {
            line.push_str(&format!("  {}", self.description));
        }
        if !self.detail.is_empty() {
            line.push_str(&format!("  — {}", self.detail));
        }
        line
    }
}

/// Prompt seam between command flows and the terminal.
///
/// Every method returns `Ok(None)` when the user cancels.
pub trait Prompt {
    fn select(&self, title: &str, items: &[PickItem]) -> anyhow::Result<Option<usize>>;
    /// Free-form text input; an empty submission counts as cancellation.
    fn input(&self, title: &str, initial: &str) -> anyhow::Result<Option<String>>;
    fn confirm(&self, title: &str, default: bool) -> anyhow::Result<Option<bool>>;
}

/// Dialoguer-backed prompt for real terminal sessions.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn select(&self, title: &str, items: &[PickItem]) -> anyhow::Result<Option<usize>> {
        let rendered: Vec<String> = items.iter().map(PickItem::render).collect();
        let selection = FuzzySelect::with_theme(&ColorfulTheme::default())
            .with_prompt(title)
            .items(&rendered)
            .default(0)
            .interact_opt()?;
        Ok(selection)
    }

    fn input(&self, title: &str, initial: &str) -> anyhow::Result<Option<String>> {
        let text: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(title)
            .with_initial_text(initial)
            .allow_empty(true)
            .interact_text()?;
        let trimmed = text.trim();
        Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
    }

    fn confirm(&self, title: &str, default: bool) -> anyhow::Result<Option<bool>> {
        let answer = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(title)
            .default(default)
            .interact_opt()?;
        Ok(answer)
    }
}

/// Coarse relative age for a commit date.
pub fn time_ago(date: DateTime<FixedOffset>) -> String {
    let elapsed = Utc::now().signed_duration_since(date.with_timezone(&Utc));
    let minutes = elapsed.num_minutes();
    if minutes < 1 {
        return "just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = elapsed.num_hours();
    if hours < 24 {
        return format!("{hours}h ago");
    }
    let days = elapsed.num_days();
    if days < 30 {
        return format!("{days}d ago");
    }
    if days < 365 {
        return format!("{}mo ago", days / 30);
    }
    format!("{}y ago", days / 365)
}
