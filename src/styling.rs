//! Terminal styling for user-facing output.
//!
//! Uses the anstyle ecosystem: anstream for auto-detecting color support
//! (NO_COLOR, CLICOLOR_FORCE, terminal capabilities) and anstyle for
//! composable semantic styles.

use anstyle::{AnsiColor, Color, Style};

/// Auto-detecting print macros.
pub use anstream::{eprint, eprintln, print, println};

/// Error style (red) - use as `{ERROR}text{ERROR:#}`
pub const ERROR: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red)));

/// Bold variant for highlighted spans inside error messages.
pub const ERROR_BOLD: Style = ERROR.bold();

/// Hint style (dimmed) - use as `{HINT}text{HINT:#}`
pub const HINT: Style = Style::new().dimmed();

pub const ERROR_EMOJI: &str = "❌";
pub const HINT_EMOJI: &str = "💡";

/// Indent multi-line subprocess output under an error header.
pub fn format_with_gutter(text: &str) -> String {
    text.lines()
        .map(|line| format!("   {HINT}│{HINT:#} {line}\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gutter_prefixes_every_line() {
        let block = format_with_gutter("first\nsecond");
        assert_eq!(block.lines().count(), 2);
        for line in block.lines() {
            assert!(line.contains("│"));
        }
        assert!(block.contains("first"));
        assert!(block.contains("second"));
    }
}
