//! ANSI styling for user-facing output.

use std::io::{self, IsTerminal};

/// Styles used by n's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Green,
    Yellow,
    Red,
    Cyan,
    Dim,
}

impl Style {
    fn code(self) -> &'static str {
        match self {
            Style::Green => "1;32",
            Style::Yellow => "33",
            Style::Red => "1;31",
            Style::Cyan => "1;36",
            Style::Dim => "2",
        }
    }
}

/// Whether stdout is a terminal and should receive colors.
pub fn use_colors() -> bool {
    io::stdout().is_terminal()
}

/// Wrap `text` in the escape codes for `style` when `enabled`.
pub fn paint(style: Style, text: &str, enabled: bool) -> String {
    if enabled {
        format!("\x1b[{}m{}\x1b[0m", style.code(), text)
    } else {
        text.to_string()
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed.
/// Handles Unicode characters properly.
pub fn truncate(s: &str, max_len: usize) -> String {
    if max_len < 4 {
        return s.chars().take(max_len).collect();
    }

    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
