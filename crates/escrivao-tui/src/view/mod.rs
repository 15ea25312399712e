pub mod credential;
pub mod help;
pub mod oitiva;
pub mod output;
pub mod people;
pub mod procedure;
pub mod status;

use ratatui::layout::{Constraint, Flex, Layout, Rect};

use crate::model::text_field::TextField;

/// Spinner frames for animated progress indication.
const SPINNER_FRAMES: &[char] = &[
    '\u{280B}', '\u{2819}', '\u{2839}', '\u{2838}', '\u{283C}', '\u{2834}', '\u{2826}', '\u{2827}',
    '\u{2807}', '\u{280F}',
];

/// Get the current spinner character based on a tick counter.
pub fn spinner_char(tick: usize) -> char {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Truncate a string to fit in `max_width` columns, appending "\u{2026}" if truncated.
pub fn truncate(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if s.chars().count() <= max_width {
        return s.to_string();
    }
    let mut truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    truncated.push('\u{2026}');
    truncated
}

/// Show only the first four chars of a key.
pub fn mask_key(key: &str) -> String {
    let len = key.chars().count();
    if len == 0 {
        "(não configurada)".to_string()
    } else if len <= 4 {
        "*".repeat(len)
    } else {
        let head: String = key.chars().take(4).collect();
        format!("{}{}", head, "*".repeat(len - 4))
    }
}

/// Field contents with a block cursor drawn at the edit position.
pub fn with_cursor(field: &TextField) -> String {
    let (head, tail) = field.as_str().split_at(field.cursor());
    format!("{head}\u{2588}{tail}")
}

/// Create a centered rectangle of the given width (columns) and height (rows).
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .split(area);
    Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .split(vertical[0])[0]
}
