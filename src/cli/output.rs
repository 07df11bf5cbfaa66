//! CLI output: colouring and the stderr rendering of user-facing failures.

use owo_colors::OwoColorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Green,
    Red,
}

/// Colour `text` when `color` is enabled.
pub fn paint(text: &str, tone: Tone, color: bool) -> String {
    if !color {
        return text.to_string();
    }
    match tone {
        Tone::Green => text.green().to_string(),
        Tone::Red => text.red().to_string(),
    }
}

/// The single stderr line written for a `User` error.
pub fn critical_error_line(message: &str, color: bool) -> String {
    format!(
        "Encountered a critical error: {}",
        paint(message, Tone::Red, color)
    )
}
