//! Operator subcommands. Each opens its own connection and prints to stdout.

pub mod doctor;
pub mod export;
pub mod inspect;
pub mod search;
pub mod stats;
pub mod submit;
pub mod top;

/// Shorten `text` to `max` characters, marking the cut with `...`.
pub(crate) fn preview(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > max {
        format!("{}...", flat.chars().take(max).collect::<String>())
    } else {
        flat
    }
}
