//! Shared rendering utilities.
//!
//! All widths here are counted in characters, not bytes, so Cyrillic titles
//! pad and truncate the same way ASCII ones do.
//!
//! # Example
//!
//! ```rust
//! use marketmod::ui::helpers::{bar, pad_right};
//!
//! assert_eq!(pad_right("Цена", 6), "Цена  ");
//! assert_eq!(bar(50.0, 10), "█████");
//! ```

use crate::ui::theme::Theme;
use std::io::{self, Write};

/// Clears the terminal and moves the cursor home.
pub const CLEAR_SCREEN: &str = "\u{1b}[2J\u{1b}[H";

/// Number of characters in `text`.
#[must_use]
pub fn width(text: &str) -> usize {
    text.chars().count()
}

/// Pads `text` with spaces to `target` characters; longer text is kept whole.
#[must_use]
pub fn pad_right(text: &str, target: usize) -> String {
    let mut padded = text.to_string();
    padded.push_str(&" ".repeat(target.saturating_sub(width(text))));
    padded
}

/// Cuts `text` to `max` characters, ending with `...` when shortened.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    if width(text) <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Horizontal bar of `ratio` percent of `max_width` cells.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn bar(ratio: f64, max_width: usize) -> String {
    let cells = (ratio.clamp(0.0, 100.0) / 100.0 * max_width as f64).round() as usize;
    "█".repeat(cells)
}

/// Writes a horizontal separator.
///
/// # Errors
///
/// Propagates write errors from `out`.
pub fn write_border<W: Write>(out: &mut W, color: &str, cols: usize) -> io::Result<()> {
    writeln!(out, "{}{}{}", Theme::fg(color), "─".repeat(cols), Theme::reset())
}

/// Writes text with highlighted character ranges.
///
/// Ranges are `(start, end)` character indices, end exclusive; ranges past
/// the end of `text` are clipped.
///
/// # Errors
///
/// Propagates write errors from `out`.
pub fn write_highlighted<W: Write>(
    out: &mut W,
    text: &str,
    ranges: &[(usize, usize)],
    theme: &Theme,
) -> io::Result<()> {
    if ranges.is_empty() {
        return write!(out, "{text}");
    }

    let chars: Vec<char> = text.chars().collect();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len());
        let end = end.min(chars.len());
        if start < current_pos || start >= end {
            continue;
        }

        let normal: String = chars[current_pos..start].iter().collect();
        let highlighted: String = chars[start..end].iter().collect();
        write!(
            out,
            "{normal}{}{}{highlighted}{}{}",
            Theme::fg(&theme.colors.match_highlight_fg),
            Theme::bg(&theme.colors.match_highlight_bg),
            Theme::reset(),
            Theme::fg(&theme.colors.text_normal),
        )?;
        current_pos = end;
    }

    let remaining: String = chars[current_pos..].iter().collect();
    write!(out, "{remaining}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_counts_characters() {
        assert_eq!(pad_right("Диван", 7), "Диван  ");
        assert_eq!(pad_right("длинный", 3), "длинный");
    }

    #[test]
    fn truncation_keeps_width() {
        assert_eq!(truncate("Велосипед горный", 10), "Велосип...");
        assert_eq!(truncate("Стол", 10), "Стол");
    }

    #[test]
    fn bars_scale_and_clamp() {
        assert_eq!(bar(100.0, 4), "████");
        assert_eq!(bar(0.0, 4), "");
        assert_eq!(bar(250.0, 2), "██");
    }

    #[test]
    fn highlighted_text_keeps_every_character() {
        let theme = Theme::default();
        let mut out = Vec::new();
        write_highlighted(&mut out, "Горный велосипед", &[(7, 16), (40, 50)], &theme).unwrap();
        let rendered = String::from_utf8(out).unwrap();

        assert!(rendered.starts_with("Горный "));
        assert!(rendered.contains("велосипед"));
        assert!(rendered.contains(&Theme::bg(&theme.colors.match_highlight_bg)));
    }
}
