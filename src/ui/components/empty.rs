//! Empty state component renderer.
//!
//! Shown in place of the table when a successful load returned no rows.

use crate::ui::helpers::width;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::EmptyState;
use std::io::{self, Write};

/// Renders the centered message and subtitle, surrounded by blank lines.
pub fn render_empty_state<W: Write>(out: &mut W, empty: &EmptyState, theme: &Theme, cols: usize) -> io::Result<()> {
    let message_padding = cols.saturating_sub(width(&empty.message)) / 2;
    let subtitle_padding = cols.saturating_sub(width(&empty.subtitle)) / 2;

    writeln!(out)?;
    writeln!(
        out,
        "{}{}{}{}{}",
        " ".repeat(message_padding),
        Theme::bold(),
        Theme::fg(&theme.colors.empty_state_fg),
        empty.message,
        Theme::reset()
    )?;
    writeln!(
        out,
        "{}{}{}{}",
        " ".repeat(subtitle_padding),
        Theme::fg(&theme.colors.text_dim),
        empty.subtitle,
        Theme::reset()
    )?;
    writeln!(out)
}
