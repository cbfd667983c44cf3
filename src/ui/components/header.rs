//! Header component renderer.
//!
//! Renders the screen title centered over the terminal width, followed by
//! the current address-bar location.

use crate::ui::helpers::width;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;
use std::io::{self, Write};

/// Renders the title bar and location line.
///
/// # Parameters
///
/// * `out` - Output sink
/// * `header` - Title and location
/// * `theme` - Active color theme
/// * `cols` - Terminal width in columns
///
/// # Layout
///
/// ```text
/// [left padding] TITLE [right padding]
///  /list?page=2
/// ```
///
/// If the width cannot be split evenly, the right padding is larger.
pub fn render_header<W: Write>(out: &mut W, header: &HeaderInfo, theme: &Theme, cols: usize) -> io::Result<()> {
    render_title(out, &header.title, theme, cols)?;
    writeln!(
        out,
        "{}{} {}{}",
        Theme::dim(),
        Theme::fg(&theme.colors.text_dim),
        header.location,
        Theme::reset()
    )
}

/// Renders a centered bold title line.
pub fn render_title<W: Write>(out: &mut W, title: &str, theme: &Theme, cols: usize) -> io::Result<()> {
    let title_len = width(title);
    let padding = cols.saturating_sub(title_len) / 2;

    write!(out, "{}{}", Theme::bold(), Theme::fg(&theme.colors.header_fg))?;
    if let Some(bg) = &theme.colors.header_bg {
        write!(out, "{}", Theme::bg(bg))?;
    }
    writeln!(
        out,
        "{}{title}{}{}",
        " ".repeat(padding),
        " ".repeat(cols.saturating_sub(padding + title_len)),
        Theme::reset()
    )
}
