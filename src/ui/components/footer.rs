//! Footer component renderer.

use crate::ui::theme::Theme;
use crate::ui::viewmodel::FooterInfo;
use std::io::{self, Write};

/// Renders the pagination line and the command help line.
pub fn render_footer<W: Write>(out: &mut W, footer: &FooterInfo, theme: &Theme) -> io::Result<()> {
    writeln!(
        out,
        " {}{}{}",
        Theme::fg(&theme.colors.text_normal),
        footer.pagination,
        Theme::reset()
    )?;
    writeln!(
        out,
        " {}{}{}{}",
        Theme::dim(),
        Theme::fg(&theme.colors.text_dim),
        footer.keybindings,
        Theme::reset()
    )
}
