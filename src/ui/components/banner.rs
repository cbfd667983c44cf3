//! Error banner and notification renderers.

use crate::app::modes::{Banner, Notification};
use crate::ui::theme::Theme;
use std::io::{self, Write};

/// Renders a persistent error banner with its troubleshooting hints.
pub fn render_banner<W: Write>(out: &mut W, banner: &Banner, theme: &Theme) -> io::Result<()> {
    let color = Theme::fg(&theme.colors.error_fg);
    writeln!(out, " {color}{}✖ {}{}", Theme::bold(), banner.title, Theme::reset())?;
    writeln!(out, " {color}{}{}", banner.message, Theme::reset())?;
    for hint in &banner.hints {
        writeln!(
            out,
            "   {}• {hint}{}",
            Theme::fg(&theme.colors.text_dim),
            Theme::reset()
        )?;
    }
    Ok(())
}

/// Renders a one-shot notification in its tone color.
pub fn render_notification<W: Write>(out: &mut W, note: &Notification, theme: &Theme) -> io::Result<()> {
    writeln!(
        out,
        " {}{}{}:{} {}",
        Theme::fg(theme.tone_color(note.tone)),
        Theme::bold(),
        note.title,
        Theme::reset(),
        note.message
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MarketmodError;

    #[test]
    fn connection_banner_lists_hints() {
        let banner = Banner::from_error(&MarketmodError::Connection("нет связи".into())).unwrap();
        let mut out = Vec::new();
        render_banner(&mut out, &banner, &Theme::default()).unwrap();
        let rendered = String::from_utf8(out).unwrap();

        assert!(rendered.contains("Ошибка подключения"));
        assert!(rendered.contains("нет связи"));
        assert_eq!(rendered.matches('•').count(), banner.hints.len());
    }
}
