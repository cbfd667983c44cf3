//! Search bar component renderer.
//!
//! Renders the search input box and the active filter summary under it.

use crate::ui::helpers::width;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::SearchBarInfo;
use std::io::{self, Write};

/// Horizontal margin for the search box (spaces on the left).
const SEARCH_BOX_MARGIN: usize = 1;

/// Renders the bordered search box, three lines high, then the filter summary.
///
/// While typed text is still waiting for the debounce the box shows a
/// pending marker.
///
/// # Layout
///
/// ```text
///  ┌──────────────────────┐
///  │ Поиск: велосипед …   │
///  └──────────────────────┘
///  Статус: На модерации · Сортировка: По дате создания, по убыванию
/// ```
pub fn render_search_bar<W: Write>(
    out: &mut W,
    search: &SearchBarInfo,
    filter_summary: &str,
    theme: &Theme,
    cols: usize,
) -> io::Result<()> {
    let box_width = cols.saturating_sub(SEARCH_BOX_MARGIN * 2);
    let inner_width = box_width.saturating_sub(2);
    let margin = " ".repeat(SEARCH_BOX_MARGIN);
    let border = Theme::fg(&theme.colors.search_bar_border);

    writeln!(out, "{margin}{border}┌{}┐{}", "─".repeat(inner_width), Theme::reset())?;

    let mut search_text = format!(" Поиск: {}", search.query);
    if search.pending {
        search_text.push_str(" …");
    }
    let padding = inner_width.saturating_sub(width(&search_text));
    writeln!(
        out,
        "{margin}{border}│{}{search_text}{}{border}│{}",
        Theme::fg(&theme.colors.text_normal),
        " ".repeat(padding),
        Theme::reset()
    )?;

    writeln!(out, "{margin}{border}└{}┘{}", "─".repeat(inner_width), Theme::reset())?;
    writeln!(
        out,
        "{margin}{}{filter_summary}{}",
        Theme::fg(&theme.colors.text_dim),
        Theme::reset()
    )
}
