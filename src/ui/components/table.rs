//! Advertisement table renderer.
//!
//! Renders the listing as fixed-width columns around a flexible title column.
//! Rows carry pre-truncated titles; this module only pads and colors them.

use crate::ui::helpers::{self, pad_right, truncate, width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::DisplayItem;
use std::io::{self, Write};

const MARKER_WIDTH: usize = 2;
const ID_WIDTH: usize = 6;
const GAP_WIDTH: usize = 2;
const PRICE_WIDTH: usize = 14;
const CATEGORY_WIDTH: usize = 18;
const STATUS_WIDTH: usize = 14;
const DATE_WIDTH: usize = 10;

/// Width taken by every column except the title.
pub const FIXED_COLUMNS_WIDTH: usize =
    MARKER_WIDTH + ID_WIDTH + GAP_WIDTH + PRICE_WIDTH + GAP_WIDTH + CATEGORY_WIDTH + STATUS_WIDTH + DATE_WIDTH;

/// Narrowest title column, even on very small terminals.
pub const MIN_TITLE_WIDTH: usize = 16;

/// Title column width for a terminal `cols` wide.
///
/// # Example
///
/// ```rust
/// use marketmod::ui::components::title_column_width;
///
/// assert_eq!(title_column_width(120), 52);
/// assert_eq!(title_column_width(40), 16);
/// ```
#[must_use]
pub const fn title_column_width(cols: usize) -> usize {
    let available = cols.saturating_sub(FIXED_COLUMNS_WIDTH);
    if available > MIN_TITLE_WIDTH {
        available
    } else {
        MIN_TITLE_WIDTH
    }
}

/// Renders the bold column headers.
pub fn render_table_headers<W: Write>(out: &mut W, theme: &Theme, cols: usize) -> io::Result<()> {
    writeln!(
        out,
        "{}{}{}{}{}{}{}{}{}",
        Theme::bold(),
        Theme::fg(&theme.colors.header_fg),
        " ".repeat(MARKER_WIDTH),
        pad_right("ID", ID_WIDTH),
        pad_right("Название", title_column_width(cols) + GAP_WIDTH),
        format!("{:>width$}{}", "Цена", " ".repeat(GAP_WIDTH), width = PRICE_WIDTH),
        pad_right("Категория", CATEGORY_WIDTH),
        pad_right("Статус", STATUS_WIDTH),
        format!("{}{}", pad_right("Создано", DATE_WIDTH), Theme::reset()),
    )
}

/// Renders every row in order.
pub fn render_table_rows<W: Write>(out: &mut W, items: &[DisplayItem], theme: &Theme, cols: usize) -> io::Result<()> {
    for item in items {
        render_table_row(out, item, theme, cols)?;
    }
    Ok(())
}

/// Renders one advertisement row.
///
/// # Layout
///
/// ```text
/// ! 42    Горный велосипед              12 500 ₽  Спорт             На модерации  15.01.2024
/// ```
///
/// Urgent advertisements get the `!` marker; the title is highlighted with
/// the search match ranges and the status is tinted by its badge color.
fn render_table_row<W: Write>(out: &mut W, item: &DisplayItem, theme: &Theme, cols: usize) -> io::Result<()> {
    if item.is_urgent {
        write!(out, "{}! {}", Theme::fg(&theme.colors.urgent_fg), Theme::reset())?;
    } else {
        write!(out, "{}", " ".repeat(MARKER_WIDTH))?;
    }

    write!(out, "{}", Theme::fg(&theme.colors.text_normal))?;
    write!(out, "{}", pad_right(&item.id.to_string(), ID_WIDTH))?;

    helpers::write_highlighted(out, &item.title, &item.highlight_ranges, theme)?;
    let title_width = title_column_width(cols);
    write!(out, "{}", " ".repeat(title_width.saturating_sub(width(&item.title)) + GAP_WIDTH))?;

    let price_padding = PRICE_WIDTH.saturating_sub(width(&item.price));
    write!(out, "{}{}{}", " ".repeat(price_padding), item.price, " ".repeat(GAP_WIDTH))?;
    write!(
        out,
        "{}",
        pad_right(&truncate(&item.category, CATEGORY_WIDTH - GAP_WIDTH), CATEGORY_WIDTH)
    )?;

    write!(
        out,
        "{}{}",
        Theme::fg(theme.status_color(item.status)),
        pad_right(item.status.label(), STATUS_WIDTH)
    )?;
    writeln!(
        out,
        "{}{}{}",
        Theme::fg(&theme.colors.text_dim),
        item.created,
        Theme::reset()
    )
}
