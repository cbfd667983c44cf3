//! Composable console component renderers.
//!
//! Each component writes one part of a screen, line by line, into any
//! [`std::io::Write`] sink. Screens are composed top to bottom; nothing is
//! positioned absolutely, so output can be captured in tests or piped.
//!
//! # Components
//!
//! - [`header`]: Title bar and address-bar location
//! - [`search`]: Search input box and filter summary
//! - [`table`]: Advertisement rows with status badges
//! - [`footer`]: Pagination and command help
//! - [`empty`]: Message shown for an empty result
//! - [`banner`]: Error banners and notifications
//! - [`detail`]: Single advertisement screen
//! - [`stats`]: Statistics screen
//!
//! # Listing Layout
//!
//! ```text
//! [Header]
//! [Border]
//! [Banner, if the last load failed]
//! [Search Bar - 3 lines + filter summary]
//! [Table Headers]
//! [Table Rows | Empty State]
//! [Border]
//! [Footer]
//! ```

mod banner;
mod detail;
mod empty;
mod footer;
mod header;
mod search;
mod stats;
mod table;

pub use banner::{render_banner, render_notification};
pub use detail::render_detail;
pub use empty::render_empty_state;
pub use stats::render_stats;
pub use table::{title_column_width, FIXED_COLUMNS_WIDTH, MIN_TITLE_WIDTH};

use crate::ui::helpers::write_border;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::ListingViewModel;
use footer::render_footer;
use header::render_header;
use search::render_search_bar;
use std::io::{self, Write};
use table::{render_table_headers, render_table_rows};

/// Renders the listing screen.
///
/// While a fetch is in flight the previous rows stay visible under a
/// loading line; the empty state replaces the table only after a load
/// returned nothing.
pub fn render_listing<W: Write>(out: &mut W, vm: &ListingViewModel, theme: &Theme, cols: usize) -> io::Result<()> {
    render_header(out, &vm.header, theme, cols)?;
    write_border(out, &theme.colors.border, cols)?;

    if let Some(banner) = &vm.banner {
        render_banner(out, banner, theme)?;
    }
    render_search_bar(out, &vm.search_bar, &vm.filter_summary, theme, cols)?;

    if vm.loading {
        writeln!(out, " {}Загрузка...{}", Theme::fg(&theme.colors.text_dim), Theme::reset())?;
    }

    if let Some(empty) = &vm.empty_state {
        render_empty_state(out, empty, theme, cols)?;
    } else {
        render_table_headers(out, theme, cols)?;
        render_table_rows(out, &vm.rows, theme, cols)?;
    }

    write_border(out, &theme.colors.border, cols)?;
    render_footer(out, &vm.footer, theme)
}
