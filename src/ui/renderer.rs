//! Top-level rendering coordinator.
//!
//! Each entry point computes the view model of one screen and delegates to
//! the components. Output goes to any [`Write`] sink; the console passes a
//! locked stdout, tests pass a `Vec<u8>`.
//!
//! # Example
//!
//! ```rust
//! use marketmod::app::ListingSnapshot;
//! use marketmod::ui::{render_listing, Theme};
//!
//! let mut out = Vec::new();
//! render_listing(&mut out, &ListingSnapshot::default(), &Theme::default(), 80).unwrap();
//! assert!(String::from_utf8(out).unwrap().contains("/list"));
//! ```

use crate::api::Transport;
use crate::app::dashboard::StatsDashboard;
use crate::app::detail::AdvertisementDetail;
use crate::app::ListingSnapshot;
use crate::ui::components;
use crate::ui::theme::Theme;
use std::io::{self, Write};

/// Renders the listing screen for a terminal `cols` wide.
///
/// # Errors
///
/// Propagates write errors from `out`.
pub fn render_listing<W: Write>(
    out: &mut W,
    snapshot: &ListingSnapshot,
    theme: &Theme,
    cols: usize,
) -> io::Result<()> {
    let viewmodel = snapshot.compute_viewmodel(cols);
    components::render_listing(out, &viewmodel, theme, cols)
}

/// Renders the detail screen.
///
/// # Errors
///
/// Propagates write errors from `out`.
pub fn render_detail<W: Write, T: Transport>(
    out: &mut W,
    detail: &AdvertisementDetail<T>,
    theme: &Theme,
    cols: usize,
) -> io::Result<()> {
    components::render_detail(out, &detail.compute_viewmodel(), theme, cols)
}

/// Renders the statistics screen; before the first successful load only the
/// banner (if any) and a loading line are shown.
///
/// # Errors
///
/// Propagates write errors from `out`.
pub fn render_stats<W: Write, T: Transport>(
    out: &mut W,
    dashboard: &StatsDashboard<T>,
    theme: &Theme,
    cols: usize,
) -> io::Result<()> {
    if let Some(viewmodel) = dashboard.compute_viewmodel() {
        return components::render_stats(out, &viewmodel, theme, cols);
    }

    if let Some(banner) = dashboard.banner() {
        components::render_banner(out, banner, theme)?;
    }
    writeln!(out, " {}Загрузка статистики...{}", Theme::dim(), Theme::reset())
}
