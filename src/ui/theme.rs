//! Theme management and ANSI escape sequence generation.
//!
//! Built-in themes are compiled into the binary; custom themes are loaded
//! from TOML files with the same layout.
//!
//! # Built-in Themes
//!
//! - `catppuccin-mocha`: Dark theme with warm tones (default)
//! - `catppuccin-latte`: Light theme with soft pastels
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! header_fg = "#cdd6f4"
//! text_normal = "#cdd6f4"
//! text_dim = "#6c7086"
//! border = "#45475a"
//! search_bar_border = "#f5c2e7"
//! match_highlight_fg = "#1e1e2e"
//! match_highlight_bg = "#f9e2af"
//! empty_state_fg = "#89b4fa"
//! urgent_fg = "#fab387"
//! status_pending = "#f9e2af"
//! status_approved = "#a6e3a1"
//! status_rejected = "#f38ba8"
//! status_draft = "#9399b2"
//! error_fg = "#f38ba8"
//! warning_fg = "#fab387"
//! success_fg = "#a6e3a1"
//! bar_fg = "#89b4fa"
//! ```
//!
//! # Example
//!
//! ```rust
//! use marketmod::ui::Theme;
//!
//! let theme = Theme::from_name("catppuccin-mocha").unwrap();
//! println!("{}Bold Text{}", Theme::bold(), Theme::reset());
//! assert!(Theme::fg(&theme.colors.header_fg).starts_with("\u{1b}[38;2;"));
//! ```

use crate::app::modes::Tone;
use crate::domain::{AdvertisementStatus, MarketmodError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Color scheme configuration for console rendering.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Theme {
    /// Human-readable theme name.
    pub name: String,
    /// Color palette for all console elements.
    pub colors: ThemeColors,
}

/// Color definitions for all console elements, as hex strings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ThemeColors {
    pub header_fg: String,
    #[serde(default)]
    pub header_bg: Option<String>,

    pub text_normal: String,
    /// Secondary text (dates, footer, filter summary).
    pub text_dim: String,
    pub border: String,

    pub search_bar_border: String,
    pub match_highlight_fg: String,
    pub match_highlight_bg: String,

    pub empty_state_fg: String,
    /// Marker of urgent advertisements.
    pub urgent_fg: String,

    pub status_pending: String,
    pub status_approved: String,
    pub status_rejected: String,
    pub status_draft: String,

    /// Banners and failure notifications.
    pub error_fg: String,
    pub warning_fg: String,
    pub success_fg: String,

    /// Chart bars on the statistics screen.
    pub bar_fg: String,
}

impl Theme {
    /// Loads a built-in theme by name, `None` if the name is unknown.
    ///
    /// # Example
    ///
    /// ```rust
    /// use marketmod::ui::Theme;
    ///
    /// let theme = Theme::from_name("catppuccin-latte").unwrap();
    /// assert_eq!(theme.name, "catppuccin-latte");
    /// assert!(Theme::from_name("solarized").is_none());
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "catppuccin-mocha" => include_str!("../../themes/catppuccin-mocha.toml"),
            "catppuccin-latte" => include_str!("../../themes/catppuccin-latte.toml"),
            _ => return None,
        };

        toml::from_str(toml_str).ok()
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`MarketmodError::Theme`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| MarketmodError::Theme(format!("Failed to read theme file: {e}")))?;

        toml::from_str(&contents)
            .map_err(|e| MarketmodError::Theme(format!("Failed to parse theme TOML: {e}")))
    }

    /// Color of a moderation status badge.
    #[must_use]
    pub fn status_color(&self, status: AdvertisementStatus) -> &str {
        match status {
            AdvertisementStatus::Pending => &self.colors.status_pending,
            AdvertisementStatus::Approved => &self.colors.status_approved,
            AdvertisementStatus::Rejected => &self.colors.status_rejected,
            AdvertisementStatus::Draft => &self.colors.status_draft,
        }
    }

    /// Color of a notification.
    #[must_use]
    pub fn tone_color(&self, tone: Tone) -> &str {
        match tone {
            Tone::Positive => &self.colors.success_fg,
            Tone::Caution => &self.colors.warning_fg,
            Tone::Negative => &self.colors.error_fg,
        }
    }

    /// Converts a hex color to RGB; white on parse errors.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim_start_matches('#').trim();

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

        (r, g, b)
    }

    /// ANSI 24-bit foreground color escape sequence.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// ANSI 24-bit background color escape sequence.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    /// Clears all styling.
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

impl Default for Theme {
    /// Returns the default theme (Catppuccin Mocha).
    ///
    /// # Panics
    ///
    /// Panics if the built-in theme fails to parse, which the tests rule out.
    fn default() -> Self {
        Self::from_name("catppuccin-mocha")
            .expect("Built-in catppuccin-mocha theme should always parse")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_themes_parse() {
        assert_eq!(Theme::default().name, "catppuccin-mocha");
        assert!(Theme::from_name("catppuccin-latte").is_some());
    }

    #[test]
    fn hex_colors_become_escape_sequences() {
        assert_eq!(Theme::fg("#ff8000"), "\u{1b}[38;2;255;128;0m");
        assert_eq!(Theme::bg("00ff00"), "\u{1b}[48;2;0;255;0m");
        assert_eq!(Theme::fg("bogus"), "\u{1b}[38;2;255;255;255m");
    }

    #[test]
    fn custom_theme_loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let mut theme = Theme::default();
        theme.name = "custom".to_string();
        file.write_all(toml::to_string(&theme).unwrap().as_bytes()).unwrap();

        assert_eq!(Theme::from_file(file.path()).unwrap().name, "custom");
    }

    #[test]
    fn unreadable_theme_is_a_theme_error() {
        let err = Theme::from_file("/nonexistent/theme.toml").unwrap_err();
        assert!(matches!(err, MarketmodError::Theme(_)));
    }
}
