//! Color schemes and the ANSI escapes the components write.
//!
//! A [`Theme`] is plain data deserialized from TOML. Four Catppuccin flavors
//! are compiled in; any other palette can be supplied as a file with the same
//! shape. Colors are `#rrggbb` strings and are emitted as 24-bit SGR escapes,
//! so the terminal's own palette never interferes.
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! header_fg = "#cdd6f4"
//! cursor_fg = "#1e1e2e"
//! cursor_bg = "#f5c2e7"
//! text_normal = "#cdd6f4"
//! text_dim = "#6c7086"
//! border = "#45475a"
//! search_bar_border = "#f5c2e7"
//! match_highlight_fg = "#1e1e2e"
//! match_highlight_bg = "#f9e2af"
//! empty_state_fg = "#89b4fa"
//! marked_fg = "#a6e3a1"
//! spinner_fg = "#cba6f7"
//! status_info_fg = "#89b4fa"
//! status_warning_fg = "#f9e2af"
//! status_error_fg = "#f38ba8"
//! ```
//!
//! `header_bg` is the only optional key.

use crate::domain::error::{ModstashError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Compiled-in palettes, looked up by name.
const BUILTIN_SOURCES: [(&str, &str); 4] = [
    ("catppuccin-mocha", include_str!("../../themes/catppuccin-mocha.toml")),
    ("catppuccin-latte", include_str!("../../themes/catppuccin-latte.toml")),
    ("catppuccin-frappe", include_str!("../../themes/catppuccin-frappe.toml")),
    ("catppuccin-macchiato", include_str!("../../themes/catppuccin-macchiato.toml")),
];

/// Names accepted by [`Theme::from_name`]. The first one is the default.
pub const BUILTIN_THEMES: [&str; 4] = [
    BUILTIN_SOURCES[0].0,
    BUILTIN_SOURCES[1].0,
    BUILTIN_SOURCES[2].0,
    BUILTIN_SOURCES[3].0,
];

const BOLD: &str = "\u{1b}[1m";
const DIM: &str = "\u{1b}[2m";
const RESET: &str = "\u{1b}[0m";

/// SGR selector for 24-bit foreground colors.
const FOREGROUND: u8 = 38;
/// SGR selector for 24-bit background colors.
const BACKGROUND: u8 = 48;

/// A named palette.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

/// One `#rrggbb` color per screen element.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    /// Title line and column headers.
    pub header_fg: String,
    #[serde(default)]
    pub header_bg: Option<String>,

    /// The row under the cursor, in lists and in the assign picker.
    pub cursor_fg: String,
    pub cursor_bg: String,

    pub text_normal: String,
    /// Secondary columns, subtitle and key hints.
    pub text_dim: String,

    /// Horizontal rules above and below the list.
    pub border: String,

    /// Frame of the search box and of every overlay.
    pub search_bar_border: String,
    pub match_highlight_fg: String,
    pub match_highlight_bg: String,

    pub empty_state_fg: String,

    /// The `●` in front of marked packages.
    pub marked_fg: String,

    pub spinner_fg: String,

    pub status_info_fg: String,
    pub status_warning_fg: String,
    pub status_error_fg: String,
}

impl Theme {
    /// Returns the compiled-in theme called `name`, if there is one.
    ///
    /// ```rust
    /// use modstash::ui::theme::Theme;
    ///
    /// let theme = Theme::from_name("catppuccin-latte").unwrap();
    /// assert_eq!(theme.name, "catppuccin-latte");
    /// assert!(Theme::from_name("solarized").is_none());
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let (_, source) = BUILTIN_SOURCES.iter().find(|(builtin, _)| *builtin == name)?;
        toml::from_str(source)
            .map_err(|e| tracing::warn!(theme = name, error = %e, "built-in theme is malformed"))
            .ok()
    }

    /// Reads a user palette.
    ///
    /// # Errors
    ///
    /// Returns [`ModstashError::Theme`] when the file is unreadable or lacks a
    /// required color.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let theme_error = |what: &str, e: &dyn std::fmt::Display| {
            ModstashError::Theme(format!("{what} {}: {e}", path.display()))
        };

        let contents = std::fs::read_to_string(path).map_err(|e| theme_error("cannot read", &e))?;
        toml::from_str(&contents).map_err(|e| theme_error("invalid theme in", &e))
    }

    /// Picks the theme from configuration: a file beats a name, and neither
    /// means the default.
    ///
    /// # Errors
    ///
    /// Returns [`ModstashError::Theme`] for a bad file or an unknown name.
    pub fn resolve(name: Option<&str>, file: Option<&Path>) -> Result<Self> {
        match (file, name) {
            (Some(file), _) => Self::from_file(file),
            (None, Some(name)) => Self::from_name(name).ok_or_else(|| {
                ModstashError::Theme(format!(
                    "unknown theme '{name}', expected one of: {}",
                    BUILTIN_THEMES.join(", ")
                ))
            }),
            (None, None) => Ok(Self::default()),
        }
    }

    /// Black, white and grey, for when even the built-ins fail.
    #[must_use]
    pub fn plain() -> Self {
        let white = || "#ffffff".to_string();
        let grey = || "#808080".to_string();
        let black = || "#000000".to_string();
        let yellow = || "#ffff00".to_string();
        Self {
            name: "plain".to_string(),
            colors: ThemeColors {
                header_fg: white(),
                header_bg: None,
                cursor_fg: black(),
                cursor_bg: white(),
                text_normal: white(),
                text_dim: grey(),
                border: grey(),
                search_bar_border: white(),
                match_highlight_fg: black(),
                match_highlight_bg: yellow(),
                empty_state_fg: white(),
                marked_fg: "#00ff00".to_string(),
                spinner_fg: white(),
                status_info_fg: white(),
                status_warning_fg: yellow(),
                status_error_fg: "#ff0000".to_string(),
            },
        }
    }

    /// Foreground escape for a `#rrggbb` color. Unparsable input renders white.
    ///
    /// ```rust
    /// use modstash::ui::theme::Theme;
    ///
    /// assert_eq!(Theme::fg("#ff0080"), "\u{1b}[38;2;255;0;128m");
    /// ```
    #[must_use]
    pub fn fg(hex: &str) -> String {
        sgr_color(FOREGROUND, hex)
    }

    /// Background escape for a `#rrggbb` color. Unparsable input renders white.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        sgr_color(BACKGROUND, hex)
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        BOLD
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        DIM
    }

    /// Clears every attribute set by the other helpers.
    #[must_use]
    pub const fn reset() -> &'static str {
        RESET
    }
}

impl Default for Theme {
    /// Catppuccin Mocha, or [`Theme::plain`] if it fails to load.
    ///
    /// ```rust
    /// use modstash::ui::Theme;
    ///
    /// assert_eq!(Theme::default().name, "catppuccin-mocha");
    /// ```
    fn default() -> Self {
        Self::from_name(BUILTIN_THEMES[0]).unwrap_or_else(Self::plain)
    }
}

/// Splits `#rrggbb` into channels.
fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.trim().strip_prefix('#').unwrap_or(hex.trim());
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let packed = u32::from_str_radix(digits, 16).ok()?;
    let [_, r, g, b] = packed.to_be_bytes();
    Some([r, g, b])
}

fn sgr_color(selector: u8, hex: &str) -> String {
    let [r, g, b] = parse_hex(hex).unwrap_or([u8::MAX; 3]);
    format!("\u{1b}[{selector};2;{r};{g};{b}m")
}
