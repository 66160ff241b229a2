//! Syntax highlighting themes for fenced code blocks.
//!
//! Code blocks are highlighted with CSS classes (see
//! [`crate::MarkdownRenderer`]); this module produces the matching
//! stylesheet for a syntect theme so it can be embedded in the page.

use syntect::highlighting::ThemeSet;
use syntect::html::{ClassStyle, css_for_theme_with_class_style};

use crate::error::{Error, Result};

/// Theme used when none is configured.
pub const DEFAULT_THEME: &str = "InspiredGitHub";

/// Class prefix shared by the renderer and the generated theme CSS.
pub const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hljs-" };

/// Returns the names of bundled syntect themes, sorted.
pub fn available_themes() -> Vec<String> {
    let themes = ThemeSet::load_defaults();
    let mut names: Vec<String> = themes.themes.into_keys().collect();
    names.sort();
    names
}

/// Generates the CSS for a bundled syntect theme.
///
/// # Errors
///
/// Returns [`Error::Conversion`] if the theme is unknown or its CSS cannot be
/// generated.
pub fn theme_css(name: &str) -> Result<String> {
    let themes = ThemeSet::load_defaults();
    let theme = themes.themes.get(name).ok_or_else(|| {
        Error::conversion(format!(
            "unknown highlight theme '{}' (available: {})",
            name,
            available_themes().join(", ")
        ))
    })?;

    css_for_theme_with_class_style(theme, CLASS_STYLE)
        .map_err(|e| Error::conversion(format!("failed to build theme CSS: {}", e)))
}
