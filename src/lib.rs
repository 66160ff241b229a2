//! Render a markdown document into one standalone, self-contained HTML page.

mod assets;
pub mod components;
mod config;
mod convert;
mod error;
mod highlight;
mod markdown;
mod mime;
mod output;
mod util;

pub use assets::{DEFAULT_STYLESHEET, inline_css_urls, load_stylesheet, page_style};
pub use config::Config;
pub use convert::{
    Backend, Builtin, ConversionRequest, Converter, DEFAULT_LANG, DEFAULT_TITLE, Pandoc,
    converter_for,
};
pub use error::{Error, Result};
pub use highlight::{DEFAULT_THEME, available_themes, theme_css};
pub use markdown::{MarkdownRenderer, ResourceInliner};
pub use mime::{MediaType, detect_media_type, mime_for};
pub use output::{PendingOutput, write_atomic};
pub use util::{default_output_path, format_file_size};
