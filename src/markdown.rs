//! Markdown rendering with hard line breaks and GitHub Flavored Markdown.
//!
//! This module renders markdown with comrak (tables, strikethrough,
//! autolinks, task lists, heading ids) and embeds local resources the
//! rendered fragment references, so the final page stands alone.

mod renderer;
mod resources;

pub use renderer::MarkdownRenderer;
pub use resources::ResourceInliner;
