//! Markdown rendering with hard line breaks and GFM extensions.

use comrak::Options;
use std::path::Path;
use syntect::html::ClassedHTMLGenerator;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use super::ResourceInliner;
use crate::error::{Error, Result};
use crate::highlight::CLASS_STYLE;

/// Renders markdown to an HTML fragment.
///
/// Single newlines inside a paragraph become `<br />` (hard line breaks).
/// Provides GFM extensions including tables, strikethrough, autolinks,
/// task lists, footnotes, and description lists. Headings carry ids so a
/// hand written table of contents can link to them. Uses syntect for code
/// block syntax highlighting when language is specified. Optionally embeds
/// local images when configured with a [`ResourceInliner`].
pub struct MarkdownRenderer<'a> {
    options: Options<'a>,
    syntax_set: SyntaxSet,
    inliner: Option<ResourceInliner>,
}

impl<'a> MarkdownRenderer<'a> {
    /// Creates renderer with hard line breaks and GFM options.
    ///
    /// - Tables, strikethrough, autolinks, task lists, footnotes
    /// - Heading ids (`## Error Handling` gets `id="error-handling"`)
    /// - Smart punctuation for quotes and dashes
    /// - Raw HTML passes through (the document is trusted)
    /// - Syntax highlighting with syntect using CSS classes
    pub fn new() -> Self {
        let mut options = Options::default();

        // Extension options (GFM features)
        options.extension.strikethrough = true;
        options.extension.table = true;
        options.extension.autolink = true;
        options.extension.tasklist = true;
        options.extension.footnotes = true;
        options.extension.description_lists = true;
        options.extension.header_ids = Some(String::new());

        options.parse.smart = true;

        options.render.hardbreaks = true;
        options.render.unsafe_ = true;

        let syntax_set = SyntaxSet::load_defaults_newlines();

        Self {
            options,
            syntax_set,
            inliner: None,
        }
    }

    /// Creates renderer that embeds local images as data URIs.
    ///
    /// # Arguments
    ///
    /// * `base_dir`: Directory relative image paths resolve against
    pub fn with_resources(base_dir: impl AsRef<Path>) -> Self {
        let mut renderer = Self::new();
        renderer.inliner = Some(ResourceInliner::new(base_dir));
        renderer
    }

    /// Renders markdown content to HTML string.
    ///
    /// Parses markdown, renders to HTML, embeds local images if an inliner
    /// is configured, then highlights code blocks with CSS class names.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conversion`] if syntax highlighting fails
    pub fn render(&self, content: &str) -> Result<String> {
        let mut html = comrak::markdown_to_html(content, &self.options);

        if let Some(inliner) = &self.inliner {
            html = inliner.inline_images(&html);
        }

        self.highlight_code_blocks(&html)
    }

    /// Renders markdown file at given path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileNotFound`] if the file is missing,
    /// [`Error::Conversion`] if it is not valid UTF-8, or any rendering error.
    pub fn render_file(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| Error::read(path, e))?;
        let content = String::from_utf8(bytes).map_err(|e| {
            Error::conversion(format!(
                "{} is not valid UTF-8 (byte {})",
                path.display(),
                e.utf8_error().valid_up_to()
            ))
        })?;
        self.render(&content)
    }

    /// Post-processes HTML to apply syntax highlighting with CSS classes.
    ///
    /// Finds code blocks with language-* classes from comrak's output and
    /// replaces the plain text content with syntect highlighted HTML.
    fn highlight_code_blocks(&self, html: &str) -> Result<String> {
        let mut result = String::with_capacity(html.len());
        let mut last_end = 0;
        let mut search_pos = 0;

        while let Some(code_start) = html[search_pos..].find("<code class=\"language-") {
            let code_start = search_pos + code_start;

            let lang_start = code_start + "<code class=\"language-".len();
            let lang_end = match html[lang_start..].find('"') {
                Some(pos) => lang_start + pos,
                None => {
                    search_pos = code_start + 1;
                    continue;
                }
            };

            let language = &html[lang_start..lang_end];

            let content_start = match html[lang_end..].find('>') {
                Some(pos) => lang_end + pos + 1,
                None => {
                    search_pos = code_start + 1;
                    continue;
                }
            };

            let content_end = match html[content_start..].find("</code>") {
                Some(pos) => content_start + pos,
                None => {
                    search_pos = code_start + 1;
                    continue;
                }
            };

            // comrak escapes &, <, >, " inside code blocks
            let decoded_content = Self::html_decode(&html[content_start..content_end]);

            result.push_str(&html[last_end..code_start]);

            let highlighted = self.highlight_code(&decoded_content, language)?;

            result.push_str("<code class=\"language-");
            result.push_str(language);
            result.push_str("\">");
            result.push_str(&highlighted);
            result.push_str("</code>");

            last_end = content_end + "</code>".len();
            search_pos = last_end;
        }

        result.push_str(&html[last_end..]);

        Ok(result)
    }

    /// Highlights code with syntect using `hljs-` prefixed CSS classes.
    ///
    /// Unknown languages come back as escaped plain text.
    fn highlight_code(&self, code: &str, language: &str) -> Result<String> {
        if code.is_empty() {
            return Ok(String::new());
        }

        let syntax = self
            .syntax_set
            .find_syntax_by_token(language)
            .or_else(|| self.syntax_set.find_syntax_by_extension(language));

        let Some(syntax) = syntax else {
            return Ok(Self::html_escape(code));
        };

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, CLASS_STYLE);

        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|e| {
                    Error::conversion(format!("failed to highlight {} code: {}", language, e))
                })?;
        }

        Ok(generator.finalize())
    }

    fn html_decode(html: &str) -> String {
        html.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&")
    }

    fn html_escape(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;")
    }
}

impl<'a> Default for MarkdownRenderer<'a> {
    fn default() -> Self {
        Self::new()
    }
}
