//! Standalone document wrapper component

use maud::{DOCTYPE, Markup, PreEscaped, html};

use super::title_block::title_block;

/// Value of the generator meta tag.
pub const GENERATOR: &str = env!("CARGO_PKG_NAME");

/// Wraps a rendered fragment in a complete, self-contained HTML document.
///
/// All styling is emitted inside a single `<style>` element; the page
/// references no external stylesheet or script. Nothing time dependent is
/// written, so equal inputs give byte-identical pages.
///
/// # Arguments
///
/// * `title`: Document title, used verbatim for `<title>` and the title block
/// * `lang`: Value of the `lang` attribute on `<html>`
/// * `style`: CSS to embed
/// * `body`: Rendered HTML fragment (trusted, not escaped)
///
/// # Returns
///
/// Complete HTML document
pub fn standalone_page(title: &str, lang: &str, style: &str, body: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(lang) {
            head {
                meta charset="utf-8";
                meta name="generator" content=(GENERATOR);
                meta name="viewport" content="width=device-width, initial-scale=1.0, user-scalable=yes";
                title { (title) }
                style { (PreEscaped(escape_style(style))) }
            }
            body {
                (title_block(title))
                (PreEscaped(body))
            }
        }
    }
}

/// Keeps embedded CSS from closing its own `<style>` element early.
fn escape_style(css: &str) -> String {
    css.replace("</style", "<\\/style")
}
