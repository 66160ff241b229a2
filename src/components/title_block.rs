//! Title block shown above the document content

use maud::{Markup, html};

/// Renders the document title header.
pub fn title_block(title: &str) -> Markup {
    html! {
        header id="title-block-header" {
            h1 class="title" { (title) }
        }
    }
}
