//! Reusable HTML components for the standalone page
//!
//! Maud component functions that assemble the rendered markdown fragment
//! into a complete document: the page wrapper (doctype, head, embedded
//! style) and the title block shown above the content.

pub mod layout;
pub mod title_block;
