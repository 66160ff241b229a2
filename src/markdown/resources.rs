//! Inlining of local resources referenced by rendered HTML.

use base64::{Engine, engine::general_purpose::STANDARD};
use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::mime::mime_for;

/// Embeds local files as base64 `data:` URIs.
///
/// Relative references resolve against `base_dir`, normally the directory
/// holding the document (or stylesheet) that contains them. Remote URLs,
/// fragment links and existing data URIs are never touched.
pub struct ResourceInliner {
    base_dir: PathBuf,
}

impl ResourceInliner {
    /// Creates inliner resolving relative references against `base_dir`.
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Creates inliner for references found in the file at `path`.
    pub fn for_file(path: impl AsRef<Path>) -> Self {
        let base_dir = path.as_ref().parent().unwrap_or_else(|| Path::new(""));
        Self::new(base_dir)
    }

    /// Returns true when `url` points at a file this inliner can embed.
    pub fn is_local(url: &str) -> bool {
        let url = url.trim();
        if url.is_empty() || url.starts_with('#') || url.starts_with("//") {
            return false;
        }

        // Any scheme (http:, https:, data:, mailto:) is external. A single
        // letter before ':' is a Windows drive, not a scheme.
        match url.find(':') {
            Some(colon) if colon > 1 => {
                let scheme = &url[..colon];
                let is_scheme = scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
                !is_scheme
            }
            _ => true,
        }
    }

    /// Resolves a URL as it appears in HTML or CSS to a filesystem path.
    ///
    /// Strips query and fragment, decodes `&amp;` and percent escapes.
    pub fn resolve(&self, url: &str) -> PathBuf {
        let url = url.trim().replace("&amp;", "&");
        let end = url.find(['?', '#']).unwrap_or(url.len());
        let decoded = percent_decode_str(&url[..end]).decode_utf8_lossy();
        self.base_dir.join(decoded.as_ref())
    }

    /// Reads the referenced file and encodes it as a `data:` URI.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileNotFound`] if the file does not exist, or
    /// [`Error::Io`] if it cannot be read.
    pub fn data_uri(&self, url: &str) -> Result<String> {
        let path = self.resolve(url);
        let bytes = std::fs::read(&path).map_err(|e| Error::read(&path, e))?;
        let mime = mime_for(&bytes, &path);

        tracing::debug!(path = %path.display(), mime, bytes = bytes.len(), "Inlined resource");

        Ok(format!("data:{};base64,{}", mime, STANDARD.encode(&bytes)))
    }

    /// Rewrites `src` of every `<img>` tag with a local target into a data URI.
    ///
    /// Tag and attribute names match case-insensitively and values may be
    /// double quoted, single quoted or bare, so raw HTML passed through from
    /// the document is handled like comrak's own output. Local images that
    /// cannot be read are reported and left unchanged, so one broken figure
    /// does not abort the whole document.
    pub fn inline_images(&self, html: &str) -> String {
        // ASCII lowercasing keeps byte offsets valid for `html`
        let lower = html.to_ascii_lowercase();
        let mut result = String::with_capacity(html.len());
        let mut pos = 0;
        let mut search = 0;

        while let Some(offset) = lower[search..].find("<img") {
            let name_end = search + offset + "<img".len();
            search = name_end;

            // `<imgfoo>` is a different element
            let at_boundary = html
                .as_bytes()
                .get(name_end)
                .is_some_and(|b| b.is_ascii_whitespace() || matches!(b, b'/' | b'>'));
            if !at_boundary {
                continue;
            }

            let Some(tag_end) = find_tag_end(html, name_end) else {
                break;
            };
            search = tag_end;

            let Some(value) = attribute_value(&html[name_end..tag_end], "src") else {
                continue;
            };
            let (start, end) = (name_end + value.start, name_end + value.end);

            let url = &html[start..end];
            let resolved = self.inline_or_keep(url);
            result.push_str(&html[pos..start]);
            if value.quoted || resolved == url {
                result.push_str(&resolved);
            } else {
                result.push('"');
                result.push_str(&resolved);
                result.push('"');
            }
            pos = end;
        }

        result.push_str(&html[pos..]);
        result
    }

    /// Returns a data URI for local `url`, or `url` itself when it is remote
    /// or unreadable.
    pub fn inline_or_keep(&self, url: &str) -> String {
        if !Self::is_local(url) {
            return url.to_string();
        }

        match self.data_uri(url) {
            Ok(uri) => uri,
            Err(e) => {
                tracing::warn!("Could not inline resource {}: {}", url, e);
                url.to_string()
            }
        }
    }
}

/// Byte range of an attribute value inside a tag's attribute text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AttributeValue {
    start: usize,
    end: usize,
    quoted: bool,
}

/// Finds the `>` closing a tag, ignoring any inside quoted values.
fn find_tag_end(html: &str, from: usize) -> Option<usize> {
    let mut quote = None;
    for (i, b) in html.bytes().enumerate().skip(from) {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'>') => return Some(i),
            (None, _) => {}
        }
    }
    None
}

/// Locates the value of attribute `name` in `attrs` (the text between the
/// tag name and `>`).
///
/// Only whole attribute names match, so `data-src` never matches `src`.
fn attribute_value(attrs: &str, name: &str) -> Option<AttributeValue> {
    let bytes = attrs.as_bytes();
    let len = bytes.len();
    let mut i = 0;

    while i < len {
        while i < len && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }

        let name_start = i;
        while i < len && !bytes[i].is_ascii_whitespace() && !matches!(bytes[i], b'=' | b'/' | b'>')
        {
            i += 1;
        }
        let attr_name = &attrs[name_start..i];

        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        if i >= len || bytes[i] != b'=' {
            if attr_name.is_empty() {
                i += 1;
            }
            continue;
        }

        // Skip '=' and whitespace before the value
        i += 1;
        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let value = match bytes.get(i) {
            Some(&q @ (b'"' | b'\'')) => {
                let start = i + 1;
                let end = attrs[start..]
                    .find(q as char)
                    .map_or(len, |p| start + p);
                i = (end + 1).min(len);
                AttributeValue {
                    start,
                    end,
                    quoted: true,
                }
            }
            Some(_) => {
                let start = i;
                while i < len && !bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                AttributeValue {
                    start,
                    end: i,
                    quoted: false,
                }
            }
            None => return None,
        };

        if attr_name.eq_ignore_ascii_case(name) {
            return Some(value);
        }
    }

    None
}
