//! Media type detection for inlined resources.
//!
//! Resources are classified in two phases:
//! 1. Extension lookup (fast path for well named files)
//! 2. Magic byte detection (extensionless or misnamed files)

use std::path::Path;

/// Media types that can be embedded as `data:` URIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Png,
    Jpeg,
    Gif,
    /// Scalable Vector Graphics (XML based)
    Svg,
    Webp,
    Bmp,
    Ico,
    Woff,
    Woff2,
    Ttf,
    Otf,
    Css,
}

impl MediaType {
    /// MIME type for data URLs
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Svg => "image/svg+xml",
            Self::Webp => "image/webp",
            Self::Bmp => "image/bmp",
            Self::Ico => "image/x-icon",
            Self::Woff => "font/woff",
            Self::Woff2 => "font/woff2",
            Self::Ttf => "font/ttf",
            Self::Otf => "font/otf",
            Self::Css => "text/css",
        }
    }
}

/// Detects the media type of a resource from its path and content.
///
/// Falls back to `application/octet-stream` semantics (returns `None`) when
/// neither the extension nor the leading bytes are recognised.
///
/// # Examples
///
/// ```
/// use mdpage::{MediaType, detect_media_type};
/// use std::path::Path;
///
/// let png_header = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
/// assert_eq!(
///     detect_media_type(&png_header, Path::new("logo")),
///     Some(MediaType::Png)
/// );
/// ```
pub fn detect_media_type(bytes: &[u8], path: &Path) -> Option<MediaType> {
    detect_by_extension(path).or_else(|| detect_by_magic(bytes))
}

/// Returns a MIME string for any resource, defaulting to octet-stream.
pub fn mime_for(bytes: &[u8], path: &Path) -> &'static str {
    detect_media_type(bytes, path)
        .map(|t| t.mime_type())
        .unwrap_or("application/octet-stream")
}

fn detect_by_extension(path: &Path) -> Option<MediaType> {
    let ext = path.extension()?.to_str()?.to_lowercase();

    match ext.as_str() {
        "png" => Some(MediaType::Png),
        "jpg" | "jpeg" => Some(MediaType::Jpeg),
        "gif" => Some(MediaType::Gif),
        "svg" => Some(MediaType::Svg),
        "webp" => Some(MediaType::Webp),
        "bmp" => Some(MediaType::Bmp),
        "ico" => Some(MediaType::Ico),
        "woff" => Some(MediaType::Woff),
        "woff2" => Some(MediaType::Woff2),
        "ttf" => Some(MediaType::Ttf),
        "otf" => Some(MediaType::Otf),
        "css" => Some(MediaType::Css),
        _ => None,
    }
}

fn detect_by_magic(bytes: &[u8]) -> Option<MediaType> {
    if bytes.len() < 4 {
        return None;
    }

    if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some(MediaType::Png);
    }

    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some(MediaType::Jpeg);
    }

    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        return Some(MediaType::Gif);
    }

    // RIFF....WEBP
    if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        return Some(MediaType::Webp);
    }

    if bytes.starts_with(b"wOFF") {
        return Some(MediaType::Woff);
    }

    if bytes.starts_with(b"wOF2") {
        return Some(MediaType::Woff2);
    }

    if bytes.starts_with(b"OTTO") {
        return Some(MediaType::Otf);
    }

    if bytes.starts_with(&[0x00, 0x01, 0x00, 0x00]) {
        return Some(MediaType::Ttf);
    }

    if is_svg_root_element(bytes) {
        return Some(MediaType::Svg);
    }

    None
}

/// Checks that `<svg` is the root element after an optional XML declaration.
fn is_svg_root_element(bytes: &[u8]) -> bool {
    let check_len = bytes.len().min(1024);
    let Ok(text) = std::str::from_utf8(&bytes[..check_len]) else {
        return false;
    };

    let mut content = text.trim_start();

    if let Some(rest) = content.strip_prefix("<?xml") {
        match rest.find("?>") {
            Some(end) => content = rest[end + 2..].trim_start(),
            None => return false,
        }
    }

    content.starts_with("<svg")
}
