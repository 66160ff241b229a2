//! Stylesheet loading and bundling

use std::path::Path;

use crate::error::{Error, Result};
use crate::highlight::theme_css;
use crate::markdown::ResourceInliner;

/// Stylesheet embedded when no `--css` is given.
pub const DEFAULT_STYLESHEET: &str = include_str!("../assets/style.css");

/// Nesting limit for `@import` chains, which also stops import cycles.
const MAX_IMPORT_DEPTH: usize = 16;

/// Loads a stylesheet and inlines the local files it references.
///
/// Local `@import` rules are replaced by the imported stylesheet, and
/// `url(...)` targets resolve against the directory of the file that
/// contains them. Without a path the bundled [`DEFAULT_STYLESHEET`] is
/// returned.
///
/// # Errors
///
/// Returns [`Error::FileNotFound`] if `path` does not exist, or
/// [`Error::Conversion`] if it is not valid UTF-8.
pub fn load_stylesheet(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => read_stylesheet(path, 0),
        None => Ok(DEFAULT_STYLESHEET.to_string()),
    }
}

fn read_stylesheet(path: &Path, depth: usize) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| Error::read(path, e))?;
    let css = String::from_utf8(bytes)
        .map_err(|_| Error::conversion(format!("{} is not valid UTF-8", path.display())))?;

    let inliner = ResourceInliner::for_file(path);
    let css = inline_css_imports(&css, &inliner, depth);
    Ok(inline_css_urls(&css, &inliner))
}

/// Replaces local `@import` rules with the content of the imported file.
///
/// Media queries on the rule are kept by wrapping the content in `@media`.
/// Remote or unreadable imports stay as they are.
fn inline_css_imports(css: &str, inliner: &ResourceInliner, depth: usize) -> String {
    let lower = css.to_ascii_lowercase();
    let mut result = String::with_capacity(css.len());
    let mut pos = 0;

    while let Some(offset) = lower[pos..].find("@import") {
        let start = pos + offset;
        let Some(semi) = css[start..].find(';') else {
            break;
        };
        let end = start + semi + 1;
        let rule = &css[start + "@import".len()..end - 1];

        result.push_str(&css[pos..start]);
        match parse_import(rule).and_then(|(url, media)| {
            expand_import(url, inliner, depth).map(|content| (content, media))
        }) {
            Some((content, "")) => result.push_str(content.trim_end()),
            Some((content, media)) => {
                result.push_str(&format!("@media {} {{\n{}\n}}", media, content.trim_end()));
            }
            None => result.push_str(&css[start..end]),
        }
        pos = end;
    }

    result.push_str(&css[pos..]);
    result
}

fn expand_import(url: &str, inliner: &ResourceInliner, depth: usize) -> Option<String> {
    if !ResourceInliner::is_local(url) {
        return None;
    }
    if depth >= MAX_IMPORT_DEPTH {
        tracing::warn!("Not inlining {}: @import nested too deeply", url);
        return None;
    }

    let path = inliner.resolve(url);
    match read_stylesheet(&path, depth + 1) {
        Ok(content) => {
            tracing::debug!(path = %path.display(), "Inlined @import");
            Some(content)
        }
        Err(e) => {
            tracing::warn!("Could not inline @import {}: {}", url, e);
            None
        }
    }
}

/// Splits the body of an `@import` rule into its target and media list.
fn parse_import(rule: &str) -> Option<(&str, &str)> {
    let rule = rule.trim();
    let is_url = rule
        .get(..4)
        .is_some_and(|head| head.eq_ignore_ascii_case("url("));

    let (target, rest) = if is_url {
        let close = rule.find(')')?;
        (strip_quotes(rule[4..close].trim()), &rule[close + 1..])
    } else {
        let quote = rule.chars().next().filter(|c| matches!(c, '"' | '\''))?;
        let close = rule[1..].find(quote)? + 1;
        (&rule[1..close], &rule[close + 1..])
    };

    Some((target, rest.trim()))
}

fn strip_quotes(value: &str) -> &str {
    match value.chars().next() {
        Some(q @ ('"' | '\'')) if value.len() >= 2 && value.ends_with(q) => {
            &value[1..value.len() - 1]
        }
        _ => value,
    }
}

/// Builds the complete `<style>` content for a page.
///
/// The user stylesheet comes first, followed by the CSS of the syntax
/// highlighting theme.
pub fn page_style(stylesheet: Option<&Path>, theme: &str) -> Result<String> {
    let css = load_stylesheet(stylesheet)?;
    let highlight = theme_css(theme)?;
    Ok(bundle(&[&css, &highlight]))
}

fn bundle(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim_end())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Rewrites local `url(...)` references in CSS into data URIs.
pub fn inline_css_urls(css: &str, inliner: &ResourceInliner) -> String {
    let mut result = String::with_capacity(css.len());
    let mut pos = 0;

    while let Some(offset) = css[pos..].find("url(") {
        let open = pos + offset + "url(".len();
        let close = match css[open..].find(')') {
            Some(p) => open + p,
            None => break,
        };

        result.push_str(&css[pos..open]);

        let raw = css[open..close].trim();
        let url = strip_quotes(raw);
        let quote = (url.len() != raw.len()).then(|| &raw[..1]);

        let resolved = inliner.inline_or_keep(url);
        match quote {
            Some(q) => {
                result.push_str(q);
                result.push_str(&resolved);
                result.push_str(q);
            }
            None => result.push_str(&resolved),
        }

        pos = close;
    }

    result.push_str(&css[pos..]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_default_stylesheet() {
        let css = load_stylesheet(None).expect("Default stylesheet should load");
        assert_eq!(css, DEFAULT_STYLESHEET);
        assert!(css.contains("body"));
    }

    #[test]
    fn test_load_missing_stylesheet() {
        let result = load_stylesheet(Some(Path::new("/nonexistent/mdpage/style.css")));
        assert!(matches!(result, Err(Error::FileNotFound { .. })));
    }

    #[test]
    fn test_inline_css_urls_quoted_and_bare() -> anyhow::Result<()> {
        // Arrange
        let dir = TempDir::new()?;
        std::fs::write(dir.path().join("font.woff2"), b"wOF2")?;
        std::fs::write(dir.path().join("bg.gif"), b"GIF89a")?;
        let inliner = ResourceInliner::new(dir.path());
        let css = concat!(
            "@font-face { src: url(\"font.woff2\") format(\"woff2\"); }\n",
            "body { background: url(bg.gif); }\n",
            "h1 { background: url('https://example.com/x.png'); }\n",
        );

        // Act
        let out = inline_css_urls(css, &inliner);

        // Assert
        assert!(
            out.contains("url(\"data:font/woff2;base64,d09GMg==\")"),
            "Quoted font url should be inlined: {}",
            out
        );
        assert!(
            out.contains("url(data:image/gif;base64,R0lGODlh)"),
            "Bare url should be inlined: {}",
            out
        );
        assert!(
            out.contains("url('https://example.com/x.png')"),
            "Remote url should be unchanged: {}",
            out
        );
        Ok(())
    }

    #[test]
    fn test_load_stylesheet_inlines_relative_to_css_file() -> anyhow::Result<()> {
        // Arrange
        let dir = TempDir::new()?;
        std::fs::create_dir(dir.path().join("css"))?;
        std::fs::write(dir.path().join("css/dot.svg"), "<svg></svg>")?;
        let css_path = dir.path().join("css/site.css");
        std::fs::write(&css_path, "li { list-style-image: url(dot.svg); }")?;

        // Act
        let css = load_stylesheet(Some(&css_path))?;

        // Assert
        assert_eq!(
            css,
            "li { list-style-image: url(data:image/svg+xml;base64,PHN2Zz48L3N2Zz4=); }"
        );
        Ok(())
    }

    #[test]
    fn test_page_style_appends_theme() {
        let style = page_style(None, crate::highlight::DEFAULT_THEME).expect("Should build");
        assert!(style.starts_with(DEFAULT_STYLESHEET.trim_end()));
        assert!(style.contains(".hljs-"));
    }

    #[test]
    fn test_load_stylesheet_inlines_string_import() -> anyhow::Result<()> {
        // Arrange
        let dir = TempDir::new()?;
        std::fs::write(dir.path().join("base.css"), "p { margin: 0; }\n")?;
        let css_path = dir.path().join("site.css");
        std::fs::write(&css_path, "@import \"base.css\";\nh1 { color: red; }")?;

        // Act
        let css = load_stylesheet(Some(&css_path))?;

        // Assert
        assert_eq!(css, "p { margin: 0; }\nh1 { color: red; }");
        Ok(())
    }

    #[test]
    fn test_load_stylesheet_import_forms() -> anyhow::Result<()> {
        // Arrange: imported file lives in a subdirectory with its own asset
        let dir = TempDir::new()?;
        std::fs::create_dir(dir.path().join("theme"))?;
        std::fs::write(dir.path().join("theme/dot.gif"), b"GIF89a")?;
        std::fs::write(
            dir.path().join("theme/print.css"),
            "li { list-style-image: url('dot.gif'); }",
        )?;
        let css_path = dir.path().join("site.css");
        std::fs::write(
            &css_path,
            concat!(
                "@IMPORT url(\"theme/print.css\") print;\n",
                "@import 'https://example.com/remote.css';\n",
                "@import \"missing.css\";\n",
            ),
        )?;

        // Act
        let css = load_stylesheet(Some(&css_path))?;

        // Assert
        assert!(
            css.contains(concat!(
                "@media print {\n",
                "li { list-style-image: url('data:image/gif;base64,R0lGODlh'); }\n",
                "}"
            )),
            "Import should be wrapped and resolved relative to itself: {}",
            css
        );
        assert!(css.contains("@import 'https://example.com/remote.css';"), "{}", css);
        assert!(css.contains("@import \"missing.css\";"), "{}", css);
        Ok(())
    }

    #[test]
    fn test_load_stylesheet_import_cycle_terminates() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let a = dir.path().join("a.css");
        std::fs::write(&a, "@import \"b.css\";\na { x: 1; }")?;
        std::fs::write(dir.path().join("b.css"), "@import \"a.css\";\nb { y: 2; }")?;

        let css = load_stylesheet(Some(&a))?;

        assert!(css.contains("@import"), "Cycle should stop at the depth limit");
        assert!(css.ends_with("a { x: 1; }"), "{}", css);
        Ok(())
    }

    #[test]
    fn test_parse_import() {
        assert_eq!(parse_import(" \"base.css\""), Some(("base.css", "")));
        assert_eq!(
            parse_import(" url(x.css) screen and (min-width: 1px)"),
            Some(("x.css", "screen and (min-width: 1px)"))
        );
        assert_eq!(parse_import(" URL('y.css')"), Some(("y.css", "")));
        assert_eq!(parse_import(" bare.css"), None);
    }
}
