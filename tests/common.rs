//! Shared test utilities for integration tests.
//!
//! Provides helpers for laying out a scratch document directory (markdown,
//! stylesheet, images) used across multiple test files.

#![allow(dead_code)]

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Markdown used by most tests: a heading, hard broken lines, a table of
/// contents link, a code block and a local image.
pub const SAMPLE_MARKDOWN: &str = "\
# Ownership
Every value has an owner.
Only one owner at a time.

See [borrowing](#borrowing).

## Borrowing

```rust
fn len(s: &String) -> usize {
    s.len()
}
```

![Diagram](img/diagram.svg)
";

pub const SAMPLE_CSS: &str = "body { color: #222; }\nh2 { background: url(\"img/rule.gif\"); }\n";

/// Creates a temporary project with `guide.md`, `style.css` and images.
///
/// # Errors
///
/// Returns error if directory creation or file write fails
pub fn create_test_project() -> Result<TempDir> {
    let dir = TempDir::new()?;
    write_file(dir.path(), "guide.md", SAMPLE_MARKDOWN)?;
    write_file(dir.path(), "style.css", SAMPLE_CSS)?;
    write_file(
        dir.path(),
        "img/diagram.svg",
        "<svg xmlns=\"http://www.w3.org/2000/svg\"><rect width=\"1\" height=\"1\"/></svg>",
    )?;
    write_file(dir.path(), "img/rule.gif", "GIF89a")?;
    Ok(dir)
}

/// Writes file under `root`, creating parent directories as needed.
///
/// # Errors
///
/// Returns error if directory creation or file write fails
pub fn write_file(root: &Path, path: &str, content: &str) -> Result<PathBuf> {
    let file_path = root.join(path);
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Lists file names directly under `dir`, sorted.
pub fn list_dir(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        names.push(entry?.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

/// Returns true when a runnable pandoc is on PATH.
pub fn pandoc_available() -> bool {
    Command::new("pandoc")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Writes an executable shell script under `root`.
///
/// # Errors
///
/// Returns error if the file write or permission change fails
#[cfg(unix)]
pub fn write_script(root: &Path, path: &str, body: &str) -> Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let script = write_file(root, path, &format!("#!/bin/sh\n{}", body))?;
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))?;
    Ok(script)
}
