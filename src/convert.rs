//! Markdown to standalone HTML conversion.
//!
//! A [`ConversionRequest`] names one input document, an optional stylesheet,
//! the output path and the fixed title. A [`Converter`] turns it into exactly
//! one self-contained HTML file or fails without leaving output behind.
//! Two converters exist: [`Builtin`] renders in process with comrak, and
//! [`Pandoc`] shells out to an installed pandoc with fixed arguments.

use clap::ValueEnum;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::assets::{DEFAULT_STYLESHEET, page_style};
use crate::components::layout::standalone_page;
use crate::error::{Error, Result};
use crate::highlight::DEFAULT_THEME;
use crate::markdown::MarkdownRenderer;
use crate::output::{PendingOutput, write_atomic};

/// Title used when none is configured.
pub const DEFAULT_TITLE: &str = "\u{2726} Two Languages, Side by Side \u{2726}";

/// Language attribute used when none is configured.
pub const DEFAULT_LANG: &str = "en";

/// One document conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    /// Markdown source
    pub input: PathBuf,
    /// Stylesheet to embed; `None` embeds the bundled default
    pub stylesheet: Option<PathBuf>,
    /// Destination HTML file
    pub output: PathBuf,
    /// Document title, used verbatim
    pub title: String,
    /// Value of the `lang` attribute on `<html>`
    pub lang: String,
    /// Syntax highlighting theme (builtin converter only)
    pub theme: String,
}

impl ConversionRequest {
    /// Creates request with default title, language, stylesheet and theme.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            stylesheet: None,
            output: output.into(),
            title: DEFAULT_TITLE.to_string(),
            lang: DEFAULT_LANG.to_string(),
            theme: DEFAULT_THEME.to_string(),
        }
    }

    /// Sets the stylesheet to embed instead of the bundled default.
    pub fn with_stylesheet(mut self, stylesheet: impl Into<PathBuf>) -> Self {
        self.stylesheet = Some(stylesheet.into());
        self
    }

    /// Sets the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Verifies that the input document and stylesheet exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileNotFound`] naming the first missing file.
    pub fn check_inputs(&self) -> Result<()> {
        let files = std::iter::once(self.input.as_path()).chain(self.stylesheet.as_deref());
        for path in files {
            if !path.is_file() {
                return Err(Error::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
        }
        Ok(())
    }
}

/// Available conversion backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Backend {
    /// In-process rendering with comrak
    #[default]
    Builtin,
    /// External pandoc executable
    Pandoc,
}

/// Converts a markdown document into a standalone HTML file.
pub trait Converter {
    /// Short name for log messages.
    fn name(&self) -> &str;

    /// Performs the conversion.
    ///
    /// Either the complete output file exists afterwards, or the call
    /// returned an error and the output path was left untouched.
    fn convert(&self, request: &ConversionRequest) -> Result<()>;
}

/// Creates the converter for `backend`.
///
/// `pandoc` names the executable used by [`Backend::Pandoc`].
pub fn converter_for(backend: Backend, pandoc: impl Into<PathBuf>) -> Box<dyn Converter> {
    match backend {
        Backend::Builtin => Box::new(Builtin),
        Backend::Pandoc => Box::new(Pandoc::new(pandoc)),
    }
}

/// In-process converter built on comrak and syntect.
#[derive(Debug, Clone, Copy, Default)]
pub struct Builtin;

impl Builtin {
    /// Renders the requested document to a complete HTML string.
    ///
    /// Images referenced by the document resolve against its directory and
    /// are embedded, as is the stylesheet and the highlighting theme CSS.
    pub fn render(&self, request: &ConversionRequest) -> Result<String> {
        request.check_inputs()?;

        let base_dir = request.input.parent().unwrap_or_else(|| Path::new(""));
        let renderer = MarkdownRenderer::with_resources(base_dir);
        let body = renderer.render_file(&request.input)?;
        let style = page_style(request.stylesheet.as_deref(), &request.theme)?;

        Ok(standalone_page(&request.title, &request.lang, &style, &body).into_string())
    }
}

impl Converter for Builtin {
    fn name(&self) -> &str {
        "builtin"
    }

    fn convert(&self, request: &ConversionRequest) -> Result<()> {
        let html = self.render(request)?;
        write_atomic(&request.output, html.as_bytes())
    }
}

/// Converter delegating to an external pandoc executable.
#[derive(Debug, Clone)]
pub struct Pandoc {
    program: PathBuf,
}

impl Pandoc {
    /// Creates converter running `program`, looked up on PATH when bare.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Builds the fixed pandoc invocation.
    ///
    /// # Arguments
    ///
    /// * `request`: Conversion being performed
    /// * `stylesheet`: Stylesheet file passed to `--css`
    /// * `output`: File pandoc writes to
    pub fn command(&self, request: &ConversionRequest, stylesheet: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--from=markdown+hard_line_breaks")
            .arg("--to=html5")
            .arg("--standalone")
            .arg("--self-contained")
            .arg(format!("--metadata=title:{}", request.title))
            .arg(format!("--metadata=lang:{}", request.lang))
            .arg("--css")
            .arg(stylesheet)
            .arg("--output")
            .arg(output)
            .arg(&request.input);
        cmd
    }
}

impl Converter for Pandoc {
    fn name(&self) -> &str {
        "pandoc"
    }

    fn convert(&self, request: &ConversionRequest) -> Result<()> {
        request.check_inputs()?;

        let pending = PendingOutput::create(&request.output)?;

        // Without a user stylesheet pandoc still needs a file to embed
        let default_css;
        let stylesheet = match &request.stylesheet {
            Some(path) => path.as_path(),
            None => {
                default_css = write_default_stylesheet().map_err(|source| Error::Io {
                    path: std::env::temp_dir(),
                    source,
                })?;
                default_css.path()
            }
        };

        let mut cmd = self.command(request, stylesheet, pending.path());
        tracing::debug!(command = ?cmd, "Running pandoc");

        let output = cmd.output().map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                Error::ToolNotFound {
                    program: self.program.display().to_string(),
                }
            } else {
                Error::Io {
                    path: self.program.clone(),
                    source: e,
                }
            }
        })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(Error::Conversion {
                message: format!("pandoc exited with {}: {}", output.status, stderr.trim()),
                status: output.status.code(),
            });
        }

        for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
            tracing::warn!("pandoc: {}", line);
        }

        pending.commit()
    }
}

fn write_default_stylesheet() -> io::Result<tempfile::NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("mdpage-")
        .suffix(".css")
        .tempfile()?;
    file.write_all(DEFAULT_STYLESHEET.as_bytes())?;
    file.flush()?;
    Ok(file)
}
