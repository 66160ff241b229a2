//! Command line configuration.

use anyhow::{Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};

use crate::convert::{Backend, ConversionRequest, DEFAULT_LANG, DEFAULT_TITLE};
use crate::highlight::{DEFAULT_THEME, available_themes};
use crate::util::default_output_path;

/// Command line configuration for mdpage.
#[derive(Debug, Clone, Parser)]
#[command(name = "mdpage", version, about, long_about = None)]
pub struct Config {
    /// Markdown document to render
    #[arg(default_value = "README.md")]
    pub input: PathBuf,

    /// Output HTML file [default: input with .html extension]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Stylesheet to embed [default: bundled stylesheet]
    #[arg(short, long)]
    pub css: Option<PathBuf>,

    /// Document title
    #[arg(long, default_value = DEFAULT_TITLE)]
    pub title: String,

    /// Document language (html lang attribute)
    #[arg(long, default_value = DEFAULT_LANG)]
    pub lang: String,

    /// Syntax highlighting theme (InspiredGitHub, Solarized (light), etc.)
    #[arg(long, default_value = DEFAULT_THEME)]
    pub theme: String,

    /// Conversion backend
    #[arg(long, value_enum, default_value_t = Backend::Builtin)]
    pub backend: Backend,

    /// Pandoc executable used by the pandoc backend
    #[arg(long, default_value = "pandoc")]
    pub pandoc: PathBuf,

    /// Open the generated page in the default browser
    #[arg(long)]
    pub open: bool,

    /// Log debug details
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only report errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Config {
    /// Parses configuration from command line arguments.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Validates configuration.
    ///
    /// Missing input files are not checked here; the conversion reports
    /// them with a dedicated error and exit status.
    ///
    /// # Errors
    ///
    /// Returns error if the title is empty, the output would overwrite the
    /// input, or the highlight theme is unknown.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            bail!("Title must not be empty");
        }

        let output = self.output_path();
        if output == self.input || same_file(&self.input, &output) {
            bail!(
                "Output path would overwrite the input: {}",
                self.input.display()
            );
        }

        if self.backend == Backend::Builtin && !available_themes().contains(&self.theme) {
            bail!(
                "Unknown highlight theme '{}' (available: {})",
                self.theme,
                available_themes().join(", ")
            );
        }

        Ok(())
    }

    /// Returns output path from configuration or derived from the input.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.input))
    }

    /// Builds the conversion request described by this configuration.
    pub fn request(&self) -> ConversionRequest {
        ConversionRequest {
            input: self.input.clone(),
            stylesheet: self.css.clone(),
            output: self.output_path(),
            title: self.title.clone(),
            lang: self.lang.clone(),
            theme: self.theme.clone(),
        }
    }

    /// Log filter directive matching the verbosity flags.
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        }
    }
}

/// Returns true when `output` names the existing file `input`, however
/// either path is spelled.
fn same_file(input: &Path, output: &Path) -> bool {
    let Ok(input) = input.canonicalize() else {
        return false;
    };

    if let Ok(output) = output.canonicalize() {
        return input == output;
    }

    // Output does not exist yet; its parent still might
    let Some(name) = output.file_name() else {
        return false;
    };
    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    parent
        .canonicalize()
        .is_ok_and(|parent| parent.join(name) == input)
}
