//! Error taxonomy for document conversion.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Exit status used when the converter executable cannot be found.
pub const EXIT_TOOL_NOT_FOUND: u8 = 127;

/// Exit status for a missing input or stylesheet (sysexits `EX_NOINPUT`).
pub const EXIT_NO_INPUT: u8 = 66;

/// Exit status for input that cannot be converted (sysexits `EX_DATAERR`).
pub const EXIT_DATA_ERR: u8 = 65;

/// Exit status for a failed output write (sysexits `EX_CANTCREAT`).
pub const EXIT_CANT_CREATE: u8 = 73;

/// Failures of a single conversion.
///
/// Every variant is terminal for the operation. No output file exists after
/// any of them is returned.
#[derive(Debug, Error)]
pub enum Error {
    #[error("converter not found: {program}")]
    ToolNotFound { program: String },

    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("conversion failed: {message}")]
    Conversion {
        message: String,
        /// Exit status reported by an external converter, if any.
        status: Option<i32>,
    },

    #[error("failed to write output {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Creates a conversion error without an external exit status.
    pub fn conversion(message: impl Into<String>) -> Self {
        Self::Conversion {
            message: message.into(),
            status: None,
        }
    }

    /// Maps a read failure on `path`, turning `NotFound` into [`Error::FileNotFound`].
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Self::FileNotFound { path }
        } else {
            Self::Io { path, source }
        }
    }

    /// Process exit status for this failure.
    ///
    /// An external converter's own status wins when it reported one in the
    /// portable `1..=255` range.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ToolNotFound { .. } => EXIT_TOOL_NOT_FOUND,
            Self::FileNotFound { .. } => EXIT_NO_INPUT,
            Self::Conversion {
                status: Some(code), ..
            } if (1..=255).contains(code) => *code as u8,
            Self::Conversion { .. } => EXIT_DATA_ERR,
            Self::OutputWrite { .. } => EXIT_CANT_CREATE,
            Self::Io { .. } => 1,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
