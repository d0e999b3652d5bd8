use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Every failure the figure pipelines can surface. None of them are recovered
/// locally; the binary reports the error and exits before writing output.
#[derive(Debug, Error)]
pub enum FigureError {
    #[error("cannot access '{}': {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("invalid formula `{formula}`: {message}")]
    Formula { formula: String, message: String },
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("space group {space_group} is outside 1..=230")]
    Lookup { space_group: u32 },
    #[error("render failed: {0}")]
    Render(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl FigureError {
    pub fn file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }

    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, FigureError>;
