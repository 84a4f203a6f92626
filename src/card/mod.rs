//! Card files on disk and the external library that understands them.
//!
//! Parsing, validation and in-place mutation of cards are delegated to the
//! [`CardLibrary`] seam. This module only enumerates files, interprets the
//! library's answers and writes the minimal template for new cards.

pub mod details;
pub mod library;
pub mod store;

use std::path::PathBuf;

pub use library::CardLibrary;
#[cfg(unix)]
pub use library::NativeLibrary;
pub use store::{CardStore, ValidCards};

/// Error type for card operations
#[derive(Debug, thiserror::Error)]
pub enum CardError {
    #[error("could not parse card {path}")]
    ParseError { path: PathBuf },
    #[error("card library failed to {operation} {path} (code {code})")]
    ExternalLibrary {
        operation: &'static str,
        path: PathBuf,
        code: i32,
    },
    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not load card library {path}: {reason}")]
    LibraryLoad { path: PathBuf, reason: String },
    #[error("path cannot be passed to the card library: {path}")]
    InvalidPath { path: PathBuf },
}

#[cfg(test)]
pub(crate) mod fake;
