//! Error types and handling for gropack
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Errors split into two families: format errors raised while parsing world
//! or archive data (always fatal, the whole scan aborts) and setup errors
//! raised while interpreting the command line. Resources that merely cannot
//! be found on disk are not errors at all; they are collected and reported
//! after scanning completes.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for gropack operations
#[derive(Error, Diagnostic, Debug)]
pub enum PackError {
    // World format errors
    #[error("'{path}' is not a world file from a classic Serious Engine game")]
    #[diagnostic(
        code(gropack::world::bad_header),
        help("Only .wld files written by Serious Engine 1 or Revolution are supported")
    )]
    NotAWorldFile { path: String },

    #[error("Malformed world data: expected '{expected}' at offset {offset}")]
    #[diagnostic(code(gropack::world::bad_chunk))]
    UnexpectedChunk { expected: String, offset: usize },

    #[error("Malformed world data: read past the end of the file at offset {offset}")]
    #[diagnostic(code(gropack::world::truncated))]
    TruncatedRead { offset: usize },

    // Archive errors
    #[error("Failed to read archive '{path}': {reason}")]
    #[diagnostic(code(gropack::archive::read_failed))]
    ArchiveReadFailed { path: String, reason: String },

    #[error("Failed to write archive '{path}': {reason}")]
    #[diagnostic(code(gropack::archive::write_failed))]
    ArchiveWriteFailed { path: String, reason: String },

    // Setup errors
    #[error("Couldn't determine the game installed at '{root}'")]
    #[diagnostic(
        code(gropack::setup::unknown_game),
        help("Expected SE1_00.gro, 1_00c.gro, All_01.gro or SE1_10.gro in the game directory")
    )]
    UnknownGameDirectory { root: String },

    #[error("World files must reside under a 'Levels' directory: {path}")]
    #[diagnostic(
        code(gropack::setup::outside_levels),
        help("Open a .wld from <game root>/Levels/... so the game root can be inferred")
    )]
    WorldOutsideLevels { path: String },

    #[error("{message}")]
    #[diagnostic(code(gropack::setup::invalid_arguments))]
    InvalidArguments { message: String },

    // File system errors
    #[error("Failed to read file: {path}")]
    #[diagnostic(code(gropack::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(gropack::fs::io_error))]
    IoError { message: String },
}

/// Shorthand for the chunk-mismatch format error
pub fn unexpected_chunk(expected: &[u8; 4], offset: usize) -> PackError {
    PackError::UnexpectedChunk {
        expected: String::from_utf8_lossy(expected).into_owned(),
        offset,
    }
}

/// Shorthand for the invalid-arguments setup error
pub fn invalid_arguments(message: impl Into<String>) -> PackError {
    PackError::InvalidArguments {
        message: message.into(),
    }
}

impl From<std::io::Error> for PackError {
    fn from(err: std::io::Error) -> Self {
        PackError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for PackError {
    fn from(err: inquire::InquireError) -> Self {
        PackError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, PackError>;
