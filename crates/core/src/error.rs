//! Error types for the vecgen code generator.

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for conversion and code generation.
#[derive(Error, Debug)]
pub enum GenError {
    #[error("invalid token at position {pos}: {msg}")]
    TokenError { pos: usize, msg: String },

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("type error: expected {expected}, got {got}")]
    TypeError {
        expected: &'static str,
        got: &'static str,
    },

    #[error("key not found: {0}")]
    KeyError(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF object not found: {0}")]
    ObjectNotFound(u32),

    #[error("PDF syntax error: {0}")]
    SyntaxError(String),

    #[error("decode error: {0}")]
    DecodeError(String),

    #[error("operand stack underflow in `{op}`")]
    StackUnderflow { op: String },

    #[error("malformed operands for `{op}`: {msg}")]
    MalformedOperands { op: String, msg: String },

    #[error("unknown {kind} resource: {name}")]
    UnknownResource { kind: &'static str, name: String },

    #[error("not implemented: {0}")]
    NotImplemented(String),

    #[error("restore without matching save")]
    GraphicsStackUnderflow,

    #[error("form xobject {0} invokes itself")]
    CyclicSubroute(String),

    #[error("malformed draw route: {0}")]
    MalformedRoute(String),

    #[error("{file}: multi-page documents are not supported ({pages} pages)")]
    MultiPageNotSupported { file: PathBuf, pages: usize },

    #[error("{0}: unsupported file extension")]
    UnsupportedFileExtension(PathBuf),

    #[error("document has no pages")]
    NoPages,

    #[error("failed to start worker threads: {0}")]
    ThreadPool(String),

    #[error("{file}: {source}")]
    WithFile {
        file: PathBuf,
        #[source]
        source: Box<GenError>,
    },
}

impl GenError {
    /// Attach the offending input file to this error.
    pub fn in_file(self, file: impl Into<PathBuf>) -> Self {
        match self {
            e @ (Self::WithFile { .. }
            | Self::MultiPageNotSupported { .. }
            | Self::UnsupportedFileExtension(_)) => e,
            e => Self::WithFile {
                file: file.into(),
                source: Box::new(e),
            },
        }
    }
}

/// Convenience Result type alias for GenError.
pub type Result<T> = std::result::Result<T, GenError>;
