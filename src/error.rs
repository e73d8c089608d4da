//! # Errors
//!
//! Error taxonomy for the loading and rendering pipeline.
//!
//! - [`ParseError`] - malformed OBJ/MTL content, always with file and line
//! - [`ResourceError`] - a resource provider could not deliver a resource
//! - [`ShaderError`] - compile or link failure of a shader program
//!
//! [`GroveError`] wraps all of them for callers that do not care which
//! stage failed.

use std::io;

use thiserror::Error;

/// Failure while parsing a Wavefront geometry or material file.
///
/// Parse failures are never partial: the whole load operation fails.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{file}:{line}: invalid number `{token}`")]
    InvalidNumber {
        file: String,
        line: usize,
        token: String,
    },

    #[error("{file}:{line}: `{directive}` expects {expected} components")]
    MissingComponent {
        file: String,
        line: usize,
        directive: String,
        expected: usize,
    },

    #[error("{file}:{line}: {pool} index {index} is out of range (pool has {len} entries)")]
    IndexOutOfRange {
        file: String,
        line: usize,
        pool: &'static str,
        index: i64,
        len: usize,
    },

    #[error("{file}:{line}: face has {corners} corners, at least 3 are required")]
    DegenerateFace {
        file: String,
        line: usize,
        corners: usize,
    },

    #[error("{file}: failed to read stream")]
    Read {
        file: String,
        #[source]
        source: io::Error,
    },
}

impl ParseError {
    /// Name of the file the error was raised for.
    pub fn file(&self) -> &str {
        match self {
            ParseError::InvalidNumber { file, .. }
            | ParseError::MissingComponent { file, .. }
            | ParseError::IndexOutOfRange { file, .. }
            | ParseError::DegenerateFace { file, .. }
            | ParseError::Read { file, .. } => file,
        }
    }
}

/// Failure of a resource provider.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("resource `{0}` not found")]
    Missing(String),

    #[error("failed to read resource `{name}`")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode image `{name}`")]
    Image {
        name: String,
        #[source]
        source: image::ImageError,
    },
}

impl ResourceError {
    /// True when the resource simply does not exist.
    pub fn is_missing(&self) -> bool {
        match self {
            ResourceError::Missing(_) => true,
            ResourceError::Io { source, .. } => source.kind() == io::ErrorKind::NotFound,
            ResourceError::Image { .. } => false,
        }
    }
}

/// Failure while building a shader program. Terminal for that program.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShaderError {
    #[error("{program}: {stage} shader failed to compile: {log}")]
    Compile {
        program: String,
        stage: &'static str,
        log: String,
    },

    #[error("{program}: program failed to link: {log}")]
    Link { program: String, log: String },
}

/// Umbrella error for operations spanning several pipeline stages.
#[derive(Debug, Error)]
pub enum GroveError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    Shader(#[from] ShaderError),
}

impl GroveError {
    /// True when the underlying cause is a resource that does not exist.
    pub fn is_missing_resource(&self) -> bool {
        matches!(self, GroveError::Resource(err) if err.is_missing())
    }
}

pub type Result<T, E = GroveError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_reports_file_and_line() {
        let err = ParseError::InvalidNumber {
            file: "fern.obj".to_string(),
            line: 12,
            token: "1.x".to_string(),
        };
        assert_eq!(err.to_string(), "fern.obj:12: invalid number `1.x`");
        assert_eq!(err.file(), "fern.obj");
    }

    #[test]
    fn test_missing_io_counts_as_missing() {
        let err = ResourceError::Io {
            name: "tree.obj".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.is_missing());
        assert!(ResourceError::Missing("x".into()).is_missing());
    }

    #[test]
    fn test_umbrella_conversion() {
        let err: GroveError = ShaderError::Link {
            program: "entity".into(),
            log: "bad".into(),
        }
        .into();
        assert!(matches!(err, GroveError::Shader(_)));
    }
}
