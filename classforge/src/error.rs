//! Error types for compilation and artifact output.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// A sink or compiler precondition that does not hold.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The output archive already exists.
    #[error("output '{}' already exists", path.display())]
    OutputExists {
        /// Output path.
        path: PathBuf,
    },

    /// The output root exists but is not a directory.
    #[error("output '{}' is not a directory", path.display())]
    NotADirectory {
        /// Output path.
        path: PathBuf,
    },

    /// The package prefix is not a valid dotted name.
    #[error("invalid package name '{package}'")]
    InvalidPackage {
        /// Package name.
        package: String,
    },

    /// The original-key annotation is not a class descriptor.
    #[error("invalid annotation descriptor '{descriptor}'")]
    InvalidAnnotation {
        /// Descriptor.
        descriptor: String,
    },

    /// Any other rejected setting.
    #[error("invalid configuration: {message}")]
    Invalid {
        /// Error message.
        message: String,
    },
}

/// Failure while generating a class file or handing it to a sink.
#[derive(Debug, Error)]
pub enum EmissionError {
    /// Class generation error.
    #[error("codegen error: {0}")]
    Codegen(#[from] classforge_codegen::CodegenError),

    /// IO error on an output path.
    #[error("IO error on '{}': {source}", path.display())]
    Io {
        /// Path being written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Archive error.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}

impl EmissionError {
    /// Creates an IO error for `path`.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Error returned by a compile invocation; the first failure wins.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The schema text could not be read or parsed.
    #[error("parse error: {0}")]
    Parse(#[from] classforge_schema::ParseError),

    /// The schema could not be turned into a type model.
    #[error("schema error: {0}")]
    Schema(#[from] classforge_schema::SchemaError),

    /// A class file could not be produced or written.
    #[error("emission error: {0}")]
    Emission(#[from] EmissionError),

    /// A precondition failed before any output was written.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

impl From<classforge_codegen::CodegenError> for CompileError {
    fn from(error: classforge_codegen::CodegenError) -> Self {
        Self::Emission(EmissionError::Codegen(error))
    }
}
