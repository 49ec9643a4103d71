//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits.
//!
//! ```ignore
//! use classforge::prelude::*;
//! ```

// Compiler and sinks
pub use crate::compiler::{Compiler, CompilerBuilder};
pub use crate::error::{CompileError, ConfigurationError, EmissionError};
pub use crate::sink::{ArtifactSink, DirectorySink, JarSink, MemorySink, sink_for_path};

// Schema model
pub use classforge_schema::{
    CompileResult, Node, ParseError, Property, Schema, SchemaError, TypeDescriptor, build_model,
    parse_document,
};

// Code generation
pub use classforge_codegen::{Artifact, ArtifactEmitter, CodegenError, EmitterConfig, Part};

// Class files
pub use classforge_core::ClassFile;
pub use classforge_core::error::{Error as CoreError, Result as CoreResult};
