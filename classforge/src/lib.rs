//! # classforge
//!
//! Compile JSON Schema documents straight to JVM record class files.
//!
//! classforge reads a resolved JSON Schema, builds a model of record types
//! (the root plus every nested object it discovers) and writes one Java 17
//! class file per type, without going through Java source or `javac`.
//!
//! ## Features
//!
//! - **Deterministic output** - Same schema and settings, same bytes
//! - **Record semantics** - Private final fields, accessors, a canonical
//!   constructor, and value-based `equals`, `hashCode` and `toString`
//! - **Nested types** - Object properties and array items become their own
//!   classes, deduplicated by name
//! - **Serializer metadata** - Original keys kept as `@JsonProperty` (or any
//!   other annotation) on fields and constructor parameters
//! - **Flexible output** - Class path directory, jar archive, or memory
//!
//! ## Quick Start
//!
//! ```no_run
//! use classforge::prelude::*;
//! use std::path::Path;
//!
//! let compiler = Compiler::builder().package_name("com.example").build()?;
//! let mut sink = sink_for_path(Path::new("model.jar"));
//! compiler.compile_file(Path::new("person.json"), &mut sink)?;
//! # Ok::<(), CompileError>(())
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`] - Class-file codec, bytecode builder and reader
//! - [`schema`] - JSON Schema reading and type model building
//! - [`codegen`] - Record class generation
//! - [`sink`] - Output destinations

pub mod compiler;
pub mod error;
pub mod prelude;
pub mod sink;

/// Class-file codec.
pub mod core {
    pub use classforge_core::*;
}

/// JSON Schema reading and type model building.
pub mod schema {
    pub use classforge_schema::*;
}

/// Record class generation.
pub mod codegen {
    pub use classforge_codegen::*;
}

// Re-export commonly used items at the crate root
pub use compiler::{Compiler, CompilerBuilder};
pub use error::{CompileError, ConfigurationError, EmissionError};
pub use sink::{ArtifactSink, DirectorySink, JarSink, MemorySink, sink_for_path};

pub use classforge_codegen::{Artifact, EmitterConfig};
