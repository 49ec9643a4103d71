//! # classforge Codegen
//!
//! JVM record class generation from classforge schema models.
//!
//! This crate provides:
//! - Lowering of schema types to JVM field types
//! - Field, accessor and constructor generation
//! - `equals`, `hashCode` and `toString` bytecode generation
//! - An emitter that turns a whole model into class files

pub mod config;
pub mod error;
pub mod generator;
pub mod jvm;

pub use config::{ANNOTATION_ELEMENT, EmitterConfig, JSON_PROPERTY};
pub use error::CodegenError;
pub use generator::{Artifact, ArtifactEmitter, Part};

/// Generates class files from JSON Schema text.
///
/// # Arguments
/// * `json` - Schema document
/// * `config` - Emitter configuration
///
/// # Returns
/// One artifact per schema, root first.
///
/// # Errors
/// Returns `CodegenError` if parsing, model building or generation fails.
pub fn generate_from_json(json: &str, config: &EmitterConfig) -> Result<Vec<Artifact>, CodegenError> {
    let document = classforge_schema::parse_document(json)?;
    let model = classforge_schema::build_model(&document)?;
    ArtifactEmitter::new(config.clone()).emit_all(&model)
}

/// Generates class files from a JSON Schema file.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, model building or
/// generation fails.
pub fn generate_from_file(
    path: &std::path::Path,
    config: &EmitterConfig,
) -> Result<Vec<Artifact>, CodegenError> {
    let document = classforge_schema::read_document(path)?;
    let model = classforge_schema::build_model(&document)?;
    ArtifactEmitter::new(config.clone()).emit_all(&model)
}
