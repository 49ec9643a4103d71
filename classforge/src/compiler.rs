//! Compile orchestration.
//!
//! One invocation runs `prepare` on the sink, builds the type model with a
//! fresh registry, generates every class in memory, hands the classes to
//! the sink root first and finally calls `finalize`. Any failure after
//! `prepare` aborts the sink, so a failed invocation leaves no output.

use crate::error::{CompileError, ConfigurationError};
use crate::sink::ArtifactSink;
use classforge_codegen::{Artifact, ArtifactEmitter, CodegenError, EmitterConfig};
use classforge_schema::Node;
use std::path::Path;

/// Builder for configuring a [`Compiler`].
#[derive(Debug, Clone, Default)]
pub struct CompilerBuilder {
    config: EmitterConfig,
}

impl CompilerBuilder {
    /// Creates a builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the dotted package prepended to every generated type.
    #[must_use]
    pub fn package_name(mut self, package: impl Into<String>) -> Self {
        self.config = self.config.with_package_name(package);
        self
    }

    /// Enables or disables original-key annotations (enabled by default).
    #[must_use]
    pub fn original_keys(mut self, enabled: bool) -> Self {
        self.config = self.config.with_original_keys(enabled);
        self
    }

    /// Sets the original-key annotation descriptor (`Lcom/x/Key;`).
    #[must_use]
    pub fn annotation(mut self, descriptor: impl Into<String>) -> Self {
        self.config = self.config.with_annotation(descriptor);
        self
    }

    /// Maps integer, number and boolean to JVM primitives.
    #[must_use]
    pub fn primitive_values(mut self, enabled: bool) -> Self {
        self.config = self.config.with_primitive_values(enabled);
        self
    }

    /// Replaces the whole emitter configuration.
    #[must_use]
    pub fn config(mut self, config: EmitterConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the compiler.
    ///
    /// # Errors
    /// Returns [`ConfigurationError`] for an invalid package name or
    /// annotation descriptor.
    pub fn build(self) -> Result<Compiler, ConfigurationError> {
        self.config.validate().map_err(|e| match e {
            CodegenError::InvalidPackage { package } => ConfigurationError::InvalidPackage { package },
            CodegenError::InvalidAnnotation { descriptor } => {
                ConfigurationError::InvalidAnnotation { descriptor }
            }
            other => ConfigurationError::Invalid {
                message: other.to_string(),
            },
        })?;
        Ok(Compiler {
            emitter: ArtifactEmitter::new(self.config),
        })
    }
}

/// Compiles schema documents to class files.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    emitter: ArtifactEmitter,
}

impl Compiler {
    /// Returns a builder.
    #[must_use]
    pub fn builder() -> CompilerBuilder {
        CompilerBuilder::new()
    }

    /// Returns the emitter configuration.
    #[must_use]
    pub fn config(&self) -> &EmitterConfig {
        self.emitter.config()
    }

    /// Generates the class files of a document without a sink.
    ///
    /// # Returns
    /// One artifact per schema, root first.
    ///
    /// # Errors
    /// Returns [`CompileError`] if the model cannot be built or a class
    /// cannot be generated.
    pub fn generate(&self, document: &Node) -> Result<Vec<Artifact>, CompileError> {
        let model = classforge_schema::build_model(document)?;
        tracing::debug!(types = ?model.names(), "type model built");
        Ok(self.emitter.emit_all(&model)?)
    }

    /// Compiles a document into `sink`.
    ///
    /// # Returns
    /// Binary names of the generated types, root first.
    ///
    /// # Errors
    /// Returns the first failure. The sink is aborted if it was prepared.
    pub fn compile_document<S>(&self, document: &Node, sink: &mut S) -> Result<Vec<String>, CompileError>
    where
        S: ArtifactSink + ?Sized,
    {
        sink.prepare()?;
        match self.deliver(document, sink) {
            Ok(names) => {
                tracing::info!(root = names.first().map(String::as_str), classes = names.len(), "compile finished");
                Ok(names)
            }
            Err(e) => {
                tracing::debug!(error = %e, "compile failed, aborting sink");
                sink.abort();
                Err(e)
            }
        }
    }

    fn deliver<S>(&self, document: &Node, sink: &mut S) -> Result<Vec<String>, CompileError>
    where
        S: ArtifactSink + ?Sized,
    {
        let artifacts = self.generate(document)?;
        for artifact in &artifacts {
            sink.receive(artifact)?;
        }
        sink.finalize()?;
        Ok(artifacts.into_iter().map(|a| a.type_name).collect())
    }

    /// Compiles JSON Schema text into `sink`.
    ///
    /// # Errors
    /// Returns [`CompileError::Parse`] for malformed JSON, otherwise as
    /// [`Compiler::compile_document`].
    pub fn compile_str<S>(&self, json: &str, sink: &mut S) -> Result<Vec<String>, CompileError>
    where
        S: ArtifactSink + ?Sized,
    {
        let document = classforge_schema::parse_document(json)?;
        self.compile_document(&document, sink)
    }

    /// Compiles a JSON Schema file into `sink`.
    ///
    /// # Errors
    /// Returns [`CompileError::Parse`] if the file cannot be read or
    /// parsed, otherwise as [`Compiler::compile_document`].
    pub fn compile_file<S>(&self, path: &Path, sink: &mut S) -> Result<Vec<String>, CompileError>
    where
        S: ArtifactSink + ?Sized,
    {
        tracing::info!(path = %path.display(), "compiling schema");
        let document = classforge_schema::read_document(path)?;
        self.compile_document(&document, sink)
    }

    /// Compiles an already-parsed JSON value into `sink`.
    ///
    /// Object keys follow the map order of `serde_json`; duplicate keys
    /// are already merged, so use [`Compiler::compile_str`] when they
    /// must be rejected.
    ///
    /// # Errors
    /// As [`Compiler::compile_document`].
    pub fn compile_value<S>(&self, value: &serde_json::Value, sink: &mut S) -> Result<Vec<String>, CompileError>
    where
        S: ArtifactSink + ?Sized,
    {
        let document = Node::from(value.clone());
        self.compile_document(&document, sink)
    }
}
