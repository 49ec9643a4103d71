//! Artifact emitter.
//!
//! Drives the part generators in a fixed order against one class builder
//! per schema. Output depends only on the schema and the configuration.

use crate::config::EmitterConfig;
use crate::error::CodegenError;
use crate::jvm::{self, ClassContext};
use classforge_schema::{CompileResult, Schema};

/// One part of a generated record class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    /// Fields and accessors.
    Fields,
    /// Canonical constructor.
    Constructor,
    /// `equals(Object)`.
    Equality,
    /// `hashCode()`.
    Hash,
    /// `toString()`.
    StringForm,
}

impl Part {
    /// Emission order. Fields come first so methods refer to declared fields.
    pub const ORDER: [Part; 5] = [
        Part::Fields,
        Part::Constructor,
        Part::Equality,
        Part::Hash,
        Part::StringForm,
    ];

    /// Adds this part to the class under construction.
    ///
    /// # Errors
    /// Returns the part generator's error.
    pub fn generate(self, ctx: &mut ClassContext<'_>) -> Result<(), CodegenError> {
        match self {
            Part::Fields => jvm::fields::generate(ctx),
            Part::Constructor => jvm::constructor::generate(ctx),
            Part::Equality => jvm::equality::generate(ctx),
            Part::Hash => jvm::hash::generate(ctx),
            Part::StringForm => jvm::string_form::generate(ctx),
        }
    }
}

/// A generated class file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Binary name (`com.example.Person`).
    pub type_name: String,
    /// Internal name (`com/example/Person`).
    pub internal_name: String,
    /// Class file bytes.
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Path of the class file inside a class path root or a jar
    /// (`com/example/Person.class`).
    #[must_use]
    pub fn resource_path(&self) -> String {
        format!("{}.class", self.internal_name)
    }
}

/// Emits one class file per schema.
#[derive(Debug, Clone, Default)]
pub struct ArtifactEmitter {
    config: EmitterConfig,
}

impl ArtifactEmitter {
    /// Creates an emitter.
    #[must_use]
    pub fn new(config: EmitterConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// Generates the class file for one schema.
    ///
    /// # Errors
    /// Returns [`CodegenError`] if the configuration is invalid or a part
    /// cannot be generated.
    pub fn emit(&self, schema: &Schema) -> Result<Artifact, CodegenError> {
        self.config.validate()?;
        self.emit_validated(schema)
    }

    fn emit_validated(&self, schema: &Schema) -> Result<Artifact, CodegenError> {
        let mut ctx = ClassContext::new(schema, &self.config)?;
        for part in Part::ORDER {
            part.generate(&mut ctx)?;
        }
        let internal_name = ctx.this_name.clone();
        let bytes = ctx.finish()?;
        let artifact = Artifact {
            type_name: self.config.binary_name(schema.name()),
            internal_name,
            bytes,
        };
        tracing::debug!(
            type_name = %artifact.type_name,
            fields = schema.properties().len(),
            bytes = artifact.bytes.len(),
            "class emitted"
        );
        Ok(artifact)
    }

    /// Generates class files for every schema of a model, root first.
    ///
    /// # Errors
    /// Returns [`CodegenError::UnknownType`] if a property refers to a
    /// schema missing from `model`, or the first generation error.
    pub fn emit_all(&self, model: &CompileResult) -> Result<Vec<Artifact>, CodegenError> {
        self.config.validate()?;
        for schema in model.iter() {
            for property in schema.properties() {
                if let Some(name) = property.ty.referenced_name()
                    && model.get(name).is_none()
                {
                    return Err(CodegenError::UnknownType {
                        type_name: name.to_string(),
                        field: format!("{}.{}", schema.name(), property.field_name),
                    });
                }
            }
        }
        model.iter().map(|schema| self.emit_validated(schema)).collect()
    }
}
