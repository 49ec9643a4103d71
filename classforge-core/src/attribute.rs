//! Runtime-visible annotations.

use crate::buffer::ByteWriter;
use crate::constant_pool::ConstantPool;
use crate::error::{Result, u16_count};

/// Attribute name for annotations on classes, fields and methods.
pub const RUNTIME_VISIBLE_ANNOTATIONS: &str = "RuntimeVisibleAnnotations";
/// Attribute name for annotations on method parameters.
pub const RUNTIME_VISIBLE_PARAMETER_ANNOTATIONS: &str = "RuntimeVisibleParameterAnnotations";

/// An annotation whose elements are all string constants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Annotation {
    /// Field descriptor of the annotation interface (`Lcom/example/Key;`).
    pub type_descriptor: String,
    /// Element name / string value pairs.
    pub elements: Vec<(String, String)>,
}

impl Annotation {
    /// Creates an annotation without elements.
    #[must_use]
    pub fn new(type_descriptor: impl Into<String>) -> Self {
        Self {
            type_descriptor: type_descriptor.into(),
            elements: Vec::new(),
        }
    }

    /// Adds a string element.
    #[must_use]
    pub fn with_string(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.elements.push((name.into(), value.into()));
        self
    }

    /// Returns the value of a string element.
    #[must_use]
    pub fn string(&self, name: &str) -> Option<&str> {
        self.elements
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn encode(&self, pool: &mut ConstantPool, out: &mut ByteWriter) -> Result<()> {
        out.write_u16(pool.utf8(&self.type_descriptor)?);
        out.write_u16(u16_count(self.elements.len(), "annotation elements")?);
        for (name, value) in &self.elements {
            out.write_u16(pool.utf8(name)?);
            out.write_u8(b's');
            out.write_u16(pool.utf8(value)?);
        }
        Ok(())
    }
}

/// Encodes the body of a `RuntimeVisibleAnnotations` attribute.
pub(crate) fn encode_annotations(
    annotations: &[Annotation],
    pool: &mut ConstantPool,
    out: &mut ByteWriter,
) -> Result<()> {
    out.write_u16(u16_count(annotations.len(), "annotations")?);
    for annotation in annotations {
        annotation.encode(pool, out)?;
    }
    Ok(())
}

/// Encodes the body of a `RuntimeVisibleParameterAnnotations` attribute.
pub(crate) fn encode_parameter_annotations(
    parameters: &[Vec<Annotation>],
    pool: &mut ConstantPool,
    out: &mut ByteWriter,
) -> Result<()> {
    let count = u8::try_from(parameters.len()).map_err(|_| crate::error::Error::TooMany {
        kind: "annotated parameters",
        count: parameters.len(),
    })?;
    out.write_u8(count);
    for annotations in parameters {
        encode_annotations(annotations, pool, out)?;
    }
    Ok(())
}
