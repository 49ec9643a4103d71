//! Field and method descriptors.

use crate::frame::VerificationType;
use std::fmt;

/// `java/lang/Object`
pub const OBJECT: &str = "java/lang/Object";
/// `java/lang/String`
pub const STRING: &str = "java/lang/String";

/// JVM field type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// `boolean` (`Z`).
    Boolean,
    /// `int` (`I`).
    Int,
    /// `double` (`D`).
    Double,
    /// Class or interface, by internal name (`java/lang/String`).
    Object(String),
    /// Array of the component type.
    Array(Box<FieldType>),
}

impl FieldType {
    /// Creates a class type from an internal name.
    #[must_use]
    pub fn object(internal_name: impl Into<String>) -> Self {
        Self::Object(internal_name.into())
    }

    /// Creates an array type with the given component.
    #[must_use]
    pub fn array_of(component: FieldType) -> Self {
        Self::Array(Box::new(component))
    }

    /// Returns the descriptor string (`I`, `Ljava/lang/String;`, `[D`...).
    #[must_use]
    pub fn descriptor(&self) -> String {
        let mut out = String::new();
        self.write_descriptor(&mut out);
        out
    }

    fn write_descriptor(&self, out: &mut String) {
        match self {
            Self::Boolean => out.push('Z'),
            Self::Int => out.push('I'),
            Self::Double => out.push('D'),
            Self::Object(name) => {
                out.push('L');
                out.push_str(name);
                out.push(';');
            }
            Self::Array(component) => {
                out.push('[');
                component.write_descriptor(out);
            }
        }
    }

    /// Name usable in a `CONSTANT_Class` entry: the internal name for
    /// classes, the descriptor for arrays.
    #[must_use]
    pub fn class_name(&self) -> String {
        match self {
            Self::Object(name) => name.clone(),
            _ => self.descriptor(),
        }
    }

    /// Number of local variable / operand stack slots a value occupies.
    #[must_use]
    pub const fn slot_size(&self) -> u16 {
        match self {
            Self::Double => 2,
            _ => 1,
        }
    }

    /// Returns true for array types.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Returns the component type of an array.
    #[must_use]
    pub fn component(&self) -> Option<&FieldType> {
        match self {
            Self::Array(component) => Some(component),
            _ => None,
        }
    }

    /// Simple, human-readable name: `int`, `String`, `Person[]`.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            Self::Boolean => "boolean".to_string(),
            Self::Int => "int".to_string(),
            Self::Double => "double".to_string(),
            Self::Object(name) => simple_name(name).to_string(),
            Self::Array(component) => format!("{}[]", component.display_name()),
        }
    }

    /// Verification type of a value of this type.
    #[must_use]
    pub fn verification_type(&self) -> VerificationType {
        match self {
            Self::Boolean | Self::Int => VerificationType::Integer,
            Self::Double => VerificationType::Double,
            _ => VerificationType::Object(self.class_name()),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.descriptor())
    }
}

/// Returns the part of an internal or binary name after the last package separator.
#[must_use]
pub fn simple_name(name: &str) -> &str {
    name.rsplit(|c: char| c == '/' || c == '.')
        .next()
        .unwrap_or(name)
}

/// JVM method descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    /// Parameter types in order.
    pub parameters: Vec<FieldType>,
    /// Return type; `None` for `void`.
    pub return_type: Option<FieldType>,
}

impl MethodDescriptor {
    /// Creates a descriptor.
    #[must_use]
    pub fn new(parameters: Vec<FieldType>, return_type: Option<FieldType>) -> Self {
        Self {
            parameters,
            return_type,
        }
    }

    /// `()V`
    #[must_use]
    pub fn void() -> Self {
        Self::new(Vec::new(), None)
    }

    /// Descriptor with no parameters returning `return_type`.
    #[must_use]
    pub fn returning(return_type: FieldType) -> Self {
        Self::new(Vec::new(), Some(return_type))
    }

    /// Returns the descriptor string.
    #[must_use]
    pub fn descriptor(&self) -> String {
        let mut out = String::from("(");
        for parameter in &self.parameters {
            parameter.write_descriptor(&mut out);
        }
        out.push(')');
        match &self.return_type {
            Some(ty) => ty.write_descriptor(&mut out),
            None => out.push('V'),
        }
        out
    }

    /// Total slots taken by the parameters (excluding `this`).
    #[must_use]
    pub fn parameter_slots(&self) -> u16 {
        self.parameters.iter().map(FieldType::slot_size).sum()
    }

    /// Slots pushed by the return value.
    #[must_use]
    pub fn return_slots(&self) -> u16 {
        self.return_type.as_ref().map_or(0, FieldType::slot_size)
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.descriptor())
    }
}
