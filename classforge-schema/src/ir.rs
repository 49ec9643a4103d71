//! Intermediate representation for code generation.
//!
//! A [`CompileResult`] holds the root [`Schema`] followed by every nested
//! schema discovered while building it. Nested types are linked by name
//! through [`TypeDescriptor::Reference`], never embedded.

use std::fmt;

/// Scalar value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// `integer`
    Integer,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
    /// `string` without a recognized format.
    String,
}

/// Value types selected by a string `format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnownKind {
    /// `date-time`
    OffsetDateTime,
    /// `time`
    OffsetTime,
    /// `date`
    LocalDate,
    /// `duration`
    Duration,
    /// `ipv4`
    Ipv4Address,
    /// `ipv6`
    Ipv6Address,
    /// `uuid`
    Uuid,
    /// `uri`, `uri-reference`, `iri`, `iri-reference`
    Uri,
}

/// Target type of a property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    /// Scalar value.
    Primitive(PrimitiveKind),
    /// Formatted string value.
    WellKnown(WellKnownKind),
    /// Nested schema, by type name.
    Reference(String),
    /// Array of the element type.
    Array(Box<TypeDescriptor>),
    /// Anything the mapper does not model.
    Generic,
}

impl TypeDescriptor {
    /// Creates an array descriptor.
    #[must_use]
    pub fn array_of(element: TypeDescriptor) -> Self {
        Self::Array(Box::new(element))
    }

    /// Returns true for arrays.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Returns the schema name this type refers to, looking through arrays.
    #[must_use]
    pub fn referenced_name(&self) -> Option<&str> {
        match self {
            Self::Reference(name) => Some(name),
            Self::Array(element) => element.referenced_name(),
            _ => None,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => write!(f, "{kind:?}"),
            Self::WellKnown(kind) => write!(f, "{kind:?}"),
            Self::Reference(name) => f.write_str(name),
            Self::Array(element) => write!(f, "{element}[]"),
            Self::Generic => f.write_str("Object"),
        }
    }
}

/// One typed field of a schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Property {
    /// Key as written in the schema document.
    pub key: String,
    /// Normalized field name.
    pub field_name: String,
    /// Target type.
    pub ty: TypeDescriptor,
}

impl Property {
    /// Creates a property.
    #[must_use]
    pub fn new(key: impl Into<String>, field_name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            key: key.into(),
            field_name: field_name.into(),
            ty,
        }
    }
}

/// A record type and its properties, sorted by key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Schema {
    name: String,
    properties: Vec<Property>,
}

impl Schema {
    /// Creates a schema, sorting `properties` by key.
    #[must_use]
    pub fn new(name: impl Into<String>, mut properties: Vec<Property>) -> Self {
        properties.sort_by(|a, b| a.key.cmp(&b.key));
        Self {
            name: name.into(),
            properties,
        }
    }

    /// Type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Properties in key order.
    #[must_use]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Looks up a property by its original key.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.key == key)
    }
}

/// Output of one model build: the root schema, then nested schemas in
/// discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileResult {
    root: Schema,
    nested: Vec<Schema>,
}

impl CompileResult {
    /// Creates a result.
    #[must_use]
    pub fn new(root: Schema, nested: Vec<Schema>) -> Self {
        Self { root, nested }
    }

    /// The root schema.
    #[must_use]
    pub fn root(&self) -> &Schema {
        &self.root
    }

    /// Nested schemas in discovery order.
    #[must_use]
    pub fn nested(&self) -> &[Schema] {
        &self.nested
    }

    /// Number of schemas, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.nested.len()
    }

    /// Always false; a result has at least the root schema.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterates over all schemas, root first.
    pub fn iter(&self) -> impl Iterator<Item = &Schema> {
        std::iter::once(&self.root).chain(self.nested.iter())
    }

    /// Finds a schema by type name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.iter().find(|s| s.name() == name)
    }

    /// Type names, root first.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.iter().map(Schema::name).collect()
    }
}

impl IntoIterator for CompileResult {
    type Item = Schema;
    type IntoIter = std::iter::Chain<std::iter::Once<Schema>, std::vec::IntoIter<Schema>>;

    fn into_iter(self) -> Self::IntoIter {
        std::iter::once(self.root).chain(self.nested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> Schema {
        Schema::new(
            "Person",
            vec![
                Property::new("lastName", "lastName", TypeDescriptor::Primitive(PrimitiveKind::String)),
                Property::new("age", "age", TypeDescriptor::Primitive(PrimitiveKind::Integer)),
                Property::new("firstName", "firstName", TypeDescriptor::Primitive(PrimitiveKind::String)),
            ],
        )
    }

    #[test]
    fn test_schema_sorts_properties_by_key() {
        let schema = person();
        let keys: Vec<&str> = schema.properties().iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["age", "firstName", "lastName"]);
        assert!(schema.property("age").is_some());
        assert!(schema.property("missing").is_none());
    }

    #[test]
    fn test_referenced_name_through_arrays() {
        let ty = TypeDescriptor::array_of(TypeDescriptor::array_of(TypeDescriptor::Reference("Item".into())));
        assert_eq!(ty.referenced_name(), Some("Item"));
        assert!(ty.is_array());
        assert_eq!(ty.to_string(), "Item[][]");
        assert_eq!(TypeDescriptor::Generic.referenced_name(), None);
    }

    #[test]
    fn test_compile_result_order() {
        let nested = Schema::new("Address", vec![]);
        let result = CompileResult::new(person(), vec![nested]);
        assert_eq!(result.len(), 2);
        assert!(!result.is_empty());
        assert_eq!(result.names(), vec!["Person", "Address"]);
        assert_eq!(result.get("Address").map(Schema::name), Some("Address"));

        let owned: Vec<String> = result.into_iter().map(|s| s.name().to_string()).collect();
        assert_eq!(owned, vec!["Person", "Address"]);
    }
}
