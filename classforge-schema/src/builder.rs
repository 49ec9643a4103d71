//! Schema model builder.
//!
//! Walks a resolved schema document once and produces the root schema plus
//! every nested object type it discovers. All state lives in a
//! [`ModelBuilder`] created per call, so builds never share a registry.

use crate::document::Node;
use crate::error::SchemaError;
use crate::ir::{CompileResult, Property, Schema, TypeDescriptor};
use crate::mapper::map_scalar;
use crate::naming::{to_field_name, to_type_name};
use crate::registry::{Registration, Registry};
use std::collections::HashSet;

/// Type name used when the root has no `title`.
pub const UNKNOWN_CLASS_NAME: &str = "UnknownClassName";

/// Builds the type model for a resolved schema document.
///
/// # Errors
/// Returns a [`SchemaError`] for duplicate keys or field names, `null`
/// property definitions, conflicting or circular nested types, and
/// documents whose structure is not a schema object.
///
/// # Example
/// ```
/// use classforge_schema::{build_model, parse_document};
///
/// let doc = parse_document(r#"{"title": "Person", "properties": {"age": {"type": "integer"}}}"#).unwrap();
/// let model = build_model(&doc).unwrap();
/// assert_eq!(model.root().name(), "Person");
/// ```
pub fn build_model(document: &Node) -> Result<CompileResult, SchemaError> {
    if document.as_object().is_none() {
        return Err(SchemaError::invalid_document(format!(
            "root must be an object, found {}",
            document.kind()
        )));
    }

    let title = title(document)?.unwrap_or(UNKNOWN_CLASS_NAME);
    let root_name = type_name(title)?;
    tracing::debug!(root = %root_name, "building schema model");

    let mut builder = ModelBuilder {
        root_name: root_name.clone(),
        registry: Registry::new(),
    };
    builder.build_schema(&root_name, document)?;

    let mut schemas = builder.registry.into_schemas().into_iter();
    let root = schemas
        .next()
        .ok_or_else(|| SchemaError::invalid_document("root schema was not registered"))?;
    let result = CompileResult::new(root, schemas.collect());
    tracing::debug!(
        root = %result.root().name(),
        nested = result.nested().len(),
        "schema model built"
    );
    Ok(result)
}

struct ModelBuilder {
    root_name: String,
    registry: Registry,
}

impl ModelBuilder {
    fn build_schema(&mut self, name: &str, definition: &Node) -> Result<Registration, SchemaError> {
        self.registry.enter(name)?;
        let properties = self.build_properties(name, definition)?;
        let registration = self.registry.complete(Schema::new(name, properties))?;
        match registration {
            Registration::Added => tracing::debug!(name, "registered type"),
            Registration::Deduplicated => tracing::debug!(name, "reused existing type"),
        }
        Ok(registration)
    }

    fn build_properties(&mut self, owner: &str, definition: &Node) -> Result<Vec<Property>, SchemaError> {
        let entries = match definition.get("properties") {
            None | Some(Node::Null) => return Ok(Vec::new()),
            Some(Node::Object(entries)) => entries,
            Some(other) => {
                return Err(SchemaError::invalid_document(format!(
                    "'properties' of '{owner}' must be an object, found {}",
                    other.kind()
                )));
            }
        };

        let mut field_names = HashSet::with_capacity(entries.len());
        let mut properties = Vec::with_capacity(entries.len());
        for (key, property) in entries {
            if properties.iter().any(|p: &Property| p.key == *key) {
                return Err(SchemaError::duplicate(owner, key.as_str()));
            }
            let field_name = to_field_name(key);
            if field_name.is_empty() {
                return Err(SchemaError::InvalidIdentifier {
                    identifier: key.clone(),
                });
            }
            if !field_names.insert(field_name.clone()) {
                return Err(SchemaError::duplicate(owner, key.as_str()));
            }

            let ty = self.resolve_property(owner, key, property)?;
            properties.push(Property::new(key.as_str(), field_name, ty));
        }
        Ok(properties)
    }

    fn resolve_property(&mut self, owner: &str, key: &str, definition: &Node) -> Result<TypeDescriptor, SchemaError> {
        match definition {
            Node::Null => Err(SchemaError::missing(owner, key)),
            Node::Bool(_) => Ok(TypeDescriptor::Generic),
            Node::Object(_) => {
                let fallback = format!("{}_{key}", self.root_name);
                self.resolve(owner, fallback, definition)
            }
            other => Err(SchemaError::invalid_document(format!(
                "definition of '{key}' in '{owner}' must be an object, found {}",
                other.kind()
            ))),
        }
    }

    /// Resolves an object or boolean definition. `fallback` names an
    /// untitled object.
    fn resolve(&mut self, owner: &str, fallback: String, definition: &Node) -> Result<TypeDescriptor, SchemaError> {
        let Node::Object(_) = definition else {
            return Ok(TypeDescriptor::Generic);
        };

        let ty = match definition.get("type") {
            Some(Node::String(kind)) => match kind.as_str() {
                "object" => {
                    let name = match title(definition)? {
                        Some(title) => type_name(title)?,
                        None => type_name(&fallback)?,
                    };
                    self.build_schema(&name, definition)?;
                    TypeDescriptor::Reference(name)
                }
                "array" => TypeDescriptor::array_of(self.resolve_items(owner, definition)?),
                scalar => map_scalar(scalar, definition.get("format").and_then(Node::as_str)),
            },
            _ => TypeDescriptor::Generic,
        };
        if ty == TypeDescriptor::Generic {
            tracing::debug!(owner, "no specific type for definition, using generic fallback");
        }
        Ok(ty)
    }

    fn resolve_items(&mut self, owner: &str, definition: &Node) -> Result<TypeDescriptor, SchemaError> {
        match definition.get("items") {
            Some(items @ Node::Object(_)) => self.resolve(owner, format!("{owner}_item"), items),
            _ => Ok(TypeDescriptor::Generic),
        }
    }
}

fn title(definition: &Node) -> Result<Option<&str>, SchemaError> {
    match definition.get("title") {
        None | Some(Node::Null) => Ok(None),
        Some(Node::String(title)) => Ok(Some(title.as_str())),
        Some(other) => Err(SchemaError::invalid_document(format!(
            "'title' must be a string, found {}",
            other.kind()
        ))),
    }
}

fn type_name(identifier: &str) -> Result<String, SchemaError> {
    let name = to_type_name(identifier);
    if name.is_empty() {
        return Err(SchemaError::InvalidIdentifier {
            identifier: identifier.to_string(),
        });
    }
    Ok(name)
}
