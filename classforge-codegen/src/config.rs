//! Emitter configuration.

use crate::error::CodegenError;
use classforge_core::Annotation;

/// Default annotation carrying the original schema key.
pub const JSON_PROPERTY: &str = "Lcom/fasterxml/jackson/annotation/JsonProperty;";

/// Annotation element holding the key.
pub const ANNOTATION_ELEMENT: &str = "value";

/// Configuration for class emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitterConfig {
    /// Dotted package prepended to every generated type (`com.example`).
    pub package_name: Option<String>,
    /// Tag fields and constructor parameters with their original key.
    pub original_keys: bool,
    /// Descriptor of the original-key annotation.
    pub annotation: String,
    /// Map integer, number and boolean to `int`, `double` and `boolean`
    /// instead of their boxed classes.
    pub primitive_values: bool,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            package_name: None,
            original_keys: true,
            annotation: JSON_PROPERTY.to_string(),
            primitive_values: false,
        }
    }
}

impl EmitterConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the package prefix.
    #[must_use]
    pub fn with_package_name(mut self, package: impl Into<String>) -> Self {
        self.package_name = Some(package.into());
        self
    }

    /// Enables or disables original-key annotations.
    #[must_use]
    pub fn with_original_keys(mut self, enabled: bool) -> Self {
        self.original_keys = enabled;
        self
    }

    /// Sets the original-key annotation descriptor.
    #[must_use]
    pub fn with_annotation(mut self, descriptor: impl Into<String>) -> Self {
        self.annotation = descriptor.into();
        self
    }

    /// Enables or disables primitive scalar fields.
    #[must_use]
    pub fn with_primitive_values(mut self, enabled: bool) -> Self {
        self.primitive_values = enabled;
        self
    }

    /// Checks the package name and annotation descriptor.
    ///
    /// # Errors
    /// Returns [`CodegenError::InvalidPackage`] or
    /// [`CodegenError::InvalidAnnotation`].
    pub fn validate(&self) -> Result<(), CodegenError> {
        if let Some(package) = &self.package_name
            && !is_valid_package(package)
        {
            return Err(CodegenError::InvalidPackage {
                package: package.clone(),
            });
        }
        if !is_valid_class_descriptor(&self.annotation) {
            return Err(CodegenError::InvalidAnnotation {
                descriptor: self.annotation.clone(),
            });
        }
        Ok(())
    }

    /// Internal name for a type (`com/example/Person`).
    #[must_use]
    pub fn internal_name(&self, type_name: &str) -> String {
        match &self.package_name {
            Some(package) if !package.is_empty() => {
                format!("{}/{type_name}", package.replace('.', "/"))
            }
            _ => type_name.to_string(),
        }
    }

    /// Binary name for a type (`com.example.Person`).
    #[must_use]
    pub fn binary_name(&self, type_name: &str) -> String {
        match &self.package_name {
            Some(package) if !package.is_empty() => format!("{package}.{type_name}"),
            _ => type_name.to_string(),
        }
    }

    /// Original-key annotation for `key`, if enabled.
    #[must_use]
    pub fn original_key(&self, key: &str) -> Option<Annotation> {
        self.original_keys
            .then(|| Annotation::new(self.annotation.as_str()).with_string(ANNOTATION_ELEMENT, key))
    }
}

/// An empty package is the default package.
fn is_valid_package(package: &str) -> bool {
    package.is_empty()
        || package
            .split('.')
            .all(|segment| !segment.is_empty() && !segment.contains(['/', ';', '[', '<', '>']))
}

fn is_valid_class_descriptor(descriptor: &str) -> bool {
    descriptor
        .strip_prefix('L')
        .and_then(|rest| rest.strip_suffix(';'))
        .is_some_and(|name| {
            !name.is_empty()
                && name
                    .split('/')
                    .all(|segment| !segment.is_empty() && !segment.contains(['.', ';', '[', '<', '>']))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EmitterConfig::default();
        assert!(config.original_keys);
        assert!(!config.primitive_values);
        assert_eq!(config.annotation, JSON_PROPERTY);
        assert!(config.package_name.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_names_with_package() {
        let config = EmitterConfig::new().with_package_name("com.example");
        assert_eq!(config.internal_name("Person"), "com/example/Person");
        assert_eq!(config.binary_name("Person"), "com.example.Person");

        let config = EmitterConfig::new();
        assert_eq!(config.internal_name("Person"), "Person");
        assert_eq!(config.binary_name("Person"), "Person");
    }

    #[test]
    fn test_invalid_package() {
        for package in ["com..example", ".com", "com/example", "com.ex;ample"] {
            let config = EmitterConfig::new().with_package_name(package);
            assert!(
                matches!(config.validate(), Err(CodegenError::InvalidPackage { .. })),
                "{package}"
            );
        }
        assert!(EmitterConfig::new().with_package_name("").validate().is_ok());
    }

    #[test]
    fn test_invalid_annotation() {
        for descriptor in ["JsonProperty", "Lcom/x/Key", "L;", "Lcom.x.Key;", "Lcom//Key;"] {
            let config = EmitterConfig::new().with_annotation(descriptor);
            assert!(
                matches!(config.validate(), Err(CodegenError::InvalidAnnotation { .. })),
                "{descriptor}"
            );
        }
        assert!(EmitterConfig::new().with_annotation("Lcom/x/Key;").validate().is_ok());
    }

    #[test]
    fn test_original_key_annotation() {
        let config = EmitterConfig::new();
        let annotation = config.original_key("first-name").unwrap();
        assert_eq!(annotation.type_descriptor, JSON_PROPERTY);
        assert_eq!(annotation.string("value"), Some("first-name"));

        assert!(config.with_original_keys(false).original_key("x").is_none());
    }
}
