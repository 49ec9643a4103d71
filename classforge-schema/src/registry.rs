//! Per-build schema registry.
//!
//! Slots are reserved when a type is entered, so the final order is the
//! order in which types were first discovered (root first). A name that is
//! entered again while still being built is a cycle.

use crate::error::SchemaError;
use crate::ir::Schema;
use std::collections::HashMap;

/// Outcome of [`Registry::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// First schema under this name.
    Added,
    /// Same shape was already registered.
    Deduplicated,
}

/// Name-keyed schema store scoped to one model build.
#[derive(Debug, Default)]
pub struct Registry {
    slots: Vec<Option<Schema>>,
    index: HashMap<String, usize>,
    in_progress: Vec<String>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of names seen so far, complete or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if nothing has been entered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns true if `name` has been entered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns the completed schema registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.index
            .get(name)
            .and_then(|&slot| self.slots[slot].as_ref())
    }

    /// Marks `name` as being built, reserving its slot on first sight.
    ///
    /// # Errors
    /// Returns [`SchemaError::CircularReference`] if `name` is already being built.
    pub fn enter(&mut self, name: &str) -> Result<(), SchemaError> {
        if self.in_progress.iter().any(|n| n == name) {
            let mut path = self.in_progress.join(" -> ");
            path.push_str(" -> ");
            path.push_str(name);
            return Err(SchemaError::CircularReference { path });
        }
        if !self.index.contains_key(name) {
            self.index.insert(name.to_string(), self.slots.len());
            self.slots.push(None);
        }
        self.in_progress.push(name.to_string());
        Ok(())
    }

    /// Stores a finished schema entered with [`Registry::enter`].
    ///
    /// # Errors
    /// Returns [`SchemaError::ConflictingDefinition`] if a different schema
    /// is already registered under the same name, or
    /// [`SchemaError::InvalidDocument`] if the name was never entered.
    pub fn complete(&mut self, schema: Schema) -> Result<Registration, SchemaError> {
        let (position, slot) = self
            .in_progress
            .iter()
            .rposition(|n| n == schema.name())
            .zip(self.index.get(schema.name()).copied())
            .ok_or_else(|| {
                SchemaError::invalid_document(format!("type '{}' was not entered", schema.name()))
            })?;
        self.in_progress.remove(position);

        match &self.slots[slot] {
            None => {
                self.slots[slot] = Some(schema);
                Ok(Registration::Added)
            }
            Some(existing) if *existing == schema => Ok(Registration::Deduplicated),
            Some(_) => Err(SchemaError::ConflictingDefinition {
                name: schema.name().to_string(),
            }),
        }
    }

    /// Consumes the registry, returning completed schemas in discovery order.
    #[must_use]
    pub fn into_schemas(self) -> Vec<Schema> {
        self.slots.into_iter().flatten().collect()
    }
}
