//! # classforge Schema
//!
//! JSON Schema reader and type model builder.
//!
//! This crate provides:
//! - A JSON document reader that keeps object keys in order, duplicates included
//! - Identifier normalization for field and type names
//! - Scalar and string-format type mapping
//! - The intermediate representation consumed by the code generator
//! - A per-build registry of nested types with deduplication and cycle detection

pub mod builder;
pub mod document;
pub mod error;
pub mod ir;
pub mod mapper;
pub mod naming;
pub mod registry;

pub use builder::{UNKNOWN_CLASS_NAME, build_model};
pub use document::{Node, parse_document, read_document};
pub use error::{ParseError, SchemaError};
pub use ir::{CompileResult, PrimitiveKind, Property, Schema, TypeDescriptor, WellKnownKind};
pub use naming::{to_field_name, to_type_name};
pub use registry::Registry;
