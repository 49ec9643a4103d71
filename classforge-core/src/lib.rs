//! # classforge Core
//!
//! JVM class-file codec used by the classforge code generator.
//!
//! This crate provides:
//! - Big-endian byte buffers for writing and reading class files
//! - A deduplicating constant pool with modified UTF-8 support
//! - Field and method descriptors
//! - A bytecode builder with labels, stack tracking and stack map frames
//! - Runtime-visible annotations
//! - Class assembly and a class-file reader for inspection

pub mod attribute;
pub mod buffer;
pub mod class;
pub mod code;
pub mod constant_pool;
pub mod descriptor;
pub mod error;
pub mod frame;
pub mod opcodes;
pub mod reader;

pub use attribute::Annotation;
pub use buffer::{ByteReader, ByteWriter};
pub use class::{ClassBuilder, access};
pub use code::{Code, CodeBuilder, Label};
pub use constant_pool::{Constant, ConstantPool, ReferenceKind};
pub use descriptor::{FieldType, MethodDescriptor};
pub use error::{Error, Result};
pub use frame::{Frame, VerificationType};
pub use reader::ClassFile;
