//! Class-file assembly.
//!
//! [`ClassBuilder`] owns the constant pool and accumulates the field and
//! method tables. Members are encoded as they are added, so everything
//! they reference is already in the pool when [`ClassBuilder::build`]
//! writes the header.
//!
//! # Example
//! ```
//! use classforge_core::class::{ClassBuilder, access};
//! use classforge_core::descriptor::{FieldType, MethodDescriptor};
//!
//! let mut class = ClassBuilder::new("Empty", "java/lang/Object", access::PUBLIC | access::SUPER).unwrap();
//! class
//!     .method(access::PUBLIC, "<init>", &MethodDescriptor::void(), &[], |code| {
//!         code.aload(0)
//!             .invokespecial("java/lang/Object", "<init>", &MethodDescriptor::void())
//!             .return_void();
//!         Ok(())
//!     })
//!     .unwrap();
//! let bytes = class.build().unwrap();
//! assert_eq!(&bytes[..4], &[0xCA, 0xFE, 0xBA, 0xBE]);
//! ```

use crate::attribute::{
    Annotation, RUNTIME_VISIBLE_ANNOTATIONS, RUNTIME_VISIBLE_PARAMETER_ANNOTATIONS,
    encode_annotations, encode_parameter_annotations,
};
use crate::buffer::ByteWriter;
use crate::code::{Code, CodeBuilder};
use crate::constant_pool::ConstantPool;
use crate::descriptor::{FieldType, MethodDescriptor};
use crate::error::{Error, Result, u16_count};
use crate::frame::encode_stack_map_table;

/// Class-file magic number.
pub const MAGIC: u32 = 0xCAFE_BABE;
/// Major version written by default (Java 17).
pub const JAVA_17: u16 = 61;

/// Access flags.
pub mod access {
    /// `ACC_PUBLIC`
    pub const PUBLIC: u16 = 0x0001;
    /// `ACC_PRIVATE`
    pub const PRIVATE: u16 = 0x0002;
    /// `ACC_FINAL`
    pub const FINAL: u16 = 0x0010;
    /// `ACC_SUPER` (classes only).
    pub const SUPER: u16 = 0x0020;
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct BootstrapMethod {
    handle: u16,
    arguments: Vec<u16>,
}

/// Builder for a single class file.
#[derive(Debug)]
pub struct ClassBuilder {
    pool: ConstantPool,
    major_version: u16,
    minor_version: u16,
    access_flags: u16,
    this_name: String,
    this_class: u16,
    super_class: u16,
    fields: ByteWriter,
    field_count: usize,
    methods: ByteWriter,
    method_count: usize,
    bootstrap_methods: Vec<BootstrapMethod>,
}

impl ClassBuilder {
    /// Creates a builder for `this_name` extending `super_name`.
    ///
    /// # Arguments
    /// * `this_name` - Internal name of the class (`com/example/Person`)
    /// * `super_name` - Internal name of the superclass
    /// * `access_flags` - Class access flags
    ///
    /// # Errors
    /// Returns an error if either name does not fit in the constant pool.
    pub fn new(this_name: &str, super_name: &str, access_flags: u16) -> Result<Self> {
        let mut pool = ConstantPool::new();
        let this_class = pool.class(this_name)?;
        let super_class = pool.class(super_name)?;
        Ok(Self {
            pool,
            major_version: JAVA_17,
            minor_version: 0,
            access_flags,
            this_name: this_name.to_string(),
            this_class,
            super_class,
            fields: ByteWriter::new(),
            field_count: 0,
            methods: ByteWriter::new(),
            method_count: 0,
            bootstrap_methods: Vec::new(),
        })
    }

    /// Overrides the class-file version.
    #[must_use]
    pub fn with_version(mut self, major: u16, minor: u16) -> Self {
        self.major_version = major;
        self.minor_version = minor;
        self
    }

    /// Internal name of the class being built.
    #[must_use]
    pub fn this_name(&self) -> &str {
        &self.this_name
    }

    /// Mutable access to the constant pool.
    pub fn pool_mut(&mut self) -> &mut ConstantPool {
        &mut self.pool
    }

    /// Adds a field.
    ///
    /// A `RuntimeVisibleAnnotations` attribute is written when
    /// `annotations` is not empty.
    ///
    /// # Errors
    /// Returns an error if the pool overflows.
    pub fn field(
        &mut self,
        access_flags: u16,
        name: &str,
        ty: &FieldType,
        annotations: &[Annotation],
    ) -> Result<()> {
        let name_index = self.pool.utf8(name)?;
        let descriptor_index = self.pool.utf8(&ty.descriptor())?;

        let out = &mut self.fields;
        out.write_u16(access_flags);
        out.write_u16(name_index);
        out.write_u16(descriptor_index);
        if annotations.is_empty() {
            out.write_u16(0);
        } else {
            let attribute = self.pool.utf8(RUNTIME_VISIBLE_ANNOTATIONS)?;
            out.write_u16(1);
            let pool = &mut self.pool;
            out.write_attribute(attribute, |out| encode_annotations(annotations, pool, out))?;
        }
        self.field_count += 1;
        Ok(())
    }

    /// Adds an instance method whose body is produced by `body`.
    ///
    /// `parameter_annotations` is either empty or holds one list per
    /// declared parameter; in the latter case a
    /// `RuntimeVisibleParameterAnnotations` attribute is written.
    ///
    /// # Errors
    /// Returns an error from `body`, from [`CodeBuilder::finish`], or if
    /// the pool overflows.
    pub fn method<F>(
        &mut self,
        access_flags: u16,
        name: &str,
        descriptor: &MethodDescriptor,
        parameter_annotations: &[Vec<Annotation>],
        body: F,
    ) -> Result<()>
    where
        F: FnOnce(&mut CodeBuilder<'_>) -> Result<()>,
    {
        if !parameter_annotations.is_empty()
            && parameter_annotations.len() != descriptor.parameters.len()
        {
            return Err(Error::malformed(format!(
                "method {name}: {} parameter annotation lists for {} parameters",
                parameter_annotations.len(),
                descriptor.parameters.len()
            )));
        }

        let name_index = self.pool.utf8(name)?;
        let descriptor_index = self.pool.utf8(&descriptor.descriptor())?;

        let mut builder = CodeBuilder::new(&mut self.pool, 1 + descriptor.parameter_slots());
        body(&mut builder)?;
        let code = builder.finish()?;

        let annotated = parameter_annotations.iter().any(|a| !a.is_empty());
        let out = &mut self.methods;
        out.write_u16(access_flags);
        out.write_u16(name_index);
        out.write_u16(descriptor_index);
        out.write_u16(if annotated { 2 } else { 1 });
        write_code(&code, &mut self.pool, out)?;
        if annotated {
            let attribute = self.pool.utf8(RUNTIME_VISIBLE_PARAMETER_ANNOTATIONS)?;
            let pool = &mut self.pool;
            out.write_attribute(attribute, |out| {
                encode_parameter_annotations(parameter_annotations, pool, out)
            })?;
        }
        self.method_count += 1;
        Ok(())
    }

    /// Registers a bootstrap method and returns its index in the
    /// `BootstrapMethods` attribute. Identical entries are shared.
    ///
    /// # Arguments
    /// * `handle` - Pool index of a `CONSTANT_MethodHandle`
    /// * `arguments` - Pool indices of the static arguments
    ///
    /// # Errors
    /// Returns [`Error::TooMany`] past 65535 entries.
    pub fn bootstrap_method(&mut self, handle: u16, arguments: Vec<u16>) -> Result<u16> {
        let entry = BootstrapMethod { handle, arguments };
        if let Some(position) = self.bootstrap_methods.iter().position(|m| *m == entry) {
            return u16_count(position, "bootstrap methods");
        }
        self.bootstrap_methods.push(entry);
        u16_count(self.bootstrap_methods.len() - 1, "bootstrap methods")
    }

    /// Registers a bootstrap method and returns the pool index of a
    /// `CONSTANT_InvokeDynamic` call site using it.
    ///
    /// # Errors
    /// Returns an error if the pool or the bootstrap table overflows.
    pub fn invoke_dynamic(
        &mut self,
        handle: u16,
        arguments: Vec<u16>,
        name: &str,
        descriptor: &MethodDescriptor,
    ) -> Result<u16> {
        let bootstrap = self.bootstrap_method(handle, arguments)?;
        self.pool
            .invoke_dynamic(bootstrap, name, &descriptor.descriptor())
    }

    /// Writes the finished class file.
    ///
    /// # Errors
    /// Returns an error if a table exceeds its class-file limit.
    pub fn build(mut self) -> Result<Vec<u8>> {
        let bootstrap_attribute = if self.bootstrap_methods.is_empty() {
            None
        } else {
            Some(self.pool.utf8("BootstrapMethods")?)
        };

        let mut out = ByteWriter::with_capacity(
            256 + self.fields.len() + self.methods.len() + self.pool.len() * 8,
        );
        out.write_u32(MAGIC);
        out.write_u16(self.minor_version);
        out.write_u16(self.major_version);
        self.pool.encode(&mut out);
        out.write_u16(self.access_flags);
        out.write_u16(self.this_class);
        out.write_u16(self.super_class);
        out.write_u16(0);

        out.write_u16(u16_count(self.field_count, "fields")?);
        out.write_bytes(self.fields.as_slice());
        out.write_u16(u16_count(self.method_count, "methods")?);
        out.write_bytes(self.methods.as_slice());

        match bootstrap_attribute {
            None => out.write_u16(0),
            Some(name) => {
                out.write_u16(1);
                let methods = &self.bootstrap_methods;
                out.write_attribute(name, |out| {
                    out.write_u16(u16_count(methods.len(), "bootstrap methods")?);
                    for method in methods {
                        out.write_u16(method.handle);
                        out.write_u16(u16_count(method.arguments.len(), "bootstrap arguments")?);
                        for argument in &method.arguments {
                            out.write_u16(*argument);
                        }
                    }
                    Ok(())
                })?;
            }
        }
        Ok(out.into_inner())
    }
}

fn write_code(code: &Code, pool: &mut ConstantPool, out: &mut ByteWriter) -> Result<()> {
    let code_name = pool.utf8("Code")?;
    let stack_map_name = if code.frames.is_empty() {
        None
    } else {
        Some(pool.utf8("StackMapTable")?)
    };

    out.write_attribute(code_name, |out| {
        out.write_u16(code.max_stack);
        out.write_u16(code.max_locals);
        out.write_u32(code.bytes.len() as u32);
        out.write_bytes(&code.bytes);
        // exception table
        out.write_u16(0);
        match stack_map_name {
            None => out.write_u16(0),
            Some(name) => {
                out.write_u16(1);
                out.write_attribute(name, |out| encode_stack_map_table(&code.frames, pool, out))?;
            }
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{Frame, VerificationType};
    use crate::reader::ClassFile;

    fn empty_constructor(class: &mut ClassBuilder) {
        class
            .method(access::PUBLIC, "<init>", &MethodDescriptor::void(), &[], |code| {
                code.aload(0)
                    .invokespecial("java/lang/Object", "<init>", &MethodDescriptor::void())
                    .return_void();
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_header() {
        let mut class = ClassBuilder::new("a/B", "java/lang/Object", access::PUBLIC).unwrap();
        empty_constructor(&mut class);
        let bytes = class.build().unwrap();

        assert_eq!(&bytes[0..4], &[0xCA, 0xFE, 0xBA, 0xBE]);
        assert_eq!(&bytes[4..8], &[0, 0, 0, 61]);

        let parsed = ClassFile::parse(&bytes).unwrap();
        assert_eq!(parsed.this_class(), "a/B");
        assert_eq!(parsed.super_class(), Some("java/lang/Object"));
        assert_eq!(parsed.methods.len(), 1);
        assert!(parsed.fields.is_empty());
    }

    #[test]
    fn test_with_version() {
        let class = ClassBuilder::new("A", "java/lang/Object", access::PUBLIC)
            .unwrap()
            .with_version(52, 0);
        let bytes = class.build().unwrap();
        assert_eq!(&bytes[4..8], &[0, 0, 0, 52]);
    }

    #[test]
    fn test_field_with_annotation() {
        let mut class = ClassBuilder::new("A", "java/lang/Object", access::PUBLIC).unwrap();
        let annotation = Annotation::new("LKey;").with_string("value", "first-name");
        class
            .field(
                access::PRIVATE | access::FINAL,
                "firstName",
                &FieldType::object("java/lang/String"),
                &[annotation.clone()],
            )
            .unwrap();
        class
            .field(access::PRIVATE | access::FINAL, "age", &FieldType::Int, &[])
            .unwrap();
        let parsed = ClassFile::parse(&class.build().unwrap()).unwrap();

        assert_eq!(parsed.fields.len(), 2);
        let first = &parsed.fields[0];
        assert_eq!(first.name, "firstName");
        assert_eq!(first.descriptor, "Ljava/lang/String;");
        assert_eq!(first.access_flags, 0x0012);
        assert_eq!(parsed.annotations(first).unwrap(), vec![annotation]);
        assert!(parsed.fields[1].attributes.is_empty());
    }

    #[test]
    fn test_method_with_frames_writes_stack_map_table() {
        let mut class = ClassBuilder::new("A", "java/lang/Object", access::PUBLIC).unwrap();
        let descriptor = MethodDescriptor::new(vec![FieldType::object("java/lang/Object")], Some(FieldType::Boolean));
        class
            .method(access::PUBLIC, "isNull", &descriptor, &[], |code| {
                let locals = Frame::new(vec![
                    VerificationType::Object("A".into()),
                    VerificationType::Object("java/lang/Object".into()),
                ]);
                let yes = code.new_label();
                code.aload(1).ifnull(yes).iconst(0).return_value(&FieldType::Boolean);
                code.bind(yes, locals).iconst(1).return_value(&FieldType::Boolean);
                Ok(())
            })
            .unwrap();
        let parsed = ClassFile::parse(&class.build().unwrap()).unwrap();

        let method = parsed.method("isNull", "(Ljava/lang/Object;)Z").unwrap();
        let code = parsed.code(method).unwrap().unwrap();
        assert_eq!(code.max_locals, 2);
        assert_eq!(code.max_stack, 1);
        assert!(code.attributes.iter().any(|a| a.name == "StackMapTable"));
    }

    #[test]
    fn test_parameter_annotation_count_mismatch() {
        let mut class = ClassBuilder::new("A", "java/lang/Object", access::PUBLIC).unwrap();
        let descriptor = MethodDescriptor::new(vec![FieldType::Int], None);
        let result = class.method(
            access::PUBLIC,
            "<init>",
            &descriptor,
            &[vec![], vec![]],
            |code| {
                code.return_void();
                Ok(())
            },
        );
        assert!(matches!(result, Err(Error::Malformed { .. })));
    }

    #[test]
    fn test_bootstrap_methods_are_shared() {
        let mut class = ClassBuilder::new("A", "java/lang/Object", access::PUBLIC).unwrap();
        let first = class.bootstrap_method(3, vec![1]).unwrap();
        let second = class.bootstrap_method(3, vec![1]).unwrap();
        let third = class.bootstrap_method(3, vec![2]).unwrap();
        assert_eq!(first, 0);
        assert_eq!(second, 0);
        assert_eq!(third, 1);
    }

    #[test]
    fn test_build_is_deterministic() {
        let build = || {
            let mut class = ClassBuilder::new("A", "java/lang/Object", access::PUBLIC).unwrap();
            class.field(access::PRIVATE, "x", &FieldType::Double, &[]).unwrap();
            empty_constructor(&mut class);
            class.build().unwrap()
        };
        assert_eq!(build(), build());
    }
}
