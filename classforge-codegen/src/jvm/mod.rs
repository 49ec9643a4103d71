//! JVM class generation.
//!
//! Each submodule emits one part of a record class into a shared
//! [`ClassContext`]: fields and accessors, the canonical constructor, and
//! the `equals`, `hashCode` and `toString` methods.

pub mod constructor;
pub mod equality;
pub mod fields;
pub mod hash;
pub mod string_form;
pub mod types;

use crate::config::EmitterConfig;
use crate::error::CodegenError;
use classforge_core::{ClassBuilder, FieldType, VerificationType, access};
use classforge_schema::Schema;

/// `java/lang/Record`
pub const RECORD: &str = "java/lang/Record";
/// `java/util/Objects`
pub const OBJECTS: &str = "java/util/Objects";
/// `java/util/Arrays`
pub const ARRAYS: &str = "java/util/Arrays";

/// A property lowered to a JVM field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoweredField {
    /// Original schema key.
    pub key: String,
    /// Field and accessor name.
    pub name: String,
    /// Field type.
    pub ty: FieldType,
}

/// State shared by the part generators while one class is assembled.
#[derive(Debug)]
pub struct ClassContext<'a> {
    /// Class under construction.
    pub class: ClassBuilder,
    /// Simple type name (`Person`).
    pub type_name: &'a str,
    /// Internal name (`com/example/Person`).
    pub this_name: String,
    /// Fields in declaration order.
    pub fields: Vec<LoweredField>,
    /// Emitter configuration.
    pub config: &'a EmitterConfig,
}

impl<'a> ClassContext<'a> {
    /// Starts a public final record class for `schema`.
    ///
    /// # Errors
    /// Returns an error if the class name cannot be encoded.
    pub fn new(schema: &'a Schema, config: &'a EmitterConfig) -> Result<Self, CodegenError> {
        let this_name = config.internal_name(schema.name());
        let class = ClassBuilder::new(
            &this_name,
            RECORD,
            access::PUBLIC | access::FINAL | access::SUPER,
        )?;
        let fields = schema
            .properties()
            .iter()
            .map(|p| LoweredField {
                key: p.key.clone(),
                name: p.field_name.clone(),
                ty: types::lower(&p.ty, config),
            })
            .collect();
        Ok(Self {
            class,
            type_name: schema.name(),
            this_name,
            fields,
            config,
        })
    }

    /// Verification type of `this`.
    #[must_use]
    pub fn this_type(&self) -> VerificationType {
        VerificationType::Object(self.this_name.clone())
    }

    /// Writes the class file.
    ///
    /// # Errors
    /// Returns an error if a class-file table overflows.
    pub fn finish(self) -> Result<Vec<u8>, CodegenError> {
        Ok(self.class.build()?)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use classforge_core::ClassFile;
    use classforge_core::reader::Member;
    use classforge_schema::{PrimitiveKind, Property, TypeDescriptor};

    pub fn person() -> Schema {
        Schema::new(
            "Person",
            vec![
                Property::new("age", "age", TypeDescriptor::Primitive(PrimitiveKind::Integer)),
                Property::new("first-name", "firstName", TypeDescriptor::Primitive(PrimitiveKind::String)),
                Property::new("lastName", "lastName", TypeDescriptor::Primitive(PrimitiveKind::String)),
            ],
        )
    }

    /// Runs one part generator on a fresh context and parses the result.
    pub fn generate_with(
        schema: &Schema,
        config: &EmitterConfig,
        part: fn(&mut ClassContext<'_>) -> Result<(), CodegenError>,
    ) -> ClassFile {
        let mut ctx = ClassContext::new(schema, config).unwrap();
        part(&mut ctx).unwrap();
        ClassFile::parse(&ctx.finish().unwrap()).unwrap()
    }

    pub fn code_of(class: &ClassFile, method: &Member) -> Vec<u8> {
        class.code(method).unwrap().unwrap().bytes
    }

    /// Collects the member references used by `invoke*`, `getfield` and
    /// `putfield` instructions, in order.
    pub fn references(class: &ClassFile, code: &[u8]) -> Vec<String> {
        use classforge_core::opcodes as op;
        let mut out = Vec::new();
        let mut i = 0;
        while i < code.len() {
            let opcode = code[i];
            let length = match opcode {
                op::BIPUSH | op::LDC | op::ILOAD | op::DLOAD | op::ALOAD => 2,
                op::SIPUSH | op::LDC_W | op::IFEQ | op::IFNE | op::IF_ICMPNE | op::IF_ACMPEQ
                | op::GOTO | op::IFNULL | op::IFNONNULL | op::CHECKCAST | op::INSTANCEOF => 3,
                op::GETFIELD | op::PUTFIELD | op::INVOKEVIRTUAL | op::INVOKESPECIAL
                | op::INVOKESTATIC => {
                    let index = u16::from_be_bytes([code[i + 1], code[i + 2]]);
                    let member = class.member_ref(index).unwrap();
                    out.push(format!("{}.{}:{}", member.owner, member.name, member.descriptor));
                    3
                }
                op::INVOKEDYNAMIC => {
                    let index = u16::from_be_bytes([code[i + 1], code[i + 2]]);
                    let (_, name, descriptor) = class.invoke_dynamic(index).unwrap();
                    out.push(format!("indy {name}:{descriptor}"));
                    5
                }
                _ => 1,
            };
            i += length;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::person;
    use super::*;

    #[test]
    fn test_context_lowers_fields() {
        let schema = person();
        let config = EmitterConfig::default().with_package_name("com.example");
        let ctx = ClassContext::new(&schema, &config).unwrap();

        assert_eq!(ctx.this_name, "com/example/Person");
        assert_eq!(ctx.type_name, "Person");
        assert_eq!(ctx.fields.len(), 3);
        assert_eq!(ctx.fields[0].ty, FieldType::object(types::INTEGER));
        assert_eq!(ctx.fields[1].key, "first-name");
        assert_eq!(ctx.fields[1].name, "firstName");
        assert_eq!(
            ctx.this_type(),
            VerificationType::Object("com/example/Person".into())
        );
    }

    #[test]
    fn test_empty_class_is_a_final_record() {
        let schema = person();
        let config = EmitterConfig::default();
        let ctx = ClassContext::new(&schema, &config).unwrap();
        let class = classforge_core::ClassFile::parse(&ctx.finish().unwrap()).unwrap();

        assert_eq!(class.major_version, 61);
        assert_eq!(class.access_flags, 0x0031);
        assert_eq!(class.super_class(), Some(RECORD));
    }
}
