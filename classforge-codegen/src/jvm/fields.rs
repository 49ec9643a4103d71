//! Fields and accessors.

use super::ClassContext;
use crate::error::CodegenError;
use classforge_core::{Annotation, MethodDescriptor, access};

/// Accessor signatures taken by generated methods.
const RESERVED: [(&str, &str); 2] = [("toString", "()Ljava/lang/String;"), ("hashCode", "()I")];

/// Emits one `private final` field per property, then one public accessor each.
///
/// # Errors
/// Returns [`CodegenError::ReservedMember`] when an accessor would
/// duplicate `toString()` or `hashCode()`.
pub fn generate(ctx: &mut ClassContext<'_>) -> Result<(), CodegenError> {
    for field in &ctx.fields {
        let annotations: Vec<Annotation> = ctx.config.original_key(&field.key).into_iter().collect();
        ctx.class
            .field(access::PRIVATE | access::FINAL, &field.name, &field.ty, &annotations)?;
    }

    let this_name = &ctx.this_name;
    for field in &ctx.fields {
        let descriptor = MethodDescriptor::returning(field.ty.clone());
        let signature = descriptor.descriptor();
        if RESERVED.iter().any(|&(name, desc)| name == field.name && desc == signature) {
            return Err(CodegenError::ReservedMember {
                name: field.name.clone(),
                descriptor: signature,
            });
        }

        ctx.class.method(access::PUBLIC, &field.name, &descriptor, &[], |code| {
            code.aload(0)
                .getfield(this_name, &field.name, &field.ty)
                .return_value(&field.ty);
            Ok(())
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EmitterConfig, JSON_PROPERTY};
    use crate::jvm::test_support::{code_of, generate_with, person, references};
    use classforge_core::opcodes as op;
    use classforge_schema::{PrimitiveKind, Property, Schema, TypeDescriptor};

    #[test]
    fn test_fields_are_private_final_in_key_order() {
        let class = generate_with(&person(), &EmitterConfig::default(), generate);

        let names: Vec<&str> = class.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["age", "firstName", "lastName"]);
        assert!(class.fields.iter().all(|f| f.access_flags == 0x0012));
        assert_eq!(class.fields[0].descriptor, "Ljava/lang/Integer;");
    }

    #[test]
    fn test_original_key_annotations() {
        let class = generate_with(&person(), &EmitterConfig::default(), generate);

        let field = class.field("firstName").unwrap();
        let annotations = class.annotations(field).unwrap();
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].type_descriptor, JSON_PROPERTY);
        assert_eq!(annotations[0].string("value"), Some("first-name"));
    }

    #[test]
    fn test_annotations_disabled() {
        let config = EmitterConfig::default().with_original_keys(false);
        let class = generate_with(&person(), &config, generate);
        assert!(class.fields.iter().all(|f| f.attributes.is_empty()));
    }

    #[test]
    fn test_accessor_bodies() {
        let config = EmitterConfig::default().with_primitive_values(true);
        let class = generate_with(&person(), &config, generate);

        let accessor = class.method("age", "()I").unwrap();
        assert_eq!(accessor.access_flags, 0x0001);
        let code = code_of(&class, accessor);
        assert_eq!(code[0], op::ALOAD_0);
        assert_eq!(code[1], op::GETFIELD);
        assert_eq!(code[4], op::IRETURN);
        assert_eq!(references(&class, &code), vec!["Person.age:I"]);

        let accessor = class.method("lastName", "()Ljava/lang/String;").unwrap();
        assert_eq!(*code_of(&class, accessor).last().unwrap(), op::ARETURN);
    }

    #[test]
    fn test_double_accessor_returns_two_slots() {
        let schema = Schema::new(
            "Point",
            vec![Property::new("x", "x", TypeDescriptor::Primitive(PrimitiveKind::Number))],
        );
        let config = EmitterConfig::default().with_primitive_values(true);
        let class = generate_with(&schema, &config, generate);

        let accessor = class.method("x", "()D").unwrap();
        let code = class.code(accessor).unwrap().unwrap();
        assert_eq!(code.max_stack, 2);
        assert_eq!(*code.bytes.last().unwrap(), op::DRETURN);
    }

    #[test]
    fn test_reserved_accessor_rejected() {
        let schema = Schema::new(
            "Odd",
            vec![Property::new("toString", "toString", TypeDescriptor::Primitive(PrimitiveKind::String))],
        );
        let config = EmitterConfig::default();
        let mut ctx = ClassContext::new(&schema, &config).unwrap();
        let err = generate(&mut ctx).unwrap_err();
        assert!(matches!(err, CodegenError::ReservedMember { name, .. } if name == "toString"));
    }

    #[test]
    fn test_boxed_hash_code_accessor_is_allowed() {
        let schema = Schema::new(
            "Odd",
            vec![Property::new("hashCode", "hashCode", TypeDescriptor::Primitive(PrimitiveKind::Integer))],
        );
        let class = generate_with(&schema, &EmitterConfig::default(), generate);
        assert!(class.method("hashCode", "()Ljava/lang/Integer;").is_some());
    }
}
