//! `hashCode()`.

use super::{ARRAYS, ClassContext, LoweredField};
use crate::error::CodegenError;
use classforge_core::descriptor::OBJECT;
use classforge_core::{CodeBuilder, FieldType, Frame, MethodDescriptor, VerificationType, access};

/// Multiplier applied to the running hash before each field.
pub const PRIME: i32 = 59;

/// Contribution of a `null` reference field.
pub const NULL_HASH: i32 = 43;

/// Emits `public final int hashCode()`.
///
/// Starting from 1, each field folds in as `result * 59 + hash(field)`.
/// `null` references hash to 43.
///
/// # Errors
/// Returns an error if the method cannot be encoded.
pub fn generate(ctx: &mut ClassContext<'_>) -> Result<(), CodegenError> {
    let frame = Frame::new(vec![ctx.this_type()]);
    let this_name = &ctx.this_name;
    let fields = &ctx.fields;

    ctx.class.method(
        access::PUBLIC | access::FINAL,
        "hashCode",
        &MethodDescriptor::returning(FieldType::Int),
        &[],
        |code| {
            code.iconst(1);
            for field in fields {
                code.iconst(PRIME).imul();
                field_hash(code, this_name, field, &frame);
                code.iadd();
            }
            code.return_value(&FieldType::Int);
            Ok(())
        },
    )?;
    Ok(())
}

/// Pushes the hash of one field on top of the running result.
fn field_hash(code: &mut CodeBuilder<'_>, this_name: &str, field: &LoweredField, frame: &Frame) {
    code.aload(0).getfield(this_name, &field.name, &field.ty);
    match &field.ty {
        FieldType::Boolean | FieldType::Int => {}
        FieldType::Double => {
            let hash = MethodDescriptor::new(vec![FieldType::Double], Some(FieldType::Int));
            code.invokestatic(super::types::DOUBLE, "hashCode", &hash);
        }
        FieldType::Array(_) => {
            let hash = MethodDescriptor::new(
                vec![FieldType::array_of(FieldType::object(OBJECT))],
                Some(FieldType::Int),
            );
            code.invokestatic(ARRAYS, "deepHashCode", &hash);
        }
        FieldType::Object(_) => {
            let present = code.new_label();
            let combine = code.new_label();
            code.dup().ifnonnull(present);
            code.pop().iconst(NULL_HASH).goto(combine);
            code.bind(
                present,
                frame.with_stack(vec![VerificationType::Integer, field.ty.verification_type()]),
            )
            .invokevirtual(OBJECT, "hashCode", &MethodDescriptor::returning(FieldType::Int));
            code.bind(
                combine,
                frame.with_stack(vec![VerificationType::Integer, VerificationType::Integer]),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmitterConfig;
    use crate::jvm::test_support::{code_of, generate_with, person, references};
    use classforge_core::opcodes as op;
    use classforge_schema::{PrimitiveKind, Property, Schema, TypeDescriptor};

    #[test]
    fn test_hash_code_signature() {
        let class = generate_with(&person(), &EmitterConfig::default(), generate);
        let method = class.method("hashCode", "()I").unwrap();
        assert_eq!(method.access_flags, 0x0011);
        assert_eq!(class.code(method).unwrap().unwrap().max_locals, 1);
    }

    #[test]
    fn test_primitive_fields_fold_directly() {
        let schema = Schema::new(
            "Counter",
            vec![
                Property::new("count", "count", TypeDescriptor::Primitive(PrimitiveKind::Integer)),
                Property::new("open", "open", TypeDescriptor::Primitive(PrimitiveKind::Boolean)),
            ],
        );
        let config = EmitterConfig::default().with_primitive_values(true);
        let class = generate_with(&schema, &config, generate);
        let method = &class.methods[0];
        let code = class.code(method).unwrap().unwrap();

        assert_eq!(
            &code.bytes[..6],
            &[op::ICONST_M1 + 2, op::BIPUSH, 59, op::IMUL, op::ALOAD_0, op::GETFIELD]
        );
        assert_eq!(code.bytes[8], op::IADD);
        assert_eq!(*code.bytes.last().unwrap(), op::IRETURN);
        assert!(code.attributes.is_empty());
        assert_eq!(
            references(&class, &code.bytes),
            vec!["Counter.count:I", "Counter.open:Z"]
        );
    }

    #[test]
    fn test_double_and_array_hashes() {
        let schema = Schema::new(
            "Series",
            vec![
                Property::new("mean", "mean", TypeDescriptor::Primitive(PrimitiveKind::Number)),
                Property::new(
                    "values",
                    "values",
                    TypeDescriptor::array_of(TypeDescriptor::Primitive(PrimitiveKind::Number)),
                ),
            ],
        );
        let config = EmitterConfig::default().with_primitive_values(true);
        let class = generate_with(&schema, &config, generate);
        let method = &class.methods[0];
        let code = code_of(&class, method);

        assert_eq!(
            references(&class, &code),
            vec![
                "Series.mean:D",
                "java/lang/Double.hashCode:(D)I",
                "Series.values:[Ljava/lang/Double;",
                "java/util/Arrays.deepHashCode:([Ljava/lang/Object;)I",
            ]
        );
        assert_eq!(class.code(method).unwrap().unwrap().max_stack, 3);
    }

    #[test]
    fn test_reference_fields_guard_null() {
        let class = generate_with(&person(), &EmitterConfig::default(), generate);
        let method = &class.methods[0];
        let code = class.code(method).unwrap().unwrap();

        let hash = "java/lang/Object.hashCode:()I";
        assert_eq!(
            references(&class, &code.bytes),
            vec![
                "Person.age:Ljava/lang/Integer;",
                hash,
                "Person.firstName:Ljava/lang/String;",
                hash,
                "Person.lastName:Ljava/lang/String;",
                hash,
            ]
        );

        // iconst_1 bipush imul aload_0 getfield, then the null guard
        assert_eq!(&code.bytes[8..10], &[op::DUP, op::IFNONNULL]);
        assert_eq!(&code.bytes[12..16], &[op::POP, op::BIPUSH, 43, op::GOTO]);
        assert_eq!(code.max_stack, 3);

        let table = code.attributes.iter().find(|a| a.name == "StackMapTable").unwrap();
        // two frames per reference field
        assert_eq!(u16::from_be_bytes([table.data[0], table.data[1]]), 6);
    }

    #[test]
    fn test_empty_record_hash_is_one() {
        let schema = Schema::new("Empty", vec![]);
        let class = generate_with(&schema, &EmitterConfig::default(), generate);
        assert_eq!(
            code_of(&class, &class.methods[0]),
            vec![op::ICONST_M1 + 2, op::IRETURN]
        );
    }
}
