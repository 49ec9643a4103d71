//! `equals(Object)`.

use super::{ClassContext, LoweredField, OBJECTS};
use crate::error::CodegenError;
use classforge_core::descriptor::OBJECT;
use classforge_core::{CodeBuilder, FieldType, Frame, Label, MethodDescriptor, VerificationType, access};

/// Emits `public final boolean equals(Object)`.
///
/// The argument must be a non-null instance of the same class; identical
/// references are equal without comparing fields. `int` and `boolean`
/// fields compare by value, `double` through `Double.compare`, arrays
/// through `Objects.deepEquals` and other references through
/// `Objects.equals`.
///
/// # Errors
/// Returns an error if the method cannot be encoded.
pub fn generate(ctx: &mut ClassContext<'_>) -> Result<(), CodegenError> {
    let descriptor = MethodDescriptor::new(vec![FieldType::object(OBJECT)], Some(FieldType::Boolean));
    let frame = Frame::new(vec![ctx.this_type(), VerificationType::Object(OBJECT.to_string())]);
    let this_name = &ctx.this_name;
    let fields = &ctx.fields;

    ctx.class.method(
        access::PUBLIC | access::FINAL,
        "equals",
        &descriptor,
        &[],
        |code| {
            let equal = code.new_label();
            let not_equal = code.new_label();
            let done = code.new_label();

            code.aload(1).ifnull(not_equal);
            code.aload(1).instanceof(this_name).ifeq(not_equal);
            code.aload(0).aload(1).if_acmpeq(equal);

            for field in fields {
                compare_field(code, this_name, field, not_equal);
            }

            code.bind(equal, frame.clone()).iconst(1).goto(done);
            code.bind(not_equal, frame.clone()).iconst(0);
            code.bind(done, frame.with_stack(vec![VerificationType::Integer]))
                .return_value(&FieldType::Boolean);
            Ok(())
        },
    )?;
    Ok(())
}

/// Jumps to `not_equal` when the field differs between `this` and the argument.
fn compare_field(code: &mut CodeBuilder<'_>, this_name: &str, field: &LoweredField, not_equal: Label) {
    code.aload(0).getfield(this_name, &field.name, &field.ty);
    code.aload(1)
        .checkcast(this_name)
        .getfield(this_name, &field.name, &field.ty);

    let object = FieldType::object(OBJECT);
    let predicate = MethodDescriptor::new(vec![object.clone(), object], Some(FieldType::Boolean));
    match &field.ty {
        FieldType::Boolean | FieldType::Int => {
            code.if_icmpne(not_equal);
        }
        FieldType::Double => {
            let compare = MethodDescriptor::new(vec![FieldType::Double, FieldType::Double], Some(FieldType::Int));
            code.invokestatic(super::types::DOUBLE, "compare", &compare)
                .ifne(not_equal);
        }
        FieldType::Array(_) => {
            code.invokestatic(OBJECTS, "deepEquals", &predicate).ifeq(not_equal);
        }
        FieldType::Object(_) => {
            code.invokestatic(OBJECTS, "equals", &predicate).ifeq(not_equal);
        }
    }
}
