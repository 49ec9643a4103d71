//! Canonical constructor.

use super::{ClassContext, RECORD};
use crate::error::CodegenError;
use classforge_core::{Annotation, MethodDescriptor, access};

/// Parameter slots available to an instance method (255 minus `this`).
const MAX_PARAMETER_SLOTS: u16 = 254;

/// Emits `public <init>(fields...)` assigning each parameter to its field.
///
/// # Errors
/// Returns [`CodegenError::Generation`] if the parameters do not fit in a
/// method descriptor.
pub fn generate(ctx: &mut ClassContext<'_>) -> Result<(), CodegenError> {
    let descriptor = MethodDescriptor::new(ctx.fields.iter().map(|f| f.ty.clone()).collect(), None);
    let slots = ctx.fields.iter().map(|f| u32::from(f.ty.slot_size())).sum::<u32>();
    if slots > u32::from(MAX_PARAMETER_SLOTS) {
        return Err(CodegenError::generation(format!(
            "{} needs {slots} constructor parameter slots, the limit is {MAX_PARAMETER_SLOTS}",
            ctx.type_name
        )));
    }

    let parameter_annotations: Vec<Vec<Annotation>> = if ctx.config.original_keys {
        ctx.fields
            .iter()
            .map(|f| ctx.config.original_key(&f.key).into_iter().collect())
            .collect()
    } else {
        Vec::new()
    };

    let this_name = &ctx.this_name;
    let fields = &ctx.fields;
    ctx.class.method(
        access::PUBLIC,
        "<init>",
        &descriptor,
        &parameter_annotations,
        |code| {
            code.aload(0)
                .invokespecial(RECORD, "<init>", &MethodDescriptor::void());
            let mut slot = 1;
            for field in fields {
                code.aload(0)
                    .load(slot, &field.ty)
                    .putfield(this_name, &field.name, &field.ty);
                slot += field.ty.slot_size();
            }
            code.return_void();
            Ok(())
        },
    )?;
    Ok(())
}
