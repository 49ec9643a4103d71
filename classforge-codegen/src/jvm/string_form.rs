//! `toString()` through `StringConcatFactory`.
//!
//! The string is `Person[age=42, firstName=Ada, tags=String[]]`: the simple
//! type name followed by every field in declaration order. Array fields show
//! their type instead of their contents. The concatenation is linked at run
//! time by `makeConcatWithConstants`, so the class only carries a recipe.

use super::{ClassContext, LoweredField};
use crate::error::CodegenError;
use classforge_core::descriptor::STRING;
use classforge_core::{FieldType, MethodDescriptor, ReferenceKind, access};

/// `java/lang/invoke/StringConcatFactory`
pub const STRING_CONCAT_FACTORY: &str = "java/lang/invoke/StringConcatFactory";

/// Descriptor of `StringConcatFactory.makeConcatWithConstants`.
pub const MAKE_CONCAT_DESCRIPTOR: &str = "(Ljava/lang/invoke/MethodHandles$Lookup;Ljava/lang/String;\
Ljava/lang/invoke/MethodType;Ljava/lang/String;[Ljava/lang/Object;)Ljava/lang/invoke/CallSite;";

/// Recipe tag for a dynamic argument.
pub const TAG_ARGUMENT: char = '\u{1}';

/// Recipe tag for a constant passed as an extra bootstrap argument.
pub const TAG_CONSTANT: char = '\u{2}';

/// Argument slots accepted by `makeConcatWithConstants`.
pub const MAX_CONCAT_SLOTS: u16 = 200;

/// A concatenation recipe and the constants its `\u{2}` tags refer to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recipe {
    /// Recipe string.
    pub template: String,
    /// Literal segments that contain a tag character, in order.
    pub constants: Vec<String>,
    pending: String,
}

impl Recipe {
    /// Builds the recipe for a record's `toString()`.
    #[must_use]
    pub fn for_record(type_name: &str, fields: &[LoweredField]) -> Self {
        let mut recipe = Self::default();
        recipe.literal(type_name);
        recipe.literal("[");
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                recipe.literal(", ");
            }
            recipe.literal(&field.name);
            recipe.literal("=");
            if field.ty.is_array() {
                recipe.literal(&field.ty.display_name());
            } else {
                recipe.argument();
            }
        }
        recipe.literal("]");
        recipe.flush();
        recipe
    }

    fn literal(&mut self, text: &str) {
        self.pending.push_str(text);
    }

    fn argument(&mut self) {
        self.flush();
        self.template.push(TAG_ARGUMENT);
    }

    /// Literal text may not contain a tag; such a segment travels as a constant.
    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let segment = std::mem::take(&mut self.pending);
        if segment.contains([TAG_ARGUMENT, TAG_CONSTANT]) {
            self.template.push(TAG_CONSTANT);
            self.constants.push(segment);
        } else {
            self.template.push_str(&segment);
        }
    }
}

/// Emits `public final String toString()`.
///
/// # Errors
/// Returns [`CodegenError::Generation`] when the non-array fields need more
/// than 200 argument slots, or an error if the class cannot be encoded.
pub fn generate(ctx: &mut ClassContext<'_>) -> Result<(), CodegenError> {
    let string = FieldType::object(STRING);
    let arguments: Vec<&LoweredField> = ctx.fields.iter().filter(|f| !f.ty.is_array()).collect();
    let call_site = MethodDescriptor::new(
        arguments.iter().map(|f| f.ty.clone()).collect(),
        Some(string.clone()),
    );
    let slots = call_site.parameter_slots();
    if slots > MAX_CONCAT_SLOTS {
        return Err(CodegenError::generation(format!(
            "{} needs {slots} toString argument slots, the limit is {MAX_CONCAT_SLOTS}",
            ctx.type_name
        )));
    }

    let recipe = Recipe::for_record(ctx.type_name, &ctx.fields);
    tracing::trace!(type_name = ctx.type_name, recipe = ?recipe.template, "toString recipe");

    let pool = ctx.class.pool_mut();
    let handle = pool.method_handle(
        ReferenceKind::InvokeStatic,
        STRING_CONCAT_FACTORY,
        "makeConcatWithConstants",
        MAKE_CONCAT_DESCRIPTOR,
    )?;
    let mut bootstrap_arguments = Vec::with_capacity(1 + recipe.constants.len());
    bootstrap_arguments.push(pool.string(&recipe.template)?);
    for constant in &recipe.constants {
        bootstrap_arguments.push(pool.string(constant)?);
    }
    let call_site_index =
        ctx.class
            .invoke_dynamic(handle, bootstrap_arguments, "toString", &call_site)?;

    let this_name = &ctx.this_name;
    ctx.class.method(
        access::PUBLIC | access::FINAL,
        "toString",
        &MethodDescriptor::returning(string.clone()),
        &[],
        |code| {
            for field in &arguments {
                code.aload(0).getfield(this_name, &field.name, &field.ty);
            }
            code.invokedynamic(call_site_index, &call_site)
                .return_value(&string);
            Ok(())
        },
    )?;
    Ok(())
}
