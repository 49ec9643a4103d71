//! Lowering of schema types to JVM field types.

use crate::config::EmitterConfig;
use classforge_core::FieldType;
use classforge_schema::{PrimitiveKind, TypeDescriptor, WellKnownKind};

/// `java/lang/Integer`
pub const INTEGER: &str = "java/lang/Integer";
/// `java/lang/Double`
pub const DOUBLE: &str = "java/lang/Double";
/// `java/lang/Boolean`
pub const BOOLEAN: &str = "java/lang/Boolean";

fn well_known_class(kind: WellKnownKind) -> &'static str {
    match kind {
        WellKnownKind::OffsetDateTime => "java/time/OffsetDateTime",
        WellKnownKind::OffsetTime => "java/time/OffsetTime",
        WellKnownKind::LocalDate => "java/time/LocalDate",
        WellKnownKind::Duration => "java/time/Duration",
        WellKnownKind::Ipv4Address => "java/net/Inet4Address",
        WellKnownKind::Ipv6Address => "java/net/Inet6Address",
        WellKnownKind::Uuid => "java/util/UUID",
        WellKnownKind::Uri => "java/net/URI",
    }
}

/// Lowers a property type.
///
/// Scalars become JVM primitives only when
/// [`EmitterConfig::primitive_values`] is set; array elements are always
/// boxed.
#[must_use]
pub fn lower(ty: &TypeDescriptor, config: &EmitterConfig) -> FieldType {
    match ty {
        TypeDescriptor::Primitive(kind) if config.primitive_values => match kind {
            PrimitiveKind::Integer => FieldType::Int,
            PrimitiveKind::Number => FieldType::Double,
            PrimitiveKind::Boolean => FieldType::Boolean,
            PrimitiveKind::String => FieldType::object(classforge_core::descriptor::STRING),
        },
        _ => lower_boxed(ty, config),
    }
}

fn lower_boxed(ty: &TypeDescriptor, config: &EmitterConfig) -> FieldType {
    match ty {
        TypeDescriptor::Primitive(kind) => FieldType::object(match kind {
            PrimitiveKind::Integer => INTEGER,
            PrimitiveKind::Number => DOUBLE,
            PrimitiveKind::Boolean => BOOLEAN,
            PrimitiveKind::String => classforge_core::descriptor::STRING,
        }),
        TypeDescriptor::WellKnown(kind) => FieldType::object(well_known_class(*kind)),
        TypeDescriptor::Reference(name) => FieldType::object(config.internal_name(name)),
        TypeDescriptor::Array(element) => FieldType::array_of(lower_boxed(element, config)),
        TypeDescriptor::Generic => FieldType::object(classforge_core::descriptor::OBJECT),
    }
}
