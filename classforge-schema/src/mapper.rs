//! Scalar type mapping.
//!
//! Arrays and objects need the model builder (they may register nested
//! schemas) and are handled there. Everything else maps here, and anything
//! unrecognized becomes [`TypeDescriptor::Generic`] instead of an error.

use crate::ir::{PrimitiveKind, TypeDescriptor, WellKnownKind};

/// Maps a string `format` to a well-known value type.
#[must_use]
pub fn map_string_format(format: &str) -> Option<WellKnownKind> {
    let kind = match format {
        "date-time" => WellKnownKind::OffsetDateTime,
        "time" => WellKnownKind::OffsetTime,
        "date" => WellKnownKind::LocalDate,
        "duration" => WellKnownKind::Duration,
        "ipv4" => WellKnownKind::Ipv4Address,
        "ipv6" => WellKnownKind::Ipv6Address,
        "uuid" => WellKnownKind::Uuid,
        "uri" | "uri-reference" | "iri" | "iri-reference" => WellKnownKind::Uri,
        _ => return None,
    };
    Some(kind)
}

/// Maps a scalar `type` keyword and optional `format`.
///
/// # Arguments
/// * `kind` - Value of the `type` keyword
/// * `format` - Value of the `format` keyword, if any
#[must_use]
pub fn map_scalar(kind: &str, format: Option<&str>) -> TypeDescriptor {
    match kind {
        "string" => format
            .and_then(map_string_format)
            .map_or(TypeDescriptor::Primitive(PrimitiveKind::String), TypeDescriptor::WellKnown),
        "integer" => TypeDescriptor::Primitive(PrimitiveKind::Integer),
        "number" => TypeDescriptor::Primitive(PrimitiveKind::Number),
        "boolean" => TypeDescriptor::Primitive(PrimitiveKind::Boolean),
        _ => TypeDescriptor::Generic,
    }
}
