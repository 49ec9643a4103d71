//! Identifier normalization.
//!
//! Schema keys and titles are folded into camel case: a run of
//! non-alphanumeric characters followed by an ASCII lowercase letter is
//! dropped and the letter uppercased. Characters the JVM rejects in
//! unqualified names are then replaced with `_`.
//!
//! Both functions are total and idempotent.

/// Characters not allowed in JVM unqualified names.
const FORBIDDEN: [char; 6] = ['.', ';', '[', '/', '<', '>'];

fn is_separator(c: char) -> bool {
    c == '_' || !c.is_alphanumeric()
}

fn fold(identifier: &str) -> Vec<char> {
    let chars: Vec<char> = identifier.chars().collect();
    let mut out = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        if is_separator(chars[i]) {
            let start = i;
            while i < chars.len() && is_separator(chars[i]) {
                i += 1;
            }
            match chars.get(i) {
                Some(c) if c.is_ascii_lowercase() => {
                    out.push(c.to_ascii_uppercase());
                    i += 1;
                }
                _ => out.extend(&chars[start..i]),
            }
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    for c in &mut out {
        if FORBIDDEN.contains(c) {
            *c = '_';
        }
    }
    out
}

fn with_first(mut chars: Vec<char>, convert: impl Fn(char) -> Option<char>) -> String {
    if let Some(first) = chars.first_mut()
        && let Some(converted) = convert(*first)
    {
        *first = converted;
    }
    chars.into_iter().collect()
}

/// Single-character case mapping; multi-character results are skipped.
fn single(mut mapped: impl Iterator<Item = char>) -> Option<char> {
    match (mapped.next(), mapped.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Converts a schema key into a field name (`first-name` -> `firstName`).
#[must_use]
pub fn to_field_name(identifier: &str) -> String {
    with_first(fold(identifier), |c| single(c.to_lowercase()))
}

/// Converts a title or synthesized name into a type name (`person_address` -> `PersonAddress`).
#[must_use]
pub fn to_type_name(identifier: &str) -> String {
    with_first(fold(identifier), |c| single(c.to_uppercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_field_name() {
        assert_eq!(to_field_name("first-name"), "firstName");
        assert_eq!(to_field_name("last_name"), "lastName");
        assert_eq!(to_field_name("Age"), "age");
        assert_eq!(to_field_name("zip code"), "zipCode");
        assert_eq!(to_field_name("a--b"), "aB");
        assert_eq!(to_field_name("already"), "already");
    }

    #[test]
    fn test_to_type_name() {
        assert_eq!(to_type_name("person"), "Person");
        assert_eq!(to_type_name("Person_address"), "PersonAddress");
        assert_eq!(to_type_name("Product_item"), "ProductItem");
        assert_eq!(to_type_name("UnknownClassName"), "UnknownClassName");
    }

    #[test]
    fn test_separator_before_non_lowercase_is_kept() {
        assert_eq!(to_field_name("item_1"), "item_1");
        assert_eq!(to_field_name("ID_Number"), "iD_Number");
        assert_eq!(to_field_name("price$"), "price$");
    }

    #[test]
    fn test_forbidden_characters_replaced() {
        assert_eq!(to_field_name("a.B"), "a_B");
        assert_eq!(to_field_name("<init>"), "init_");
        assert_eq!(to_field_name("x/Y;Z"), "x_Y_Z");
    }

    #[test]
    fn test_leading_separator() {
        assert_eq!(to_field_name("_private"), "private");
        assert_eq!(to_type_name("$ref"), "Ref");
    }

    #[test]
    fn test_idempotent() {
        for input in ["first-name", "a.B", "item_1", "<init>", "__x__", "İx", "Ünïcode_näme", "", "--"] {
            let field = to_field_name(input);
            assert_eq!(to_field_name(&field), field, "field name of {input:?}");
            let ty = to_type_name(input);
            assert_eq!(to_type_name(&ty), ty, "type name of {input:?}");
        }
    }

    #[test]
    fn test_empty_and_separator_only() {
        assert_eq!(to_field_name(""), "");
        assert_eq!(to_field_name("--"), "--");
    }
}
