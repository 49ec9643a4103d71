//! Constant pool construction and encoding.
//!
//! Entries are deduplicated: asking for the same constant twice returns the
//! same index, so emission order alone determines the pool layout and the
//! output stays byte-for-byte reproducible.

use crate::buffer::ByteWriter;
use crate::error::{Error, Result};
use std::collections::HashMap;

/// `CONSTANT_Utf8` tag.
pub const TAG_UTF8: u8 = 1;
/// `CONSTANT_Integer` tag.
pub const TAG_INTEGER: u8 = 3;
/// `CONSTANT_Class` tag.
pub const TAG_CLASS: u8 = 7;
/// `CONSTANT_String` tag.
pub const TAG_STRING: u8 = 8;
/// `CONSTANT_Fieldref` tag.
pub const TAG_FIELD_REF: u8 = 9;
/// `CONSTANT_Methodref` tag.
pub const TAG_METHOD_REF: u8 = 10;
/// `CONSTANT_NameAndType` tag.
pub const TAG_NAME_AND_TYPE: u8 = 12;
/// `CONSTANT_MethodHandle` tag.
pub const TAG_METHOD_HANDLE: u8 = 15;
/// `CONSTANT_InvokeDynamic` tag.
pub const TAG_INVOKE_DYNAMIC: u8 = 18;

/// Largest number of entries a pool can hold (`constant_pool_count` is a u2
/// and index 0 is reserved).
pub const MAX_ENTRIES: usize = u16::MAX as usize - 1;

/// Method handle reference kinds (JVMS §5.4.3.5).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// `REF_getField`
    GetField = 1,
    /// `REF_invokeVirtual`
    InvokeVirtual = 5,
    /// `REF_invokeStatic`
    InvokeStatic = 6,
    /// `REF_invokeSpecial`
    InvokeSpecial = 7,
}

impl ReferenceKind {
    /// Parses a reference kind byte.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::GetField),
            5 => Some(Self::InvokeVirtual),
            6 => Some(Self::InvokeStatic),
            7 => Some(Self::InvokeSpecial),
            _ => None,
        }
    }
}

/// A single constant pool entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constant {
    /// Text in modified UTF-8.
    Utf8(String),
    /// 32-bit integer.
    Integer(i32),
    /// Class reference (index of a `Utf8` internal name).
    Class(u16),
    /// String literal (index of a `Utf8`).
    String(u16),
    /// Field reference.
    FieldRef {
        /// Index of the owning `Class`.
        class: u16,
        /// Index of the `NameAndType`.
        name_and_type: u16,
    },
    /// Method reference.
    MethodRef {
        /// Index of the owning `Class`.
        class: u16,
        /// Index of the `NameAndType`.
        name_and_type: u16,
    },
    /// Name and descriptor pair.
    NameAndType {
        /// Index of the name `Utf8`.
        name: u16,
        /// Index of the descriptor `Utf8`.
        descriptor: u16,
    },
    /// Method handle.
    MethodHandle {
        /// Reference kind.
        kind: ReferenceKind,
        /// Index of the referenced member.
        reference: u16,
    },
    /// Dynamically-computed call site.
    InvokeDynamic {
        /// Index into the `BootstrapMethods` attribute.
        bootstrap: u16,
        /// Index of the `NameAndType`.
        name_and_type: u16,
    },
}

impl Constant {
    /// Returns the tag byte of this entry.
    #[must_use]
    pub const fn tag(&self) -> u8 {
        match self {
            Self::Utf8(_) => TAG_UTF8,
            Self::Integer(_) => TAG_INTEGER,
            Self::Class(_) => TAG_CLASS,
            Self::String(_) => TAG_STRING,
            Self::FieldRef { .. } => TAG_FIELD_REF,
            Self::MethodRef { .. } => TAG_METHOD_REF,
            Self::NameAndType { .. } => TAG_NAME_AND_TYPE,
            Self::MethodHandle { .. } => TAG_METHOD_HANDLE,
            Self::InvokeDynamic { .. } => TAG_INVOKE_DYNAMIC,
        }
    }
}

/// Deduplicating constant pool builder.
#[derive(Debug, Default, Clone)]
pub struct ConstantPool {
    entries: Vec<Constant>,
    index: HashMap<Constant, u16>,
}

impl ConstantPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the pool has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up an entry by its 1-based index.
    #[must_use]
    pub fn get(&self, index: u16) -> Option<&Constant> {
        (index as usize)
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
    }

    fn insert(&mut self, constant: Constant) -> Result<u16> {
        if let Some(&index) = self.index.get(&constant) {
            return Ok(index);
        }
        if self.entries.len() >= MAX_ENTRIES {
            return Err(Error::ConstantPoolOverflow { max: MAX_ENTRIES });
        }
        self.entries.push(constant.clone());
        // Bounded by MAX_ENTRIES above.
        let index = self.entries.len() as u16;
        self.index.insert(constant, index);
        Ok(index)
    }

    /// Adds a `CONSTANT_Utf8`.
    ///
    /// # Errors
    /// Returns [`Error::StringTooLong`] if the encoded form exceeds 65535 bytes.
    pub fn utf8(&mut self, value: &str) -> Result<u16> {
        let length = modified_utf8_len(value);
        if length > u16::MAX as usize {
            return Err(Error::StringTooLong { length });
        }
        self.insert(Constant::Utf8(value.to_string()))
    }

    /// Adds a `CONSTANT_Integer`.
    pub fn integer(&mut self, value: i32) -> Result<u16> {
        self.insert(Constant::Integer(value))
    }

    /// Adds a `CONSTANT_Class` for an internal name (`java/lang/String`) or
    /// an array descriptor (`[Ljava/lang/String;`).
    pub fn class(&mut self, internal_name: &str) -> Result<u16> {
        let name = self.utf8(internal_name)?;
        self.insert(Constant::Class(name))
    }

    /// Adds a `CONSTANT_String`.
    pub fn string(&mut self, value: &str) -> Result<u16> {
        let utf8 = self.utf8(value)?;
        self.insert(Constant::String(utf8))
    }

    /// Adds a `CONSTANT_NameAndType`.
    pub fn name_and_type(&mut self, name: &str, descriptor: &str) -> Result<u16> {
        let name = self.utf8(name)?;
        let descriptor = self.utf8(descriptor)?;
        self.insert(Constant::NameAndType { name, descriptor })
    }

    /// Adds a `CONSTANT_Fieldref`.
    pub fn field_ref(&mut self, owner: &str, name: &str, descriptor: &str) -> Result<u16> {
        let class = self.class(owner)?;
        let name_and_type = self.name_and_type(name, descriptor)?;
        self.insert(Constant::FieldRef {
            class,
            name_and_type,
        })
    }

    /// Adds a `CONSTANT_Methodref`.
    pub fn method_ref(&mut self, owner: &str, name: &str, descriptor: &str) -> Result<u16> {
        let class = self.class(owner)?;
        let name_and_type = self.name_and_type(name, descriptor)?;
        self.insert(Constant::MethodRef {
            class,
            name_and_type,
        })
    }

    /// Adds a `CONSTANT_MethodHandle` pointing at a method.
    pub fn method_handle(
        &mut self,
        kind: ReferenceKind,
        owner: &str,
        name: &str,
        descriptor: &str,
    ) -> Result<u16> {
        let reference = match kind {
            ReferenceKind::GetField => self.field_ref(owner, name, descriptor)?,
            _ => self.method_ref(owner, name, descriptor)?,
        };
        self.insert(Constant::MethodHandle { kind, reference })
    }

    /// Adds a `CONSTANT_InvokeDynamic`.
    pub fn invoke_dynamic(&mut self, bootstrap: u16, name: &str, descriptor: &str) -> Result<u16> {
        let name_and_type = self.name_and_type(name, descriptor)?;
        self.insert(Constant::InvokeDynamic {
            bootstrap,
            name_and_type,
        })
    }

    /// Encodes `constant_pool_count` followed by every entry.
    pub fn encode(&self, out: &mut ByteWriter) {
        // len() <= MAX_ENTRIES, so the count fits.
        out.write_u16(self.entries.len() as u16 + 1);
        for constant in &self.entries {
            out.write_u8(constant.tag());
            match constant {
                Constant::Utf8(value) => {
                    let bytes = encode_modified_utf8(value);
                    out.write_u16(bytes.len() as u16);
                    out.write_bytes(&bytes);
                }
                Constant::Integer(value) => out.write_i32(*value),
                Constant::Class(name) => out.write_u16(*name),
                Constant::String(utf8) => out.write_u16(*utf8),
                Constant::FieldRef {
                    class,
                    name_and_type,
                }
                | Constant::MethodRef {
                    class,
                    name_and_type,
                } => {
                    out.write_u16(*class);
                    out.write_u16(*name_and_type);
                }
                Constant::NameAndType { name, descriptor } => {
                    out.write_u16(*name);
                    out.write_u16(*descriptor);
                }
                Constant::MethodHandle { kind, reference } => {
                    out.write_u8(*kind as u8);
                    out.write_u16(*reference);
                }
                Constant::InvokeDynamic {
                    bootstrap,
                    name_and_type,
                } => {
                    out.write_u16(*bootstrap);
                    out.write_u16(*name_and_type);
                }
            }
        }
    }
}

/// Returns the length of `value` in modified UTF-8.
#[must_use]
pub fn modified_utf8_len(value: &str) -> usize {
    value.encode_utf16().map(unit_len).sum()
}

fn unit_len(unit: u16) -> usize {
    match unit {
        0x0001..=0x007F => 1,
        0x0000 | 0x0080..=0x07FF => 2,
        _ => 3,
    }
}

/// Encodes text in the JVM's modified UTF-8.
///
/// NUL becomes `C0 80` and supplementary characters are written as two
/// three-byte surrogates.
#[must_use]
pub fn encode_modified_utf8(value: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(value.len());
    for unit in value.encode_utf16() {
        match unit_len(unit) {
            1 => bytes.push(unit as u8),
            2 => {
                bytes.push(0xC0 | (unit >> 6) as u8);
                bytes.push(0x80 | (unit & 0x3F) as u8);
            }
            _ => {
                bytes.push(0xE0 | (unit >> 12) as u8);
                bytes.push(0x80 | ((unit >> 6) & 0x3F) as u8);
                bytes.push(0x80 | (unit & 0x3F) as u8);
            }
        }
    }
    bytes
}

/// Decodes modified UTF-8.
///
/// # Arguments
/// * `bytes` - Encoded text
/// * `offset` - Position of `bytes` in the enclosing buffer, used in errors
///
/// # Errors
/// Returns [`Error::InvalidUtf8`] for malformed sequences or unpaired surrogates.
pub fn decode_modified_utf8(bytes: &[u8], offset: usize) -> Result<String> {
    let mut units = Vec::with_capacity(bytes.len());
    let mut i = 0;
    let invalid = |at: usize| Error::InvalidUtf8 {
        offset: offset + at,
    };
    let continuation = |at: usize| -> Result<u16> {
        match bytes.get(at) {
            Some(&b) if b & 0xC0 == 0x80 => Ok(u16::from(b & 0x3F)),
            _ => Err(invalid(at)),
        }
    };

    while i < bytes.len() {
        let b = bytes[i];
        if b != 0 && b & 0x80 == 0 {
            units.push(u16::from(b));
            i += 1;
        } else if b & 0xE0 == 0xC0 {
            units.push((u16::from(b & 0x1F) << 6) | continuation(i + 1)?);
            i += 2;
        } else if b & 0xF0 == 0xE0 {
            units.push(
                (u16::from(b & 0x0F) << 12) | (continuation(i + 1)? << 6) | continuation(i + 2)?,
            );
            i += 3;
        } else {
            return Err(invalid(i));
        }
    }

    String::from_utf16(&units).map_err(|_| invalid(0))
}
