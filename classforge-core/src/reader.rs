//! Class-file reader.
//!
//! Parses the subset of the format the builder produces (plus unknown
//! attributes, which are kept as raw bytes). Used to inspect and verify
//! emitted classes.

use crate::attribute::{Annotation, RUNTIME_VISIBLE_ANNOTATIONS, RUNTIME_VISIBLE_PARAMETER_ANNOTATIONS};
use crate::buffer::ByteReader;
use crate::class::MAGIC;
use crate::constant_pool::{
    Constant, ReferenceKind, TAG_CLASS, TAG_FIELD_REF, TAG_INTEGER, TAG_INVOKE_DYNAMIC,
    TAG_METHOD_HANDLE, TAG_METHOD_REF, TAG_NAME_AND_TYPE, TAG_STRING, TAG_UTF8,
    decode_modified_utf8,
};
use crate::error::{Error, Result};

/// A raw attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// Attribute body.
    pub data: Vec<u8>,
}

/// A field or method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Access flags.
    pub access_flags: u16,
    /// Member name.
    pub name: String,
    /// Field or method descriptor.
    pub descriptor: String,
    /// Member attributes.
    pub attributes: Vec<Attribute>,
}

impl Member {
    /// Finds an attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// Decoded `Code` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeAttribute {
    /// Maximum operand stack depth.
    pub max_stack: u16,
    /// Local variable slots.
    pub max_locals: u16,
    /// Instruction bytes.
    pub bytes: Vec<u8>,
    /// Nested attributes (`StackMapTable`).
    pub attributes: Vec<Attribute>,
}

/// Method referenced by a `CONSTANT_MethodHandle` or a member reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRef {
    /// Owning class internal name.
    pub owner: String,
    /// Member name.
    pub name: String,
    /// Member descriptor.
    pub descriptor: String,
}

/// Static argument of a bootstrap method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapArgument {
    /// `CONSTANT_String`
    String(String),
    /// `CONSTANT_Integer`
    Integer(i32),
    /// `CONSTANT_Class`
    Class(String),
}

/// Entry of the `BootstrapMethods` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapMethodInfo {
    /// Reference kind of the bootstrap handle.
    pub kind: ReferenceKind,
    /// Bootstrap method.
    pub method: MemberRef,
    /// Static arguments.
    pub arguments: Vec<BootstrapArgument>,
}

/// A parsed class file.
#[derive(Debug, Clone)]
pub struct ClassFile {
    /// Minor version.
    pub minor_version: u16,
    /// Major version.
    pub major_version: u16,
    /// Constant pool; index 0 is unused.
    pub constants: Vec<Option<Constant>>,
    /// Class access flags.
    pub access_flags: u16,
    this_class: String,
    super_class: Option<String>,
    /// Implemented interface names.
    pub interfaces: Vec<String>,
    /// Field table.
    pub fields: Vec<Member>,
    /// Method table.
    pub methods: Vec<Member>,
    /// Class attributes.
    pub attributes: Vec<Attribute>,
}

impl ClassFile {
    /// Parses a class file.
    ///
    /// # Errors
    /// Returns an error for a bad magic number, truncated input, unknown
    /// constant tags, dangling pool indices, or trailing bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(bytes);
        let magic = reader.read_u32()?;
        if magic != MAGIC {
            return Err(Error::InvalidMagic { found: magic });
        }
        let minor_version = reader.read_u16()?;
        let major_version = reader.read_u16()?;
        let constants = read_constants(&mut reader)?;

        let mut class = Self {
            minor_version,
            major_version,
            constants,
            access_flags: 0,
            this_class: String::new(),
            super_class: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            attributes: Vec::new(),
        };

        class.access_flags = reader.read_u16()?;
        let this_index = reader.read_u16()?;
        class.this_class = class.class_name(this_index)?.to_string();
        let super_index = reader.read_u16()?;
        class.super_class = match super_index {
            0 => None,
            index => Some(class.class_name(index)?.to_string()),
        };

        let interface_count = reader.read_u16()?;
        for _ in 0..interface_count {
            let index = reader.read_u16()?;
            let name = class.class_name(index)?.to_string();
            class.interfaces.push(name);
        }

        class.fields = class.read_members(&mut reader)?;
        class.methods = class.read_members(&mut reader)?;
        class.attributes = class.read_attributes(&mut reader)?;

        if !reader.is_exhausted() {
            return Err(Error::malformed(format!(
                "{} trailing bytes after class attributes",
                reader.remaining()
            )));
        }
        Ok(class)
    }

    /// Internal name of this class.
    #[must_use]
    pub fn this_class(&self) -> &str {
        &self.this_class
    }

    /// Internal name of the superclass (`None` only for `java/lang/Object`).
    #[must_use]
    pub fn super_class(&self) -> Option<&str> {
        self.super_class.as_deref()
    }

    /// Looks up a pool entry.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConstant`] for index 0 or out-of-range indices.
    pub fn constant(&self, index: u16) -> Result<&Constant> {
        self.constants
            .get(index as usize)
            .and_then(Option::as_ref)
            .ok_or(Error::InvalidConstant {
                index,
                reason: "no such entry",
            })
    }

    /// Resolves a `CONSTANT_Utf8`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConstant`] if the entry is not `Utf8`.
    pub fn utf8(&self, index: u16) -> Result<&str> {
        match self.constant(index)? {
            Constant::Utf8(value) => Ok(value),
            _ => Err(Error::InvalidConstant {
                index,
                reason: "expected Utf8",
            }),
        }
    }

    /// Resolves a `CONSTANT_Class` to its name.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConstant`] if the entry is not `Class`.
    pub fn class_name(&self, index: u16) -> Result<&str> {
        match self.constant(index)? {
            Constant::Class(name) => self.utf8(*name),
            _ => Err(Error::InvalidConstant {
                index,
                reason: "expected Class",
            }),
        }
    }

    /// Resolves a `CONSTANT_String` to its text.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConstant`] if the entry is not `String`.
    pub fn string(&self, index: u16) -> Result<&str> {
        match self.constant(index)? {
            Constant::String(utf8) => self.utf8(*utf8),
            _ => Err(Error::InvalidConstant {
                index,
                reason: "expected String",
            }),
        }
    }

    fn name_and_type(&self, index: u16) -> Result<(&str, &str)> {
        match self.constant(index)? {
            Constant::NameAndType { name, descriptor } => {
                Ok((self.utf8(*name)?, self.utf8(*descriptor)?))
            }
            _ => Err(Error::InvalidConstant {
                index,
                reason: "expected NameAndType",
            }),
        }
    }

    /// Resolves a `Fieldref` or `Methodref`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConstant`] for any other kind of entry.
    pub fn member_ref(&self, index: u16) -> Result<MemberRef> {
        match self.constant(index)? {
            Constant::FieldRef {
                class,
                name_and_type,
            }
            | Constant::MethodRef {
                class,
                name_and_type,
            } => {
                let (name, descriptor) = self.name_and_type(*name_and_type)?;
                Ok(MemberRef {
                    owner: self.class_name(*class)?.to_string(),
                    name: name.to_string(),
                    descriptor: descriptor.to_string(),
                })
            }
            _ => Err(Error::InvalidConstant {
                index,
                reason: "expected Fieldref or Methodref",
            }),
        }
    }

    /// Resolves a `CONSTANT_InvokeDynamic` to its bootstrap index, name and descriptor.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConstant`] for any other kind of entry.
    pub fn invoke_dynamic(&self, index: u16) -> Result<(u16, &str, &str)> {
        match self.constant(index)? {
            Constant::InvokeDynamic {
                bootstrap,
                name_and_type,
            } => {
                let (name, descriptor) = self.name_and_type(*name_and_type)?;
                Ok((*bootstrap, name, descriptor))
            }
            _ => Err(Error::InvalidConstant {
                index,
                reason: "expected InvokeDynamic",
            }),
        }
    }

    /// Finds a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Member> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Finds a method by name and descriptor.
    #[must_use]
    pub fn method(&self, name: &str, descriptor: &str) -> Option<&Member> {
        self.methods
            .iter()
            .find(|m| m.name == name && m.descriptor == descriptor)
    }

    /// Decodes the `Code` attribute of a method, if present.
    ///
    /// # Errors
    /// Returns an error if the attribute is malformed.
    pub fn code(&self, method: &Member) -> Result<Option<CodeAttribute>> {
        let Some(attribute) = method.attribute("Code") else {
            return Ok(None);
        };
        let mut reader = ByteReader::new(&attribute.data);
        let max_stack = reader.read_u16()?;
        let max_locals = reader.read_u16()?;
        let length = reader.read_u32()? as usize;
        let bytes = reader.read_bytes(length)?.to_vec();
        let exceptions = reader.read_u16()?;
        reader.read_bytes(exceptions as usize * 8)?;
        let attributes = self.read_attributes(&mut reader)?;
        Ok(Some(CodeAttribute {
            max_stack,
            max_locals,
            bytes,
            attributes,
        }))
    }

    /// Decodes the `RuntimeVisibleAnnotations` of a member.
    ///
    /// Returns an empty list when the attribute is absent.
    ///
    /// # Errors
    /// Returns an error if the attribute is malformed or uses element
    /// values other than strings.
    pub fn annotations(&self, member: &Member) -> Result<Vec<Annotation>> {
        match member.attribute(RUNTIME_VISIBLE_ANNOTATIONS) {
            None => Ok(Vec::new()),
            Some(attribute) => {
                let mut reader = ByteReader::new(&attribute.data);
                self.read_annotation_list(&mut reader)
            }
        }
    }

    /// Decodes the `RuntimeVisibleParameterAnnotations` of a method.
    ///
    /// # Errors
    /// Returns an error if the attribute is malformed.
    pub fn parameter_annotations(&self, method: &Member) -> Result<Vec<Vec<Annotation>>> {
        match method.attribute(RUNTIME_VISIBLE_PARAMETER_ANNOTATIONS) {
            None => Ok(Vec::new()),
            Some(attribute) => {
                let mut reader = ByteReader::new(&attribute.data);
                let count = reader.read_u8()?;
                (0..count)
                    .map(|_| self.read_annotation_list(&mut reader))
                    .collect()
            }
        }
    }

    /// Decodes the `BootstrapMethods` attribute.
    ///
    /// # Errors
    /// Returns an error if the attribute or a referenced constant is malformed.
    pub fn bootstrap_methods(&self) -> Result<Vec<BootstrapMethodInfo>> {
        let Some(attribute) = self.attributes.iter().find(|a| a.name == "BootstrapMethods") else {
            return Ok(Vec::new());
        };
        let mut reader = ByteReader::new(&attribute.data);
        let count = reader.read_u16()?;
        let mut methods = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let handle = reader.read_u16()?;
            let (kind, method) = match self.constant(handle)? {
                Constant::MethodHandle { kind, reference } => (*kind, self.member_ref(*reference)?),
                _ => {
                    return Err(Error::InvalidConstant {
                        index: handle,
                        reason: "expected MethodHandle",
                    });
                }
            };
            let argument_count = reader.read_u16()?;
            let mut arguments = Vec::with_capacity(argument_count as usize);
            for _ in 0..argument_count {
                let index = reader.read_u16()?;
                let argument = match self.constant(index)? {
                    Constant::String(utf8) => BootstrapArgument::String(self.utf8(*utf8)?.to_string()),
                    Constant::Integer(value) => BootstrapArgument::Integer(*value),
                    Constant::Class(name) => BootstrapArgument::Class(self.utf8(*name)?.to_string()),
                    _ => {
                        return Err(Error::InvalidConstant {
                            index,
                            reason: "unsupported bootstrap argument",
                        });
                    }
                };
                arguments.push(argument);
            }
            methods.push(BootstrapMethodInfo {
                kind,
                method,
                arguments,
            });
        }
        Ok(methods)
    }

    fn read_members(&self, reader: &mut ByteReader<'_>) -> Result<Vec<Member>> {
        let count = reader.read_u16()?;
        let mut members = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let access_flags = reader.read_u16()?;
            let name = self.utf8(reader.read_u16()?)?.to_string();
            let descriptor = self.utf8(reader.read_u16()?)?.to_string();
            let attributes = self.read_attributes(reader)?;
            members.push(Member {
                access_flags,
                name,
                descriptor,
                attributes,
            });
        }
        Ok(members)
    }

    fn read_attributes(&self, reader: &mut ByteReader<'_>) -> Result<Vec<Attribute>> {
        let count = reader.read_u16()?;
        let mut attributes = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let name = self.utf8(reader.read_u16()?)?.to_string();
            let length = reader.read_u32()? as usize;
            let data = reader.read_bytes(length)?.to_vec();
            attributes.push(Attribute { name, data });
        }
        Ok(attributes)
    }

    fn read_annotation_list(&self, reader: &mut ByteReader<'_>) -> Result<Vec<Annotation>> {
        let count = reader.read_u16()?;
        let mut annotations = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let type_descriptor = self.utf8(reader.read_u16()?)?.to_string();
            let pairs = reader.read_u16()?;
            let mut elements = Vec::with_capacity(pairs as usize);
            for _ in 0..pairs {
                let name = self.utf8(reader.read_u16()?)?.to_string();
                let tag = reader.read_u8()?;
                if tag != b's' {
                    return Err(Error::malformed(format!(
                        "unsupported annotation element tag '{}'",
                        tag as char
                    )));
                }
                let value = self.utf8(reader.read_u16()?)?.to_string();
                elements.push((name, value));
            }
            annotations.push(Annotation {
                type_descriptor,
                elements,
            });
        }
        Ok(annotations)
    }
}

fn read_constants(reader: &mut ByteReader<'_>) -> Result<Vec<Option<Constant>>> {
    let count = reader.read_u16()?;
    let mut constants = Vec::with_capacity(count as usize);
    constants.push(None);
    for index in 1..count {
        let tag = reader.read_u8()?;
        let constant = match tag {
            TAG_UTF8 => {
                let length = reader.read_u16()? as usize;
                let offset = reader.position();
                Constant::Utf8(decode_modified_utf8(reader.read_bytes(length)?, offset)?)
            }
            TAG_INTEGER => Constant::Integer(reader.read_i32()?),
            TAG_CLASS => Constant::Class(reader.read_u16()?),
            TAG_STRING => Constant::String(reader.read_u16()?),
            TAG_FIELD_REF => Constant::FieldRef {
                class: reader.read_u16()?,
                name_and_type: reader.read_u16()?,
            },
            TAG_METHOD_REF => Constant::MethodRef {
                class: reader.read_u16()?,
                name_and_type: reader.read_u16()?,
            },
            TAG_NAME_AND_TYPE => Constant::NameAndType {
                name: reader.read_u16()?,
                descriptor: reader.read_u16()?,
            },
            TAG_METHOD_HANDLE => {
                let kind = reader.read_u8()?;
                let kind = ReferenceKind::from_u8(kind).ok_or(Error::InvalidConstant {
                    index,
                    reason: "unsupported method handle kind",
                })?;
                Constant::MethodHandle {
                    kind,
                    reference: reader.read_u16()?,
                }
            }
            TAG_INVOKE_DYNAMIC => Constant::InvokeDynamic {
                bootstrap: reader.read_u16()?,
                name_and_type: reader.read_u16()?,
            },
            tag => return Err(Error::UnsupportedConstant { tag, index }),
        };
        constants.push(Some(constant));
    }
    Ok(constants)
}
