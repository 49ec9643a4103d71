//! Stack map frames for the type-checking verifier.
//!
//! Every frame is written as a `full_frame`. It is never the most compact
//! form, but it is always valid and needs no knowledge of the previous
//! frame.

use crate::buffer::ByteWriter;
use crate::constant_pool::ConstantPool;
use crate::error::{Result, u16_count};

const FULL_FRAME: u8 = 255;

/// Verification type of a local variable or operand stack entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VerificationType {
    /// `int`, `boolean`, `byte`, `char`, `short`.
    Integer,
    /// `double` (two slots).
    Double,
    /// Reference to a class or array, by `CONSTANT_Class` name.
    Object(String),
}

impl VerificationType {
    /// Slots occupied on the stack or in the locals array.
    #[must_use]
    pub const fn slots(&self) -> u16 {
        match self {
            Self::Double => 2,
            _ => 1,
        }
    }

    fn encode(&self, pool: &mut ConstantPool, out: &mut ByteWriter) -> Result<()> {
        match self {
            Self::Integer => out.write_u8(1),
            Self::Double => out.write_u8(3),
            Self::Object(name) => {
                let class = pool.class(name)?;
                out.write_u8(7);
                out.write_u16(class);
            }
        }
        Ok(())
    }
}

/// Types of the locals and operand stack at a branch target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Frame {
    /// Local variable types, one entry per value (a `Double` covers two slots).
    pub locals: Vec<VerificationType>,
    /// Operand stack types, bottom first.
    pub stack: Vec<VerificationType>,
}

impl Frame {
    /// Creates a frame with the given locals and an empty stack.
    #[must_use]
    pub fn new(locals: Vec<VerificationType>) -> Self {
        Self {
            locals,
            stack: Vec::new(),
        }
    }

    /// Returns a copy of this frame with `stack` as the operand stack.
    #[must_use]
    pub fn with_stack(&self, stack: Vec<VerificationType>) -> Self {
        Self {
            locals: self.locals.clone(),
            stack,
        }
    }

    /// Operand stack depth in slots.
    #[must_use]
    pub fn stack_slots(&self) -> u16 {
        self.stack.iter().map(VerificationType::slots).sum()
    }

    fn encode(&self, offset_delta: u16, pool: &mut ConstantPool, out: &mut ByteWriter) -> Result<()> {
        out.write_u8(FULL_FRAME);
        out.write_u16(offset_delta);
        out.write_u16(u16_count(self.locals.len(), "frame locals")?);
        for local in &self.locals {
            local.encode(pool, out)?;
        }
        out.write_u16(u16_count(self.stack.len(), "frame stack items")?);
        for item in &self.stack {
            item.encode(pool, out)?;
        }
        Ok(())
    }
}

/// Encodes the body of a `StackMapTable` attribute.
///
/// `frames` must be sorted by bytecode offset with no duplicates.
pub(crate) fn encode_stack_map_table(
    frames: &[(usize, Frame)],
    pool: &mut ConstantPool,
    out: &mut ByteWriter,
) -> Result<()> {
    out.write_u16(u16_count(frames.len(), "stack map frames")?);
    let mut previous: Option<usize> = None;
    for (offset, frame) in frames {
        let delta = match previous {
            None => *offset,
            Some(prev) => offset - prev - 1,
        };
        // Offsets are bounded by the 64 KiB code limit.
        frame.encode(delta as u16, pool, out)?;
        previous = Some(*offset);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_slots() {
        let frame = Frame::new(vec![VerificationType::Object("A".into())])
            .with_stack(vec![VerificationType::Integer, VerificationType::Double]);
        assert_eq!(frame.stack_slots(), 3);
        assert_eq!(frame.locals.len(), 1);
    }

    #[test]
    fn test_encode_offset_deltas() {
        let mut pool = ConstantPool::new();
        let mut out = ByteWriter::new();
        let frames = vec![(5, Frame::default()), (9, Frame::default())];

        encode_stack_map_table(&frames, &mut pool, &mut out).unwrap();

        assert_eq!(
            out.as_slice(),
            &[0, 2, 255, 0, 5, 0, 0, 0, 0, 255, 0, 3, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_encode_object_type_uses_class_constant() {
        let mut pool = ConstantPool::new();
        let mut out = ByteWriter::new();
        let frame = Frame::new(vec![VerificationType::Object("Person".into())])
            .with_stack(vec![VerificationType::Integer]);

        encode_stack_map_table(&[(0, frame)], &mut pool, &mut out).unwrap();

        // Utf8 "Person" is #1, Class is #2
        assert_eq!(
            out.as_slice(),
            &[0, 1, 255, 0, 0, 0, 1, 7, 0, 2, 0, 1, 1]
        );
    }
}
