//! Bytecode builder.
//!
//! [`CodeBuilder`] appends instructions, tracks the operand stack depth and
//! local variable usage, resolves forward branches through [`Label`]s, and
//! collects the stack map frame declared at every branch target.
//!
//! Instruction methods return `&mut Self` so bodies read as a chain. A
//! failure (constant pool overflow, stack underflow) is remembered and
//! reported once by [`CodeBuilder::finish`].

use crate::buffer::ByteWriter;
use crate::constant_pool::ConstantPool;
use crate::descriptor::{FieldType, MethodDescriptor};
use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::opcodes as op;

/// Branch target handle created by [`CodeBuilder::new_label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label(usize);

#[derive(Debug)]
struct Fixup {
    /// Offset of the branch opcode.
    instruction: usize,
    /// Offset of the 16-bit operand to patch.
    operand: usize,
    label: Label,
}

/// Finished method body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code {
    /// Maximum operand stack depth in slots.
    pub max_stack: u16,
    /// Size of the local variable array in slots.
    pub max_locals: u16,
    /// Instruction bytes.
    pub bytes: Vec<u8>,
    /// Stack map frames sorted by offset.
    pub frames: Vec<(usize, Frame)>,
}

/// Builder for a single method body.
pub struct CodeBuilder<'p> {
    pool: &'p mut ConstantPool,
    code: ByteWriter,
    labels: Vec<Option<usize>>,
    fixups: Vec<Fixup>,
    frames: Vec<(usize, Frame)>,
    stack: u16,
    max_stack: u16,
    max_locals: u16,
    error: Option<Error>,
}

impl<'p> CodeBuilder<'p> {
    /// Creates a builder whose locals start with `initial_locals` slots
    /// (`this` plus parameters).
    #[must_use]
    pub fn new(pool: &'p mut ConstantPool, initial_locals: u16) -> Self {
        Self {
            pool,
            code: ByteWriter::with_capacity(64),
            labels: Vec::new(),
            fixups: Vec::new(),
            frames: Vec::new(),
            stack: 0,
            max_stack: 0,
            max_locals: initial_locals,
            error: None,
        }
    }

    /// Current bytecode offset.
    #[must_use]
    pub fn position(&self) -> usize {
        self.code.position()
    }

    fn fail(&mut self, error: Error) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn adjust(&mut self, pop: u16, push: u16) {
        if self.stack < pop {
            let offset = self.position();
            self.fail(Error::StackUnderflow { offset });
            self.stack = 0;
        } else {
            self.stack -= pop;
        }
        self.stack += push;
        self.max_stack = self.max_stack.max(self.stack);
    }

    fn constant(&mut self, result: Result<u16>) -> u16 {
        result.unwrap_or_else(|e| {
            self.fail(e);
            0
        })
    }

    fn touch_local(&mut self, slot: u16, size: u16) {
        self.max_locals = self.max_locals.max(slot + size);
    }

    fn local_insn(&mut self, short_base: u8, long_op: u8, slot: u16) {
        if slot <= 3 {
            self.code.write_u8(short_base + slot as u8);
        } else if let Ok(slot) = u8::try_from(slot) {
            self.code.write_u8(long_op);
            self.code.write_u8(slot);
        } else {
            self.fail(Error::TooMany {
                kind: "local variable slots",
                count: slot as usize,
            });
        }
    }

    /// Creates an unbound label.
    pub fn new_label(&mut self) -> Label {
        self.labels.push(None);
        Label(self.labels.len() - 1)
    }

    /// Binds `label` to the current offset and records the frame that holds there.
    ///
    /// The tracked stack depth is reset to the frame's stack, so code after
    /// an unconditional jump continues from the declared state.
    pub fn bind(&mut self, label: Label, frame: Frame) -> &mut Self {
        let offset = self.position();
        self.labels[label.0] = Some(offset);
        self.stack = frame.stack_slots();
        self.max_stack = self.max_stack.max(self.stack);
        self.frames.push((offset, frame));
        self
    }

    fn branch(&mut self, opcode: u8, label: Label, pop: u16) -> &mut Self {
        let instruction = self.position();
        self.code.write_u8(opcode);
        let operand = self.position();
        self.code.write_i16(0);
        self.fixups.push(Fixup {
            instruction,
            operand,
            label,
        });
        self.adjust(pop, 0);
        self
    }

    /// `aload`
    pub fn aload(&mut self, slot: u16) -> &mut Self {
        self.local_insn(op::ALOAD_0, op::ALOAD, slot);
        self.touch_local(slot, 1);
        self.adjust(0, 1);
        self
    }

    /// Loads a local of the given type (`iload`, `dload` or `aload`).
    pub fn load(&mut self, slot: u16, ty: &FieldType) -> &mut Self {
        match ty {
            FieldType::Boolean | FieldType::Int => self.local_insn(op::ILOAD_0, op::ILOAD, slot),
            FieldType::Double => self.local_insn(op::DLOAD_0, op::DLOAD, slot),
            _ => self.local_insn(op::ALOAD_0, op::ALOAD, slot),
        }
        self.touch_local(slot, ty.slot_size());
        self.adjust(0, ty.slot_size());
        self
    }

    /// Pushes an int constant using the shortest encoding.
    pub fn iconst(&mut self, value: i32) -> &mut Self {
        match value {
            -1..=5 => self.code.write_u8((op::ICONST_M1 as i32 + 1 + value) as u8),
            -128..=127 => {
                self.code.write_u8(op::BIPUSH);
                self.code.write_u8(value as i8 as u8);
            }
            -32768..=32767 => {
                self.code.write_u8(op::SIPUSH);
                self.code.write_i16(value as i16);
            }
            _ => {
                let result = self.pool.integer(value);
                let index = self.constant(result);
                if let Ok(short) = u8::try_from(index) {
                    self.code.write_u8(op::LDC);
                    self.code.write_u8(short);
                } else {
                    self.code.write_u8(op::LDC_W);
                    self.code.write_u16(index);
                }
            }
        }
        self.adjust(0, 1);
        self
    }

    /// `imul`
    pub fn imul(&mut self) -> &mut Self {
        self.code.write_u8(op::IMUL);
        self.adjust(2, 1);
        self
    }

    /// `iadd`
    pub fn iadd(&mut self) -> &mut Self {
        self.code.write_u8(op::IADD);
        self.adjust(2, 1);
        self
    }

    /// `dup`
    pub fn dup(&mut self) -> &mut Self {
        self.code.write_u8(op::DUP);
        self.adjust(1, 2);
        self
    }

    /// `pop`
    pub fn pop(&mut self) -> &mut Self {
        self.code.write_u8(op::POP);
        self.adjust(1, 0);
        self
    }

    /// `getfield owner.name : ty`
    pub fn getfield(&mut self, owner: &str, name: &str, ty: &FieldType) -> &mut Self {
        let result = self.pool.field_ref(owner, name, &ty.descriptor());
        let index = self.constant(result);
        self.code.write_u8(op::GETFIELD);
        self.code.write_u16(index);
        self.adjust(1, ty.slot_size());
        self
    }

    /// `putfield owner.name : ty`
    pub fn putfield(&mut self, owner: &str, name: &str, ty: &FieldType) -> &mut Self {
        let result = self.pool.field_ref(owner, name, &ty.descriptor());
        let index = self.constant(result);
        self.code.write_u8(op::PUTFIELD);
        self.code.write_u16(index);
        self.adjust(1 + ty.slot_size(), 0);
        self
    }

    fn invoke(
        &mut self,
        opcode: u8,
        owner: &str,
        name: &str,
        descriptor: &MethodDescriptor,
        receiver: u16,
    ) -> &mut Self {
        let result = self.pool.method_ref(owner, name, &descriptor.descriptor());
        let index = self.constant(result);
        self.code.write_u8(opcode);
        self.code.write_u16(index);
        self.adjust(
            receiver + descriptor.parameter_slots(),
            descriptor.return_slots(),
        );
        self
    }

    /// `invokevirtual`
    pub fn invokevirtual(&mut self, owner: &str, name: &str, descriptor: &MethodDescriptor) -> &mut Self {
        self.invoke(op::INVOKEVIRTUAL, owner, name, descriptor, 1)
    }

    /// `invokespecial`
    pub fn invokespecial(&mut self, owner: &str, name: &str, descriptor: &MethodDescriptor) -> &mut Self {
        self.invoke(op::INVOKESPECIAL, owner, name, descriptor, 1)
    }

    /// `invokestatic`
    pub fn invokestatic(&mut self, owner: &str, name: &str, descriptor: &MethodDescriptor) -> &mut Self {
        self.invoke(op::INVOKESTATIC, owner, name, descriptor, 0)
    }

    /// `invokedynamic` on a prepared `CONSTANT_InvokeDynamic` entry.
    ///
    /// # Arguments
    /// * `index` - Pool index of the call site
    /// * `descriptor` - Call site type, used for stack accounting
    pub fn invokedynamic(&mut self, index: u16, descriptor: &MethodDescriptor) -> &mut Self {
        self.code.write_u8(op::INVOKEDYNAMIC);
        self.code.write_u16(index);
        self.code.write_u16(0);
        self.adjust(descriptor.parameter_slots(), descriptor.return_slots());
        self
    }

    /// `checkcast`
    pub fn checkcast(&mut self, class_name: &str) -> &mut Self {
        let result = self.pool.class(class_name);
        let index = self.constant(result);
        self.code.write_u8(op::CHECKCAST);
        self.code.write_u16(index);
        self.adjust(1, 1);
        self
    }

    /// `instanceof`
    pub fn instanceof(&mut self, class_name: &str) -> &mut Self {
        let result = self.pool.class(class_name);
        let index = self.constant(result);
        self.code.write_u8(op::INSTANCEOF);
        self.code.write_u16(index);
        self.adjust(1, 1);
        self
    }

    /// `ifeq`
    pub fn ifeq(&mut self, label: Label) -> &mut Self {
        self.branch(op::IFEQ, label, 1)
    }

    /// `ifne`
    pub fn ifne(&mut self, label: Label) -> &mut Self {
        self.branch(op::IFNE, label, 1)
    }

    /// `ifnull`
    pub fn ifnull(&mut self, label: Label) -> &mut Self {
        self.branch(op::IFNULL, label, 1)
    }

    /// `ifnonnull`
    pub fn ifnonnull(&mut self, label: Label) -> &mut Self {
        self.branch(op::IFNONNULL, label, 1)
    }

    /// `if_icmpne`
    pub fn if_icmpne(&mut self, label: Label) -> &mut Self {
        self.branch(op::IF_ICMPNE, label, 2)
    }

    /// `if_acmpeq`
    pub fn if_acmpeq(&mut self, label: Label) -> &mut Self {
        self.branch(op::IF_ACMPEQ, label, 2)
    }

    /// `goto`
    pub fn goto(&mut self, label: Label) -> &mut Self {
        self.branch(op::GOTO, label, 0)
    }

    /// `return` from a `void` method.
    pub fn return_void(&mut self) -> &mut Self {
        self.code.write_u8(op::RETURN);
        self
    }

    /// Returns a value of the given type (`ireturn`, `dreturn` or `areturn`).
    pub fn return_value(&mut self, ty: &FieldType) -> &mut Self {
        let opcode = match ty {
            FieldType::Boolean | FieldType::Int => op::IRETURN,
            FieldType::Double => op::DRETURN,
            _ => op::ARETURN,
        };
        self.code.write_u8(opcode);
        self.adjust(ty.slot_size(), 0);
        self
    }

    /// Resolves branches and returns the finished body.
    ///
    /// # Errors
    /// Returns the first error recorded while building, or an error for
    /// unbound labels, out-of-range branches, oversized code or
    /// conflicting frames.
    pub fn finish(mut self) -> Result<Code> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }

        for fixup in &self.fixups {
            let target = self.labels[fixup.label.0].ok_or(Error::UnboundLabel {
                label: fixup.label.0,
            })?;
            let offset = target as i64 - fixup.instruction as i64;
            let offset = i16::try_from(offset).map_err(|_| Error::BranchOutOfRange { offset })?;
            self.code.patch_i16(fixup.operand, offset);
        }

        let length = self.code.len();
        if length > u16::MAX as usize {
            return Err(Error::CodeTooLarge { length });
        }

        self.frames.sort_by_key(|(offset, _)| *offset);
        let mut frames: Vec<(usize, Frame)> = Vec::with_capacity(self.frames.len());
        for (offset, frame) in self.frames {
            match frames.last() {
                Some((last, existing)) if *last == offset => {
                    if *existing != frame {
                        return Err(Error::ConflictingFrames { offset });
                    }
                }
                _ => frames.push((offset, frame)),
            }
        }

        Ok(Code {
            max_stack: self.max_stack,
            max_locals: self.max_locals,
            bytes: self.code.into_inner(),
            frames,
        })
    }
}
