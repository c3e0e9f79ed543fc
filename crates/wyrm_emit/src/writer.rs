//! The code writer (spec §4.3): the emission façade that turns semantic
//! calls into concrete opcode/operand bytes, drives the label table, and
//! finalizes a [`FuncArtifact`].

use wyrm_op::{Opcode, WORD_SIZE};
use wyrm_value::{FuncArtifact, Value};

use crate::buffer::ByteBuffer;
pub use crate::label::LabelId;
use crate::label::LabelTable;
use crate::pool::ConstantPool;
use crate::EmitError;

/// The writer's tunable size bounds (SPEC_FULL §7). Both of the spec's "left
/// to the implementer" defaults are collected here instead of living as
/// magic numbers inside `CodeWriter::new`.
#[derive(Debug, Clone, Copy)]
pub struct EmitConfig {
  /// Starting byte capacity of the instruction buffer (spec §4.3:
  /// "starting capacity ≥ 128 bytes").
  pub initial_buffer_capacity: usize,
  /// Maximum number of live labels the table will track before refusing
  /// `open_label` (spec §9: "implementers should pick a cap ... and
  /// document it").
  pub label_capacity: usize,
  /// Ceiling on instruction-buffer growth, in bytes. Defaults to the
  /// largest offset an operand word can address, since a code offset past
  /// this point could never be resolved by a jump anyway.
  pub max_code_size: usize,
}

impl Default for EmitConfig {
  fn default() -> Self {
    Self {
      initial_buffer_capacity: 128,
      label_capacity: 1024,
      max_code_size: u32::MAX as usize,
    }
  }
}

/// A single function body under construction. Created fresh per function,
/// driven by one compiler activity, and consumed by [`CodeWriter::finish`]
/// (spec §5: "strictly single-threaded and not shared").
#[derive(Debug)]
pub struct CodeWriter {
  buffer: ByteBuffer,
  pool: ConstantPool,
  labels: LabelTable,
  max_locals: u32,
  varargs: bool,
  poisoned: bool,
}

impl Default for CodeWriter {
  fn default() -> Self {
    Self::new()
  }
}

impl CodeWriter {
  pub fn new() -> Self {
    Self::with_config(EmitConfig::default())
  }

  pub fn with_config(config: EmitConfig) -> Self {
    Self {
      buffer: ByteBuffer::new(config.initial_buffer_capacity, config.max_code_size),
      pool: ConstantPool::new(),
      labels: LabelTable::new(config.label_capacity),
      max_locals: 0,
      varargs: false,
      poisoned: false,
    }
  }

  pub fn is_poisoned(&self) -> bool {
    self.poisoned
  }

  /// Current instruction buffer length, in bytes.
  pub fn len(&self) -> usize {
    self.buffer.len()
  }

  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  fn check_alive(&self) -> Result<(), EmitError> {
    if self.poisoned {
      Err(EmitError::Poisoned)
    } else {
      Ok(())
    }
  }

  fn poison(&mut self) -> EmitError {
    self.poison_with(EmitError::Poisoned)
  }

  /// Sets the sticky flag but returns a more specific diagnosis for the
  /// call that tripped it — every call after this one sees `Poisoned`
  /// instead (SPEC_FULL §7).
  fn poison_with(&mut self, err: EmitError) -> EmitError {
    self.poisoned = true;
    err
  }

  fn emit_op(&mut self, op: Opcode) -> Result<usize, EmitError> {
    self.buffer.push_op(op).map_err(|_| self.poison())
  }

  fn emit_word(&mut self, word: u32) -> Result<usize, EmitError> {
    self.buffer.push_word(word).map_err(|_| self.poison())
  }

  fn push_const(&mut self, value: Value) -> Result<u32, EmitError> {
    self.pool.push(value).map_err(|_| self.poison())
  }

  /// Emits a branch operand for `label`: a resolved target word if the
  /// label is already placed (a backward jump), or a patched-later
  /// placeholder if it is still open (a forward jump) — spec §4.3.3.
  fn emit_branch_operand(&mut self, label: LabelId) -> Result<(), EmitError> {
    let offset = self.emit_word(0)?;
    if let Some(target) = self.labels.reference(label, offset) {
      self.buffer.patch_word(offset, target);
    }
    Ok(())
  }

  // --- §4.3.1 local and flag reporting -----------------------------

  /// `max_locals ← max(max_locals, n)`. Idempotent.
  pub fn report_locals(&mut self, n: u32) {
    self.max_locals = self.max_locals.max(n);
  }

  /// Idempotent.
  pub fn enable_varargs(&mut self) {
    self.varargs = true;
  }

  // --- §4.3.2 emission primitives -----------------------------------

  pub fn load_self(&mut self) -> Result<(), EmitError> {
    self.check_alive()?;
    self.emit_op(Opcode::LoadSelf)?;
    Ok(())
  }

  pub fn load_const(&mut self, value: impl Into<Value>) -> Result<(), EmitError> {
    self.check_alive()?;
    let index = self.push_const(value.into())?;
    self.emit_op(Opcode::LoadConst)?;
    self.emit_word(index)?;
    Ok(())
  }

  pub fn load_array(&mut self, n: u32) -> Result<(), EmitError> {
    self.check_alive()?;
    self.emit_op(Opcode::LoadArray)?;
    self.emit_word(n)?;
    Ok(())
  }

  pub fn load_mapping(&mut self, n: u32) -> Result<(), EmitError> {
    self.check_alive()?;
    self.emit_op(Opcode::LoadMapping)?;
    self.emit_word(n)?;
    Ok(())
  }

  pub fn load_funcref(&mut self, name: impl Into<Value>) -> Result<(), EmitError> {
    self.check_alive()?;
    let index = self.push_const(name.into())?;
    self.emit_op(Opcode::LoadFuncref)?;
    self.emit_word(index)?;
    Ok(())
  }

  pub fn load_local(&mut self, index: u32) -> Result<(), EmitError> {
    self.check_alive()?;
    self.emit_op(Opcode::LoadLocal)?;
    self.emit_word(index)?;
    Ok(())
  }

  pub fn store_local(&mut self, index: u32) -> Result<(), EmitError> {
    self.check_alive()?;
    self.emit_op(Opcode::StoreLocal)?;
    self.emit_word(index)?;
    Ok(())
  }

  pub fn load_member(&mut self, index: u32) -> Result<(), EmitError> {
    self.check_alive()?;
    self.emit_op(Opcode::LoadMember)?;
    self.emit_word(index)?;
    Ok(())
  }

  pub fn store_member(&mut self, index: u32) -> Result<(), EmitError> {
    self.check_alive()?;
    self.emit_op(Opcode::StoreMember)?;
    self.emit_word(index)?;
    Ok(())
  }

  pub fn push_self(&mut self) -> Result<(), EmitError> {
    self.check_alive()?;
    self.emit_op(Opcode::PushSelf)?;
    Ok(())
  }

  pub fn push(&mut self) -> Result<(), EmitError> {
    self.check_alive()?;
    self.emit_op(Opcode::Push)?;
    Ok(())
  }

  pub fn pop(&mut self) -> Result<(), EmitError> {
    self.check_alive()?;
    self.emit_op(Opcode::Pop)?;
    Ok(())
  }

  pub fn return_(&mut self) -> Result<(), EmitError> {
    self.check_alive()?;
    self.emit_op(Opcode::Return)?;
    Ok(())
  }

  pub fn op(&mut self, secondary: u32) -> Result<(), EmitError> {
    self.check_alive()?;
    self.emit_op(Opcode::Op)?;
    self.emit_word(secondary)?;
    Ok(())
  }

  pub fn send(&mut self, message: impl Into<Value>, argc: u32) -> Result<(), EmitError> {
    self.check_alive()?;
    let index = self.push_const(message.into())?;
    self.emit_op(Opcode::Send)?;
    self.emit_word(index)?;
    self.emit_word(argc)?;
    Ok(())
  }

  pub fn super_send(&mut self, message: impl Into<Value>, argc: u32) -> Result<(), EmitError> {
    self.check_alive()?;
    let index = self.push_const(message.into())?;
    self.emit_op(Opcode::SuperSend)?;
    self.emit_word(index)?;
    self.emit_word(argc)?;
    Ok(())
  }

  pub fn jump(&mut self, label: LabelId) -> Result<(), EmitError> {
    self.check_alive()?;
    self.emit_op(Opcode::Jump)?;
    self.emit_branch_operand(label)
  }

  pub fn jump_if(&mut self, label: LabelId) -> Result<(), EmitError> {
    self.check_alive()?;
    self.emit_op(Opcode::JumpIf)?;
    self.emit_branch_operand(label)
  }

  pub fn jump_if_not(&mut self, label: LabelId) -> Result<(), EmitError> {
    self.check_alive()?;
    self.emit_op(Opcode::JumpIfNot)?;
    self.emit_branch_operand(label)
  }

  // --- §4.3.3 label protocol ------------------------------------------

  pub fn open_label(&mut self) -> Result<LabelId, EmitError> {
    self.check_alive()?;
    self.labels
      .open()
      .map_err(|_| self.poison_with(EmitError::LabelTableExhausted))
  }

  pub fn place_label(&mut self, label: LabelId) -> Result<(), EmitError> {
    self.check_alive()?;
    let target = self.buffer.len() as u32;
    self.labels.place(label, target, &mut self.buffer);
    Ok(())
  }

  pub fn close_label(&mut self, label: LabelId) -> Result<(), EmitError> {
    self.check_alive()?;
    self.labels.close(label);
    Ok(())
  }

  // --- §4.3.4 finalization ---------------------------------------------

  /// Consumes the writer, per spec §3's lifecycle ("consumed (moved
  /// from) by finish"). Refuses to produce an artifact with unresolved
  /// label references rather than emitting sentinel jump targets — the
  /// stricter of the two options spec §7 allows.
  pub fn finish(self) -> Result<FuncArtifact, EmitError> {
    if self.poisoned {
      return Err(EmitError::Poisoned);
    }
    let unresolved = self.labels.unresolved_count();
    if unresolved > 0 {
      return Err(EmitError::UnresolvedLabels(unresolved));
    }
    Ok(FuncArtifact::new(
      self.max_locals + 1,
      self.varargs,
      self.buffer.into_vec(),
      self.pool.into_vec(),
    ))
  }
}

const _: () = assert!(WORD_SIZE == 4);
