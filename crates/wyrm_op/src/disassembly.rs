//! Human-readable instruction dump (ambient debug tooling, SPEC_FULL §6).
//! Not part of the wire contract — used by tests and `FuncArtifact`'s
//! `Display` impl in `wyrm_value`.

use std::fmt;

use crate::instruction::read_word;
use crate::opcode::{Opcode, WORD_SIZE};

/// One decoded instruction: its opcode, the byte offset it started at, and
/// its operand words in the order they appear in the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedInstruction {
  pub offset: usize,
  pub opcode: Opcode,
  pub operands: Vec<u32>,
}

impl fmt::Display for DecodedInstruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:04x}  {}", self.offset, self.opcode.mnemonic())?;
    for operand in &self.operands {
      write!(f, " {operand}")?;
    }
    Ok(())
  }
}

/// Decodes the single instruction starting at `offset`, returning it along
/// with the offset just past it.
///
/// # Panics
///
/// Panics if `offset` is not the start of a valid instruction, or if the
/// buffer ends before the opcode's declared operand count is satisfied. A
/// finished `FuncArtifact`'s code is always well-formed by construction
/// (spec §4.3.4, invariant 5); malformed input here means the artifact was
/// built some other way and is a caller bug.
pub fn disassemble_one(code: &[u8], offset: usize) -> (DecodedInstruction, usize) {
  let opcode = Opcode::try_from(code[offset])
    .unwrap_or_else(|byte| panic!("unknown opcode byte {byte:#04x} at offset {offset:#06x}"));
  let mut cursor = offset + 1;
  let mut operands = Vec::with_capacity(opcode.operand_count());
  for _ in 0..opcode.operand_count() {
    operands.push(read_word(code, cursor));
    cursor += WORD_SIZE;
  }
  (
    DecodedInstruction {
      offset,
      opcode,
      operands,
    },
    cursor,
  )
}

/// Decodes an entire instruction stream from start to end.
pub fn disassemble(code: &[u8]) -> Vec<DecodedInstruction> {
  let mut out = Vec::new();
  let mut offset = 0;
  while offset < code.len() {
    let (instruction, next) = disassemble_one(code, offset);
    out.push(instruction);
    offset = next;
  }
  out
}
