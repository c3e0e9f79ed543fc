//! Fixed-width operand encoding on top of a plain byte vector (spec §4.1,
//! §4.3.2). These are free functions rather than methods on a buffer type:
//! `wyrm_op` has no buffer of its own, only the wire format, so the writer's
//! `ByteBuffer` calls into these against its own `Vec<u8>`.

use crate::opcode::{Opcode, WORD_SIZE};

/// Appends a single opcode byte. Callers are responsible for following it
/// with `Opcode::operand_count()` words via [`encode_word`].
pub fn encode_op(out: &mut Vec<u8>, op: Opcode) {
  out.push(op as u8);
}

/// Appends one operand word, little-endian, per spec §3 ("Operand word").
pub fn encode_word(out: &mut Vec<u8>, value: u32) {
  out.extend_from_slice(&value.to_le_bytes());
}

/// Overwrites the word at `offset` in place, used by label placement to
/// patch a previously emitted jump target (spec §4.3.3, invariant 2).
///
/// # Panics
///
/// Panics if `offset + WORD_SIZE` exceeds `buf.len()`. A patch site recorded
/// by the writer is always within bounds by construction; an out-of-bounds
/// patch indicates a code writer bug, not a caller input error.
pub fn patch_word(buf: &mut [u8], offset: usize, value: u32) {
  let bytes = value.to_le_bytes();
  buf[offset..offset + WORD_SIZE].copy_from_slice(&bytes);
}

/// Reads the word at `offset`, used by disassembly and by tests asserting
/// on patched jump targets.
///
/// # Panics
///
/// Panics if `offset + WORD_SIZE` exceeds `buf.len()`.
pub fn read_word(buf: &[u8], offset: usize) -> u32 {
  let mut bytes = [0u8; WORD_SIZE];
  bytes.copy_from_slice(&buf[offset..offset + WORD_SIZE]);
  u32::from_le_bytes(bytes)
}
