//! The constant pool (spec §4.2): an append-only table of constants,
//! indexed by operand-word-sized indices. Does not deduplicate — see
//! SPEC_FULL §3 for why that's the faithful reading of invariant 3, not a
//! missed optimization.

use wyrm_value::Value;

/// Returned when the pool has already grown to `u32::MAX` entries, the
/// largest index an operand word can carry (spec §3: "Operand word").
/// Unreachable in any realistic program, but the writer still poisons on it
/// rather than silently wrapping an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolExhausted;

#[derive(Debug, Clone, Default)]
pub struct ConstantPool {
  values: Vec<Value>,
}

impl ConstantPool {
  pub fn new() -> Self {
    Self { values: Vec::new() }
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  /// Appends `value`, returning its (permanent) index. Per invariant 3,
  /// once returned this index refers to `value` for the pool's lifetime —
  /// there is no removal or compaction API.
  pub fn push(&mut self, value: Value) -> Result<u32, PoolExhausted> {
    if self.values.len() >= u32::MAX as usize {
      return Err(PoolExhausted);
    }
    let index = self.values.len() as u32;
    self.values.push(value);
    Ok(index)
  }

  pub fn get(&self, index: u32) -> Option<&Value> {
    self.values.get(index as usize)
  }

  pub fn into_vec(self) -> Vec<Value> {
    self.values
  }

  pub fn as_slice(&self) -> &[Value] {
    &self.values
  }
}
