//! The six concrete scenarios from spec §8, reproduced verbatim as
//! acceptance tests, plus property-style checks of the invariants they
//! illustrate.

use wyrm_op::{Opcode, WORD_SIZE};
use wyrm_value::{HeapValue, Value};

use crate::{disassemble_artifact, CodeWriter};

fn word(value: u32) -> [u8; 4] {
  value.to_le_bytes()
}

/// Scenario 1: Empty return.
#[test]
fn scenario_empty_return() {
  let mut writer = CodeWriter::new();
  writer.return_().unwrap();
  let artifact = writer.finish().unwrap();

  assert_eq!(artifact.code, vec![Opcode::Return as u8]);
  assert_eq!(artifact.num_locals, 1);
  assert!(!artifact.varargs);
  assert!(artifact.constants.is_empty());
}

/// Scenario 2: Load-and-send.
/// `LOAD_CONST, 00 00 00 00, SEND, 01 00 00 00, 00 00 00 00, RETURN`
/// Pool: `[int 7, symbol "foo"]`.
#[test]
fn scenario_load_and_send() {
  let mut writer = CodeWriter::new();
  writer.load_const(Value::Int(7)).unwrap();
  writer.send(HeapValue::Symbol("foo".into()), 0).unwrap();
  writer.return_().unwrap();
  let artifact = writer.finish().unwrap();

  let mut expected = vec![Opcode::LoadConst as u8];
  expected.extend_from_slice(&word(0));
  expected.push(Opcode::Send as u8);
  expected.extend_from_slice(&word(1));
  expected.extend_from_slice(&word(0));
  expected.push(Opcode::Return as u8);

  assert_eq!(artifact.code, expected);
  assert_eq!(artifact.constants, vec![
    Value::Int(7),
    Value::from(HeapValue::Symbol("foo".into())),
  ]);
}

/// Scenario 3: Forward branch. The branch operand at offset 1 must, after
/// placement, contain the offset of the instruction after `load_self`
/// (= 1 + w + 1 = 6).
#[test]
fn scenario_forward_branch() {
  let mut writer = CodeWriter::new();
  let label = writer.open_label().unwrap();
  writer.jump_if(label).unwrap();
  writer.load_self().unwrap();
  writer.place_label(label).unwrap();
  writer.return_().unwrap();
  writer.close_label(label).unwrap();
  let artifact = writer.finish().unwrap();

  assert_eq!(artifact.code[0], Opcode::JumpIf as u8);
  let operand = u32::from_le_bytes(artifact.code[1..1 + WORD_SIZE].try_into().unwrap());
  assert_eq!(operand, 1 + WORD_SIZE as u32 + 1);
  assert_eq!(operand, 6);
}

/// Scenario 4: Backward branch. The jump operand equals 0 (the recorded
/// placement offset). No pending slot used.
#[test]
fn scenario_backward_branch() {
  let mut writer = CodeWriter::new();
  let label = writer.open_label().unwrap();
  writer.place_label(label).unwrap();
  writer.load_self().unwrap();
  writer.jump(label).unwrap();
  writer.return_().unwrap();
  let artifact = writer.finish().unwrap();

  let jump_offset = 1;
  assert_eq!(artifact.code[jump_offset], Opcode::Jump as u8);
  let operand = u32::from_le_bytes(
    artifact.code[jump_offset + 1..jump_offset + 1 + WORD_SIZE]
      .try_into()
      .unwrap(),
  );
  assert_eq!(operand, 0);
}

/// Scenario 5: Multiple references. Both branch operand positions, after
/// placement, contain the offset of the `RETURN` instruction.
#[test]
fn scenario_multiple_references() {
  let mut writer = CodeWriter::new();
  let label = writer.open_label().unwrap();
  writer.jump(label).unwrap();
  writer.jump_if_not(label).unwrap();
  writer.place_label(label).unwrap();
  writer.return_().unwrap();
  let artifact = writer.finish().unwrap();

  let return_offset = artifact.code.len() - 1;
  let first_operand = u32::from_le_bytes(artifact.code[1..1 + WORD_SIZE].try_into().unwrap());
  let second_offset = 1 + WORD_SIZE + 1;
  let second_operand =
    u32::from_le_bytes(artifact.code[second_offset..second_offset + WORD_SIZE].try_into().unwrap());

  assert_eq!(first_operand, return_offset as u32);
  assert_eq!(second_operand, return_offset as u32);
}

/// Scenario 6: Varargs + locals.
#[test]
fn scenario_varargs_and_locals() {
  let mut writer = CodeWriter::new();
  writer.report_locals(3);
  writer.enable_varargs();
  writer.return_().unwrap();
  let artifact = writer.finish().unwrap();

  assert_eq!(artifact.num_locals, 4);
  assert!(artifact.varargs);
  assert_eq!(artifact.code.len(), 1);
}

#[test]
fn disassembly_snapshot_of_load_and_send() {
  let mut writer = CodeWriter::new();
  writer.load_const(Value::Int(7)).unwrap();
  writer.send(HeapValue::Symbol("foo".into()), 0).unwrap();
  writer.return_().unwrap();
  let artifact = writer.finish().unwrap();

  insta::assert_snapshot!(disassemble_artifact(&artifact), @r###"
  0000  load_const 0
  0005  send 1 0
  000e  return
  "###);
}

#[test]
fn disassembly_snapshot_of_forward_branch() {
  let mut writer = CodeWriter::new();
  let label = writer.open_label().unwrap();
  writer.jump_if(label).unwrap();
  writer.load_self().unwrap();
  writer.place_label(label).unwrap();
  writer.return_().unwrap();
  writer.close_label(label).unwrap();
  let artifact = writer.finish().unwrap();

  insta::assert_snapshot!(disassemble_artifact(&artifact), @r###"
  0000  jump_if 6
  0005  load_self
  0006  return
  "###);
}

mod properties {
  use super::*;
  use proptest::prelude::*;

  proptest! {
    /// *Append monotonicity* (spec §8): every successful emission call
    /// grows the buffer by exactly `1 + sum(operand_widths)` bytes.
    #[test]
    fn load_const_grows_buffer_by_opcode_plus_one_word(values in proptest::collection::vec(any::<i32>(), 0..32)) {
      let mut writer = CodeWriter::new();
      for v in values {
        let before = writer.len();
        writer.load_const(Value::Int(v)).unwrap();
        prop_assert_eq!(writer.len(), before + 1 + WORD_SIZE);
      }
    }

    /// *Constant pool stability* (spec §8): reading index `i` after
    /// further appends still returns the originally appended value.
    #[test]
    fn pool_indices_remain_stable_after_further_pushes(ints in proptest::collection::vec(any::<i32>(), 1..32)) {
      let mut writer = CodeWriter::new();
      for &v in &ints {
        writer.load_const(Value::Int(v)).unwrap();
      }
      writer.return_().unwrap();
      let artifact = writer.finish().unwrap();
      for (index, &expected) in ints.iter().enumerate() {
        prop_assert_eq!(&artifact.constants[index], &Value::Int(expected));
      }
    }

    /// *max_locals monotonicity* (spec §8): the finished local count is
    /// `max(n1..nk) + 1`.
    #[test]
    fn max_locals_tracks_the_largest_report(reports in proptest::collection::vec(0u32..10_000, 1..32)) {
      let mut writer = CodeWriter::new();
      for &n in &reports {
        writer.report_locals(n);
      }
      writer.return_().unwrap();
      let artifact = writer.finish().unwrap();
      prop_assert_eq!(artifact.num_locals, reports.iter().copied().max().unwrap() + 1);
    }
  }
}
