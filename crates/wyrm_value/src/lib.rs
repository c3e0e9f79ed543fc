//! The constant-pool value representation (spec §3, "Any-value") and the
//! finished function artifact handed off to the out-of-scope object runtime
//! (spec §6).
//!
//! The writer treats values as opaque: it never inspects a `Value` beyond
//! storing it and handing back its pool index. A plain tagged enum is
//! therefore the faithful encoding here, not the teacher's NaN-boxed 64-bit
//! runtime `Value` — that representation buys call-stack-hot-path
//! performance this crate has no call stack to exercise, at the cost of
//! `unsafe` this crate has no reason to carry.

pub mod object;

use std::fmt;
use std::rc::Rc;

pub use object::func::FuncArtifact;

/// Anything that can live in the constant pool or be pushed by `PUSH` /
/// `PUSH_SELF`. Mirrors the teacher's `Value` in shape, not in
/// representation: `Object` boxes the out-of-scope heap types behind an
/// `Rc` rather than a GC handle, since this crate owns no allocator or
/// collector (spec §1, §6 — object runtime and allocator are external
/// collaborators).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  Nil,
  Int(i32),
  Char(u8),
  Object(Rc<HeapValue>),
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Nil => write!(f, "nil"),
      Value::Int(n) => write!(f, "{n}"),
      Value::Char(c) => write!(f, "'{}'", *c as char),
      Value::Object(obj) => write!(f, "{obj}"),
    }
  }
}

impl From<i32> for Value {
  fn from(n: i32) -> Self {
    Value::Int(n)
  }
}

impl From<HeapValue> for Value {
  fn from(heap: HeapValue) -> Self {
    Value::Object(Rc::new(heap))
  }
}

/// Stand-in for the out-of-scope object runtime's heap-allocated values.
/// Just enough shape to exercise `LOAD_CONST` / `LOAD_FUNCREF` / `SEND`
/// without pulling in a garbage collector: a `Symbol` is a method or field
/// name (what `SEND`'s selector operand indexes into the pool), a `Str` is
/// a string literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeapValue {
  Symbol(String),
  Str(String),
}

impl fmt::Display for HeapValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      HeapValue::Symbol(name) => write!(f, "#{name}"),
      HeapValue::Str(s) => write!(f, "{s:?}"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display_matches_expected_forms() {
    assert_eq!(Value::Nil.to_string(), "nil");
    assert_eq!(Value::Int(-3).to_string(), "-3");
    assert_eq!(Value::Char(b'x').to_string(), "'x'");
    assert_eq!(
      Value::from(HeapValue::Symbol("foo".into())).to_string(),
      "#foo"
    );
  }

  #[test]
  fn object_values_compare_by_underlying_heap_value() {
    let a = Value::from(HeapValue::Str("hi".into()));
    let b = Value::from(HeapValue::Str("hi".into()));
    assert_eq!(a, b);
  }
}
