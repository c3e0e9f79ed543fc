//! The compiler-facing façade (spec §4.4, SPEC_FULL §4.4): a thin layer a
//! parser would drive. It owns no bytes of its own — every method forwards
//! to a borrowed [`CodeWriter`] — it only decides *which* writer call a
//! symbolic name or loop construct lowers to.

use beef::lean::Cow;
use std::collections::HashMap;

use crate::writer::{CodeWriter, LabelId};
use crate::EmitError;

/// One loop's break/continue targets, tracked on a stack so nested loops
/// resolve to their own innermost labels (mirrors the teacher's
/// `Scope`/loop-stack handling in `emit::ctx`).
struct LoopLabels {
  break_label: LabelId,
  continue_label: LabelId,
}

/// Tracks declared local names and loop targets for one function body,
/// lowering symbolic references to `CodeWriter` calls. Shadowing is
/// supported the way the teacher's `Function::locals: HashMap<Cow<str>,
/// Vec<Register>>` does: each name maps to a stack of slots, and declaring
/// an already-bound name pushes a new slot rather than overwriting it.
#[derive(Default)]
pub struct FunctionScope {
  locals: HashMap<Cow<'static, str>, Vec<u32>>,
  loops: Vec<LoopLabels>,
  next_local: u32,
}

impl FunctionScope {
  /// Local slot 0 is reserved for the implicit receiver (spec GLOSSARY:
  /// "Self ... occupies local slot 0 by convention"), so the first
  /// declared name gets slot 1.
  pub fn new() -> Self {
    Self {
      next_local: 1,
      ..Self::default()
    }
  }

  /// Declares `name` as a new local, returning its slot index. Shadows
  /// any outer binding of the same name until [`Self::undeclare`] pops it.
  pub fn declare(&mut self, name: impl Into<Cow<'static, str>>, writer: &mut CodeWriter) -> u32 {
    let slot = self.next_local;
    self.next_local += 1;
    writer.report_locals(slot);
    self.locals.entry(name.into()).or_default().push(slot);
    slot
  }

  /// Ends the innermost binding of `name`, exposing any shadowed outer
  /// binding again.
  pub fn undeclare(&mut self, name: &str) {
    if let Some(slots) = self.locals.get_mut(name) {
      slots.pop();
      if slots.is_empty() {
        self.locals.remove(name);
      }
    }
  }

  fn slot_of(&self, name: &str) -> Option<u32> {
    self.locals.get(name).and_then(|slots| slots.last().copied())
  }

  /// Loads `name`: a declared local loads directly, an undeclared name
  /// falls back to a member load against the implicit `self` receiver —
  /// the LPC-family self-send fallback spec §4.4 alludes to without
  /// specifying, since this crate has no notion of a free global.
  pub fn load_var(&self, name: &str, writer: &mut CodeWriter) -> Result<(), EmitError> {
    match self.slot_of(name) {
      Some(slot) => writer.load_local(slot),
      None => writer.load_member(member_index(name)),
    }
  }

  pub fn store_var(&self, name: &str, writer: &mut CodeWriter) -> Result<(), EmitError> {
    match self.slot_of(name) {
      Some(slot) => writer.store_local(slot),
      None => writer.store_member(member_index(name)),
    }
  }

  /// Opens a new loop's break/continue labels and pushes it as the
  /// innermost loop. `continue_label` is placed immediately, at the call
  /// site — the natural target for a `continue` is "re-enter the loop
  /// from here", which is exactly where a compiler would call this.
  pub fn push_loop(&mut self, writer: &mut CodeWriter) -> Result<(), EmitError> {
    let break_label = writer.open_label()?;
    let continue_label = writer.open_label()?;
    writer.place_label(continue_label)?;
    self.loops.push(LoopLabels {
      break_label,
      continue_label,
    });
    Ok(())
  }

  /// Places and closes the innermost loop's labels, popping it. A pop
  /// with no loop on the stack is a compiler-internal bug (the parser
  /// called this outside a loop); per SPEC_FULL §7 that is reported as a
  /// diagnostic rather than a panic, and is otherwise a no-op.
  pub fn pop_loop(&mut self, writer: &mut CodeWriter) -> Result<(), EmitError> {
    let loop_labels = match self.loops.pop() {
      Some(loop_labels) => loop_labels,
      None => {
        tracing::warn!("pop_loop called with no loop on the stack");
        return Ok(());
      }
    };
    writer.place_label(loop_labels.break_label)?;
    writer.close_label(loop_labels.break_label)?;
    writer.close_label(loop_labels.continue_label)?;
    Ok(())
  }

  /// The innermost loop's break target, for a `break` statement to jump
  /// to. `None` outside of a loop — a compiler-internal bug, reported via
  /// a diagnostic rather than a panic.
  pub fn break_label(&self) -> Option<LabelId> {
    match self.loops.last() {
      Some(loop_labels) => Some(loop_labels.break_label),
      None => {
        tracing::warn!("break outside of a loop");
        None
      }
    }
  }

  /// The innermost loop's continue target, for a `continue` statement to
  /// jump to. `None` outside of a loop — a compiler-internal bug, reported
  /// via a diagnostic rather than a panic.
  pub fn continue_label(&self) -> Option<LabelId> {
    match self.loops.last() {
      Some(loop_labels) => Some(loop_labels.continue_label),
      None => {
        tracing::warn!("continue outside of a loop");
        None
      }
    }
  }
}

/// Placeholder member-name resolution: in a full compiler this would
/// intern `name` into the enclosing blueprint's member table. `FunctionScope`
/// only needs *a* stable index per name, not member-table semantics, so a
/// deterministic hash of the name's bytes stands in for that collaborator.
fn member_index(name: &str) -> u32 {
  name.bytes().fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32))
}
