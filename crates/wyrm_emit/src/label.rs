//! The label table (spec §3, §4.3.3, §9). Implements the Design Notes §9
//! recommendation directly: an explicit tagged `Slot` instead of the
//! source's pointer-chasing pending-reference encoding, with a vector of
//! pending patch sites per label rather than a linear sweep at placement
//! time.

use crate::buffer::ByteBuffer;

/// Identifies one label for the lifetime between `open_label` and
/// `close_label`. Not reused across that lifetime (spec §9: "identifiers
/// are single-use") even though the underlying table slot may be recycled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LabelId(u32);

#[derive(Debug, Clone)]
enum Slot {
  Free,
  Open { pending: Vec<usize> },
  Placed { target: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelTableExhausted;

#[derive(Debug, Clone)]
pub struct LabelTable {
  slots: Vec<Slot>,
  capacity: usize,
}

impl LabelTable {
  pub fn new(capacity: usize) -> Self {
    Self {
      slots: Vec::new(),
      capacity,
    }
  }

  /// Allocates a fresh label in the Open/unplaced state. Per spec §9's
  /// resolved open question, the free-slot scan always starts at slot 0
  /// rather than guessing at the source's `-1` starting bound.
  pub fn open(&mut self) -> Result<LabelId, LabelTableExhausted> {
    for (index, slot) in self.slots.iter_mut().enumerate() {
      if matches!(slot, Slot::Free) {
        *slot = Slot::Open { pending: Vec::new() };
        return Ok(LabelId(index as u32));
      }
    }
    if self.slots.len() >= self.capacity {
      return Err(LabelTableExhausted);
    }
    let index = self.slots.len();
    self.slots.push(Slot::Open { pending: Vec::new() });
    Ok(LabelId(index as u32))
  }

  fn slot_mut(&mut self, id: LabelId) -> &mut Slot {
    &mut self.slots[id.0 as usize]
  }

  /// Records a reference to `id` at `patch_site`. If the label is already
  /// placed, returns its target immediately so the writer can encode it
  /// without waiting; otherwise the site is queued and the writer should
  /// encode a placeholder word to be patched later.
  pub fn reference(&mut self, id: LabelId, patch_site: usize) -> Option<u32> {
    match self.slot_mut(id) {
      Slot::Placed { target } => Some(*target),
      Slot::Open { pending } => {
        pending.push(patch_site);
        None
      }
      Slot::Free => panic!("reference to a label that was never opened or already closed"),
    }
  }

  /// Fixes `id`'s target at `target`, patching every pending reference
  /// recorded so far in place (spec §4.3.3, invariant 2). A label may be
  /// placed only once.
  pub fn place(&mut self, id: LabelId, target: u32, buffer: &mut ByteBuffer) {
    let pending = match self.slot_mut(id) {
      Slot::Open { pending } => std::mem::take(pending),
      Slot::Placed { .. } => panic!("label placed more than once"),
      Slot::Free => panic!("placement of a label that was never opened or already closed"),
    };
    for patch_site in &pending {
      buffer.patch_word(*patch_site, target);
    }
    *self.slot_mut(id) = Slot::Placed { target };
  }

  /// Frees `id`'s slot for reuse by a future `open`. Per spec §4.3.3,
  /// closing an unplaced label "releases the label slot without
  /// patching" and leaves any already-emitted references pointing at
  /// their placeholder — a compiler-internal bug (spec §7), reported as a
  /// diagnostic rather than a panic since it does not corrupt the table
  /// itself.
  pub fn close(&mut self, id: LabelId) {
    match self.slot_mut(id) {
      Slot::Placed { .. } => *self.slot_mut(id) = Slot::Free,
      Slot::Open { .. } => {
        tracing::warn!(
          "close_label on a label whose pending references were never patched"
        );
        *self.slot_mut(id) = Slot::Free;
      }
      Slot::Free => panic!("label already closed"),
    }
  }

  /// Total pending references across every label still open — what
  /// `finish` reports as `EmitError::UnresolvedLabels` (spec §7).
  pub fn unresolved_count(&self) -> usize {
    self.slots
      .iter()
      .map(|slot| match slot {
        Slot::Open { pending } => pending.len().max(1),
        _ => 0,
      })
      .sum()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn forward_reference_then_place_patches_the_site() {
    let mut table = LabelTable::new(8);
    let mut buffer = ByteBuffer::new(16, 1024);
    let label = table.open().unwrap();

    buffer.push_word(0).unwrap();
    assert_eq!(table.reference(label, 0), None);

    table.place(label, 42, &mut buffer);
    assert_eq!(buffer.read_word(0), 42);
  }

  #[test]
  fn reference_after_placement_returns_target_immediately() {
    let mut table = LabelTable::new(8);
    let mut buffer = ByteBuffer::new(16, 1024);
    let label = table.open().unwrap();
    table.place(label, 7, &mut buffer);
    assert_eq!(table.reference(label, 123), Some(7));
  }

  #[test]
  fn multiple_pending_references_are_all_patched() {
    let mut table = LabelTable::new(8);
    let mut buffer = ByteBuffer::new(16, 1024);
    let label = table.open().unwrap();
    buffer.push_word(0).unwrap();
    buffer.push_word(0).unwrap();
    table.reference(label, 0);
    table.reference(label, 4);
    table.place(label, 99, &mut buffer);
    assert_eq!(buffer.read_word(0), 99);
    assert_eq!(buffer.read_word(4), 99);
  }

  #[test]
  fn closed_slot_is_reused_by_the_next_open() {
    let mut table = LabelTable::new(1);
    let mut buffer = ByteBuffer::new(16, 1024);
    let first = table.open().unwrap();
    table.place(first, 0, &mut buffer);
    table.close(first);
    let second = table.open().unwrap();
    assert_eq!(second, first);
  }

  #[test]
  fn closing_an_unplaced_label_frees_it_without_panicking() {
    let mut table = LabelTable::new(1);
    let label = table.open().unwrap();
    table.close(label);
    assert!(table.open().is_ok());
  }

  #[test]
  fn exhausted_table_refuses_further_opens() {
    let mut table = LabelTable::new(1);
    table.open().unwrap();
    assert_eq!(table.open(), Err(LabelTableExhausted));
  }

  #[test]
  fn unresolved_count_reflects_unplaced_labels() {
    let mut table = LabelTable::new(8);
    let mut buffer = ByteBuffer::new(16, 1024);
    let a = table.open().unwrap();
    let b = table.open().unwrap();
    buffer.push_word(0).unwrap();
    table.reference(a, 0);
    assert_eq!(table.unresolved_count(), 2);
    table.place(a, 0, &mut buffer);
    let _ = b;
    assert_eq!(table.unresolved_count(), 1);
  }
}
