//! The bytecode code writer: byte buffer, constant pool, label table, and
//! the emission façade that ties them together into finished function
//! artifacts.
//!
//! ```
//! use wyrm_emit::CodeWriter;
//!
//! let mut writer = CodeWriter::new();
//! writer.return_().unwrap();
//! let artifact = writer.finish().unwrap();
//! assert_eq!(artifact.num_locals, 1);
//! ```

mod buffer;
mod facade;
mod label;
mod pool;
mod writer;

#[cfg(test)]
mod tests;

pub use facade::FunctionScope;
pub use label::LabelId;
pub use writer::{CodeWriter, EmitConfig};

use wyrm_op::disassemble;
use wyrm_value::FuncArtifact;

/// The writer's three documented error classes (spec §7), collapsed to two
/// observable outcomes: a sticky poison (allocation failure, class 1, and
/// label table exhaustion, class 2, are indistinguishable once poisoned —
/// both mean "this writer's output can no longer be trusted"), and
/// unresolved labels surfaced only at `finish` (class 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EmitError {
  #[error("label table exhausted: no free slot for a new label or pending reference")]
  LabelTableExhausted,
  #[error("finish() called with {0} unresolved label reference(s)")]
  UnresolvedLabels(usize),
  #[error("code writer is poisoned from a prior error and cannot continue")]
  Poisoned,
}

pub type Result<T> = std::result::Result<T, EmitError>;

/// Renders a finished artifact's instruction stream with opcode mnemonics
/// rather than raw bytes (SPEC_FULL §6). Lives here rather than on
/// `FuncArtifact` itself because `wyrm_value` does not depend on `wyrm_op`.
pub fn disassemble_artifact(artifact: &FuncArtifact) -> String {
  let mut out = String::new();
  for instruction in disassemble(&artifact.code) {
    out.push_str(&instruction.to_string());
    out.push('\n');
  }
  out
}
