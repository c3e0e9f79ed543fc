//! The finished function artifact (spec §6): the code writer's only
//! product, and the sole shape its external collaborators (the object
//! runtime, the serializer) need to agree on.

use std::fmt;

use crate::Value;

/// A compiled function body, exactly the fields spec §6 lists: nothing a
/// downstream consumer would need to reach back into the writer for.
///
/// `Display` gives a raw hex dump of the code, not a disassembly —
/// `FuncArtifact` is defined in a crate that deliberately does not depend on
/// `wyrm_op` (the opcode table belongs one layer up), so mnemonic-level
/// disassembly lives in `wyrm_emit::disassemble_artifact` instead.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncArtifact {
  pub num_locals: u32,
  pub varargs: bool,
  pub code: Vec<u8>,
  pub constants: Vec<Value>,
}

impl FuncArtifact {
  pub fn new(num_locals: u32, varargs: bool, code: Vec<u8>, constants: Vec<Value>) -> Self {
    Self {
      num_locals,
      varargs,
      code,
      constants,
    }
  }
}

impl fmt::Display for FuncArtifact {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(
      f,
      "fn(locals={}, varargs={}, {} bytes, {} constants)",
      self.num_locals,
      self.varargs,
      self.code.len(),
      self.constants.len()
    )?;
    for (index, value) in self.constants.iter().enumerate() {
      writeln!(f, "  const[{index}] = {value}")?;
    }
    write!(f, "  code = ")?;
    for byte in &self.code {
      write!(f, "{byte:02x} ")?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::HeapValue;

  #[test]
  fn display_lists_constants_and_raw_bytes() {
    let artifact = FuncArtifact::new(
      1,
      false,
      vec![0x09, 0x12],
      vec![Value::from(HeapValue::Symbol("greet".into()))],
    );
    let text = artifact.to_string();
    assert!(text.contains("locals=1"));
    assert!(text.contains("#greet"));
    assert!(text.contains("09 12"));
  }
}
