//! Opcode space and fixed-width instruction encoding shared by the code
//! writer and (eventually) the interpreter. See `opcode` for the opcode
//! table and `instruction` for the wire encoding; this crate owns no
//! buffer, pool, or label state of its own.

mod disassembly;
mod instruction;
mod opcode;

pub use disassembly::{disassemble, disassemble_one, DecodedInstruction};
pub use instruction::{encode_op, encode_word, patch_word, read_word};
pub use opcode::{Opcode, WORD_SIZE};
