//! Instruction encoding produced by the reference emitter.
//!
//! - [`OpCode`] - the instruction set
//! - [`Chunk`] - encoded instructions and literal constants for one function

mod chunk;
mod opcode;

pub use chunk::{Chunk, Instr};
pub use opcode::OpCode;
