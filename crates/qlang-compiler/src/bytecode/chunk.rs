//! Encoded code for a single function.

use num_enum::TryFromPrimitiveError;
use qlang_core::TypeHash;

use super::OpCode;

const INSTR_LEN: usize = 9;

/// A decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instr {
    pub op: OpCode,
    pub operand: u64,
}

/// Generated code for one function or method.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Identity of the function the code belongs to.
    pub hash: TypeHash,
    /// Function name, for debugging.
    pub name: String,
    code: Vec<u8>,
    constants: Vec<String>,
}

impl Chunk {
    pub fn new(hash: TypeHash, name: impl Into<String>) -> Self {
        Self {
            hash,
            name: name.into(),
            code: Vec::new(),
            constants: Vec::new(),
        }
    }

    /// Append an instruction.
    pub fn write(&mut self, op: OpCode, operand: u64) {
        self.code.push(op.into());
        self.code.extend_from_slice(&operand.to_le_bytes());
    }

    /// Add a literal, reusing an existing slot for identical text.
    pub fn add_constant(&mut self, text: &str) -> u32 {
        if let Some(i) = self.constants.iter().position(|c| c == text) {
            return i as u32;
        }
        self.constants.push(text.to_string());
        (self.constants.len() - 1) as u32
    }

    pub fn constant(&self, index: u32) -> Option<&str> {
        self.constants.get(index as usize).map(String::as_str)
    }

    /// Raw encoded bytes.
    pub fn code(&self) -> &[u8] {
        &self.code
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.code.len() / INSTR_LEN
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Decode every instruction.
    pub fn instructions(&self) -> Result<Vec<Instr>, TryFromPrimitiveError<OpCode>> {
        self.code
            .chunks_exact(INSTR_LEN)
            .map(|raw| {
                let op = OpCode::try_from(raw[0])?;
                let mut operand = [0u8; 8];
                operand.copy_from_slice(&raw[1..]);
                Ok(Instr {
                    op,
                    operand: u64::from_le_bytes(operand),
                })
            })
            .collect()
    }

    /// Opcodes in order, for quick assertions.
    pub fn opcodes(&self) -> Vec<OpCode> {
        self.code
            .chunks_exact(INSTR_LEN)
            .filter_map(|raw| OpCode::try_from(raw[0]).ok())
            .collect()
    }

    /// Hashes of every callee named by a call instruction.
    pub fn callees(&self) -> Vec<TypeHash> {
        self.instructions()
            .unwrap_or_default()
            .into_iter()
            .filter(|i| i.op.is_call())
            .map(|i| TypeHash(i.operand))
            .collect()
    }
}
