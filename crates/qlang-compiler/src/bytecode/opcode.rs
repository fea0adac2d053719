//! Operation codes.
//!
//! Every instruction is one opcode byte followed by a little-endian `u64`
//! operand. Operands that do not apply are zero.

use num_enum::{IntoPrimitive, TryFromPrimitive};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum OpCode {
    // =========================================================================
    // Values
    // =========================================================================
    /// Push a literal. Operand: constant index in the chunk.
    PushConst = 0,
    /// Push a variable. Operand: packed `VarAddr`.
    LoadVar,
    /// Pop into a variable. Operand: packed `VarAddr`.
    StoreVar,
    /// Push a package function value. Operand: function hash.
    LoadFunc,
    /// Push a bound method value. Operand: method hash.
    LoadMethod,
    /// Push a member of an imported package. Operand: member hash.
    LoadExtern,
    /// Discard the top of the stack.
    Pop,

    // =========================================================================
    // Calls
    // =========================================================================
    /// Call a package function. Operand: function hash.
    CallFunc,
    /// Call a method on the receiver below the arguments. Operand: method hash.
    CallMethod,
    /// Call into an imported package. Operand: member hash.
    CallExtern,
    /// Call a builtin. Operand: builtin hash.
    CallBuiltin,
    /// Call the function value below the arguments. Operand: argument count.
    CallIndirect,
    /// Return. Operand: number of results.
    Return,
}

impl OpCode {
    /// Whether the operand names a callee by hash.
    pub fn is_call(self) -> bool {
        matches!(
            self,
            OpCode::CallFunc | OpCode::CallMethod | OpCode::CallExtern | OpCode::CallBuiltin
        )
    }
}
