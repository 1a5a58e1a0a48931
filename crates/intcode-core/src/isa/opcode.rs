//! Opcode Definitions
//!
//! Defines the Intcode opcode set. Opcode values are the low two decimal
//! digits of an instruction word.

/// Intcode opcodes
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    // Arithmetic
    Add = 1,
    Mul = 2,

    // I/O
    Input = 3,
    Output = 4,

    // Control flow
    JumpIfTrue = 5,
    JumpIfFalse = 6,

    // Comparison
    LessThan = 7,
    Equals = 8,

    // Registers
    AdjustBase = 9,

    // System
    Halt = 99,
}

impl OpCode {
    /// Convert a raw opcode value (word mod 100) to an opcode
    pub fn from_i64(raw: i64) -> Option<Self> {
        match raw {
            1 => Some(OpCode::Add),
            2 => Some(OpCode::Mul),
            3 => Some(OpCode::Input),
            4 => Some(OpCode::Output),
            5 => Some(OpCode::JumpIfTrue),
            6 => Some(OpCode::JumpIfFalse),
            7 => Some(OpCode::LessThan),
            8 => Some(OpCode::Equals),
            9 => Some(OpCode::AdjustBase),
            99 => Some(OpCode::Halt),
            _ => None,
        }
    }

    /// Number of parameters following the opcode word.
    pub const fn arity(self) -> usize {
        match self {
            OpCode::Add | OpCode::Mul | OpCode::LessThan | OpCode::Equals => 3,
            OpCode::JumpIfTrue | OpCode::JumpIfFalse => 2,
            OpCode::Input | OpCode::Output | OpCode::AdjustBase => 1,
            OpCode::Halt => 0,
        }
    }

    /// Instruction size in cells, opcode word included.
    pub const fn size(self) -> usize {
        1 + self.arity()
    }

    pub const fn mnemonic(self) -> &'static str {
        match self {
            OpCode::Add => "ADD",
            OpCode::Mul => "MUL",
            OpCode::Input => "IN",
            OpCode::Output => "OUT",
            OpCode::JumpIfTrue => "JT",
            OpCode::JumpIfFalse => "JF",
            OpCode::LessThan => "LT",
            OpCode::Equals => "EQ",
            OpCode::AdjustBase => "ARB",
            OpCode::Halt => "HALT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_i64_accepts_instruction_set() {
        for raw in (1..=9).chain([99]) {
            let op = OpCode::from_i64(raw).expect("valid opcode");
            assert_eq!(op as u8 as i64, raw);
        }
    }

    #[test]
    fn from_i64_rejects_gaps() {
        for raw in [0, 10, 42, 98, 100, -1] {
            assert!(OpCode::from_i64(raw).is_none(), "opcode {} accepted", raw);
        }
    }

    #[test]
    fn sizes_match_arity() {
        assert_eq!(OpCode::Add.size(), 4);
        assert_eq!(OpCode::JumpIfFalse.size(), 3);
        assert_eq!(OpCode::Output.size(), 2);
        assert_eq!(OpCode::Halt.size(), 1);
    }
}
