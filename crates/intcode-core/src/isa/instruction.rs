//! Instruction Decoding
//!
//! Splits a raw instruction word into its opcode and parameter modes.
//! This layer contains no execution semantics.

use super::opcode::OpCode;
use super::operand::ParamMode;
use crate::error::VmError;

/// Most parameters any instruction takes.
pub const MAX_PARAMS: usize = 3;

/// Decoded instruction header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: OpCode,
    pub modes: [ParamMode; MAX_PARAMS],
}

impl Instruction {
    /// Decode an instruction word.
    ///
    /// Only the modes of parameters the opcode actually takes are validated;
    /// digits beyond the arity are ignored.
    pub fn decode(word: i64) -> Result<Self, VmError> {
        let raw_op = word % 100;
        let opcode = OpCode::from_i64(raw_op).ok_or(VmError::UnknownOpcode(raw_op))?;

        let mut modes = [ParamMode::Position; MAX_PARAMS];
        let mut digits = word / 100;
        for (param, mode) in modes.iter_mut().enumerate().take(opcode.arity()) {
            let digit = digits % 10;
            *mode = ParamMode::try_from(digit)
                .map_err(|mode| VmError::InvalidMode { mode, param: param + 1 })?;
            digits /= 10;
        }

        Ok(Instruction { opcode, modes })
    }

    /// Mode of the 1-based parameter `param`.
    pub fn mode(&self, param: usize) -> ParamMode {
        self.modes[param - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_plain_opcode() {
        let instr = Instruction::decode(2).expect("decode failed");
        assert_eq!(instr.opcode, OpCode::Mul);
        assert_eq!(instr.modes, [ParamMode::Position; 3]);
    }

    #[test]
    fn decode_modes_least_significant_first() {
        let instr = Instruction::decode(1002).expect("decode failed");
        assert_eq!(instr.opcode, OpCode::Mul);
        assert_eq!(instr.mode(1), ParamMode::Position);
        assert_eq!(instr.mode(2), ParamMode::Immediate);
        assert_eq!(instr.mode(3), ParamMode::Position);

        let instr = Instruction::decode(21101).expect("decode failed");
        assert_eq!(instr.opcode, OpCode::Add);
        assert_eq!(
            instr.modes,
            [ParamMode::Immediate, ParamMode::Immediate, ParamMode::Relative]
        );
    }

    #[test]
    fn decode_rejects_unknown_opcode() {
        assert!(matches!(
            Instruction::decode(42),
            Err(VmError::UnknownOpcode(42))
        ));
        assert!(matches!(
            Instruction::decode(0),
            Err(VmError::UnknownOpcode(0))
        ));
    }

    #[test]
    fn decode_rejects_bad_mode() {
        assert!(matches!(
            Instruction::decode(301),
            Err(VmError::InvalidMode { mode: 3, param: 1 })
        ));
        assert!(matches!(
            Instruction::decode(9001),
            Err(VmError::InvalidMode { mode: 9, param: 2 })
        ));
    }

    #[test]
    fn decode_ignores_digits_past_arity() {
        let instr = Instruction::decode(999).expect("decode failed");
        assert_eq!(instr.opcode, OpCode::Halt);
    }
}
