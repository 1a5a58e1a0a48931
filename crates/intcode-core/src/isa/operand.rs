//! Parameter modes and operand resolution.

use crate::error::VmError;

/// Parameter addressing mode, one decimal digit per parameter.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamMode {
    Position = 0,
    Immediate = 1,
    Relative = 2,
}

impl TryFrom<i64> for ParamMode {
    type Error = i64;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Position),
            1 => Ok(Self::Immediate),
            2 => Ok(Self::Relative),
            other => Err(other),
        }
    }
}

/// Operand resolved from a raw parameter cell and its mode.
///
/// Resolution is pure: nothing touches memory until the operand is read or
/// written through the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// Memory address.
    Position(i64),
    /// Literal value; never a valid write target.
    Immediate(i64),
    /// Offset from the relative base.
    Relative(i64),
}

impl Operand {
    pub const fn new(mode: ParamMode, raw: i64) -> Self {
        match mode {
            ParamMode::Position => Operand::Position(raw),
            ParamMode::Immediate => Operand::Immediate(raw),
            ParamMode::Relative => Operand::Relative(raw),
        }
    }

    /// Absolute address this operand refers to, given the relative base.
    pub fn address(self, relative_base: i64) -> Result<i64, VmError> {
        match self {
            Operand::Position(address) => Ok(address),
            Operand::Relative(offset) => Ok(relative_base.wrapping_add(offset)),
            Operand::Immediate(_) => Err(VmError::InvalidWrite),
        }
    }
}
