//! Intcode Error Types
//!
//! Defines every fault the Intcode machine can raise. Faults are never
//! recoverable: they point at a malformed program or at wiring mistakes in
//! the calling code.

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VmError {
    // Program text errors
    #[error("malformed program: token {index} ({token:?}) is not an integer")]
    MalformedProgram { index: usize, token: String },
    #[error("program listing is empty")]
    EmptyProgram,

    // Decode errors
    #[error("unknown opcode {0}")]
    UnknownOpcode(i64),
    #[error("unsupported parameter mode {mode} for parameter {param}")]
    InvalidMode { mode: i64, param: usize },

    // Addressing errors
    #[error("write to an immediate-mode operand")]
    InvalidWrite,
    #[error("negative memory address {0}")]
    NegativeAddress(i64),
    #[error("address {address} exceeds the memory limit of {limit} cells")]
    MemoryLimitExceeded { address: usize, limit: usize },
    #[error("invalid jump target {0}")]
    InvalidJumpTarget(i64),

    // I/O wiring errors
    #[error("input instruction with no input attached")]
    InputDetached,
    #[error("output instruction with no output attached")]
    OutputDetached,
    #[error("input read from a closed channel")]
    InputClosed,
    #[error("input read past the end of a finite source")]
    InputExhausted,
    #[error("output written to a closed channel")]
    OutputClosed,

    /// A fault raised while executing the instruction at `ip`.
    #[error("fault at ip {ip} (instruction {word}): {source}")]
    Fault {
        ip: usize,
        word: i64,
        #[source]
        source: Box<VmError>,
    },

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl VmError {
    /// Strip the `Fault` context, if any, and return the underlying cause.
    pub fn root_cause(&self) -> &VmError {
        match self {
            VmError::Fault { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

pub type VmResult<T> = Result<T, VmError>;
