//! Intcode Runtime - Core Library
//!
//! Public API surface for the Intcode virtual machine: program parsing,
//! the growable memory arena, the decoder, and the execution engine with
//! its two I/O disciplines.
//!
//! - [`Interpreter`]: blocking endpoints, one thread per running machine.
//! - [`SteppedInterpreter`]: owned queues, suspended when input runs dry,
//!   for a single scheduler multiplexing many machines.

pub mod log;
pub mod error;
pub mod config;
pub mod isa;
pub mod program;
pub mod vm;

// Re-export commonly used types
pub use error::{VmError, VmResult};
pub use config::VmConfig;
pub use isa::OpCode;
pub use program::Program;
pub use vm::{ExecState, Interpreter, Machine, SteppedInterpreter};
