pub mod interpreter;
pub mod machine;
pub mod memory;
pub mod port;
pub mod stepped;

pub use interpreter::Interpreter;
pub use machine::{ExecState, Machine, Port};
pub use memory::Memory;
pub use port::{Chained, InputPort, OutputBuffer, OutputPort};
pub use stepped::SteppedInterpreter;
