pub mod instruction;
pub mod opcode;
pub mod operand;

pub use instruction::Instruction;
pub use opcode::OpCode;
pub use operand::{Operand, ParamMode};
