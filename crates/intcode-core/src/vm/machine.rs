//! Execution Engine
//!
//! Fetch-decode-execute loop shared by both I/O disciplines. The engine
//! talks to the outside world only through [`Port`], so the blocking and
//! the suspend/resume interpreters run the exact same instruction code.

use crate::config::VmConfig;
use crate::error::{VmError, VmResult};
use crate::isa::{Instruction, OpCode, Operand};
use crate::program::Program;

use super::memory::Memory;

/// Execution state reported after every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecState {
    /// More instructions can run.
    Ready,
    /// The next instruction is an input and no value is available yet.
    /// The instruction pointer still points at it.
    BlockedOnInput,
    /// Terminal.
    Halted,
}

/// I/O boundary seen by the engine.
pub trait Port {
    /// Next input value, or `None` if nothing is available right now.
    fn read(&mut self) -> VmResult<Option<i64>>;

    fn write(&mut self, value: i64) -> VmResult<()>;
}

/// Machine state: memory plus registers. Carries no I/O endpoints, so a
/// clone is always a fully independent instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Machine {
    config: VmConfig,
    memory: Memory,
    ip: usize,
    relative_base: i64,
    halted: bool,
}

impl Machine {
    pub fn new(program: &Program, config: VmConfig) -> Self {
        Machine {
            memory: Memory::new(program.cells().to_vec(), config.max_memory_cells),
            ip: 0,
            relative_base: 0,
            halted: false,
            config,
        }
    }

    /// Execute a single instruction against `port`.
    ///
    /// A halted machine stays halted and is left untouched. Any fault is
    /// wrapped with the instruction pointer and raw word that caused it.
    pub fn step<P: Port + ?Sized>(&mut self, port: &mut P) -> VmResult<ExecState> {
        if self.halted {
            return Ok(ExecState::Halted);
        }

        let ip = self.ip;
        let word = self
            .memory
            .read(ip as i64)
            .map_err(|source| Self::fault(ip, 0, source))?;

        self.execute(word, port)
            .map_err(|source| Self::fault(ip, word, source))
    }

    fn fault(ip: usize, word: i64, source: VmError) -> VmError {
        VmError::Fault {
            ip,
            word,
            source: Box::new(source),
        }
    }

    fn execute<P: Port + ?Sized>(&mut self, word: i64, port: &mut P) -> VmResult<ExecState> {
        let instr = Instruction::decode(word)?;
        if self.config.trace {
            crate::debug!(
                "ip={} word={} op={} rb={}",
                self.ip,
                word,
                instr.opcode.mnemonic(),
                self.relative_base
            );
        }

        let mut next_ip = self.ip + instr.opcode.size();

        match instr.opcode {
            OpCode::Add => {
                let a = self.load(&instr, 1)?;
                let b = self.load(&instr, 2)?;
                self.store(&instr, 3, a.wrapping_add(b))?;
            }
            OpCode::Mul => {
                let a = self.load(&instr, 1)?;
                let b = self.load(&instr, 2)?;
                self.store(&instr, 3, a.wrapping_mul(b))?;
            }
            OpCode::Input => {
                // Resolve the destination first so a bad target faults even
                // when no input is pending.
                let address = self.operand(&instr, 1)?.address(self.relative_base)?;
                match port.read()? {
                    Some(value) => self.memory.write(address, value)?,
                    None => return Ok(ExecState::BlockedOnInput),
                }
            }
            OpCode::Output => {
                let value = self.load(&instr, 1)?;
                port.write(value)?;
            }
            OpCode::JumpIfTrue => {
                if self.load(&instr, 1)? != 0 {
                    next_ip = Self::jump_target(self.load(&instr, 2)?)?;
                }
            }
            OpCode::JumpIfFalse => {
                if self.load(&instr, 1)? == 0 {
                    next_ip = Self::jump_target(self.load(&instr, 2)?)?;
                }
            }
            OpCode::LessThan => {
                let a = self.load(&instr, 1)?;
                let b = self.load(&instr, 2)?;
                self.store(&instr, 3, (a < b) as i64)?;
            }
            OpCode::Equals => {
                let a = self.load(&instr, 1)?;
                let b = self.load(&instr, 2)?;
                self.store(&instr, 3, (a == b) as i64)?;
            }
            OpCode::AdjustBase => {
                let delta = self.load(&instr, 1)?;
                self.relative_base = self.relative_base.wrapping_add(delta);
            }
            OpCode::Halt => self.halted = true,
        }

        self.ip = next_ip;
        if self.halted {
            return Ok(ExecState::Halted);
        }
        Ok(ExecState::Ready)
    }

    fn jump_target(target: i64) -> VmResult<usize> {
        usize::try_from(target).map_err(|_| VmError::InvalidJumpTarget(target))
    }

    /// Operand for the 1-based parameter `param` of the current instruction.
    fn operand(&mut self, instr: &Instruction, param: usize) -> VmResult<Operand> {
        let raw = self.memory.read((self.ip + param) as i64)?;
        Ok(Operand::new(instr.mode(param), raw))
    }

    fn load(&mut self, instr: &Instruction, param: usize) -> VmResult<i64> {
        match self.operand(instr, param)? {
            Operand::Immediate(value) => Ok(value),
            other => {
                let address = other.address(self.relative_base)?;
                self.memory.read(address)
            }
        }
    }

    fn store(&mut self, instr: &Instruction, param: usize, value: i64) -> VmResult<()> {
        let address = self.operand(instr, param)?.address(self.relative_base)?;
        self.memory.write(address, value)
    }

    /// Read a cell without growing memory; cells past the end read as zero.
    pub fn peek(&self, address: usize) -> i64 {
        self.memory.peek(address)
    }

    /// Patch a cell before or between runs. Grows memory like any write.
    pub fn poke(&mut self, address: usize, value: i64) -> VmResult<()> {
        let address = i64::try_from(address).map_err(|_| VmError::MemoryLimitExceeded {
            address,
            limit: self.memory.limit(),
        })?;
        self.memory.write(address, value)
    }

    pub fn memory(&self) -> &[i64] {
        self.memory.as_slice()
    }

    pub fn ip(&self) -> usize {
        self.ip
    }

    pub fn relative_base(&self) -> i64 {
        self.relative_base
    }

    pub fn set_relative_base(&mut self, base: i64) {
        self.relative_base = base;
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn config(&self) -> &VmConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// In-memory port for driving the engine directly.
    #[derive(Default)]
    struct Queues {
        input: VecDeque<i64>,
        output: Vec<i64>,
    }

    impl Port for Queues {
        fn read(&mut self) -> VmResult<Option<i64>> {
            Ok(self.input.pop_front())
        }

        fn write(&mut self, value: i64) -> VmResult<()> {
            self.output.push(value);
            Ok(())
        }
    }

    fn machine(cells: &[i64]) -> Machine {
        Machine::new(&Program::from(cells.to_vec()), VmConfig::new())
    }

    fn run(m: &mut Machine, port: &mut Queues) -> ExecState {
        loop {
            match m.step(port).expect("step failed") {
                ExecState::Ready => continue,
                other => return other,
            }
        }
    }

    #[test]
    fn self_add() {
        let mut m = machine(&[1, 0, 0, 0, 99]);
        assert_eq!(run(&mut m, &mut Queues::default()), ExecState::Halted);
        assert_eq!(m.peek(0), 2);
    }

    #[test]
    fn add_mul_program() {
        let mut m = machine(&[1, 9, 10, 3, 2, 3, 11, 0, 99, 30, 40, 50]);
        run(&mut m, &mut Queues::default());
        assert_eq!(m.peek(0), 3500);
        assert_eq!(m.peek(3), 70);
    }

    #[test]
    fn immediate_multiply_single_step() {
        let mut m = machine(&[1002, 4, 3, 4, 33]);
        let state = m.step(&mut Queues::default()).expect("step failed");
        assert_eq!(state, ExecState::Ready);
        assert_eq!(m.peek(4), 99);
        assert_eq!(m.ip(), 4);
    }

    #[test]
    fn relative_base_output() {
        let mut m = machine(&[109, 19, 204, -34, 99]);
        m.set_relative_base(2000);
        m.poke(1985, 77).expect("poke failed");
        let mut port = Queues::default();
        run(&mut m, &mut port);
        assert_eq!(m.relative_base(), 2019);
        assert_eq!(port.output, vec![77]);
    }

    #[test]
    fn input_blocks_without_advancing() {
        let mut m = machine(&[3, 5, 4, 5, 99, 0]);
        let mut port = Queues::default();
        assert_eq!(m.step(&mut port).expect("step failed"), ExecState::BlockedOnInput);
        assert_eq!(m.ip(), 0);
        assert_eq!(m.memory(), &[3, 5, 4, 5, 99, 0]);

        port.input.push_back(42);
        assert_eq!(run(&mut m, &mut port), ExecState::Halted);
        assert_eq!(port.output, vec![42]);
    }

    #[test]
    fn halted_step_is_idempotent() {
        let mut m = machine(&[99, 7]);
        let mut port = Queues::default();
        assert_eq!(m.step(&mut port).expect("step failed"), ExecState::Halted);
        let snapshot = m.clone();
        for _ in 0..3 {
            assert_eq!(m.step(&mut port).expect("step failed"), ExecState::Halted);
        }
        assert_eq!(m, snapshot);
        // Halt advances by its size.
        assert_eq!(m.ip(), 1);
    }

    #[test]
    fn jumps_skip_default_advance() {
        // Jump over an unknown opcode when [1] is nonzero.
        let mut m = machine(&[1105, 1, 4, 42, 104, 5, 99]);
        let mut port = Queues::default();
        run(&mut m, &mut port);
        assert_eq!(port.output, vec![5]);

        let mut m = machine(&[1106, 0, 4, 42, 104, 6, 99]);
        let mut port = Queues::default();
        run(&mut m, &mut port);
        assert_eq!(port.output, vec![6]);
    }

    #[test]
    fn comparisons_write_flags() {
        let mut m = machine(&[1107, 1, 2, 9, 1108, 3, 3, 10, 99, -1, -1]);
        run(&mut m, &mut Queues::default());
        assert_eq!(m.peek(9), 1);
        assert_eq!(m.peek(10), 1);

        let mut m = machine(&[1107, 2, 1, 9, 1108, 3, 4, 10, 99, -1, -1]);
        run(&mut m, &mut Queues::default());
        assert_eq!(m.peek(9), 0);
        assert_eq!(m.peek(10), 0);
    }

    #[test]
    fn unknown_opcode_reports_context() {
        let mut m = machine(&[1101, 1, 1, 5, 42, 0]);
        let mut port = Queues::default();
        m.step(&mut port).expect("first step failed");
        let err = m.step(&mut port).unwrap_err();
        match err {
            VmError::Fault { ip, word, source } => {
                assert_eq!(ip, 4);
                assert_eq!(word, 42);
                assert!(matches!(*source, VmError::UnknownOpcode(42)));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn immediate_destination_is_invalid_write() {
        let mut m = machine(&[11101, 1, 1, 0, 99]);
        let err = m.step(&mut Queues::default()).unwrap_err();
        assert!(matches!(err.root_cause(), VmError::InvalidWrite));
        assert_eq!(m.peek(0), 11101);
    }

    #[test]
    fn immediate_input_destination_faults_even_when_blocked() {
        let mut m = machine(&[103, 0, 99]);
        let err = m.step(&mut Queues::default()).unwrap_err();
        assert!(matches!(err.root_cause(), VmError::InvalidWrite));
    }

    #[test]
    fn negative_jump_target_faults() {
        let mut m = machine(&[1105, 1, -3, 99]);
        let err = m.step(&mut Queues::default()).unwrap_err();
        assert!(matches!(err.root_cause(), VmError::InvalidJumpTarget(-3)));
    }

    #[test]
    fn write_beyond_memory_grows() {
        let mut m = machine(&[1101, 2, 3, 20, 99]);
        run(&mut m, &mut Queues::default());
        assert_eq!(m.memory().len(), 21);
        assert_eq!(m.peek(20), 5);
        assert_eq!(&m.memory()[..5], &[1101, 2, 3, 20, 99]);
    }

    #[test]
    fn memory_limit_faults() {
        let mut m = Machine::new(
            &Program::from(vec![1101, 2, 3, 100, 99]),
            VmConfig::new().with_max_memory_cells(64),
        );
        let err = m.step(&mut Queues::default()).unwrap_err();
        assert!(matches!(
            err.root_cause(),
            VmError::MemoryLimitExceeded { address: 100, limit: 64 }
        ));
    }

    #[test]
    fn clone_is_isolated() {
        let original = machine(&[1, 0, 0, 0, 99]);
        let mut copy = original.clone();
        copy.poke(0, 1234).expect("poke failed");
        assert_eq!(original.peek(0), 1);
        assert_eq!(copy.peek(0), 1234);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn running_a_clone_leaves_original_untouched(
                a in -1000i64..1000,
                b in -1000i64..1000,
                dest in 5usize..200,
            ) {
                let mut original = machine(&[1101, a, b, dest as i64, 99]);
                let before = original.clone();
                let mut copy = original.clone();

                prop_assert_eq!(run(&mut copy, &mut Queues::default()), ExecState::Halted);
                prop_assert_eq!(&original, &before);
                prop_assert_eq!(copy.peek(dest), a + b);

                run(&mut original, &mut Queues::default());
                prop_assert_eq!(original, copy);
            }
        }
    }
}
