//! Suspend/Resume Interpreter
//!
//! Owns plain FIFO queues that the driving caller fills and drains between
//! calls. Execution never blocks: an input instruction with nothing queued
//! suspends the machine and hands control back.

use std::collections::VecDeque;

use crate::config::VmConfig;
use crate::error::VmResult;
use crate::program::Program;

use super::machine::{ExecState, Machine, Port};

struct Queues<'a> {
    input: &'a mut VecDeque<i64>,
    output: &'a mut VecDeque<i64>,
}

impl Port for Queues<'_> {
    fn read(&mut self) -> VmResult<Option<i64>> {
        Ok(self.input.pop_front())
    }

    fn write(&mut self, value: i64) -> VmResult<()> {
        self.output.push_back(value);
        Ok(())
    }
}

/// Intcode interpreter driven cooperatively by a single scheduler
#[derive(Debug)]
pub struct SteppedInterpreter {
    machine: Machine,
    /// Values the program has not consumed yet.
    pub input: VecDeque<i64>,
    /// Values the program wrote that the caller has not drained yet.
    pub output: VecDeque<i64>,
}

impl SteppedInterpreter {
    pub fn new(program: &Program) -> Self {
        Self::with_config(program, VmConfig::default())
    }

    pub fn with_config(program: &Program, config: VmConfig) -> Self {
        SteppedInterpreter::from(Machine::new(program, config))
    }

    pub fn from_source(source: &str) -> VmResult<Self> {
        Ok(Self::new(&Program::parse(source)?))
    }

    /// Execute one instruction and report the resulting state.
    pub fn exec_one(&mut self) -> VmResult<ExecState> {
        let mut queues = Queues {
            input: &mut self.input,
            output: &mut self.output,
        };
        self.machine.step(&mut queues)
    }

    /// Run until the program halts or needs input.
    pub fn exec_all(&mut self) -> VmResult<ExecState> {
        loop {
            match self.exec_one()? {
                ExecState::Ready => continue,
                state => return Ok(state),
            }
        }
    }

    pub fn push_input(&mut self, value: i64) {
        self.input.push_back(value);
    }

    pub fn extend_input<I: IntoIterator<Item = i64>>(&mut self, values: I) {
        self.input.extend(values);
    }

    pub fn drain_output(&mut self) -> Vec<i64> {
        self.output.drain(..).collect()
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut Machine {
        &mut self.machine
    }

    pub fn peek(&self, address: usize) -> i64 {
        self.machine.peek(address)
    }

    pub fn poke(&mut self, address: usize, value: i64) -> VmResult<()> {
        self.machine.poke(address, value)
    }

    pub fn memory(&self) -> &[i64] {
        self.machine.memory()
    }

    pub fn is_halted(&self) -> bool {
        self.machine.is_halted()
    }
}

impl From<Machine> for SteppedInterpreter {
    fn from(machine: Machine) -> Self {
        SteppedInterpreter {
            machine,
            input: VecDeque::new(),
            output: VecDeque::new(),
        }
    }
}

/// Clones the machine state only; the copy starts with empty queues.
impl Clone for SteppedInterpreter {
    fn clone(&self) -> Self {
        SteppedInterpreter::from(self.machine.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Sums pairs of inputs forever: in a; in b; out a+b; jump 0.
    const ADDER: &str = "3,20,3,21,1,20,21,22,4,22,1105,1,0";

    fn stepped(source: &str) -> SteppedInterpreter {
        SteppedInterpreter::from_source(source).expect("parse failed")
    }

    #[test]
    fn blocks_then_resumes() {
        let mut vm = stepped(ADDER);
        assert_eq!(vm.exec_all().expect("run failed"), ExecState::BlockedOnInput);
        assert_eq!(vm.machine().ip(), 0);

        vm.push_input(2);
        assert_eq!(vm.exec_all().expect("run failed"), ExecState::BlockedOnInput);
        assert_eq!(vm.machine().ip(), 2);
        assert!(vm.output.is_empty());

        vm.push_input(3);
        assert_eq!(vm.exec_all().expect("run failed"), ExecState::BlockedOnInput);
        assert_eq!(vm.drain_output(), vec![5]);

        vm.extend_input([10, 20, 1, 1]);
        assert_eq!(vm.exec_all().expect("run failed"), ExecState::BlockedOnInput);
        assert_eq!(vm.drain_output(), vec![30, 2]);
    }

    #[test]
    fn blocked_step_leaves_state_untouched() {
        let mut vm = stepped(ADDER);
        vm.exec_all().expect("run failed");
        let before = vm.memory().to_vec();
        for _ in 0..3 {
            assert_eq!(vm.exec_one().expect("step failed"), ExecState::BlockedOnInput);
        }
        assert_eq!(vm.memory(), before.as_slice());
        assert_eq!(vm.machine().ip(), 0);
    }

    #[test]
    fn halted_stays_halted() {
        let mut vm = stepped("104,8,99");
        assert_eq!(vm.exec_all().expect("run failed"), ExecState::Halted);
        let ip = vm.machine().ip();
        assert_eq!(ip, 3);
        let memory = vm.memory().to_vec();
        assert_eq!(vm.exec_one().expect("step failed"), ExecState::Halted);
        assert_eq!(vm.exec_all().expect("run failed"), ExecState::Halted);
        assert_eq!(vm.machine().ip(), ip);
        assert_eq!(vm.memory(), memory.as_slice());
        assert_eq!(vm.drain_output(), vec![8]);
    }

    #[test]
    fn clone_starts_with_empty_queues() {
        let mut vm = stepped(ADDER);
        vm.push_input(4);
        vm.exec_all().expect("run failed");
        vm.push_input(99);

        let copy = vm.clone();
        assert!(copy.input.is_empty());
        assert!(copy.output.is_empty());
        assert_eq!(copy.machine().ip(), vm.machine().ip());
        assert_eq!(copy.peek(20), 4);
    }
}
