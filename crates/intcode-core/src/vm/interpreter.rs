//! Blocking Interpreter
//!
//! Runs a machine against pluggable pull/push endpoints. Input blocks the
//! calling thread until a value arrives; halting drops the output endpoint
//! so a downstream consumer sees end-of-stream.

use std::collections::VecDeque;
use std::fmt;

use crate::config::VmConfig;
use crate::error::{VmError, VmResult};
use crate::program::Program;

use super::machine::{ExecState, Machine, Port};
use super::port::{InputPort, OutputBuffer, OutputPort};

/// Borrowed endpoints handed to the engine for one step.
struct Endpoints<'a> {
    input: &'a mut Option<Box<dyn InputPort>>,
    output: &'a mut Option<Box<dyn OutputPort>>,
}

impl Port for Endpoints<'_> {
    fn read(&mut self) -> VmResult<Option<i64>> {
        let input = self.input.as_mut().ok_or(VmError::InputDetached)?;
        input.read().map(Some)
    }

    fn write(&mut self, value: i64) -> VmResult<()> {
        let output = self.output.as_mut().ok_or(VmError::OutputDetached)?;
        output.write(value)
    }
}

/// Intcode interpreter with blocking I/O
pub struct Interpreter {
    machine: Machine,
    input: Option<Box<dyn InputPort>>,
    output: Option<Box<dyn OutputPort>>,
}

impl Interpreter {
    /// Create an interpreter with no endpoints attached.
    pub fn new(program: &Program) -> Self {
        Self::with_config(program, VmConfig::default())
    }

    pub fn with_config(program: &Program, config: VmConfig) -> Self {
        Interpreter {
            machine: Machine::new(program, config),
            input: None,
            output: None,
        }
    }

    /// Create an interpreter with both endpoints attached.
    pub fn with_io<I, O>(program: &Program, input: I, output: O) -> Self
    where
        I: InputPort + 'static,
        O: OutputPort + 'static,
    {
        let mut interp = Self::new(program);
        interp.attach_input(input);
        interp.attach_output(output);
        interp
    }

    /// Parse `source` and create an interpreter with no endpoints.
    pub fn from_source(source: &str) -> VmResult<Self> {
        Ok(Self::new(&Program::parse(source)?))
    }

    pub fn attach_input<I: InputPort + 'static>(&mut self, input: I) {
        self.input = Some(Box::new(input));
    }

    pub fn attach_output<O: OutputPort + 'static>(&mut self, output: O) {
        self.output = Some(Box::new(output));
    }

    pub fn detach_input(&mut self) -> Option<Box<dyn InputPort>> {
        self.input.take()
    }

    pub fn detach_output(&mut self) -> Option<Box<dyn OutputPort>> {
        self.output.take()
    }

    /// Execute one instruction. Returns whether more execution is possible.
    pub fn exec_one(&mut self) -> VmResult<bool> {
        let mut endpoints = Endpoints {
            input: &mut self.input,
            output: &mut self.output,
        };
        match self.machine.step(&mut endpoints)? {
            ExecState::Ready => Ok(true),
            ExecState::Halted => {
                if self.output.take().is_some() {
                    crate::debug!("halted at ip {}; output closed", self.machine.ip());
                }
                Ok(false)
            }
            // Blocking endpoints never report "nothing yet".
            ExecState::BlockedOnInput => Ok(false),
        }
    }

    /// Run until the program halts.
    pub fn exec_all(&mut self) -> VmResult<()> {
        while self.exec_one()? {}
        Ok(())
    }

    /// Run to completion against a finite input script, returning everything
    /// the program wrote. Replaces any attached endpoints.
    pub fn run_with_input<I>(&mut self, input: I) -> VmResult<Vec<i64>>
    where
        I: IntoIterator<Item = i64>,
    {
        let buffer = OutputBuffer::new();
        self.attach_input(input.into_iter().collect::<VecDeque<i64>>());
        self.attach_output(buffer.clone());
        self.exec_all()?;
        Ok(buffer.take())
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

impl From<Machine> for Interpreter {
    fn from(machine: Machine) -> Self {
        Interpreter {
            machine,
            input: None,
            output: None,
        }
    }
}

/// Clones the machine state only; endpoints must be attached again.
impl Clone for Interpreter {
    fn clone(&self) -> Self {
        Interpreter::from(self.machine.clone())
    }
}

impl fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpreter")
            .field("machine", &self.machine)
            .field("input_attached", &self.input.is_some())
            .field("output_attached", &self.output.is_some())
            .finish()
    }
}
