//! Blocking I/O Endpoints
//!
//! Pull sources and push sinks for the blocking interpreter. Every endpoint
//! is `Send` so an interpreter can be moved onto its own thread.

use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, Sender, SyncSender};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{VmError, VmResult};

/// Source of input values. `read` blocks until a value is available.
pub trait InputPort: Send {
    fn read(&mut self) -> VmResult<i64>;
}

/// Sink for output values. `write` blocks until the value is accepted.
pub trait OutputPort: Send {
    fn write(&mut self, value: i64) -> VmResult<()>;
}

impl InputPort for Receiver<i64> {
    fn read(&mut self) -> VmResult<i64> {
        self.recv().map_err(|_| VmError::InputClosed)
    }
}

/// Finite scripted input; reading past the end is fatal.
impl InputPort for VecDeque<i64> {
    fn read(&mut self) -> VmResult<i64> {
        self.pop_front().ok_or(VmError::InputExhausted)
    }
}

impl<P: InputPort + ?Sized> InputPort for Box<P> {
    fn read(&mut self) -> VmResult<i64> {
        (**self).read()
    }
}

impl OutputPort for Sender<i64> {
    fn write(&mut self, value: i64) -> VmResult<()> {
        self.send(value).map_err(|_| VmError::OutputClosed)
    }
}

impl OutputPort for SyncSender<i64> {
    fn write(&mut self, value: i64) -> VmResult<()> {
        self.send(value).map_err(|_| VmError::OutputClosed)
    }
}

impl<P: OutputPort + ?Sized> OutputPort for Box<P> {
    fn write(&mut self, value: i64) -> VmResult<()> {
        (**self).write(value)
    }
}

/// Serves a fixed prelude before falling through to another source.
///
/// Used to pre-seed a stage (phase settings, a loop's first value) without
/// needing a running producer on the other end of its channel.
#[derive(Debug)]
pub struct Chained<P> {
    prelude: VecDeque<i64>,
    rest: P,
}

impl<P: InputPort> Chained<P> {
    pub fn new(prelude: impl IntoIterator<Item = i64>, rest: P) -> Self {
        Chained {
            prelude: prelude.into_iter().collect(),
            rest,
        }
    }
}

impl<P: InputPort> InputPort for Chained<P> {
    fn read(&mut self) -> VmResult<i64> {
        match self.prelude.pop_front() {
            Some(value) => Ok(value),
            None => self.rest.read(),
        }
    }
}

/// Clonable capture buffer. One handle is attached to the interpreter,
/// the caller keeps another to inspect what was written.
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer {
    values: Arc<Mutex<Vec<i64>>>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<i64>> {
        // A poisoned buffer still holds every value written before the panic.
        self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of everything written so far.
    pub fn values(&self) -> Vec<i64> {
        self.lock().clone()
    }

    /// Remove and return everything written so far.
    pub fn take(&self) -> Vec<i64> {
        std::mem::take(&mut *self.lock())
    }

    pub fn last(&self) -> Option<i64> {
        self.lock().last().copied()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl OutputPort for OutputBuffer {
    fn write(&mut self, value: i64) -> VmResult<()> {
        self.lock().push(value);
        Ok(())
    }
}
