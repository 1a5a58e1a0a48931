//! Machine Configuration
//!
//! Defines runtime limits for an Intcode machine.
//! Configuration specifies constraints only; enforcement is handled by the VM.

/// Default ceiling on memory growth, in cells (32 MiB of `i64`).
pub const DEFAULT_MAX_MEMORY_CELLS: usize = 1 << 22;

/// VM Configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmConfig {
    /// Maximum number of memory cells the arena may grow to
    pub max_memory_cells: usize,

    /// Log every executed instruction at debug level
    pub trace: bool,
}

impl Default for VmConfig {
    fn default() -> Self {
        VmConfig {
            max_memory_cells: DEFAULT_MAX_MEMORY_CELLS,
            trace: false,
        }
    }
}

impl VmConfig {
    /// Create a new configuration with default limits
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_memory_cells(mut self, cells: usize) -> Self {
        self.max_memory_cells = cells;
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}
