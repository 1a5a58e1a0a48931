use intcode_core::VmError;
use thiserror::Error;

/// Errors raised while driving groups of machines.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error(transparent)]
    Vm(#[from] VmError),

    // Pipelines
    #[error("pipeline has no stages")]
    EmptyPipeline,
    #[error("stage {index} failed: {source}")]
    Stage { index: usize, source: VmError },
    #[error("stage {index} panicked")]
    StagePanicked { index: usize },
    #[error("pipeline halted without producing output")]
    NoOutput,

    // Packet network
    #[error("node {address} failed: {source}")]
    Node { address: usize, source: VmError },
    #[error("node {0} halted")]
    NodeHalted(usize),
    #[error("packet addressed to unknown node {0}")]
    UnknownDestination(i64),
    #[error("node {address} emitted {values} values, not a whole number of packets")]
    IncompletePacket { address: usize, values: usize },
    #[error("network stalled: no NAT packet after {0} idle rounds")]
    Stalled(usize),
    #[error("NAT sent {0} packets to node 0 without repeating a Y value")]
    NoRepeat(usize),

    // Search
    #[error("search worker panicked")]
    WorkerPanicked,
}

pub type LinkResult<T> = Result<T, LinkError>;
