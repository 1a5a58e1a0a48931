//! Host-side composition of Intcode machines.
//!
//! The VM core knows nothing about how machines are wired together; this
//! crate holds the mechanical drivers callers reach for: blocking pipelines
//! and feedback loops, amplifier phase search, a cooperative packet
//! network, parallel patch search, and ASCII conversion.

pub mod amplifier;
pub mod ascii;
pub mod error;
pub mod network;
pub mod permutations;
pub mod pipeline;
pub mod search;

pub use amplifier::{max_signal, Amplification};
pub use error::{LinkError, LinkResult};
pub use network::{Network, NetworkConfig, Packet};
pub use permutations::Permutations;
pub use pipeline::{Pipeline, PipelineConfig, Topology};
