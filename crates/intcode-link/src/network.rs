//! Cooperative packet network.
//!
//! A single scheduler multiplexes many [`SteppedInterpreter`] nodes. Nodes
//! emit packets as `(dest, x, y)` triples; a delivery appends `x, y` to the
//! destination's input queue and wakes it. Address 255 is the NAT, which
//! keeps only the most recent packet it received.

use std::collections::{BTreeSet, VecDeque};

use intcode_core::{debug, ExecState, SteppedInterpreter};

use crate::error::{LinkError, LinkResult};

pub const NAT_ADDRESS: i64 = 255;

/// Value a node reads when the network has nothing for it.
pub const IDLE_INPUT: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet {
    pub dest: i64,
    pub x: i64,
    pub y: i64,
}

/// Network configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Idle rounds tolerated before the run gives up.
    pub max_idle_rounds: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            max_idle_rounds: 10_000,
        }
    }
}

impl NetworkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_idle_rounds(mut self, rounds: usize) -> Self {
        self.max_idle_rounds = rounds;
        self
    }
}

#[derive(Debug)]
pub struct Network {
    nodes: Vec<SteppedInterpreter>,
    ready: VecDeque<usize>,
    blocked: BTreeSet<usize>,
    nat: Option<Packet>,
    config: NetworkConfig,
}

impl Network {
    /// Clone `template` once per address and queue every node with its
    /// own address as first input.
    pub fn new(template: &SteppedInterpreter, size: usize, config: NetworkConfig) -> Self {
        let nodes = (0..size)
            .map(|address| {
                let mut node = template.clone();
                node.push_input(address as i64);
                node
            })
            .collect();
        Network {
            nodes,
            ready: (0..size).collect(),
            blocked: BTreeSet::new(),
            nat: None,
            config,
        }
    }

    /// Route one packet. NAT packets replace the stored one.
    pub fn deliver(&mut self, packet: Packet) -> LinkResult<()> {
        if packet.dest == NAT_ADDRESS {
            self.nat = Some(packet);
            return Ok(());
        }

        let address = usize::try_from(packet.dest)
            .ok()
            .filter(|&a| a < self.nodes.len())
            .ok_or(LinkError::UnknownDestination(packet.dest))?;

        self.nodes[address].extend_input([packet.x, packet.y]);
        if self.blocked.remove(&address) {
            self.ready.push_back(address);
        }
        Ok(())
    }

    /// Run ready nodes round-robin until every node is blocked with an
    /// empty queue. Returns the first packet addressed to the NAT during
    /// this call.
    pub fn run_until_idle(&mut self) -> LinkResult<Option<Packet>> {
        let mut first_nat = None;

        while let Some(address) = self.ready.pop_front() {
            let node = &mut self.nodes[address];
            match node.exec_all() {
                Ok(ExecState::BlockedOnInput) => {}
                Ok(_) => return Err(LinkError::NodeHalted(address)),
                Err(source) => return Err(LinkError::Node { address, source }),
            }
            self.blocked.insert(address);

            let output = node.drain_output();
            if output.len() % 3 != 0 {
                return Err(LinkError::IncompletePacket {
                    address,
                    values: output.len(),
                });
            }
            for triple in output.chunks_exact(3) {
                let packet = Packet {
                    dest: triple[0],
                    x: triple[1],
                    y: triple[2],
                };
                if packet.dest == NAT_ADDRESS && first_nat.is_none() {
                    first_nat = Some(packet);
                }
                self.deliver(packet)?;
            }
        }
        Ok(first_nat)
    }

    /// Hand every blocked node the idle marker and make it ready again.
    pub fn wake_idle(&mut self) {
        for address in std::mem::take(&mut self.blocked) {
            self.nodes[address].push_input(IDLE_INPUT);
            self.ready.push_back(address);
        }
    }

    /// Run until some node sends a packet to the NAT and return it.
    pub fn run_until_nat_packet(&mut self) -> LinkResult<Packet> {
        let mut idle_rounds = 0;
        loop {
            if let Some(packet) = self.run_until_idle()? {
                return Ok(packet);
            }
            idle_rounds += 1;
            if idle_rounds > self.config.max_idle_rounds {
                return Err(LinkError::Stalled(self.config.max_idle_rounds));
            }
            self.wake_idle();
        }
    }

    /// Whenever the network goes idle, re-send the NAT's packet to node 0.
    /// Returns that packet the first time its Y value is sent twice in a row.
    ///
    /// Idle rounds without any NAT packet count toward `Stalled`; NAT
    /// deliveries that never repeat count toward `NoRepeat`. Both share
    /// `max_idle_rounds` as their limit.
    pub fn run_with_nat(&mut self) -> LinkResult<Packet> {
        let limit = self.config.max_idle_rounds;
        let mut last_y = None;
        let mut idle_rounds = 0;
        let mut deliveries = 0;
        loop {
            self.run_until_idle()?;

            let Some(stored) = self.nat else {
                idle_rounds += 1;
                if idle_rounds > limit {
                    return Err(LinkError::Stalled(limit));
                }
                self.wake_idle();
                continue;
            };
            let packet = Packet { dest: 0, ..stored };
            debug!("NAT -> 0: x={} y={}", packet.x, packet.y);
            if last_y == Some(packet.y) {
                return Ok(packet);
            }
            deliveries += 1;
            if deliveries > limit {
                return Err(LinkError::NoRepeat(limit));
            }
            last_y = Some(packet.y);
            self.deliver(packet)?;
        }
    }

    pub fn nat(&self) -> Option<Packet> {
        self.nat
    }

    pub fn nodes(&self) -> &[SteppedInterpreter] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }
}
