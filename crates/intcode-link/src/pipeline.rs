//! Blocking pipelines.
//!
//! Every stage is a clone of one template interpreter running on its own
//! scoped thread. Stages hand values over `mpsc` channels; a halting stage
//! drops its sender, which the next stage observes as end-of-stream.
//!
//! The calling thread drains the final stage. In a feedback loop it also
//! relays each final value back into the first stage, so the loop-carried
//! value is handed to the caller exactly once, after every stage halted.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use intcode_core::vm::{Chained, OutputPort};
use intcode_core::Interpreter;

use crate::error::{LinkError, LinkResult};

/// How the final stage is wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Final output goes only to the caller.
    Chain,
    /// Final output is also fed back into the first stage.
    Feedback,
}

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Capacity of each stage-to-stage queue. `None` means unbounded.
    /// Bounded queues make a fast producer wait for its consumer.
    pub queue_capacity: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            queue_capacity: Some(1),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unbounded() -> Self {
        PipelineConfig {
            queue_capacity: None,
        }
    }
}

/// Stage template plus wiring policy.
#[derive(Debug, Clone)]
pub struct Pipeline {
    template: Interpreter,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(template: Interpreter, config: PipelineConfig) -> Self {
        Pipeline { template, config }
    }

    /// Run one stage per phase in a straight line and return the final
    /// stage's last output. Each stage first reads its phase; the first
    /// stage then reads `seed`.
    pub fn run_chain(&self, phases: &[i64], seed: i64) -> LinkResult<i64> {
        self.run(phases, seed, Topology::Chain)
    }

    /// Like [`Pipeline::run_chain`], but the final stage's outputs are fed
    /// back into the first stage until every stage has halted.
    pub fn run_feedback(&self, phases: &[i64], seed: i64) -> LinkResult<i64> {
        self.run(phases, seed, Topology::Feedback)
    }

    pub fn run(&self, phases: &[i64], seed: i64, topology: Topology) -> LinkResult<i64> {
        if phases.is_empty() {
            return Err(LinkError::EmptyPipeline);
        }

        // The relay never blocks on the first stage, so this link is unbounded.
        let (loop_tx, loop_rx) = mpsc::channel::<i64>();
        // A chain closes the first stage's channel up front, so reading past
        // the prelude ends with InputClosed instead of blocking.
        let mut loop_tx = match topology {
            Topology::Feedback => Some(loop_tx),
            Topology::Chain => {
                drop(loop_tx);
                None
            }
        };

        // inputs[i] feeds stage i; outputs[i] is where stage i writes.
        let (final_tx, final_rx) = self.link();
        let mut inputs = vec![loop_rx];
        let mut outputs = Vec::with_capacity(phases.len());
        for _ in 1..phases.len() {
            let (tx, rx) = self.link();
            outputs.push(tx);
            inputs.push(rx);
        }
        outputs.push(final_tx);

        let mut stages = Vec::with_capacity(phases.len());
        for (index, ((&phase, input), output)) in
            phases.iter().zip(inputs).zip(outputs).enumerate()
        {
            let prelude = if index == 0 { vec![phase, seed] } else { vec![phase] };
            let mut stage = self.template.clone();
            stage.attach_input(Chained::new(prelude, input));
            stage.attach_output(output);
            stages.push(stage);
        }

        thread::scope(|scope| {
            let handles: Vec<_> = stages
                .into_iter()
                .enumerate()
                .map(|(index, mut stage)| {
                    scope.spawn(move || {
                        stage
                            .exec_all()
                            .map_err(|source| LinkError::Stage { index, source })
                    })
                })
                .collect();

            let mut last = None;
            for value in final_rx.iter() {
                last = Some(value);
                if let Some(tx) = &loop_tx {
                    // The first stage may already have halted; nothing to relay to.
                    let _ = tx.send(value);
                }
            }
            loop_tx.take();

            for (index, handle) in handles.into_iter().enumerate() {
                handle
                    .join()
                    .map_err(|_| LinkError::StagePanicked { index })??;
            }
            last.ok_or(LinkError::NoOutput)
        })
    }

    /// One stage-to-stage connection.
    fn link(&self) -> (Box<dyn OutputPort>, Receiver<i64>) {
        match self.config.queue_capacity {
            Some(capacity) => {
                let (tx, rx) = mpsc::sync_channel(capacity);
                (Box::new(tx), rx)
            }
            None => {
                let (tx, rx): (Sender<i64>, Receiver<i64>) = mpsc::channel();
                (Box::new(tx), rx)
            }
        }
    }

    pub fn template(&self) -> &Interpreter {
        &self.template
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}
