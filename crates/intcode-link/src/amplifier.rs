//! Phase-setting search over an amplifier pipeline.

use intcode_core::debug;

use crate::error::{LinkError, LinkResult};
use crate::permutations::Permutations;
use crate::pipeline::{Pipeline, Topology};

/// Best signal found and the phase ordering that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amplification {
    pub signal: i64,
    pub phases: Vec<i64>,
}

/// Try every ordering of `phase_set` with a seed of 0 and keep the highest
/// final signal. Ties keep the ordering seen first. The first failing
/// ordering aborts the search.
pub fn max_signal(
    pipeline: &Pipeline,
    phase_set: &[i64],
    topology: Topology,
) -> LinkResult<Amplification> {
    let mut best: Option<Amplification> = None;
    for phases in Permutations::new(phase_set) {
        let signal = pipeline.run(&phases, 0, topology)?;
        debug!("phases {:?} -> {}", phases, signal);
        if best.as_ref().map_or(true, |b| signal > b.signal) {
            best = Some(Amplification { signal, phases });
        }
    }
    best.ok_or(LinkError::EmptyPipeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PipelineConfig;
    use intcode_core::Interpreter;

    fn pipeline(source: &str) -> Pipeline {
        Pipeline::new(
            Interpreter::from_source(source).expect("parse failed"),
            PipelineConfig::default(),
        )
    }

    #[test]
    fn chain_examples() {
        let cases: [(&str, i64, [i64; 5]); 3] = [
            (
                "3,15,3,16,1002,16,10,16,1,16,15,15,4,15,99,0,0",
                43210,
                [4, 3, 2, 1, 0],
            ),
            (
                "3,23,3,24,1002,24,10,24,1002,23,-1,23,101,5,23,23,1,24,23,23,4,23,99,0,0",
                54321,
                [0, 1, 2, 3, 4],
            ),
            (
                "3,31,3,32,1002,32,10,32,1001,31,-2,31,1007,31,0,33,\
                 1002,33,7,33,1,33,31,31,1,32,31,31,4,31,99,0,0,0",
                65210,
                [1, 0, 4, 3, 2],
            ),
        ];
        for (source, signal, phases) in cases {
            let best = max_signal(&pipeline(source), &[0, 1, 2, 3, 4], Topology::Chain)
                .expect("search failed");
            assert_eq!(best.signal, signal);
            assert_eq!(best.phases, phases.to_vec());
        }
    }

    #[test]
    fn feedback_examples() {
        let p = pipeline(
            "3,26,1001,26,-4,26,3,27,1002,27,2,27,1,27,26,\
             27,4,27,1001,28,-1,28,1005,28,6,99,0,0,5",
        );
        let best = max_signal(&p, &[5, 6, 7, 8, 9], Topology::Feedback).expect("search failed");
        assert_eq!(best.signal, 139629729);
        assert_eq!(best.phases, vec![9, 8, 7, 6, 5]);

        let p = pipeline(
            "3,52,1001,52,-5,52,3,53,1,52,56,54,1007,54,5,55,1005,55,26,1001,54,\
             -5,54,1105,1,12,1,53,54,53,1008,54,0,55,1001,55,1,55,2,53,55,53,4,\
             53,1001,56,-1,56,1005,56,6,99,0,0,0,0,10",
        );
        let best = max_signal(&p, &[5, 6, 7, 8, 9], Topology::Feedback).expect("search failed");
        assert_eq!(best.signal, 18216);
        assert_eq!(best.phases, vec![9, 7, 8, 5, 6]);
    }

    #[test]
    fn failing_ordering_aborts() {
        assert!(max_signal(&pipeline("3,0,99"), &[0, 1], Topology::Chain).is_err());
    }
}
