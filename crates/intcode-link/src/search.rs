//! Parallel patch search.
//!
//! Workers pull candidates from a shared iterator, patch a fresh clone of
//! the template, run it to halt against empty input and test the result.
//! The first accepted candidate or the first error stops every worker.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::thread;

use intcode_core::{debug, Interpreter, VmResult};

use crate::error::{LinkError, LinkResult};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn worker_count() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

/// Find a candidate for which `accept` holds after `prepare` patched a
/// clone of `template` and the clone ran to halt.
pub fn search<T, I, P, A>(
    template: &Interpreter,
    candidates: I,
    prepare: P,
    accept: A,
) -> LinkResult<Option<T>>
where
    T: Send,
    I: IntoIterator<Item = T>,
    I::IntoIter: Send,
    P: Fn(&mut Interpreter, &T) -> VmResult<()> + Sync,
    A: Fn(&Interpreter) -> bool + Sync,
{
    // Interpreter holds Send-only endpoints; share the bare machine instead.
    let machine = template.machine().clone();
    let candidates = Mutex::new(candidates.into_iter());
    let stop = AtomicBool::new(false);

    let attempt = |candidate: &T| -> LinkResult<bool> {
        let mut vm = Interpreter::from(machine.clone());
        prepare(&mut vm, candidate)?;
        vm.run_with_input([])?;
        Ok(accept(&vm))
    };

    let work = || -> LinkResult<Option<T>> {
        while !stop.load(Ordering::Relaxed) {
            let Some(candidate) = lock(&candidates).next() else {
                break;
            };
            match attempt(&candidate) {
                Ok(true) => {
                    stop.store(true, Ordering::Relaxed);
                    return Ok(Some(candidate));
                }
                Ok(false) => {}
                Err(e) => {
                    stop.store(true, Ordering::Relaxed);
                    return Err(e);
                }
            }
        }
        Ok(None)
    };

    let workers = worker_count();
    debug!("searching with {} workers", workers);

    thread::scope(|scope| {
        let handles: Vec<_> = (0..workers).map(|_| scope.spawn(&work)).collect();

        let mut found = None;
        let mut failure = None;
        for handle in handles {
            match handle.join() {
                Ok(Ok(Some(candidate))) => {
                    found.get_or_insert(candidate);
                }
                Ok(Ok(None)) => {}
                Ok(Err(e)) => {
                    failure.get_or_insert(e);
                }
                Err(_) => {
                    failure.get_or_insert(LinkError::WorkerPanicked);
                }
            }
        }

        match (found, failure) {
            (Some(candidate), _) => Ok(Some(candidate)),
            (None, Some(e)) => Err(e),
            (None, None) => Ok(None),
        }
    })
}

/// Search nouns and verbs in `0..max` for the pair that leaves `target`
/// at address 0. The noun is written to address 1, the verb to address 2.
pub fn find_noun_verb(template: &Interpreter, target: i64, max: i64) -> LinkResult<Option<(i64, i64)>> {
    let pairs = (0..max).flat_map(move |noun| (0..max).map(move |verb| (noun, verb)));
    search(
        template,
        pairs,
        |vm, &(noun, verb)| {
            vm.poke(1, noun)?;
            vm.poke(2, verb)
        },
        |vm| vm.peek(0) == target,
    )
}
