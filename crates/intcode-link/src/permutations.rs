//! Permutation enumeration (Heap's algorithm, iterative form).

/// Iterator over every ordering of a slice. The first item is the input
/// order; each following item differs from the previous one by one swap.
#[derive(Debug, Clone)]
pub struct Permutations<T> {
    items: Vec<T>,
    counters: Vec<usize>,
    i: usize,
    started: bool,
}

impl<T: Clone> Permutations<T> {
    pub fn new(items: &[T]) -> Self {
        Permutations {
            items: items.to_vec(),
            counters: vec![0; items.len()],
            i: 1,
            started: false,
        }
    }
}

impl<T: Clone> Iterator for Permutations<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            self.started = true;
            return Some(self.items.clone());
        }

        while self.i < self.items.len() {
            let i = self.i;
            if self.counters[i] < i {
                if i % 2 == 0 {
                    self.items.swap(0, i);
                } else {
                    self.items.swap(self.counters[i], i);
                }
                self.counters[i] += 1;
                self.i = 1;
                return Some(self.items.clone());
            }
            self.counters[i] = 0;
            self.i += 1;
        }
        None
    }
}
