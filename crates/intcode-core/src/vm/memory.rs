//! VM Memory Model
//!
//! Growable arena of signed cells. Every read and write goes through
//! [`Memory::access`], which zero-fills up to the requested address.

use crate::error::{VmError, VmResult};

/// Intcode memory arena
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    cells: Vec<i64>,
    limit: usize,
}

impl Memory {
    pub fn new(cells: Vec<i64>, limit: usize) -> Self {
        Memory { cells, limit }
    }

    /// Resolve `address` to a cell, growing the arena if it lies past the end.
    pub fn access(&mut self, address: i64) -> VmResult<&mut i64> {
        let index = usize::try_from(address).map_err(|_| VmError::NegativeAddress(address))?;
        if index >= self.cells.len() {
            if index >= self.limit {
                return Err(VmError::MemoryLimitExceeded {
                    address: index,
                    limit: self.limit,
                });
            }
            self.cells.resize(index + 1, 0);
        }
        Ok(&mut self.cells[index])
    }

    pub fn read(&mut self, address: i64) -> VmResult<i64> {
        self.access(address).map(|cell| *cell)
    }

    pub fn write(&mut self, address: i64, value: i64) -> VmResult<()> {
        *self.access(address)? = value;
        Ok(())
    }

    /// Read without growing; cells past the end read as zero.
    pub fn peek(&self, address: usize) -> i64 {
        self.cells.get(address).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn read_in_bounds() {
        let mut mem = Memory::new(vec![1, 2, 3], 16);
        assert_eq!(mem.read(2).expect("read failed"), 3);
        assert_eq!(mem.len(), 3);
    }

    #[test]
    fn read_past_end_grows_with_zeros() {
        let mut mem = Memory::new(vec![7], 16);
        assert_eq!(mem.read(4).expect("read failed"), 0);
        assert_eq!(mem.as_slice(), &[7, 0, 0, 0, 0]);
    }

    #[test]
    fn negative_address_rejected() {
        let mut mem = Memory::new(vec![0], 16);
        assert!(matches!(mem.read(-1), Err(VmError::NegativeAddress(-1))));
        assert_eq!(mem.len(), 1);
    }

    #[test]
    fn limit_enforced() {
        let mut mem = Memory::new(vec![0], 4);
        mem.write(3, 9).expect("write at limit - 1 failed");
        assert!(matches!(
            mem.write(4, 1),
            Err(VmError::MemoryLimitExceeded { address: 4, limit: 4 })
        ));
        assert_eq!(mem.len(), 4);
    }

    #[test]
    fn peek_never_grows() {
        let mem = Memory::new(vec![5], 16);
        assert_eq!(mem.peek(0), 5);
        assert_eq!(mem.peek(10), 0);
        assert_eq!(mem.len(), 1);
    }

    proptest! {
        #[test]
        fn growth_preserves_existing_cells(
            initial in prop::collection::vec(any::<i64>(), 1..64),
            address in 0i64..4096,
            value in any::<i64>(),
        ) {
            let mut mem = Memory::new(initial.clone(), 1 << 16);
            mem.write(address, value).expect("write failed");

            let index = address as usize;
            prop_assert_eq!(mem.len(), initial.len().max(index + 1));
            prop_assert_eq!(mem.peek(index), value);
            for (i, cell) in initial.iter().enumerate() {
                if i != index {
                    prop_assert_eq!(mem.peek(i), *cell);
                }
            }
            for i in initial.len()..mem.len() {
                if i != index {
                    prop_assert_eq!(mem.peek(i), 0);
                }
            }
        }
    }
}
