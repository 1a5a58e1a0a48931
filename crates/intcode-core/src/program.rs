//! Program Loader
//!
//! Parses Intcode listings: comma-separated, optionally signed decimal
//! integers with an optional trailing newline.

use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{VmError, VmResult};

/// Parsed program listing.
///
/// Cells are shared behind an `Arc`, so handing the same program to many
/// machines never re-parses or copies it until a machine is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    cells: Arc<[i64]>,
}

impl Program {
    /// Parse a program listing.
    pub fn parse(source: &str) -> VmResult<Self> {
        let source = source.trim();
        if source.is_empty() {
            return Err(VmError::EmptyProgram);
        }

        let cells = source
            .split(',')
            .enumerate()
            .map(|(index, token)| {
                let token = token.trim();
                token.parse::<i64>().map_err(|_| VmError::MalformedProgram {
                    index,
                    token: token.to_string(),
                })
            })
            .collect::<VmResult<Vec<i64>>>()?;

        Ok(Program { cells: cells.into() })
    }

    /// Read and parse a program listing from disk.
    pub fn load(path: &Path) -> VmResult<Self> {
        let source = fs::read_to_string(path)?;
        Self::parse(&source)
    }

    pub fn cells(&self) -> &[i64] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl From<Vec<i64>> for Program {
    fn from(cells: Vec<i64>) -> Self {
        Program { cells: cells.into() }
    }
}

impl FromStr for Program {
    type Err = VmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Program::parse(s)
    }
}
