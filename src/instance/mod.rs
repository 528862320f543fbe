//! Problem instances
//!
//! An instance is an ordered, non-empty list of terminals, each a point in 3D integer space. The
//! exchange format shared with the solver binaries is:
//!
//! ```text
//! 3
//! 0 0 0
//! 5 5 5
//! 9 0 9
//! ```
//!
//! ## Modules
//!
//! - `generator` - random instances from an explicit random source
//! - `parse` - reading the exchange format (fixtures)
//! - `writer` - writing the exchange format

mod generator;
mod parse;
mod writer;

use std::fmt;

pub use generator::{DEFAULT_COORDINATE_MAX, MAX_TERMINALS, fresh_seed, generate, seeded_rng};
pub use parse::{parse, read_fixture};
pub use writer::{write, write_to_path};

use crate::errors::InstanceError;

/// One point the solver must connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Terminal {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl Terminal {
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Largest of the three coordinates.
    pub fn max_coordinate(&self) -> u32 {
        self.x.max(self.y).max(self.z)
    }
}

/// An immutable, non-empty sequence of terminals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemInstance {
    terminals: Vec<Terminal>,
}

impl ProblemInstance {
    /// Build an instance, rejecting an empty terminal list.
    pub fn new(terminals: Vec<Terminal>) -> Result<Self, InstanceError> {
        if terminals.is_empty() {
            return Err(InstanceError::Empty);
        }
        Ok(Self { terminals })
    }

    pub fn terminals(&self) -> &[Terminal] {
        &self.terminals
    }

    /// Number of terminals (the serialized count prefix).
    pub fn len(&self) -> usize {
        self.terminals.len()
    }

    /// Always false for a constructed instance.
    pub fn is_empty(&self) -> bool {
        self.terminals.is_empty()
    }
}

/// Renders the exchange format, identical to what [`write`] produces.
impl fmt::Display for ProblemInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.terminals.len())?;
        for t in &self.terminals {
            writeln!(f, "{} {} {}", t.x, t.y, t.z)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_instance_rejected() {
        assert!(matches!(ProblemInstance::new(Vec::new()), Err(InstanceError::Empty)));
    }

    #[test]
    fn test_duplicates_are_kept() {
        let t = Terminal::new(1, 2, 3);
        let inst = ProblemInstance::new(vec![t, t]).unwrap();
        assert_eq!(inst.len(), 2);
        assert!(!inst.is_empty());
    }

    #[test]
    fn test_display_matches_exchange_format() {
        let inst = ProblemInstance::new(vec![
            Terminal::new(0, 0, 0),
            Terminal::new(5, 5, 5),
            Terminal::new(9, 0, 9),
        ])
        .unwrap();
        assert_eq!(inst.to_string(), "3\n0 0 0\n5 5 5\n9 0 9\n");
    }

    #[test]
    fn test_max_coordinate() {
        assert_eq!(Terminal::new(3, 9, 4).max_coordinate(), 9);
    }
}
