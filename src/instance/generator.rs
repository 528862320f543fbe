//! Random instance generation.
//!
//! The random source is always passed in by the caller. A campaign seeds one [`StdRng`] and threads
//! it through every call, so a fixed seed reproduces the exact same instance files.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{ProblemInstance, Terminal};
use crate::errors::InstanceError;

/// Default inclusive upper bound for every coordinate.
pub const DEFAULT_COORDINATE_MAX: u32 = 999;

/// Largest instance the generator will build.
pub const MAX_TERMINALS: usize = 1 << 20;

/// Generate `terminal_count` terminals with coordinates uniform on `[0, coordinate_max]`.
///
/// Duplicate points are allowed; filtering them is the solver's job.
pub fn generate<R: Rng + ?Sized>(
    rng: &mut R,
    terminal_count: usize,
    coordinate_max: u32,
) -> Result<ProblemInstance, InstanceError> {
    if terminal_count == 0 {
        return Err(InstanceError::Empty);
    }
    if terminal_count > MAX_TERMINALS {
        return Err(InstanceError::TooLarge {
            requested: terminal_count,
            limit: MAX_TERMINALS,
        });
    }
    let mut terminals = Vec::with_capacity(terminal_count.min(1024));
    for _ in 0..terminal_count {
        // x, y, z drawn in that order
        let x = rng.gen_range(0..=coordinate_max);
        let y = rng.gen_range(0..=coordinate_max);
        let z = rng.gen_range(0..=coordinate_max);
        terminals.push(Terminal::new(x, y, z));
    }
    ProblemInstance::new(terminals)
}

/// The campaign's random source for a given seed.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// A seed drawn from OS entropy, for runs that did not ask for one.
pub fn fresh_seed() -> u64 {
    rand::random()
}
