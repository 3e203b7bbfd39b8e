/* ************************************************************************ **
** This file is part of densemat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Random number sources shared by everything that fills matrices.

use ::rand::SeedableRng;
use ::rand::rngs::StdRng;
use ::std::sync::{Mutex, PoisonError};

pub const FIXED_SEED: u64 = 1;

/// A seeded generator shared between threads.
///
/// Every draw happens under the lock, so concurrent users get disjoint
/// pieces of one sequential stream.
#[derive(Debug)]
pub struct SharedStream {
    rng: Mutex<StdRng>,
}

impl SharedStream {
    pub fn new(seed: u64) -> Self
    { SharedStream { rng: Mutex::new(StdRng::seed_from_u64(seed)) } }

    /// Run `f` with exclusive access to the generator.
    pub fn with<B>(&self, f: impl FnOnce(&mut StdRng) -> B) -> B {
        // a panic inside f cannot leave a StdRng in a broken state
        let mut guard = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

lazy_static! {
    /// Process-wide generator behind every "seed fixed" operation.
    ///
    /// It is seeded once and never reseeded, so results depend on how many
    /// values were drawn from it before.
    static ref FIXED_SEED_RNG: SharedStream = SharedStream::new(FIXED_SEED);
}

/// A generator seeded from the operating system.
pub fn entropy_rng() -> StdRng { StdRng::from_entropy() }

/// Run `f` with exclusive access to the fixed-seed generator.
pub fn with_fixed_seed_rng<B>(f: impl FnOnce(&mut StdRng) -> B) -> B
{ FIXED_SEED_RNG.with(f) }
