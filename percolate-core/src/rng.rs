//! Uniform deviate sources consumed by graph construction and attack.
//!
//! Graph construction and attack never seed a generator themselves. Callers
//! hand in anything that implements [`UniformSource`]; every [`rand::Rng`]
//! qualifies, so a `SmallRng` from [`seeded_rng`], seeded once at start-up,
//! gives reproducible sweeps.

use rand::{Rng, SeedableRng, distributions::Standard, rngs::SmallRng};

/// Produces independent uniform deviates in `[0, 1)`.
///
/// # Examples
/// ```
/// use percolate_core::{UniformSource, seeded_rng};
///
/// let mut rng = seeded_rng(7);
/// let draw = rng.next_uniform();
/// assert!((0.0..1.0).contains(&draw));
/// ```
pub trait UniformSource {
    /// Returns the next deviate in `[0, 1)`.
    fn next_uniform(&mut self) -> f64;
}

impl<R: Rng + ?Sized> UniformSource for R {
    fn next_uniform(&mut self) -> f64 {
        self.sample(Standard)
    }
}

/// Builds the default generator used by the sweep driver.
#[must_use]
pub fn seeded_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// Draws a node identifier uniformly from `0..node_count`.
///
/// Computes `floor(u * node_count)` and clamps the result so a source that
/// returns a value at or above `1.0` cannot escape the index space.
/// `node_count` must be non-zero.
pub(crate) fn uniform_index<S: UniformSource + ?Sized>(source: &mut S, node_count: usize) -> usize {
    debug_assert!(node_count > 0, "cannot sample from an empty index space");
    let scaled = (source.next_uniform() * node_count as f64).floor();
    if scaled <= 0.0 {
        return 0;
    }
    (scaled as usize).min(node_count - 1)
}
