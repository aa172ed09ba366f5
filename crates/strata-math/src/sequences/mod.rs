//! Low-discrepancy sequences used to seed global searches.

mod halton;

pub use halton::Halton;

/// A deterministic sequence of points in the unit hypercube.
pub trait LowDiscrepancySequence {
    /// Number of coordinates in each point.
    fn dimension(&self) -> usize;

    /// Advances the sequence and returns the next point, each coordinate in `[0, 1)`.
    fn next_point(&mut self) -> &[f64];

    /// Restarts the sequence from its first point.
    fn reset(&mut self);

    /// Skips `n` points.
    fn skip(&mut self, n: usize);
}
