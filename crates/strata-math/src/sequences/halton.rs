//! Halton sequence.

use crate::error::{MathError, MathResult};
use crate::sequences::LowDiscrepancySequence;

const PRIMES: [u64; 16] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53];

/// Halton sequence with one prime base per dimension.
///
/// Index zero (the origin) is skipped; the first point of the 2-d sequence is
/// `(1/2, 1/3)`.
///
/// # Example
///
/// ```rust
/// use strata_math::sequences::{Halton, LowDiscrepancySequence};
///
/// let mut halton = Halton::new(2).unwrap();
/// assert_eq!(halton.next_point(), &[0.5, 1.0 / 3.0]);
/// assert_eq!(halton.next_point(), &[0.25, 2.0 / 3.0]);
/// ```
#[derive(Debug, Clone)]
pub struct Halton {
    index: u64,
    point: Vec<f64>,
}

impl Halton {
    /// Creates a sequence of the given dimension (at most 16).
    pub fn new(dimension: usize) -> MathResult<Self> {
        if dimension == 0 || dimension > PRIMES.len() {
            return Err(MathError::invalid_input(format!(
                "Halton dimension must be in 1..={}, got {dimension}",
                PRIMES.len()
            )));
        }
        Ok(Self {
            index: 0,
            point: vec![0.0; dimension],
        })
    }

    /// First `n` points.
    pub fn points(dimension: usize, n: usize) -> MathResult<Vec<Vec<f64>>> {
        let mut seq = Self::new(dimension)?;
        Ok((0..n).map(|_| seq.next_point().to_vec()).collect())
    }

    /// Van der Corput radical inverse of `index` in `base`.
    fn radical_inverse(mut index: u64, base: u64) -> f64 {
        let inv_base = 1.0 / base as f64;
        let mut factor = inv_base;
        let mut result = 0.0;
        while index > 0 {
            result += (index % base) as f64 * factor;
            index /= base;
            factor *= inv_base;
        }
        result
    }
}

impl LowDiscrepancySequence for Halton {
    fn dimension(&self) -> usize {
        self.point.len()
    }

    fn next_point(&mut self) -> &[f64] {
        self.index += 1;
        for (coordinate, base) in self.point.iter_mut().zip(PRIMES) {
            *coordinate = Self::radical_inverse(self.index, base);
        }
        &self.point
    }

    fn reset(&mut self) {
        self.index = 0;
    }

    fn skip(&mut self, n: usize) {
        self.index += n as u64;
    }
}
