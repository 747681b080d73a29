use std::fmt::Debug;
use std::ops::Range;

use rand::Rng;
use rand::SeedableRng;

use super::Int;
use crate::ripple_assert_moderate;

/// Abstraction for randomness, so that neighbourhoods and the annealer can be driven by a
/// deterministic source in tests.
pub trait Random: Debug {
    /// Generates a bool which is true with probability `probability`, which must lie in `[0, 1]`.
    fn generate_bool(&mut self, probability: f64) -> bool;

    /// Generates a usize uniformly from `[range.start, range.end)`.
    fn generate_usize_in_range(&mut self, range: Range<usize>) -> usize;

    /// Generates an integer uniformly from `[lb, ub]`.
    fn generate_i64_in_range(&mut self, lb: Int, ub: Int) -> Int;

    /// Generates a float in `[0, 1)`.
    fn generate_f64(&mut self) -> f64;

    /// Picks an index with probability proportional to its weight.
    fn get_weighted_choice(&mut self, weights: &[f64]) -> Option<usize>;
}

impl<T> Random for T
where
    T: SeedableRng + Rng + Debug,
{
    fn generate_bool(&mut self, probability: f64) -> bool {
        ripple_assert_moderate!(
            (0.0..=1.0).contains(&probability),
            "It should hold that 0.0 <= {probability} <= 1.0"
        );

        self.gen_bool(probability)
    }

    fn generate_usize_in_range(&mut self, range: Range<usize>) -> usize {
        self.gen_range(range)
    }

    fn generate_i64_in_range(&mut self, lb: Int, ub: Int) -> Int {
        self.gen_range(lb..=ub)
    }

    fn generate_f64(&mut self) -> f64 {
        self.gen_range(0.0..1.0)
    }

    fn get_weighted_choice(&mut self, weights: &[f64]) -> Option<usize> {
        let sum = weights.iter().sum::<f64>();
        if weights.is_empty() || sum <= 0.0 {
            return None;
        }

        let spin = self.generate_f64() * sum;

        let mut accumulated = 0.0;
        for (index, weight) in weights.iter().enumerate() {
            accumulated += weight;
            if spin < accumulated {
                return Some(index);
            }
        }

        // Rounding can leave the spin just above the accumulated total.
        weights.iter().rposition(|weight| *weight > 0.0)
    }
}
