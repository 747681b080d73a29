//! A scripted [`Random`] which hands out pre-determined values.
use std::ops::Range;

use ripple_core::basic_types::Random;
use ripple_core::Int;

#[derive(Debug, Default)]
pub(crate) struct TestRandom {
    pub(crate) usizes: Vec<usize>,
    pub(crate) integers: Vec<Int>,
    pub(crate) bools: Vec<bool>,
    pub(crate) floats: Vec<f64>,
    pub(crate) weighted_choices: Vec<usize>,
}

impl Random for TestRandom {
    fn generate_bool(&mut self, _probability: f64) -> bool {
        self.bools.remove(0)
    }

    fn generate_usize_in_range(&mut self, range: Range<usize>) -> usize {
        let selected = self.usizes.remove(0);
        assert!(
            range.contains(&selected),
            "the scripted value {selected} is not in {range:?}"
        );
        selected
    }

    fn generate_i64_in_range(&mut self, lb: Int, ub: Int) -> Int {
        let selected = self.integers.remove(0);
        assert!(
            (lb..=ub).contains(&selected),
            "the scripted value {selected} is not in [{lb}, {ub}]"
        );
        selected
    }

    fn generate_f64(&mut self) -> f64 {
        self.floats.remove(0)
    }

    fn get_weighted_choice(&mut self, weights: &[f64]) -> Option<usize> {
        let selected = self.weighted_choices.remove(0);
        assert!(weights[selected] > 0.0, "the scripted choice {selected} has no weight");
        Some(selected)
    }
}
