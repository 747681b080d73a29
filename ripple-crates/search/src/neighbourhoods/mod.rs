//! Neighbourhoods propose moves to the [`Annealer`], which decides whether they are committed.
mod all_different_non_uniform;
mod all_different_uniform;
mod circuit;
mod combinator;
mod int_lin_eq;
mod random;
#[cfg(test)]
pub(crate) mod test_helpers;

use std::fmt::Debug;

pub use all_different_non_uniform::AllDifferentNonUniformNeighbourhood;
pub use all_different_uniform::AllDifferentUniformNeighbourhood;
pub use circuit::CircuitNeighbourhood;
pub use combinator::NeighbourhoodCombinator;
pub use int_lin_eq::IntLinEqNeighbourhood;
use ripple_core::basic_types::Random;
use ripple_core::EngineError;
use ripple_core::IntVarId;
pub use random::RandomNeighbourhood;

use crate::annealing::Annealer;
use crate::assignment::Assignment;
use crate::assignment::AssignmentModifier;
use crate::basic_types::SearchError;

/// A way of moving from one assignment to another.
///
/// A neighbourhood is responsible for the variables it covers: it gives them their initial values
/// and changes them during search.
pub trait Neighbourhood: Debug {
    /// Assigns the covered variables before the search starts.
    fn initialise(
        &mut self,
        random: &mut dyn Random,
        modifier: &mut AssignmentModifier<'_>,
    ) -> Result<(), EngineError>;

    /// Draws a random move and offers it to `annealer`. Returns whether a move was committed.
    fn random_move(
        &mut self,
        random: &mut dyn Random,
        assignment: &mut Assignment,
        annealer: &mut Annealer,
    ) -> Result<bool, SearchError>;

    fn covered_variables(&self) -> &[IntVarId];
}

impl<N: Neighbourhood + ?Sized> Neighbourhood for Box<N> {
    fn initialise(
        &mut self,
        random: &mut dyn Random,
        modifier: &mut AssignmentModifier<'_>,
    ) -> Result<(), EngineError> {
        (**self).initialise(random, modifier)
    }

    fn random_move(
        &mut self,
        random: &mut dyn Random,
        assignment: &mut Assignment,
        annealer: &mut Annealer,
    ) -> Result<bool, SearchError> {
        (**self).random_move(random, assignment, annealer)
    }

    fn covered_variables(&self) -> &[IntVarId] {
        (**self).covered_variables()
    }
}
