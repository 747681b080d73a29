//! A model without constraints, on which every move is accepted.
use ripple_core::engine::Solver;
use ripple_core::Int;
use ripple_core::IntVarId;

use crate::annealing::Annealer;
use crate::annealing::AnnealerOptions;
use crate::assignment::Assignment;
use crate::objective::Objective;

pub(crate) struct Unconstrained {
    pub(crate) assignment: Assignment,
    pub(crate) annealer: Annealer,
    pub(crate) variables: Vec<IntVarId>,
}

/// Creates one variable for every `(initial value, lower bound, upper bound)`.
pub(crate) fn unconstrained(domains: &[(Int, Int, Int)]) -> Unconstrained {
    let mut solver = Solver::new();
    let variables = domains
        .iter()
        .map(|&(value, lb, ub)| solver.make_int_var(value, lb, ub).unwrap())
        .collect::<Vec<_>>();
    let violation = solver.make_int_var(0, 0, 0).unwrap();
    solver.close().unwrap();

    let assignment = Assignment::new(solver, violation, Objective::satisfy()).unwrap();
    let mut annealer = Annealer::with_default_schedule(AnnealerOptions::default()).unwrap();
    annealer.start(&assignment);
    Unconstrained {
        assignment,
        annealer,
        variables,
    }
}

impl Unconstrained {
    pub(crate) fn values(&self) -> Vec<Int> {
        self.variables
            .iter()
            .map(|&var| self.assignment.value(var))
            .collect()
    }
}
