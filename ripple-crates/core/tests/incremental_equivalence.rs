#![cfg(test)]

use ripple_core::engine::OutputToInputMarkingMode;
use ripple_core::engine::PropagationMode;
use ripple_core::engine::Solver;
use ripple_core::invariants::CountConst;
use ripple_core::invariants::ElementVar;
use ripple_core::invariants::Linear;
use ripple_core::invariants::MaxSparse;
use ripple_core::invariants::Plus;
use ripple_core::invariants::Times;
use ripple_core::rand::rngs::SmallRng;
use ripple_core::rand::Rng;
use ripple_core::rand::SeedableRng;
use ripple_core::violation_invariants::AllDifferent;
use ripple_core::Int;
use ripple_core::IntVarId;

const NUM_SEARCH_VARS: usize = 4;

/// A model in which most invariants read a defined variable next to search variables:
///
/// ```text
/// twos = count(2, [x0, x1])     shifted = twos + x0       selected = xs[twos]
/// sum = 2 * shifted - selected + x3                       largest = max(sum, x2, selected)
/// scaled = largest * twos       violation = alldifferent(shifted, selected, x1, x3)
/// ```
struct LayeredModel {
    solver: Solver,
    search_vars: Vec<IntVarId>,
    defined_vars: Vec<IntVarId>,
}

fn layered_model(
    values: &[Int],
    mode: PropagationMode,
    marking_mode: OutputToInputMarkingMode,
) -> LayeredModel {
    let mut solver = Solver::new();
    solver.set_propagation_mode(mode).unwrap();
    solver.set_output_to_input_marking_mode(marking_mode).unwrap();

    let xs = values
        .iter()
        .map(|&value| solver.make_int_var(value, 0, 4).unwrap())
        .collect::<Vec<_>>();
    let mut defined = || solver.make_int_var(0, 0, 0).unwrap();
    let (twos, shifted, selected, sum, largest, scaled, violation) =
        (defined(), defined(), defined(), defined(), defined(), defined(), defined());

    let _ = solver.make_invariant(CountConst::new(twos, 2, [xs[0], xs[1]])).unwrap();
    let _ = solver.make_invariant(Plus::new(shifted, twos, xs[0])).unwrap();
    let _ = solver
        .make_invariant(ElementVar::new(selected, twos, xs.clone(), 0))
        .unwrap();
    let _ = solver
        .make_invariant(Linear::new(sum, vec![2, -1, 1], [shifted, selected, xs[3]]))
        .unwrap();
    let _ = solver
        .make_invariant(MaxSparse::new(largest, [sum, xs[2], selected]))
        .unwrap();
    let _ = solver.make_invariant(Times::new(scaled, largest, twos)).unwrap();
    let _ = solver
        .make_violation_invariant(AllDifferent::new(violation, [shifted, selected, xs[1], xs[3]]))
        .unwrap();
    solver.close().unwrap();

    LayeredModel {
        solver,
        search_vars: xs,
        defined_vars: vec![twos, shifted, selected, sum, largest, scaled, violation],
    }
}

/// The defined values of a model closed directly on `values`.
fn rebuilt_values(values: &[Int]) -> Vec<Int> {
    let model = layered_model(values, PropagationMode::InputToOutput, OutputToInputMarkingMode::None);
    model
        .defined_vars
        .iter()
        .map(|&var| model.solver.committed_value(var))
        .collect()
}

fn run_random_moves(mode: PropagationMode, marking_mode: OutputToInputMarkingMode, seed: u64) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut model = layered_model(&[2, 0, 1, 3], mode, marking_mode);

    for iteration in 0..300 {
        model.solver.begin_move().unwrap();
        for _ in 0..rng.gen_range(1..=3) {
            let var = model.search_vars[rng.gen_range(0..NUM_SEARCH_VARS)];
            model.solver.set_value(var, rng.gen_range(0..=4)).unwrap();
        }
        model.solver.end_move().unwrap();

        model.solver.begin_probe().unwrap();
        for &var in model.defined_vars.iter() {
            model.solver.query(var).unwrap();
        }
        model.solver.end_probe().unwrap();

        let probed_search_values = model
            .search_vars
            .iter()
            .map(|&var| model.solver.value(var))
            .collect::<Vec<_>>();
        let probed = model
            .defined_vars
            .iter()
            .map(|&var| model.solver.value(var))
            .collect::<Vec<_>>();
        assert_eq!(
            probed,
            rebuilt_values(&probed_search_values),
            "probe {iteration} of {probed_search_values:?} in {mode:?}/{marking_mode:?}"
        );

        if rng.gen_bool(0.5) {
            model.solver.begin_commit().unwrap();
            model.solver.end_commit().unwrap();

            let committed_search_values = model
                .search_vars
                .iter()
                .map(|&var| model.solver.committed_value(var))
                .collect::<Vec<_>>();
            let committed = model
                .defined_vars
                .iter()
                .map(|&var| model.solver.committed_value(var))
                .collect::<Vec<_>>();
            assert_eq!(
                committed,
                rebuilt_values(&committed_search_values),
                "commit {iteration} of {committed_search_values:?} in {mode:?}/{marking_mode:?}"
            );
        }
    }
}

#[test]
fn input_to_output_matches_a_rebuilt_model() {
    for seed in [1, 2, 3] {
        run_random_moves(PropagationMode::InputToOutput, OutputToInputMarkingMode::None, seed);
    }
}

#[test]
fn output_to_input_matches_a_rebuilt_model() {
    for marking_mode in [
        OutputToInputMarkingMode::None,
        OutputToInputMarkingMode::OutputToInputStatic,
        OutputToInputMarkingMode::InputToOutputExploration,
    ] {
        run_random_moves(PropagationMode::OutputToInput, marking_mode, 7);
    }
}

#[test]
fn reader_sees_a_defined_input_which_ends_unchanged() {
    let mut model = layered_model(
        &[2, 0, 1, 3],
        PropagationMode::InputToOutput,
        OutputToInputMarkingMode::None,
    );
    let (x0, x1) = (model.search_vars[0], model.search_vars[1]);
    let (twos, shifted, selected) = (
        model.defined_vars[0],
        model.defined_vars[1],
        model.defined_vars[2],
    );
    assert_eq!(model.solver.value(twos), 1);
    assert_eq!(model.solver.value(shifted), 3);

    // The number of twos drops to zero when x0 is processed and returns to one with x1.
    model.solver.begin_move().unwrap();
    model.solver.set_value(x0, 0).unwrap();
    model.solver.set_value(x1, 2).unwrap();
    model.solver.end_move().unwrap();

    model.solver.begin_probe().unwrap();
    model.solver.query(shifted).unwrap();
    model.solver.end_probe().unwrap();
    assert_eq!(model.solver.value(twos), 1);
    assert_eq!(model.solver.value(shifted), 1);

    model.solver.begin_commit().unwrap();
    model.solver.end_commit().unwrap();
    assert_eq!(model.solver.committed_value(shifted), 1);
    assert_eq!(model.solver.committed_value(selected), 2);
    assert_eq!(
        model
            .defined_vars
            .iter()
            .map(|&var| model.solver.committed_value(var))
            .collect::<Vec<_>>(),
        rebuilt_values(&[0, 2, 1, 3])
    );
}
