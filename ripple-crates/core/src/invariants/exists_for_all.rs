use super::ArrayExtremum;
use super::Extremum;
use crate::basic_types::Int;
use crate::basic_types::Timestamp;
use crate::containers::PriorityList;

/// Some input holds: the output is the smallest violation of the inputs.
#[derive(Debug, Clone, Copy)]
pub struct SomeHolds;

impl Extremum for SomeHolds {
    const NAME: &'static str = "Exists";

    fn select(list: &PriorityList, ts: Timestamp) -> Option<Int> {
        list.min_priority(ts)
    }

    fn combine(left: Int, right: Int) -> Int {
        left.min(right)
    }
}

/// Every input holds: the output is the largest violation of the inputs.
#[derive(Debug, Clone, Copy)]
pub struct AllHold;

impl Extremum for AllHold {
    const NAME: &'static str = "ForAll";

    fn select(list: &PriorityList, ts: Timestamp) -> Option<Int> {
        list.max_priority(ts)
    }

    fn combine(left: Int, right: Int) -> Int {
        left.max(right)
    }
}

/// Disjunction over violation booleans; 0 iff at least one input is 0.
pub type Exists = ArrayExtremum<SomeHolds>;

/// Conjunction over violation booleans; 0 iff every input is 0.
pub type ForAll = ArrayExtremum<AllHold>;

#[cfg(test)]
mod tests {
    use super::AllHold;
    use super::SomeHolds;
    use crate::invariants::max_min_sparse::tests::extremum_harness;

    #[test]
    fn exists_holds_once_one_input_holds() {
        let mut harness = extremum_harness::<SomeHolds>(&[(0, 4), (0, 4), (0, 4)]);
        let inputs = harness.inputs.clone();
        harness.ts += 1;
        let ts = harness.ts;
        for (input, value) in inputs.iter().zip([3, 2, 4]) {
            harness.solver.set_value_at(ts, *input, value);
        }
        harness.solver.recompute_invariant(ts, harness.invariant);
        assert_eq!(harness.output_values(), vec![2]);

        harness.solver.set_value_at(ts, inputs[2], 0);
        harness.solver.notify_invariant(ts, harness.invariant, 2);
        assert_eq!(harness.output_values(), vec![0]);
    }

    #[test]
    fn for_all_holds_only_when_every_input_holds() {
        let mut harness = extremum_harness::<AllHold>(&[(0, 4), (0, 4)]);
        assert_eq!(harness.output_values(), vec![0]);

        harness.ts += 1;
        let ts = harness.ts;
        harness.solver.set_value_at(ts, harness.inputs[1], 3);
        harness.solver.notify_invariant(ts, harness.invariant, 1);
        assert_eq!(harness.output_values(), vec![3]);
    }

    #[test]
    fn incremental_updates_match_recomputation() {
        let domains = [(0, 3), (0, 1), (0, 5), (2, 4), (0, 0)];
        extremum_harness::<SomeHolds>(&domains).check_all();
        extremum_harness::<AllHold>(&domains).check_all();
    }
}
