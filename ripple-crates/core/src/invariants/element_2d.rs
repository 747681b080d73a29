use super::binary::extremes;
use super::element_var::clamped_index;
use super::register_inputs;
use super::BinaryInvariant;
use super::BinaryOperator;
use super::InputCursor;
use super::Invariant;
use crate::basic_types::EngineError;
use crate::basic_types::Int;
use crate::basic_types::Timestamp;
use crate::engine::IntVarId;
use crate::engine::InvariantContext;
use crate::engine::InvariantRegistrar;
use crate::engine::LocalId;
use crate::engine::VarId;

/// Looks up a cell of a constant matrix; rows and columns are clamped into range.
#[derive(Debug, Clone)]
pub struct MatrixLookup {
    matrix: Vec<Vec<Int>>,
    row_offset: Int,
    column_offset: Int,
}

impl MatrixLookup {
    fn cell(&self, row: Int, column: Int) -> Int {
        let row = &self.matrix[clamped_index(row, self.row_offset, self.matrix.len())];
        row[clamped_index(column, self.column_offset, row.len())]
    }
}

impl BinaryOperator for MatrixLookup {
    const NAME: &'static str = "Element2dConst";

    fn apply(&self, row: Int, column: Int) -> Int {
        self.cell(row, column)
    }

    fn bounds(&self, rows: (Int, Int), columns: (Int, Int)) -> (Int, Int) {
        let num_rows = self.matrix.len();
        let first_row = clamped_index(rows.0, self.row_offset, num_rows);
        let last_row = clamped_index(rows.1, self.row_offset, num_rows);
        extremes(self.matrix[first_row..=last_row].iter().flat_map(|row| {
            let first = clamped_index(columns.0, self.column_offset, row.len());
            let last = clamped_index(columns.1, self.column_offset, row.len());
            row[first..=last].iter().copied()
        }))
    }
}

/// `output = matrix[row - row_offset][column - column_offset]` over a constant matrix.
pub type Element2dConst = BinaryInvariant<MatrixLookup>;

impl BinaryInvariant<MatrixLookup> {
    /// The matrix must be non-empty and rectangular.
    pub fn lookup(
        output: IntVarId,
        row: impl Into<VarId>,
        column: impl Into<VarId>,
        matrix: Vec<Vec<Int>>,
        row_offset: Int,
        column_offset: Int,
    ) -> Result<Self, EngineError> {
        check_rectangular(matrix.len(), matrix.first().map_or(0, Vec::len), |row| matrix[row].len())?;
        Ok(Self::with_operator(
            output,
            row,
            column,
            MatrixLookup {
                matrix,
                row_offset,
                column_offset,
            },
        ))
    }
}

fn check_rectangular(
    num_rows: usize,
    num_columns: usize,
    row_len: impl Fn(usize) -> usize,
) -> Result<(), EngineError> {
    if num_rows == 0 || num_columns == 0 {
        return Err(EngineError::InvalidArgument("the matrix is empty".to_owned()));
    }
    if (0..num_rows).any(|row| row_len(row) != num_columns) {
        return Err(EngineError::InvalidArgument(
            "the rows of the matrix have different lengths".to_owned(),
        ));
    }
    Ok(())
}

/// `output = matrix[row - row_offset][column - column_offset]` over a matrix of variables.
///
/// The cells have local ids `0..rows * columns` in row-major order, followed by the row index and
/// the column index.
#[derive(Debug)]
pub struct Element2dVar {
    output: IntVarId,
    row: VarId,
    column: VarId,
    cells: Vec<VarId>,
    num_rows: usize,
    num_columns: usize,
    row_offset: Int,
    column_offset: Int,
    cursor: InputCursor,
}

impl Element2dVar {
    pub fn new<Var: Into<VarId>>(
        output: IntVarId,
        row: impl Into<VarId>,
        column: impl Into<VarId>,
        matrix: Vec<Vec<Var>>,
        row_offset: Int,
        column_offset: Int,
    ) -> Result<Self, EngineError> {
        let num_rows = matrix.len();
        let num_columns = matrix.first().map_or(0, Vec::len);
        check_rectangular(num_rows, num_columns, |row| matrix[row].len())?;
        Ok(Element2dVar {
            output,
            row: row.into(),
            column: column.into(),
            cells: matrix.into_iter().flatten().map(Into::into).collect(),
            num_rows,
            num_columns,
            row_offset,
            column_offset,
            cursor: InputCursor::default(),
        })
    }

    fn cell_index(&self, row: Int, column: Int) -> usize {
        clamped_index(row, self.row_offset, self.num_rows) * self.num_columns
            + clamped_index(column, self.column_offset, self.num_columns)
    }

    fn selected(&self, ts: Timestamp, context: &InvariantContext<'_>) -> usize {
        self.cell_index(context.value(ts, self.row), context.value(ts, self.column))
    }

    fn write_output(&self, ts: Timestamp, context: &mut InvariantContext<'_>) {
        let value = context.value(ts, self.cells[self.selected(ts, context)]);
        context.update_value(ts, self.output, value);
    }
}

impl Invariant for Element2dVar {
    fn name(&self) -> &str {
        "Element2dVar"
    }

    fn register_vars(&mut self, registrar: &mut InvariantRegistrar<'_>) -> Result<(), EngineError> {
        register_inputs(registrar, &self.cells)?;
        registrar.register_input(self.row, LocalId::from(self.cells.len() as u32))?;
        registrar.register_input(self.column, LocalId::from(self.cells.len() as u32 + 1))?;
        registrar.register_defined_var(self.output)
    }

    fn update_bounds(&mut self, widen_only: bool, context: &mut InvariantContext<'_>) {
        let first_row = clamped_index(context.lower_bound(self.row), self.row_offset, self.num_rows);
        let last_row = clamped_index(context.upper_bound(self.row), self.row_offset, self.num_rows);
        let first_column = clamped_index(context.lower_bound(self.column), self.column_offset, self.num_columns);
        let last_column = clamped_index(context.upper_bound(self.column), self.column_offset, self.num_columns);

        let mut lower_bound = Int::MAX;
        let mut upper_bound = Int::MIN;
        for row in first_row..=last_row {
            for column in first_column..=last_column {
                let cell = self.cells[row * self.num_columns + column];
                lower_bound = lower_bound.min(context.lower_bound(cell));
                upper_bound = upper_bound.max(context.upper_bound(cell));
            }
        }
        context.update_bounds(self.output, lower_bound, upper_bound, widen_only);
    }

    fn recompute(&mut self, ts: Timestamp, context: &mut InvariantContext<'_>) {
        self.write_output(ts, context);
    }

    fn next_input(&mut self, ts: Timestamp, context: &InvariantContext<'_>) -> Option<VarId> {
        match self.cursor.next_index(ts, 3)? {
            0 => Some(self.row),
            1 => Some(self.column),
            _ => Some(self.cells[self.selected(ts, context)]),
        }
    }

    fn notify_current_input_changed(&mut self, ts: Timestamp, context: &mut InvariantContext<'_>) {
        self.write_output(ts, context);
    }

    fn notify_input_changed(&mut self, ts: Timestamp, local_id: LocalId, context: &mut InvariantContext<'_>) {
        let local_id = local_id.unpack() as usize;
        if local_id >= self.cells.len() || local_id == self.selected(ts, context) {
            self.write_output(ts, context);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Element2dConst;
    use super::Element2dVar;
    use crate::basic_types::EngineError;
    use crate::basic_types::Int;
    use crate::engine::IntVarId;
    use crate::engine::Solver;
    use crate::engine::test_solver::InvariantHarness;

    fn const_harness(rows: (Int, Int), columns: (Int, Int), matrix: Vec<Vec<Int>>) -> InvariantHarness {
        let mut solver = Solver::new();
        let row = solver.make_int_var(rows.0, rows.0, rows.1).unwrap();
        let column = solver.make_int_var(columns.0, columns.0, columns.1).unwrap();
        let output = solver.make_int_var(0, 0, 0).unwrap();
        let invariant = solver
            .make_invariant(Element2dConst::lookup(output, row, column, matrix, 1, 1).unwrap())
            .unwrap();
        InvariantHarness::new(solver, invariant, vec![row, column], vec![output])
    }

    fn var_harness(rows: (Int, Int), columns: (Int, Int), cells: Vec<Vec<(Int, Int)>>) -> InvariantHarness {
        let mut solver = Solver::new();
        let matrix = cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&(lb, ub)| solver.make_int_var(lb, lb, ub).unwrap())
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        let row = solver.make_int_var(rows.0, rows.0, rows.1).unwrap();
        let column = solver.make_int_var(columns.0, columns.0, columns.1).unwrap();
        let output = solver.make_int_var(0, 0, 0).unwrap();
        let mut inputs = matrix.iter().flatten().copied().collect::<Vec<IntVarId>>();
        let invariant = solver
            .make_invariant(Element2dVar::new(output, row, column, matrix, 1, 1).unwrap())
            .unwrap();
        inputs.extend([row, column]);
        InvariantHarness::new(solver, invariant, inputs, vec![output])
    }

    #[test]
    fn constant_matrix_lookup() {
        let matrix = vec![vec![1, 2, 3], vec![4, 5, 6]];
        let mut harness = const_harness((1, 2), (1, 3), matrix);
        assert_eq!(harness.output_values(), vec![1]);
        let (row, column) = (harness.inputs[0], harness.inputs[1]);

        harness.ts += 1;
        let ts = harness.ts;
        harness.solver.set_value_at(ts, row, 2);
        harness.solver.set_value_at(ts, column, 3);
        harness.solver.notify_invariant(ts, harness.invariant, 0);
        assert_eq!(harness.output_values(), vec![6]);
    }

    #[test]
    fn bounds_of_the_reachable_submatrix() {
        let matrix = vec![vec![1, -2, 30], vec![4, 5, 6], vec![-70, 8, 9]];
        let harness = const_harness((1, 2), (1, 2), matrix);
        let output = harness.outputs[0];
        assert_eq!((harness.solver.lower_bound(output), harness.solver.upper_bound(output)), (-2, 5));
    }

    #[test]
    fn ragged_matrices_are_rejected() {
        let mut solver = Solver::new();
        let row = solver.make_int_var(1, 1, 2).unwrap();
        let output = solver.make_int_var(0, 0, 0).unwrap();
        let result = Element2dConst::lookup(output, row, row, vec![vec![1, 2], vec![3]], 1, 1);
        assert!(matches!(result, Err(EngineError::InvalidArgument(_))));
        let result = Element2dConst::lookup(output, row, row, Vec::new(), 1, 1);
        assert!(matches!(result, Err(EngineError::InvalidArgument(_))));
    }

    #[test]
    fn constant_lookup_matches_recomputation() {
        let matrix = vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]];
        const_harness((0, 4), (-1, 3), matrix).check_all();
    }

    #[test]
    fn variable_matrix_only_reacts_to_the_selected_cell() {
        let cells = vec![vec![(0, 9), (0, 9)], vec![(0, 9), (0, 9)]];
        let mut harness = var_harness((1, 2), (1, 2), cells);
        let (row, column) = (harness.inputs[4], harness.inputs[5]);

        harness.ts += 1;
        let ts = harness.ts;
        harness.solver.set_value_at(ts, harness.inputs[3], 7);
        harness.solver.notify_invariant(ts, harness.invariant, 3);
        assert_eq!(harness.output_values(), vec![0]);

        harness.solver.set_value_at(ts, row, 2);
        harness.solver.set_value_at(ts, column, 2);
        harness.solver.notify_invariant(ts, harness.invariant, 4);
        assert_eq!(harness.output_values(), vec![7]);
    }

    #[test]
    fn variable_lookup_matches_recomputation() {
        let cells = vec![vec![(0, 3), (-2, 2)], vec![(5, 7), (1, 1)], vec![(0, 0), (-5, 5)]];
        var_harness((0, 4), (1, 2), cells).check_all();
    }
}
