use crate::errors::{DoeError, Result};
use crate::{Grid, Lhs, SamplingMethod, SamplingStrategy, VariableSpecTable};
use linfa::Float;
use log::{debug, warn};
use ndarray::{Array1, Array2};
use ndarray_rand::rand::{Rng, SeedableRng};
use num_traits::ToPrimitive;
use rand_xoshiro::Xoshiro256Plus;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

type RngRef<R> = Arc<RwLock<R>>;

/// A deduplicated design matrix together with its row bookkeeping.
///
/// Deduplication can leave fewer rows than the Cartesian combination
/// produced, so the pre-deduplication count is kept and exposed instead of
/// being silently discarded.
#[derive(Clone, Debug)]
pub struct Design<F: Float> {
    matrix: Array2<F>,
    pre_dedup: usize,
}

impl<F: Float> Design<F> {
    /// The composed matrix, one column per declared variable
    pub fn matrix(&self) -> &Array2<F> {
        &self.matrix
    }

    /// Consumes the design and hands the matrix over by value
    pub fn into_matrix(self) -> Array2<F> {
        self.matrix
    }

    /// Number of surviving rows
    pub fn n_rows(&self) -> usize {
        self.matrix.nrows()
    }

    /// Row count of the Cartesian combination before deduplication,
    /// `N * r_1 * ... * r_k` over the joint block and the grids
    pub fn pre_dedup_count(&self) -> usize {
        self.pre_dedup
    }

    /// Whether deduplication removed at least one row
    pub fn was_reduced(&self) -> bool {
        self.matrix.nrows() < self.pre_dedup
    }
}

/// One dimension of the Cartesian combination. The LHS block enters as a
/// single joint dimension ranging over its row indices, so its rows are
/// combined whole and never cross-producted column-by-column.
enum Dimension<F: Float> {
    /// all LHS columns together, domain is the block row index
    JointBlock { cols: Vec<usize>, block: Array2<F> },
    /// one grid variable, domain is its level index
    IndependentGrid { col: usize, levels: Array1<F> },
    /// one constant variable, domain is the single value
    Constant { col: usize, value: F },
}

impl<F: Float> Dimension<F> {
    fn cardinality(&self) -> usize {
        match self {
            Dimension::JointBlock { block, .. } => block.nrows(),
            Dimension::IndependentGrid { levels, .. } => levels.len(),
            Dimension::Constant { .. } => 1,
        }
    }

    /// Writes the values selected by `choice` into their declared columns
    fn write(&self, choice: usize, row: &mut [F]) {
        match self {
            Dimension::JointBlock { cols, block } => {
                for (j, &col) in cols.iter().enumerate() {
                    row[col] = block[[choice, j]];
                }
            }
            Dimension::IndependentGrid { col, levels } => row[*col] = levels[choice],
            Dimension::Constant { col, value } => row[*col] = *value,
        }
    }
}

/// Composes the per-strategy samples of a [VariableSpecTable] into one
/// deduplicated design matrix.
///
/// ```
/// use pbatch_doe::{DesignComposer, VariableSpec, VariableSpecTable};
/// use ndarray_rand::rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256Plus;
///
/// let specs = VariableSpecTable::new(vec![
///     VariableSpec::lhs("x", 0., 10.),
///     VariableSpec::lin("y", 0., 1., 3),
/// ]);
/// let design = DesignComposer::new(&specs)
///     .n_samples(4)
///     .with_rng(Xoshiro256Plus::seed_from_u64(42))
///     .compose()
///     .unwrap();
/// assert_eq!(12, design.pre_dedup_count());
/// ```
pub struct DesignComposer<F: Float, R: Rng> {
    specs: VariableSpecTable<F>,
    n_samples: usize,
    rng: RngRef<R>,
}

/// Composer with default random generator
impl<F: Float> DesignComposer<F, Xoshiro256Plus> {
    /// Constructor given the variable table; the table stays owned by the
    /// caller and is only read
    pub fn new(specs: &VariableSpecTable<F>) -> Self {
        Self::new_with_rng(specs, Xoshiro256Plus::from_entropy())
    }
}

impl<F: Float, R: Rng> DesignComposer<F, R> {
    /// Constructor given the variable table and a random generator
    /// feeding the LHS block for reproducibility
    pub fn new_with_rng(specs: &VariableSpecTable<F>, rng: R) -> Self {
        DesignComposer {
            specs: specs.clone(),
            n_samples: 1,
            rng: Arc::new(RwLock::new(rng)),
        }
    }

    /// Sets the number of joint LHS samples (the `N` of the `N x k` block)
    pub fn n_samples(mut self, n_samples: usize) -> Self {
        self.n_samples = n_samples;
        self
    }

    /// Sets the random generator
    pub fn with_rng<R2: Rng>(self, rng: R2) -> DesignComposer<F, R2> {
        DesignComposer {
            specs: self.specs,
            n_samples: self.n_samples,
            rng: Arc::new(RwLock::new(rng)),
        }
    }

    /// Samples every variable according to its strategy and combines the
    /// results into a deduplicated matrix in declared column order.
    ///
    /// The whole table is validated before any sampling; composition either
    /// fully succeeds or fails without a partial result.
    pub fn compose(&self) -> Result<Design<F>> {
        self.specs.validate(self.n_samples)?;

        let dims = self.dimensions();
        let ncols = self.specs.len();
        let pre_dedup = dims.iter().map(Dimension::cardinality).product::<usize>();
        debug!(
            "Composing {} dimensions into {} candidate rows of {} columns",
            dims.len(),
            pre_dedup,
            ncols
        );

        let mut seen = HashSet::with_capacity(pre_dedup);
        let mut data: Vec<F> = Vec::with_capacity(pre_dedup * ncols);
        let mut kept = 0;
        let mut row = vec![F::zero(); ncols];
        let mut choices = vec![0usize; dims.len()];
        for _ in 0..pre_dedup {
            for (dim, &choice) in dims.iter().zip(&choices) {
                dim.write(choice, &mut row);
            }
            if seen.insert(row_key(&row)) {
                data.extend_from_slice(&row);
                kept += 1;
            }
            // odometer over dimension cardinalities, rightmost fastest
            for i in (0..dims.len()).rev() {
                choices[i] += 1;
                if choices[i] < dims[i].cardinality() {
                    break;
                }
                choices[i] = 0;
            }
        }

        if kept == 0 || ncols == 0 {
            return Err(DoeError::DegenerateComposition(format!(
                "composed matrix has {kept} rows and {ncols} columns"
            )));
        }
        if kept < pre_dedup {
            warn!("Deduplication reduced the design from {pre_dedup} to {kept} rows");
        }
        let matrix = Array2::from_shape_vec((kept, ncols), data).unwrap();
        Ok(Design { matrix, pre_dedup })
    }

    /// Maps the variable table onto Cartesian dimensions, sampling the
    /// joint LHS block for all LHS variables at once
    fn dimensions(&self) -> Vec<Dimension<F>> {
        let mut lhs_cols = Vec::new();
        let mut lhs_limits = Vec::new();
        let mut dims = Vec::new();
        for (col, spec) in self.specs.iter().enumerate() {
            match spec.strategy {
                SamplingStrategy::Lhs { lower, upper } => {
                    lhs_cols.push(col);
                    lhs_limits.push([lower, upper]);
                }
                SamplingStrategy::Lin {
                    lower,
                    upper,
                    resolution,
                } => dims.push(Dimension::IndependentGrid {
                    col,
                    levels: Grid::new(lower, upper, resolution).levels(),
                }),
                SamplingStrategy::Const { value } => {
                    dims.push(Dimension::Constant { col, value })
                }
            }
        }
        if !lhs_cols.is_empty() {
            let xlimits = Array2::from(lhs_limits);
            let mut rng = self.rng.write().unwrap();
            let block = Lhs::new_with_rng(&xlimits, &mut *rng).sample(self.n_samples);
            dims.insert(
                0,
                Dimension::JointBlock {
                    cols: lhs_cols,
                    block,
                },
            );
        }
        dims
    }
}

/// Exact-equality row key over the f64 bit patterns of the values
fn row_key<F: Float>(row: &[F]) -> Vec<u64> {
    row.iter()
        .map(|v| v.to_f64().unwrap_or(f64::NAN).to_bits())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VariableSpec;
    use approx::assert_abs_diff_eq;
    use ndarray::arr2;

    fn seeded(seed: u64) -> Xoshiro256Plus {
        Xoshiro256Plus::seed_from_u64(seed)
    }

    #[test]
    fn test_mixed_strategies_end_to_end() {
        let specs = VariableSpecTable::new(vec![
            VariableSpec::lhs("speed", 0., 10.),
            VariableSpec::lin("ratio", 0., 1., 3),
            VariableSpec::constant("mass", 5.),
        ]);
        let design = DesignComposer::new(&specs)
            .n_samples(4)
            .with_rng(seeded(42))
            .compose()
            .unwrap();

        assert_eq!(12, design.pre_dedup_count());
        assert_eq!(12, design.n_rows());
        assert!(!design.was_reduced());
        let matrix = design.matrix();
        assert_eq!(3, matrix.ncols());
        for row in matrix.rows() {
            assert!(row[0] >= 0. && row[0] <= 10.);
            assert!([0., 0.5, 1.].contains(&row[1]));
            assert_eq!(5., row[2]);
        }
    }

    #[test]
    fn test_rows_pairwise_distinct() {
        let specs = VariableSpecTable::new(vec![
            VariableSpec::lhs("a", 0., 1.),
            VariableSpec::lin("b", 0., 1., 4),
        ]);
        let design = DesignComposer::new(&specs)
            .n_samples(5)
            .with_rng(seeded(7))
            .compose()
            .unwrap();
        let matrix = design.matrix();
        let keys: HashSet<_> = matrix.rows().into_iter().map(|r| row_key(&r.to_vec())).collect();
        assert_eq!(matrix.nrows(), keys.len());
    }

    #[test]
    fn test_joint_block_stays_joint() {
        // without grids the output is exactly the LHS block with the
        // constant column broadcast, row-for-row
        let specs = VariableSpecTable::new(vec![
            VariableSpec::lhs("x", 5., 10.),
            VariableSpec::lhs("y", 0., 1.),
            VariableSpec::constant("c", 2.),
        ]);
        let design = DesignComposer::new(&specs)
            .n_samples(6)
            .with_rng(seeded(42))
            .compose()
            .unwrap();

        let expected = Lhs::new(&arr2(&[[5., 10.], [0., 1.]]))
            .with_rng(seeded(42))
            .sample(6);
        let matrix = design.matrix();
        assert_eq!(6, matrix.nrows());
        for i in 0..6 {
            assert_abs_diff_eq!(matrix[[i, 0]], expected[[i, 0]]);
            assert_abs_diff_eq!(matrix[[i, 1]], expected[[i, 1]]);
            assert_eq!(2., matrix[[i, 2]]);
        }
    }

    #[test]
    fn test_grids_only() {
        let specs = VariableSpecTable::new(vec![
            VariableSpec::lin("a", 0., 1., 2),
            VariableSpec::lin("b", 0., 1., 3),
        ]);
        let design = DesignComposer::new(&specs).compose().unwrap();
        assert_eq!(6, design.pre_dedup_count());
        assert_eq!(6, design.n_rows());
    }

    #[test]
    fn test_dedup_surfaces_reduction() {
        // a zero-width grid collapses all its levels onto one value
        let specs = VariableSpecTable::new(vec![
            VariableSpec::lin("flat", 2., 2., 3),
            VariableSpec::constant("c", 1.),
        ]);
        let design = DesignComposer::new(&specs).compose().unwrap();
        assert_eq!(3, design.pre_dedup_count());
        assert_eq!(1, design.n_rows());
        assert!(design.was_reduced());
    }

    #[test]
    fn test_seeded_composition_idempotent() {
        let specs = VariableSpecTable::new(vec![
            VariableSpec::lhs("x", -1., 1.),
            VariableSpec::lin("y", 0., 4., 5),
        ]);
        let d1 = DesignComposer::new(&specs)
            .n_samples(3)
            .with_rng(seeded(99))
            .compose()
            .unwrap();
        let d2 = DesignComposer::new(&specs)
            .n_samples(3)
            .with_rng(seeded(99))
            .compose()
            .unwrap();
        assert_abs_diff_eq!(d1.matrix(), d2.matrix());
    }

    #[test]
    fn test_invalid_table_detected_before_sampling() {
        let specs = VariableSpecTable::new(vec![VariableSpec::lhs("x", 1., 0.)]);
        let err = DesignComposer::new(&specs).n_samples(4).compose().unwrap_err();
        assert!(matches!(err, DoeError::InvalidInput(_)));
    }
}
