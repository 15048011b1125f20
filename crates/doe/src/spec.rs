use crate::errors::{DoeError, Result};
use linfa::Float;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Sampling strategy declared for a single variable of the design space
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub enum SamplingStrategy<F: Float> {
    /// Variable is sampled jointly with all other LHS variables
    /// using a Latin Hypercube design over `[lower, upper]`
    Lhs {
        /// lower bound of the variable interval
        lower: F,
        /// upper bound of the variable interval
        upper: F,
    },
    /// Variable takes `resolution` evenly spaced values covering `[lower, upper]`
    Lin {
        /// lower bound of the grid
        lower: F,
        /// upper bound of the grid
        upper: F,
        /// number of grid points, must be >= 1
        resolution: usize,
    },
    /// Variable is held at a fixed value in every row
    Const {
        /// the broadcast value
        value: F,
    },
}

/// A named variable of the design space together with its sampling strategy.
/// Pure data, owned by the caller and read-only to all samplers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct VariableSpec<F: Float> {
    /// variable name, used as table header and parameter key
    pub name: String,
    /// how values are drawn for this variable
    pub strategy: SamplingStrategy<F>,
}

impl<F: Float> VariableSpec<F> {
    /// Declares an LHS-sampled variable over `[lower, upper]`
    pub fn lhs(name: &str, lower: F, upper: F) -> Self {
        VariableSpec {
            name: name.to_string(),
            strategy: SamplingStrategy::Lhs { lower, upper },
        }
    }

    /// Declares a grid variable with `resolution` points over `[lower, upper]`
    pub fn lin(name: &str, lower: F, upper: F, resolution: usize) -> Self {
        VariableSpec {
            name: name.to_string(),
            strategy: SamplingStrategy::Lin {
                lower,
                upper,
                resolution,
            },
        }
    }

    /// Declares a constant variable
    pub fn constant(name: &str, value: F) -> Self {
        VariableSpec {
            name: name.to_string(),
            strategy: SamplingStrategy::Const { value },
        }
    }

    fn check_bounds(&self) -> Result<()> {
        let (lower, upper) = match self.strategy {
            SamplingStrategy::Lhs { lower, upper } => (lower, upper),
            SamplingStrategy::Lin { lower, upper, .. } => (lower, upper),
            SamplingStrategy::Const { .. } => return Ok(()),
        };
        if upper < lower {
            return Err(DoeError::InvalidInput(format!(
                "variable '{}': inverted bounds [{}, {}]",
                self.name, lower, upper
            )));
        }
        Ok(())
    }
}

/// Ordered list of variable declarations. Column order of the composed
/// design matrix follows the declaration order of this table.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct VariableSpecTable<F: Float> {
    specs: Vec<VariableSpec<F>>,
}

impl<F: Float> VariableSpecTable<F> {
    /// Builds a table from declarations in column order
    pub fn new(specs: Vec<VariableSpec<F>>) -> Self {
        VariableSpecTable { specs }
    }

    /// Number of declared variables
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether no variable is declared
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Iterates over the declarations in column order
    pub fn iter(&self) -> std::slice::Iter<'_, VariableSpec<F>> {
        self.specs.iter()
    }

    /// Variable names in column order
    pub fn names(&self) -> Vec<String> {
        self.specs.iter().map(|s| s.name.clone()).collect()
    }

    /// Whether at least one variable uses the LHS strategy
    pub fn has_lhs(&self) -> bool {
        self.specs
            .iter()
            .any(|s| matches!(s.strategy, SamplingStrategy::Lhs { .. }))
    }

    /// Checks the whole table before any sampling takes place.
    ///
    /// Rejected as [DoeError::InvalidInput]: an empty table, an all-constant
    /// table, inverted bounds, a grid resolution below 1, and a sample count
    /// below 1 when LHS variables are declared. The offending variable is
    /// named in the error.
    pub fn validate(&self, n_samples: usize) -> Result<()> {
        if self.specs.is_empty() {
            return Err(DoeError::InvalidInput(
                "the variable table declares no variable".to_string(),
            ));
        }
        let all_const = self
            .specs
            .iter()
            .all(|s| matches!(s.strategy, SamplingStrategy::Const { .. }));
        if all_const {
            return Err(DoeError::InvalidInput(
                "all variables are constant, the design is degenerate".to_string(),
            ));
        }
        for spec in &self.specs {
            spec.check_bounds()?;
            if let SamplingStrategy::Lin { resolution, .. } = spec.strategy {
                if resolution < 1 {
                    return Err(DoeError::InvalidInput(format!(
                        "variable '{}': grid resolution must be >= 1",
                        spec.name
                    )));
                }
            }
        }
        if self.has_lhs() && n_samples < 1 {
            return Err(DoeError::InvalidInput(format!(
                "sample count must be >= 1, got {n_samples}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_table() -> VariableSpecTable<f64> {
        VariableSpecTable::new(vec![
            VariableSpec::lhs("x", 0., 10.),
            VariableSpec::lin("y", 0., 1., 3),
            VariableSpec::constant("c", 5.),
        ])
    }

    #[test]
    fn test_valid_table() {
        assert!(valid_table().validate(4).is_ok());
    }

    #[test]
    fn test_empty_table_rejected() {
        let table: VariableSpecTable<f64> = VariableSpecTable::new(vec![]);
        assert!(matches!(
            table.validate(1),
            Err(DoeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_all_constant_rejected() {
        let table = VariableSpecTable::new(vec![
            VariableSpec::constant("a", 1.),
            VariableSpec::constant("b", 2.),
        ]);
        assert!(matches!(
            table.validate(1),
            Err(DoeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_inverted_bounds_name_offender() {
        let table = VariableSpecTable::new(vec![
            VariableSpec::lhs("good", 0., 1.),
            VariableSpec::lin("bad", 3., 2., 4),
        ]);
        let err = table.validate(2).unwrap_err();
        assert!(err.to_string().contains("bad"));
    }

    #[test]
    fn test_zero_resolution_rejected() {
        let table = VariableSpecTable::new(vec![VariableSpec::lin("y", 0., 1., 0)]);
        assert!(table.validate(1).is_err());
    }

    #[test]
    fn test_zero_samples_rejected_with_lhs() {
        assert!(valid_table().validate(0).is_err());
    }

    #[test]
    fn test_zero_samples_allowed_without_lhs() {
        let table = VariableSpecTable::new(vec![
            VariableSpec::lin("y", 0., 1., 3),
            VariableSpec::constant("c", 5.),
        ]);
        assert!(table.validate(0).is_ok());
    }
}
