use crate::errors::{DoeError, Result};
use ndarray_rand::rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

type RngRef<R> = Arc<RwLock<R>>;

/// Default numeric range the run identifiers are drawn from
pub const DEFAULT_ID_RANGE: u64 = 1_000_000;
/// Default oversampling multiplier absorbing identifier collisions
pub const DEFAULT_OVERSAMPLE: usize = 5;

/// Generates unique, filesystem-safe run names of the form
/// `BatchRun_<id>`.
///
/// Candidates are drawn uniformly from a bounded integer range,
/// oversampled by a fixed multiplier, then deduplicated; the first `count`
/// survivors become the names. Generation fails rather than silently
/// truncating when the unique pool is too small; the caller may retry with
/// a larger [oversample](NameGenerator::oversample).
pub struct NameGenerator<R: Rng> {
    prefix: String,
    id_range: u64,
    oversample: usize,
    rng: RngRef<R>,
}

/// Generator with default random generator
impl NameGenerator<Xoshiro256Plus> {
    /// Constructor with default prefix, range and oversampling
    pub fn new() -> Self {
        Self::new_with_rng(Xoshiro256Plus::from_entropy())
    }
}

impl Default for NameGenerator<Xoshiro256Plus> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> NameGenerator<R> {
    /// Constructor with a given random generator for reproducibility
    pub fn new_with_rng(rng: R) -> Self {
        NameGenerator {
            prefix: "BatchRun".to_string(),
            id_range: DEFAULT_ID_RANGE,
            oversample: DEFAULT_OVERSAMPLE,
            rng: Arc::new(RwLock::new(rng)),
        }
    }

    /// Sets the name prefix
    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    /// Sets the exclusive upper bound of the identifier range
    pub fn id_range(mut self, id_range: u64) -> Self {
        self.id_range = id_range;
        self
    }

    /// Sets the oversampling multiplier
    pub fn oversample(mut self, oversample: usize) -> Self {
        self.oversample = oversample;
        self
    }

    /// Sets the random generator
    pub fn with_rng<R2: Rng>(self, rng: R2) -> NameGenerator<R2> {
        NameGenerator {
            prefix: self.prefix,
            id_range: self.id_range,
            oversample: self.oversample,
            rng: Arc::new(RwLock::new(rng)),
        }
    }

    /// Produces `count` distinct names.
    ///
    /// Fails with [DoeError::NameGeneration] when fewer than `count` unique
    /// identifiers survive deduplication of the oversampled draw.
    pub fn generate(&self, count: usize) -> Result<Vec<String>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let mut rng = self.rng.write().unwrap();
        let mut seen = HashSet::with_capacity(count * self.oversample);
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count * self.oversample {
            let id = rng.gen_range(0..self.id_range);
            if seen.insert(id) && ids.len() < count {
                ids.push(id);
            }
        }
        if ids.len() < count {
            return Err(DoeError::NameGeneration(format!(
                "only {} unique identifiers out of {} requested after {}x oversampling",
                ids.len(),
                count,
                self.oversample
            )));
        }
        Ok(ids
            .iter()
            .map(|id| format!("{}_{}", self.prefix, id))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_unique() {
        let names = NameGenerator::new()
            .with_rng(Xoshiro256Plus::seed_from_u64(42))
            .generate(200)
            .unwrap();
        assert_eq!(200, names.len());
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(200, unique.len());
        assert!(names.iter().all(|n| n.starts_with("BatchRun_")));
    }

    #[test]
    fn test_exhausted_pool_fails() {
        // only 4 possible identifiers for 10 requested names
        let err = NameGenerator::new()
            .with_rng(Xoshiro256Plus::seed_from_u64(42))
            .id_range(4)
            .generate(10)
            .unwrap_err();
        assert!(matches!(err, DoeError::NameGeneration(_)));
    }

    #[test]
    fn test_empty_request() {
        let names = NameGenerator::new().generate(0).unwrap();
        assert!(names.is_empty());
    }

    #[test]
    fn test_custom_prefix() {
        let names = NameGenerator::new()
            .with_rng(Xoshiro256Plus::seed_from_u64(0))
            .prefix("Case")
            .generate(3)
            .unwrap();
        assert!(names.iter().all(|n| n.starts_with("Case_")));
    }

    #[test]
    fn test_seeded_reproducibility() {
        let n1 = NameGenerator::new()
            .with_rng(Xoshiro256Plus::seed_from_u64(5))
            .generate(10)
            .unwrap();
        let n2 = NameGenerator::new()
            .with_rng(Xoshiro256Plus::seed_from_u64(5))
            .generate(10)
            .unwrap();
        assert_eq!(n1, n2);
    }
}
