use crate::SamplingMethod;
use linfa::Float;
use ndarray::{Array2, ArrayBase, Data, Ix2};
use ndarray_rand::rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;
use std::sync::{Arc, RwLock};

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Kinds of Latin Hypercube design
#[derive(Clone, Debug, Default, Copy)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub enum LhsKind {
    /// each sample is drawn uniformly within its hypercube interval
    #[default]
    Classic,
    /// each sample sits at the middle of its hypercube interval
    Centered,
}

type RngRef<R> = Arc<RwLock<R>>;

/// Latin Hypercube sampler: each dimension interval is split into `ns`
/// equal-width sections, one point lands in each section, and sections are
/// shuffled independently per dimension. Marginal coverage is stratified;
/// joint placement across dimensions is randomized.
#[derive(Clone, Debug)]
pub struct Lhs<F: Float, R: Rng> {
    /// Sampling space definition as a (nx, 2) matrix
    /// The ith row is the [lower_bound, upper_bound] of the ith component
    xlimits: Array2<F>,
    /// The requested kind of LHS
    kind: LhsKind,
    /// Random generator used for reproducibility
    rng: RngRef<R>,
}

/// LHS with default random generator
impl<F: Float> Lhs<F, Xoshiro256Plus> {
    /// Constructor given a design space as a (nx, 2) matrix \[\[lower bound, upper bound\], ...\]
    ///
    /// ```
    /// use pbatch_doe::Lhs;
    /// use ndarray::arr2;
    ///
    /// let doe = Lhs::new(&arr2(&[[0.0, 1.0], [5.0, 10.0]]));
    /// ```
    pub fn new(xlimits: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Self {
        Self::new_with_rng(xlimits, Xoshiro256Plus::from_entropy())
    }
}

impl<F: Float, R: Rng> Lhs<F, R> {
    /// Constructor with given design space and random generator.
    ///
    /// **Panics** if `xlimits` number of columns is different from 2.
    pub fn new_with_rng(xlimits: &ArrayBase<impl Data<Elem = F>, Ix2>, rng: R) -> Self {
        if xlimits.ncols() != 2 {
            panic!("xlimits must have 2 columns (lower, upper)");
        }
        Lhs {
            xlimits: xlimits.to_owned(),
            kind: LhsKind::default(),
            rng: Arc::new(RwLock::new(rng)),
        }
    }

    /// Sets the kind of LHS
    pub fn kind(mut self, kind: LhsKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the random generator
    pub fn with_rng<R2: Rng>(self, rng: R2) -> Lhs<F, R2> {
        Lhs {
            xlimits: self.xlimits,
            kind: self.kind,
            rng: Arc::new(RwLock::new(rng)),
        }
    }

    fn stratified(&self, ns: usize, centered: bool) -> Array2<F> {
        let nx = self.xlimits.nrows();
        let step = 1. / ns as f64;
        let mut rng = self.rng.write().unwrap();
        let mut lhs = Array2::zeros((ns, nx));
        let mut column = vec![0.; ns];
        for j in 0..nx {
            for (i, c) in column.iter_mut().enumerate() {
                let offset = if centered { 0.5 } else { rng.gen::<f64>() };
                *c = (i as f64 + offset) * step;
            }
            column.shuffle(&mut *rng);
            for i in 0..ns {
                lhs[[i, j]] = F::cast(column[i]);
            }
        }
        lhs
    }
}

impl<F: Float, R: Rng> SamplingMethod<F> for Lhs<F, R> {
    fn sampling_space(&self) -> &Array2<F> {
        &self.xlimits
    }

    fn normalized_sample(&self, ns: usize) -> Array2<F> {
        match self.kind {
            LhsKind::Classic => self.stratified(ns, false),
            LhsKind::Centered => self.stratified(ns, true),
        }
    }
}
