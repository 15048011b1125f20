use linfa::Float;
use ndarray::Array2;

/// A sampling method generates a set of `ns` points within a sample space.
///
/// The sample space is the hyper-rectangle `[lower_i, upper_i]^nx` described
/// by an `(nx, 2)` bounds matrix, one `[lower, upper]` row per component.
pub trait SamplingMethod<F: Float> {
    /// Returns the `(nx, 2)` bounds matrix of the sample space
    fn sampling_space(&self) -> &Array2<F>;

    /// Generates `ns` samples in the unit hypercube `[0., 1.]^nx`
    /// as an `(ns, nx)` matrix
    fn normalized_sample(&self, ns: usize) -> Array2<F>;

    /// Generates `ns` samples within the sample space bounds as an
    /// `(ns, nx)` matrix, scaling each unit sample `u` to
    /// `u * (upper - lower) + lower` componentwise
    fn sample(&self, ns: usize) -> Array2<F> {
        let limits = self.sampling_space();
        let lower = limits.column(0);
        let width = &limits.column(1) - &lower;
        self.normalized_sample(ns) * width + lower
    }
}
