use rand::Rng;

/// Source of uniformly distributed doubles used to build random particles.
///
/// Every [`rand::Rng`] is a `RandomSource`; pass a seeded
/// `rand::rngs::StdRng` for reproducible setups.
pub trait RandomSource {
    /// Uniform sample in `[min, max)`. Requires `min < max`.
    fn uniform(&mut self, min: f64, max: f64) -> f64;
}

impl<R: Rng + ?Sized> RandomSource for R {
    #[inline]
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        self.random_range(min..max)
    }
}
