use std::sync::atomic::{AtomicBool, AtomicU64};
use std::sync::atomic::Ordering;
use rand_distr::LogNormal;

/// Global iteration seed, set by the CLI loop before each simulation run
pub static RAND_SEED: AtomicU64 = AtomicU64::new(0);

/// Counter of completed simulation runs across the whole process
pub static TOTAL_SIMULATION_RUNS: AtomicU64 = AtomicU64::new(0);

/// When set, per-bid auction activity is logged (see --verbose auction)
pub static VERBOSE_AUCTION: AtomicBool = AtomicBool::new(false);

/// Derive a seed for a specific randomness stream from the global seed
/// Distinct stream constants keep bid increments, catalog generation etc.
/// on independent sequences within the same iteration
pub fn get_seed(stream: u64) -> u64 {
    RAND_SEED
        .load(Ordering::Relaxed)
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(stream)
}

/// Convert mean and standard deviation to log-normal distribution parameters
/// Returns (μ, σ) for LogNormal(μ, σ) that approximates the given mean and stddev
///
/// For LogNormal(μ, σ):
/// - E[X] = exp(μ + σ²/2)
/// - Var[X] = (exp(σ²) - 1) * exp(2μ + σ²)
///
/// To convert from mean (m) and stddev (s):
/// - σ = sqrt(ln(1 + s²/m²))
/// - μ = ln(m) - σ²/2
fn lognormal_from_mean_stddev(mean: f64, stddev: f64) -> (f64, f64) {
    let variance = stddev * stddev;
    let sigma_squared = (1.0 + variance / (mean * mean)).ln();
    let sigma = sigma_squared.sqrt();
    let mu = mean.ln() - sigma_squared / 2.0;
    (mu, sigma)
}

/// Create a log-normal distribution from mean and standard deviation
pub fn lognormal_dist(mean: f64, stddev: f64) -> LogNormal<f64> {
    let (mu, sigma) = lognormal_from_mean_stddev(mean, stddev);
    LogNormal::new(mu, sigma).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_seed_streams_differ() {
        RAND_SEED.store(7, Ordering::Relaxed);
        assert_ne!(get_seed(1001), get_seed(2002));
    }

    #[test]
    fn test_lognormal_parameters() {
        let (mu, sigma) = lognormal_from_mean_stddev(500.0, 250.0);
        let mean_back = (mu + sigma * sigma / 2.0).exp();
        assert!((mean_back - 500.0).abs() < 1e-6);
    }
}
