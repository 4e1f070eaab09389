//! Shared constants.

/// Default deterministic seed for RNG operations.
///
/// Same seed + same design = same simulated data and same posterior.
/// The value `0x746F6A` is "toj" encoded in ASCII.
pub const DEFAULT_SEED: u64 = 0x746F6A;

/// Natural log of 2π, used in normal log-pdf computation.
pub const LOG_2PI: f64 = 1.8378770664093453;

/// Credible mass used for all posterior and success-rate intervals.
pub const CRED_MASS: f64 = 0.95;

/// Floor applied to binomial success probabilities before taking logs.
pub const THETA_FLOOR: f64 = 1e-12;
