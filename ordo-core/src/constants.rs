/// Starting parameters `(a, b, c)` for the exponential fit `a * e^(b - x) + c`.
pub const EXPONENTIAL_INITIAL_GUESS: [f64; 3] = [1.0, 0.0, 0.0];

/// Default cap on Levenberg-Marquardt iterations.
///
/// Three anchors and three parameters converge in well under 20 iterations for
/// any sane price range; the cap only matters for pathological input.
pub const MAX_FIT_ITERATIONS: usize = 200;

/// Stop when one accepted step lowers the cost by less than this fraction.
pub const COST_TOLERANCE: f64 = 1e-12;

/// Stop when the largest gradient component drops below this.
pub const GRADIENT_TOLERANCE: f64 = 1e-10;

/// Initial damping factor applied to the diagonal of the normal matrix.
pub const INITIAL_DAMPING: f64 = 1e-3;

/// Damping is multiplied by this after a rejected step and divided after an accepted one.
pub const DAMPING_FACTOR: f64 = 10.0;

/// Lower bound for the damping factor after repeated successes.
pub const MIN_DAMPING: f64 = 1e-12;

/// Once damping exceeds this, no descent direction exists: we are at a minimum.
pub const MAX_DAMPING: f64 = 1e12;

/// Floor for diagonal entries of the normal matrix before damping.
///
/// `a` and `b` are redundant in `a * e^(b - x)`, so the undamped normal matrix
/// is always singular, and the `b` column vanishes entirely when `a == 0`.
pub const DIAGONAL_FLOOR: f64 = 1e-9;
