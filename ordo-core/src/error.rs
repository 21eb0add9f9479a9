use thiserror::Error;

/// Failure of the exponential curve fit.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("exponential fit did not converge after {iterations} iterations")]
    NotConverged { iterations: usize },
    #[error("exponential fit produced non-finite values; try smaller prices")]
    NonFinite,
}

/// Problems with user-supplied anchor prices or curve choice.
///
/// These are meant to be shown to the user, who can then re-enter their input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValuationError {
    #[error("the prices must be in descending order due to your preference ranking")]
    PricesNotDescending,
    #[error("cannot fit an exponential curve with only n={n} items; choose linear instead")]
    TooFewItems { n: usize },
    #[error("expected {expected} anchor prices, got {got}")]
    AnchorCount { expected: usize, got: usize },
    #[error("unknown curve \"{name}\"; use \"linear\" or \"exponential\"")]
    UnknownCurve { name: String },
    #[error("no curve has been selected yet")]
    NoCurveSelected,
    #[error(transparent)]
    Fit(#[from] FitError),
}
