use thiserror::Error;

/// Errors reported by the simulation engine.
///
/// All variants are recoverable and returned to the caller as ordinary
/// values; no failure mutates live state. The request-denial variants
/// (`RequestExceedsNeed`, `RequestExceedsAvailable`, `RequestUnsafe`) are
/// mutually exclusive and checked in that priority order. Variants carrying
/// a `Vec<usize>` name the offending resource indices.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SimulationError {
    #[error("Simulation error, unknown session (id: {0})")]
    UnknownSession(u32),

    #[error("Simulation error, process index out of range (process: {0}, count: {1})")]
    InvalidProcess(usize, usize),

    #[error("Simulation error, expected a vector of {expected} components, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Simulation error, negative value at resource index {index}: {value}")]
    NegativeValue { index: usize, value: i64 },

    #[error("Simulation error, process or resource count out of bounds (got: {0})")]
    CountOutOfBounds(usize),

    #[error("Simulation error, allocation exceeds declared maximum (resources: {0:?})")]
    ExceedsMaximum(Vec<usize>),

    #[error("Simulation error, quantity exceeds total resources (resources: {0:?})")]
    ExceedsTotal(Vec<usize>),

    #[error("Simulation error, request exceeds declared need (resources: {0:?})")]
    RequestExceedsNeed(Vec<usize>),

    #[error("Simulation error, request exceeds available resources (resources: {0:?})")]
    RequestExceedsAvailable(Vec<usize>),

    #[error("Simulation error, granting the request would leave the system unsafe")]
    RequestUnsafe,

    #[error("Simulation error, release exceeds current allocation (resources: {0:?})")]
    ReleaseExceedsAllocation(Vec<usize>),
}
