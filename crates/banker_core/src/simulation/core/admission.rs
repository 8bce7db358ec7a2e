//! Admission control: request evaluation and release handling.
//!
//! Both operations take the live system by shared reference and return a new
//! [`System`] value on success. The caller commits by replacing its handle,
//! so partial application is never observable; on any denial the live state
//! is untouched.

use super::{
    safety::check_safety,
    state::{System, checked_vector},
};
use crate::simulation::error::SimulationError;

/// Evaluates a resource request from one process.
///
/// Validation order, first failing check wins:
/// 1. process index in range,
/// 2. vector width and non-negativity,
/// 3. request within the process's remaining need,
/// 4. request within current availability,
/// 5. simulated allocation keeps the system safe.
///
/// A grant returns the successor state; every denial leaves the input alone.
pub fn evaluate_request(
    system: &System,
    process: usize,
    request: &[i64],
) -> Result<System, SimulationError> {
    if process >= system.process_count() {
        return Err(SimulationError::InvalidProcess(process, system.process_count()));
    }
    let request = checked_vector(request, system.resource_count())?;

    let need = system.need_row(process);
    let over_need: Vec<usize> =
        (0..request.len()).filter(|&j| request[j] > need[j]).collect();
    if !over_need.is_empty() {
        return Err(SimulationError::RequestExceedsNeed(over_need));
    }

    let available = system.available();
    let over_available: Vec<usize> =
        (0..request.len()).filter(|&j| request[j] > available[j]).collect();
    if !over_available.is_empty() {
        return Err(SimulationError::RequestExceedsAvailable(over_available));
    }

    let mut simulated = system.clone();
    simulated.apply_request_unchecked(process, &request);
    let report =
        check_safety(simulated.allocation(), simulated.available(), simulated.maximum());
    if report.is_safe() { Ok(simulated) } else { Err(SimulationError::RequestUnsafe) }
}

/// Applies a resource release from one process.
///
/// A release never needs a safety gate: it can only increase availability, so
/// it is applied unconditionally once the bounds hold. Validation still
/// short-circuits with zero mutation on a bad index, width, negative
/// component, or a release above the current allocation.
pub fn apply_release(
    system: &System,
    process: usize,
    release: &[i64],
) -> Result<System, SimulationError> {
    if process >= system.process_count() {
        return Err(SimulationError::InvalidProcess(process, system.process_count()));
    }
    let release = checked_vector(release, system.resource_count())?;

    let held = &system.allocation()[process];
    let over_held: Vec<usize> =
        (0..release.len()).filter(|&j| release[j] > held[j]).collect();
    if !over_held.is_empty() {
        return Err(SimulationError::ReleaseExceedsAllocation(over_held));
    }

    let mut next = system.clone();
    next.apply_release_unchecked(process, &release);
    Ok(next)
}
