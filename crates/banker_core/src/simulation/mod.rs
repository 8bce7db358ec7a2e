//! Simulation module.
//!
//! Deadlock-avoidance engine built around the Banker's Algorithm. Given a
//! system of processes competing for multiple reusable resource types, it
//! decides whether an allocation state is safe, evaluates hypothetical
//! resource requests by simulation, and enumerates every possible safe
//! completion order.
//!
//! ## Core Components
//!
//! - **State Model** ([`core::state`]): per-process allocation and maximum
//!   matrices plus the per-resource total/available vectors, with the
//!   conservation invariant enforced at every mutation point.
//! - **Safety Checker** ([`core::safety`]): the classical safety algorithm
//!   with a deterministic lowest-index-first scan and a full replay trace.
//! - **Sequence Enumerator** ([`core::enumeration`]): exhaustive depth-first
//!   search over all completion orders.
//! - **Request Evaluator / Release Handler** ([`core::admission`]):
//!   validate-simulate-commit admission control with atomic state
//!   replacement.
//!
//! ## Service Layer
//!
//! [`service::SimulationService`] exposes the core through a
//! [`tower::Service`] keyed by session, carrying the preset scenarios and
//! per-session statistics on top of the pure algorithms.
//!
//! ## Initialization Helpers
//!
//! - [`init_simulator`]: a fresh service with no sessions.
//! - [`init_simulator_with_scenario`]: a service with one session preloaded
//!   from a preset, for tests, benches, and demos.

pub mod api;
pub mod core;
pub mod error;
pub mod scenarios;
pub mod service;

/// Initialize a simulation service with no sessions.
pub fn init_simulator() -> service::SimulationService {
    service::SimulationService::default()
}

/// Initialize a simulation service with `session` preloaded from a preset
/// scenario.
///
/// Intended for tests, benchmarks, and demonstrations where the incremental
/// configuration workflow is not the point.
pub fn init_simulator_with_scenario(
    session: u32,
    scenario: scenarios::Scenario,
) -> Result<service::SimulationService, error::SimulationError> {
    let service = service::SimulationService::default();
    service.load_scenario(session, scenario)?;
    Ok(service)
}
