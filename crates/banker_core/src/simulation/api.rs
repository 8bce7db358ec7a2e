//! Simulation API type definitions.
//!
//! Request and response types for the session-oriented simulation service.
//! A session owns one [`System`](crate::simulation::core::state::System) and
//! its running statistics; every request names its session, and every
//! operation is a complete synchronous transform from one well-formed state
//! to the next.
//!
//! Quantity vectors cross this boundary as `i64`: the surrounding layer is
//! responsible for parsing free text, while the core rejects wrong-width
//! vectors and negative components with distinguishable error kinds.

use crate::simulation::{core::safety::SafetyReport, scenarios::Scenario};

/// Requests accepted by the simulation service.
///
/// The setup workflow follows the original configuration flow:
/// 1. `Configure` creates the session with counts, totals, and availability,
/// 2. `RecordProcess` populates processes one at a time,
/// 3. `RequestResources` / `ReleaseResources` mutate the running state,
/// 4. `CheckSafety` / `EnumerateSequences` inspect it on demand.
#[derive(Debug, Clone)]
pub enum SimulationRequest {
    /// Create (or replace) a session with a freshly configured system.
    ///
    /// Counts are capped at
    /// [`MAX_DIMENSION`](crate::simulation::core::state::MAX_DIMENSION);
    /// availability must not exceed the totals componentwise. Statistics
    /// restart from zero.
    Configure {
        session: u32,
        processes: usize,
        resources: usize,
        total: Vec<i64>,
        available: Vec<i64>,
    },

    /// Record the current allocation and declared maximum of one process.
    ///
    /// Availability is recomputed as `total - Σ allocation` on success.
    RecordProcess { session: u32, process: usize, allocation: Vec<i64>, maximum: Vec<i64> },

    /// Ask for additional resources on behalf of one process.
    ///
    /// Granted only if the request fits the process's remaining need and the
    /// current availability, and the simulated successor state is safe. The
    /// commit is an atomic replace; every denial leaves the state untouched.
    RequestResources { session: u32, process: usize, request: Vec<i64> },

    /// Hand resources back from one process.
    ///
    /// Applied unconditionally once it fits the process's current holdings;
    /// a release only increases availability and needs no safety gate.
    ReleaseResources { session: u32, process: usize, release: Vec<i64> },

    /// Run the safety algorithm on the current state.
    CheckSafety { session: u32 },

    /// Enumerate every safe completion order from the current state.
    EnumerateSequences { session: u32 },

    /// Replace the session's state with a preset scenario and report its
    /// safety immediately.
    LoadScenario { session: u32, scenario: Scenario },

    /// Snapshot the current matrices and vectors for display.
    GetState { session: u32 },

    /// Read the session's running counters.
    GetStatistics { session: u32 },

    /// Drop the session entirely.
    Reset { session: u32 },
}

/// Responses returned by the simulation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationResponse {
    /// Confirmation of a configuration change or reset.
    Ack,

    /// A process was recorded; carries its derived need row.
    ProcessRecorded { need: Vec<u64> },

    /// A request was granted and committed. The report reflects the safety
    /// check re-run on the new live state.
    Granted { report: SafetyReport },

    /// A release was applied. The report reflects the safety check re-run on
    /// the new live state; a release is never reverted, even if the refreshed
    /// verdict were unfavorable.
    Released { report: SafetyReport },

    /// Verdict, sequence, blocked set, and replay trace for the current
    /// state.
    Safety(SafetyReport),

    /// Every safe completion order from the current state; empty iff unsafe.
    Sequences(Vec<Vec<usize>>),

    /// Display snapshot of the current state.
    State(SystemView),

    /// Running counters for the session.
    Statistics(Statistics),
}

/// Copy of a session's state for presentation purposes.
///
/// Owned data only; it never aliases the live system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemView {
    pub processes: usize,
    pub resources: usize,
    pub total: Vec<u64>,
    pub available: Vec<u64>,
    pub total_allocated: Vec<u64>,
    pub allocation: Vec<Vec<u64>>,
    pub maximum: Vec<Vec<u64>>,
    pub need: Vec<Vec<u64>>,
}

/// Running counters of one session.
///
/// A denial for any reason counts as a denied request; only a denial caused
/// by an unsafe simulated state counts as an avoided deadlock. Release
/// denials leave the counters untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    pub requests_granted: u64,
    pub requests_denied: u64,
    pub resources_released: u64,
    pub deadlocks_avoided: u64,
}
