//! Session-oriented service facade over the algorithmic core.
//!
//! [`SimulationService`] implements [`tower::Service`] so hosting layers can
//! compose it like any other middleware. Sessions live in a shared
//! [`DashMap`]; each entry is one logical session with exclusive access
//! during an operation, so two in-flight operations never interleave on the
//! same system state. Every mutation goes through the core admission
//! functions and commits by replacing the session's `System` value.

use std::{future::Future, pin::Pin, sync::Arc, task::Poll};

use dashmap::DashMap;
use tower::Service;
#[cfg(feature = "banker_tracing")]
use tracing::info;

use crate::simulation::{
    api::{SimulationRequest, SimulationResponse, Statistics, SystemView},
    core::{
        admission::{apply_release, evaluate_request},
        enumeration::enumerate_safe_sequences,
        safety::{SafetyReport, check_safety},
        state::{System, SystemConfig},
    },
    error::SimulationError,
    scenarios::Scenario,
};

/// One logical session: a live system plus its running counters.
#[derive(Debug, Clone)]
struct Session {
    system: System,
    statistics: Statistics,
}

type SessionMap = DashMap<u32, Session>;

/// Deadlock-avoidance simulation service.
///
/// Cheap to clone; clones share the session map.
#[derive(Debug, Clone, Default)]
pub struct SimulationService {
    sessions: Arc<SessionMap>,
}

impl SimulationService {
    fn safety_of(system: &System) -> SafetyReport {
        check_safety(system.allocation(), system.available(), system.maximum())
    }

    fn configure(
        &self,
        session: u32,
        config: SystemConfig,
    ) -> Result<SimulationResponse, SimulationError> {
        let system = System::new(config)?;
        self.sessions.insert(session, Session { system, statistics: Statistics::default() });
        Ok(SimulationResponse::Ack)
    }

    fn record_process(
        &self,
        session: u32,
        process: usize,
        allocation: &[i64],
        maximum: &[i64],
    ) -> Result<SimulationResponse, SimulationError> {
        let mut entry =
            self.sessions.get_mut(&session).ok_or(SimulationError::UnknownSession(session))?;
        let need = entry.system.record_process(process, allocation, maximum)?;
        Ok(SimulationResponse::ProcessRecorded { need })
    }

    fn request_resources(
        &self,
        session: u32,
        process: usize,
        request: &[i64],
    ) -> Result<SimulationResponse, SimulationError> {
        let mut entry =
            self.sessions.get_mut(&session).ok_or(SimulationError::UnknownSession(session))?;
        match evaluate_request(&entry.system, process, request) {
            Ok(next) => {
                entry.system = next;
                entry.statistics.requests_granted += 1;
                let report = Self::safety_of(&entry.system);
                Ok(SimulationResponse::Granted { report })
            }
            Err(denial) => {
                // Structural failures (bad index, width, negative values) are
                // caller mistakes, not banker decisions; only real denials
                // feed the counters.
                match denial {
                    SimulationError::RequestUnsafe => {
                        entry.statistics.requests_denied += 1;
                        entry.statistics.deadlocks_avoided += 1;
                    }
                    SimulationError::RequestExceedsNeed(_)
                    | SimulationError::RequestExceedsAvailable(_) => {
                        entry.statistics.requests_denied += 1;
                    }
                    _ => {}
                }
                Err(denial)
            }
        }
    }

    fn release_resources(
        &self,
        session: u32,
        process: usize,
        release: &[i64],
    ) -> Result<SimulationResponse, SimulationError> {
        let mut entry =
            self.sessions.get_mut(&session).ok_or(SimulationError::UnknownSession(session))?;
        let next = apply_release(&entry.system, process, release)?;
        entry.system = next;
        entry.statistics.resources_released += 1;
        let report = Self::safety_of(&entry.system);
        Ok(SimulationResponse::Released { report })
    }

    fn check_safety_now(&self, session: u32) -> Result<SimulationResponse, SimulationError> {
        let entry =
            self.sessions.get(&session).ok_or(SimulationError::UnknownSession(session))?;
        Ok(SimulationResponse::Safety(Self::safety_of(&entry.system)))
    }

    fn enumerate(&self, session: u32) -> Result<SimulationResponse, SimulationError> {
        let entry =
            self.sessions.get(&session).ok_or(SimulationError::UnknownSession(session))?;
        let system = &entry.system;
        Ok(SimulationResponse::Sequences(enumerate_safe_sequences(
            system.available(),
            system.allocation(),
            system.maximum(),
        )))
    }

    pub(crate) fn load_scenario(
        &self,
        session: u32,
        scenario: Scenario,
    ) -> Result<SimulationResponse, SimulationError> {
        let system = scenario.build()?;
        let report = Self::safety_of(&system);
        self.sessions.insert(session, Session { system, statistics: Statistics::default() });
        Ok(SimulationResponse::Safety(report))
    }

    fn state_view(&self, session: u32) -> Result<SimulationResponse, SimulationError> {
        let entry =
            self.sessions.get(&session).ok_or(SimulationError::UnknownSession(session))?;
        let system = &entry.system;
        Ok(SimulationResponse::State(SystemView {
            processes: system.process_count(),
            resources: system.resource_count(),
            total: system.total().to_vec(),
            available: system.available().to_vec(),
            total_allocated: system.total_allocated(),
            allocation: system.allocation().to_vec(),
            maximum: system.maximum().to_vec(),
            need: system.need_matrix(),
        }))
    }

    fn statistics(&self, session: u32) -> Result<SimulationResponse, SimulationError> {
        let entry =
            self.sessions.get(&session).ok_or(SimulationError::UnknownSession(session))?;
        Ok(SimulationResponse::Statistics(entry.statistics))
    }

    fn reset(&self, session: u32) -> Result<SimulationResponse, SimulationError> {
        self.sessions.remove(&session);
        Ok(SimulationResponse::Ack)
    }
}

impl Service<SimulationRequest> for SimulationService {
    type Response = SimulationResponse;
    type Error = SimulationError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _: &mut std::task::Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: SimulationRequest) -> Self::Future {
        let this = self.clone();
        Box::pin(async move {
            match request {
                SimulationRequest::Configure { session, processes, resources, total, available } => {
                    #[cfg(feature = "banker_tracing")]
                    info!(
                        "[simulation] Configure: session: {}, processes: {}, resources: {}",
                        session, processes, resources
                    );
                    this.configure(session, SystemConfig { processes, resources, total, available })
                }
                SimulationRequest::RecordProcess { session, process, allocation, maximum } => {
                    #[cfg(feature = "banker_tracing")]
                    info!(
                        "[simulation] RecordProcess: session: {}, process: {}, allocation: {:?}, maximum: {:?}",
                        session, process, allocation, maximum
                    );
                    this.record_process(session, process, &allocation, &maximum)
                }
                SimulationRequest::RequestResources { session, process, request } => {
                    #[cfg(feature = "banker_tracing")]
                    info!(
                        "[simulation] RequestResources: session: {}, process: {}, request: {:?}",
                        session, process, request
                    );
                    this.request_resources(session, process, &request)
                }
                SimulationRequest::ReleaseResources { session, process, release } => {
                    #[cfg(feature = "banker_tracing")]
                    info!(
                        "[simulation] ReleaseResources: session: {}, process: {}, release: {:?}",
                        session, process, release
                    );
                    this.release_resources(session, process, &release)
                }
                SimulationRequest::CheckSafety { session } => {
                    #[cfg(feature = "banker_tracing")]
                    info!("[simulation] CheckSafety: session: {}", session);
                    this.check_safety_now(session)
                }
                SimulationRequest::EnumerateSequences { session } => {
                    #[cfg(feature = "banker_tracing")]
                    info!("[simulation] EnumerateSequences: session: {}", session);
                    this.enumerate(session)
                }
                SimulationRequest::LoadScenario { session, scenario } => {
                    #[cfg(feature = "banker_tracing")]
                    info!("[simulation] LoadScenario: session: {}, scenario: {:?}", session, scenario);
                    this.load_scenario(session, scenario)
                }
                SimulationRequest::GetState { session } => {
                    #[cfg(feature = "banker_tracing")]
                    info!("[simulation] GetState: session: {}", session);
                    this.state_view(session)
                }
                SimulationRequest::GetStatistics { session } => {
                    #[cfg(feature = "banker_tracing")]
                    info!("[simulation] GetStatistics: session: {}", session);
                    this.statistics(session)
                }
                SimulationRequest::Reset { session } => {
                    #[cfg(feature = "banker_tracing")]
                    info!("[simulation] Reset: session: {}", session);
                    this.reset(session)
                }
            }
        })
    }
}
