use tower::Service;

use crate::simulation::{api::SimulationRequest, service::SimulationService};

/// Sends a request and unwraps the expected response variant.
macro_rules! expect_response {
    ($service:expr, $request:expr, $variant:ident) => {{
        let SimulationResponse::$variant(inner) = $service.call($request).await.unwrap() else {
            panic!(concat!("Expected SimulationResponse::", stringify!($variant)));
        };
        inner
    }};
    ($service:expr, $request:expr, $variant:ident { $field:ident }) => {{
        let SimulationResponse::$variant { $field } = $service.call($request).await.unwrap()
        else {
            panic!(concat!("Expected SimulationResponse::", stringify!($variant)));
        };
        $field
    }};
}

/// Describes one process row of a configured system.
pub(super) struct ProcessRow {
    pub allocation: Vec<i64>,
    pub maximum: Vec<i64>,
}

impl ProcessRow {
    pub fn new(allocation: &[i64], maximum: &[i64]) -> Self {
        Self { allocation: allocation.to_vec(), maximum: maximum.to_vec() }
    }
}

/// Configures session 0 of a fresh service through the incremental setup
/// workflow, the way the surrounding layer would.
pub(super) async fn setup_session(
    total: &[i64],
    rows: &[ProcessRow],
) -> SimulationService {
    let mut service = SimulationService::default();
    service
        .call(SimulationRequest::Configure {
            session: 0,
            processes: rows.len(),
            resources: total.len(),
            total: total.to_vec(),
            available: total.to_vec(),
        })
        .await
        .unwrap();
    for (process, row) in rows.iter().enumerate() {
        service
            .call(SimulationRequest::RecordProcess {
                session: 0,
                process,
                allocation: row.allocation.clone(),
                maximum: row.maximum.clone(),
            })
            .await
            .unwrap();
    }
    service
}

/// The safe three-process, two-resource state used across the suite.
pub(super) async fn simple_session() -> SimulationService {
    setup_session(
        &[10, 8],
        &[
            ProcessRow::new(&[2, 1], &[4, 3]),
            ProcessRow::new(&[3, 3], &[6, 4]),
            ProcessRow::new(&[2, 2], &[4, 4]),
        ],
    )
    .await
}
