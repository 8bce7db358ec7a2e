#[macro_use]
mod fixtures;

use fixtures::{ProcessRow, setup_session, simple_session};
use tower::Service;

use crate::simulation::{
    api::{SimulationRequest, SimulationResponse},
    core::safety::Verdict,
    error::SimulationError,
    init_simulator_with_scenario,
    scenarios::Scenario,
};

/// Replays a completion order against a state snapshot, asserting every step
/// passes the eligibility test.
fn assert_replayable(
    sequence: &[usize],
    allocation: &[Vec<u64>],
    available: &[u64],
    maximum: &[Vec<u64>],
) {
    let mut work = available.to_vec();
    for &i in sequence {
        for j in 0..work.len() {
            let need = maximum[i][j] - allocation[i][j];
            assert!(need <= work[j], "process {i} ineligible at its turn (resource {j})");
        }
        for (w, units) in work.iter_mut().zip(&allocation[i]) {
            *w += units;
        }
    }
}

#[tokio::test]
async fn integration_simple_setup_is_safe() {
    #[cfg(feature = "banker_tracing")]
    crate::banker_tracing::init();
    let mut service = simple_session().await;

    let view = expect_response!(service, SimulationRequest::GetState { session: 0 }, State);
    assert_eq!(view.need, vec![vec![2, 2], vec![3, 1], vec![2, 2]]);
    assert_eq!(view.available, vec![3, 2]);
    assert_eq!(view.total_allocated, vec![7, 6]);

    let report = expect_response!(service, SimulationRequest::CheckSafety { session: 0 }, Safety);
    assert_eq!(report.verdict, Verdict::Safe);
    // Lowest-index-first scan with restart is deterministic.
    assert_eq!(report.sequence, vec![0, 1, 2]);
    assert_replayable(&report.sequence, &view.allocation, &view.available, &view.maximum);
}

#[tokio::test]
async fn integration_grant_within_need_and_availability() {
    #[cfg(feature = "banker_tracing")]
    crate::banker_tracing::init();
    let mut service = simple_session().await;

    let report = expect_response!(
        service,
        SimulationRequest::RequestResources { session: 0, process: 0, request: vec![1, 0] },
        Granted { report }
    );
    assert!(report.is_safe());

    let view = expect_response!(service, SimulationRequest::GetState { session: 0 }, State);
    assert_eq!(view.allocation[0], vec![3, 1]);
    assert_eq!(view.need[0], vec![1, 2]);
    assert_eq!(view.available, vec![2, 2]);
}

#[tokio::test]
async fn integration_deny_request_exceeding_need() {
    #[cfg(feature = "banker_tracing")]
    crate::banker_tracing::init();
    let mut service = simple_session().await;

    assert_eq!(
        service
            .call(SimulationRequest::RequestResources {
                session: 0,
                process: 0,
                request: vec![3, 3],
            })
            .await
            .unwrap_err(),
        SimulationError::RequestExceedsNeed(vec![0, 1])
    );

    // Zero mutation on denial.
    let view = expect_response!(service, SimulationRequest::GetState { session: 0 }, State);
    assert_eq!(view.allocation[0], vec![2, 1]);
    assert_eq!(view.available, vec![3, 2]);
}

#[tokio::test]
async fn integration_deny_release_exceeding_allocation() {
    #[cfg(feature = "banker_tracing")]
    crate::banker_tracing::init();
    let mut service = simple_session().await;

    assert_eq!(
        service
            .call(SimulationRequest::ReleaseResources {
                session: 0,
                process: 0,
                release: vec![5, 5],
            })
            .await
            .unwrap_err(),
        SimulationError::ReleaseExceedsAllocation(vec![0, 1])
    );

    let view = expect_response!(service, SimulationRequest::GetState { session: 0 }, State);
    assert_eq!(view.allocation[0], vec![2, 1]);
    assert_eq!(view.available, vec![3, 2]);
}

#[tokio::test]
async fn integration_exhausted_state_is_unsafe_with_no_sequences() {
    #[cfg(feature = "banker_tracing")]
    crate::banker_tracing::init();
    let mut service = setup_session(
        &[12, 10, 8],
        &[
            ProcessRow::new(&[3, 2, 2], &[5, 4, 4]),
            ProcessRow::new(&[2, 3, 2], &[4, 5, 4]),
            ProcessRow::new(&[3, 2, 3], &[5, 4, 5]),
            ProcessRow::new(&[2, 2, 1], &[4, 4, 3]),
        ],
    )
    .await;

    let report = expect_response!(service, SimulationRequest::CheckSafety { session: 0 }, Safety);
    assert_eq!(report.verdict, Verdict::Unsafe);
    assert_eq!(report.blocked, vec![0, 1, 2, 3]);

    let sequences =
        expect_response!(service, SimulationRequest::EnumerateSequences { session: 0 }, Sequences);
    assert!(sequences.is_empty());
}

#[tokio::test]
async fn integration_enumerator_agrees_with_checker() {
    #[cfg(feature = "banker_tracing")]
    crate::banker_tracing::init();
    for scenario in [Scenario::Simple, Scenario::DeadlockRisk] {
        let mut service = init_simulator_with_scenario(0, scenario).unwrap();
        let report =
            expect_response!(service, SimulationRequest::CheckSafety { session: 0 }, Safety);
        let sequences = expect_response!(
            service,
            SimulationRequest::EnumerateSequences { session: 0 },
            Sequences
        );
        assert_eq!(report.is_safe(), !sequences.is_empty());
        if report.is_safe() {
            assert!(sequences.contains(&report.sequence));
            let view =
                expect_response!(service, SimulationRequest::GetState { session: 0 }, State);
            for sequence in &sequences {
                assert_replayable(sequence, &view.allocation, &view.available, &view.maximum);
            }
        }
    }
}

#[tokio::test]
async fn integration_conservation_holds_across_operations() {
    #[cfg(feature = "banker_tracing")]
    crate::banker_tracing::init();
    let mut service = simple_session().await;

    service
        .call(SimulationRequest::RequestResources { session: 0, process: 1, request: vec![2, 0] })
        .await
        .unwrap();
    service
        .call(SimulationRequest::ReleaseResources { session: 0, process: 2, release: vec![1, 2] })
        .await
        .unwrap();
    let _ = service
        .call(SimulationRequest::RequestResources { session: 0, process: 0, request: vec![9, 9] })
        .await;

    let view = expect_response!(service, SimulationRequest::GetState { session: 0 }, State);
    for j in 0..view.resources {
        let held: u64 = view.allocation.iter().map(|row| row[j]).sum();
        assert_eq!(view.available[j] + held, view.total[j]);
    }
    for i in 0..view.processes {
        for j in 0..view.resources {
            assert_eq!(view.need[i][j], view.maximum[i][j] - view.allocation[i][j]);
        }
    }
}

#[tokio::test]
async fn integration_statistics_track_the_session_history() {
    #[cfg(feature = "banker_tracing")]
    crate::banker_tracing::init();
    let mut service = simple_session().await;

    // One grant, one bounds denial, one release.
    service
        .call(SimulationRequest::RequestResources { session: 0, process: 0, request: vec![1, 0] })
        .await
        .unwrap();
    let _ = service
        .call(SimulationRequest::RequestResources { session: 0, process: 0, request: vec![9, 9] })
        .await
        .unwrap_err();
    service
        .call(SimulationRequest::ReleaseResources { session: 0, process: 1, release: vec![1, 1] })
        .await
        .unwrap();

    let stats =
        expect_response!(service, SimulationRequest::GetStatistics { session: 0 }, Statistics);
    assert_eq!(stats.requests_granted, 1);
    assert_eq!(stats.requests_denied, 1);
    assert_eq!(stats.resources_released, 1);
}

#[tokio::test]
async fn integration_unsafe_denial_counts_as_avoided_deadlock() {
    #[cfg(feature = "banker_tracing")]
    crate::banker_tracing::init();
    let mut service = setup_session(
        &[4],
        &[ProcessRow::new(&[1], &[4]), ProcessRow::new(&[1], &[3])],
    )
    .await;

    assert_eq!(
        service
            .call(SimulationRequest::RequestResources {
                session: 0,
                process: 0,
                request: vec![1],
            })
            .await
            .unwrap_err(),
        SimulationError::RequestUnsafe
    );

    let stats =
        expect_response!(service, SimulationRequest::GetStatistics { session: 0 }, Statistics);
    assert_eq!(stats.requests_denied, 1);
    assert_eq!(stats.deadlocks_avoided, 1);
}

#[tokio::test]
async fn integration_trace_narrates_the_full_run() {
    #[cfg(feature = "banker_tracing")]
    crate::banker_tracing::init();
    let mut service = init_simulator_with_scenario(0, Scenario::Simple).unwrap();

    let report = expect_response!(service, SimulationRequest::CheckSafety { session: 0 }, Safety);
    let accepted: Vec<usize> =
        report.trace.iter().filter(|s| s.eligible).map(|s| s.process).collect();
    assert_eq!(accepted, report.sequence);
    // Accepted steps carry the work vector before and after the release.
    for step in report.trace.iter().filter(|s| s.eligible) {
        assert!(step.work_after.is_some());
    }
}
