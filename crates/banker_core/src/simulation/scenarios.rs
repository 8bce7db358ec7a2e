//! Preset scenarios for demonstrations, tests, and benches.

use crate::simulation::{
    core::state::{System, SystemConfig},
    error::SimulationError,
};

/// A named preset system state.
///
/// `Simple` is a safe three-process, two-resource state with several valid
/// completion orders. `DeadlockRisk` is a four-process, three-resource state
/// whose availability is exhausted while every need exceeds it, so it has no
/// safe sequence at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    Simple,
    DeadlockRisk,
}

impl Scenario {
    /// Builds the preset through the validated constructor path, so the
    /// result honors every structural invariant.
    pub fn build(&self) -> Result<System, SimulationError> {
        let (processes, total, rows) = match self {
            Scenario::Simple => (
                3,
                vec![10, 8],
                vec![
                    (vec![2, 1], vec![4, 3]),
                    (vec![3, 3], vec![6, 4]),
                    (vec![2, 2], vec![4, 4]),
                ],
            ),
            Scenario::DeadlockRisk => (
                4,
                vec![12, 10, 8],
                vec![
                    (vec![3, 2, 2], vec![5, 4, 4]),
                    (vec![2, 3, 2], vec![4, 5, 4]),
                    (vec![3, 2, 3], vec![5, 4, 5]),
                    (vec![2, 2, 1], vec![4, 4, 3]),
                ],
            ),
        };
        let resources = total.len();
        let mut system = System::new(SystemConfig {
            processes,
            resources,
            available: total.clone(),
            total,
        })?;
        for (process, (allocation, maximum)) in rows.iter().enumerate() {
            system.record_process(process, allocation, maximum)?;
        }
        Ok(system)
    }
}

impl std::str::FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simple" => Ok(Scenario::Simple),
            "deadlock" | "deadlock-risk" | "deadlock_risk" => Ok(Scenario::DeadlockRisk),
            other => Err(format!("Unknown scenario: {other}")),
        }
    }
}
