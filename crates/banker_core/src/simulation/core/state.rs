//! Live allocation state for one simulated system.
//!
//! A [`System`] owns the allocation, maximum, total and available vectors for
//! a fixed number of processes and resource types. The need matrix is always
//! derived as `maximum - allocation`, never stored. Structural invariants are
//! enforced at every mutation point:
//!
//! - `available[j] + Σ_i allocation[i][j] == total[j]` for every resource `j`
//! - `allocation[i][j] <= maximum[i][j] <= total[j]` for every process `i`
//!
//! Processes are populated one at a time through [`System::record_process`]
//! during setup; afterwards the state changes only through the admission
//! operations, which work on value copies and commit atomically.

use crate::simulation::error::SimulationError;

/// Upper bound on both the process count and the resource type count.
///
/// Keeps the exhaustive sequence enumeration tractable; the exploration is
/// exponential in the process count.
pub const MAX_DIMENSION: usize = 10;

/// Validates a raw boundary vector: exactly `expected` components, none
/// negative. Returns the widened copy the engine works with.
pub fn checked_vector(raw: &[i64], expected: usize) -> Result<Vec<u64>, SimulationError> {
    if raw.len() != expected {
        return Err(SimulationError::InvalidDimension { expected, actual: raw.len() });
    }
    let mut out = Vec::with_capacity(expected);
    for (index, &value) in raw.iter().enumerate() {
        if value < 0 {
            return Err(SimulationError::NegativeValue { index, value });
        }
        out.push(value as u64);
    }
    Ok(out)
}

/// Initial configuration of a simulated system.
#[derive(Debug, Clone)]
pub struct SystemConfig {
    pub processes: usize,
    pub resources: usize,
    pub total: Vec<i64>,
    pub available: Vec<i64>,
}

/// One simulated system of processes competing for reusable resource types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct System {
    total: Vec<u64>,
    available: Vec<u64>,
    allocation: Vec<Vec<u64>>,
    maximum: Vec<Vec<u64>>,
}

impl System {
    /// Builds an empty system from a validated configuration.
    ///
    /// Allocation and maximum start zeroed, so the initial state is trivially
    /// well formed (every need is zero). The configured availability must not
    /// exceed the totals componentwise.
    pub fn new(config: SystemConfig) -> Result<Self, SimulationError> {
        if config.processes == 0 || config.processes > MAX_DIMENSION {
            return Err(SimulationError::CountOutOfBounds(config.processes));
        }
        if config.resources == 0 || config.resources > MAX_DIMENSION {
            return Err(SimulationError::CountOutOfBounds(config.resources));
        }
        let total = checked_vector(&config.total, config.resources)?;
        let available = checked_vector(&config.available, config.resources)?;
        let excess: Vec<usize> =
            (0..config.resources).filter(|&j| available[j] > total[j]).collect();
        if !excess.is_empty() {
            return Err(SimulationError::ExceedsTotal(excess));
        }
        Ok(Self {
            total,
            available,
            allocation: vec![vec![0; config.resources]; config.processes],
            maximum: vec![vec![0; config.resources]; config.processes],
        })
    }

    pub fn process_count(&self) -> usize {
        self.allocation.len()
    }

    pub fn resource_count(&self) -> usize {
        self.total.len()
    }

    pub fn total(&self) -> &[u64] {
        &self.total
    }

    pub fn available(&self) -> &[u64] {
        &self.available
    }

    pub fn allocation(&self) -> &[Vec<u64>] {
        &self.allocation
    }

    pub fn maximum(&self) -> &[Vec<u64>] {
        &self.maximum
    }

    /// Derived remaining need of one process.
    pub fn need_row(&self, process: usize) -> Vec<u64> {
        self.maximum[process]
            .iter()
            .zip(&self.allocation[process])
            .map(|(max, alloc)| max - alloc)
            .collect()
    }

    /// Derived need matrix for all processes.
    pub fn need_matrix(&self) -> Vec<Vec<u64>> {
        (0..self.process_count()).map(|i| self.need_row(i)).collect()
    }

    /// Units currently held across all processes, per resource type.
    pub fn total_allocated(&self) -> Vec<u64> {
        let mut sums = vec![0; self.resource_count()];
        for row in &self.allocation {
            for (sum, units) in sums.iter_mut().zip(row) {
                *sum += units;
            }
        }
        sums
    }

    /// Records the allocation and declared maximum of one process during
    /// setup, then recomputes availability as `total - Σ allocation`.
    ///
    /// Returns the derived need row. Re-recording a process replaces its
    /// previous values. Nothing is committed unless every bound holds:
    /// `allocation <= maximum <= total` componentwise, and the summed
    /// allocation across processes must stay within the totals.
    pub fn record_process(
        &mut self,
        process: usize,
        allocation: &[i64],
        maximum: &[i64],
    ) -> Result<Vec<u64>, SimulationError> {
        if process >= self.process_count() {
            return Err(SimulationError::InvalidProcess(process, self.process_count()));
        }
        let resources = self.resource_count();
        let allocation = checked_vector(allocation, resources)?;
        let maximum = checked_vector(maximum, resources)?;

        let over_total: Vec<usize> = (0..resources).filter(|&j| maximum[j] > self.total[j]).collect();
        if !over_total.is_empty() {
            return Err(SimulationError::ExceedsTotal(over_total));
        }
        let over_max: Vec<usize> = (0..resources).filter(|&j| allocation[j] > maximum[j]).collect();
        if !over_max.is_empty() {
            return Err(SimulationError::ExceedsMaximum(over_max));
        }

        // Summed allocation with this row swapped in must fit the totals.
        let mut summed = self.total_allocated();
        for j in 0..resources {
            summed[j] = summed[j] - self.allocation[process][j] + allocation[j];
        }
        let over_sum: Vec<usize> = (0..resources).filter(|&j| summed[j] > self.total[j]).collect();
        if !over_sum.is_empty() {
            return Err(SimulationError::ExceedsTotal(over_sum));
        }

        self.allocation[process] = allocation;
        self.maximum[process] = maximum;
        for j in 0..resources {
            self.available[j] = self.total[j] - summed[j];
        }
        Ok(self.need_row(process))
    }

    /// Checks the conservation and bound invariants. Intended for tests and
    /// debug assertions; committed states always satisfy it.
    pub fn is_well_formed(&self) -> bool {
        let summed = self.total_allocated();
        let conserved = (0..self.resource_count())
            .all(|j| self.available[j] + summed[j] == self.total[j]);
        let bounded = self.allocation.iter().zip(&self.maximum).all(|(alloc, max)| {
            alloc
                .iter()
                .zip(max)
                .zip(&self.total)
                .all(|((a, m), t)| a <= m && m <= t)
        });
        conserved && bounded
    }

    /// Applies a validated request delta in place. Callers must have checked
    /// `request <= need` and `request <= available` beforehand.
    pub(crate) fn apply_request_unchecked(&mut self, process: usize, request: &[u64]) {
        for j in 0..self.resource_count() {
            self.allocation[process][j] += request[j];
            self.available[j] -= request[j];
        }
    }

    /// Applies a validated release delta in place. Callers must have checked
    /// `release <= allocation` beforehand.
    pub(crate) fn apply_release_unchecked(&mut self, process: usize, release: &[u64]) {
        for j in 0..self.resource_count() {
            self.allocation[process][j] -= release[j];
            self.available[j] += release[j];
        }
    }
}
