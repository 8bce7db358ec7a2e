//! Classical Banker's safety algorithm over a snapshot.
//!
//! The checker works on borrowed matrices and builds its own `work`/`finish`
//! copies, so it never touches live state. The scan rule is the one the rest
//! of the engine depends on for reproducibility: processes are inspected in
//! ascending index order, the lowest currently eligible index is accepted,
//! and the scan restarts from index zero after every acceptance. A full pass
//! with no acceptance terminates the algorithm.
//!
//! Worst case O(P² · R): up to P acceptances, each preceded by a scan of up
//! to P processes with an O(R) eligibility test.

/// Outcome of a safety check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Safe,
    Unsafe,
}

/// One inspection of a process during the scan, recorded for replay.
///
/// External collaborators narrate these at their own pace; the whole trace is
/// computed synchronously before any of it is surfaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyStep {
    /// Process inspected.
    pub process: usize,
    /// Whether its full need fit within `work` at this point.
    pub eligible: bool,
    /// The process's derived need at inspection time.
    pub need: Vec<u64>,
    /// Working availability before the inspection.
    pub work: Vec<u64>,
    /// Working availability after the process released its allocation;
    /// `None` when the process was not eligible.
    pub work_after: Option<Vec<u64>>,
}

/// Result of a safety check: the verdict, one valid completion order when
/// safe, the processes that can never finish when unsafe, and the full
/// inspection trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyReport {
    pub verdict: Verdict,
    pub sequence: Vec<usize>,
    pub blocked: Vec<usize>,
    pub trace: Vec<SafetyStep>,
}

impl SafetyReport {
    pub fn is_safe(&self) -> bool {
        self.verdict == Verdict::Safe
    }
}

/// Whether `need` fits within `work` componentwise.
pub(crate) fn fits(need: &[u64], work: &[u64]) -> bool {
    need.iter().zip(work).all(|(n, w)| n <= w)
}

/// Runs the safety algorithm on a snapshot.
///
/// `allocation` and `maximum` are indexed `[process][resource]`; `available`
/// has one component per resource type. The returned sequence is the
/// deterministic lowest-index-first completion order; it is one valid safe
/// sequence, not necessarily the only one.
pub fn check_safety(
    allocation: &[Vec<u64>],
    available: &[u64],
    maximum: &[Vec<u64>],
) -> SafetyReport {
    let processes = allocation.len();
    let need: Vec<Vec<u64>> = allocation
        .iter()
        .zip(maximum)
        .map(|(alloc, max)| max.iter().zip(alloc).map(|(m, a)| m - a).collect())
        .collect();

    let mut work = available.to_vec();
    let mut finish = vec![false; processes];
    let mut sequence = Vec::with_capacity(processes);
    let mut trace = Vec::new();
    // Ineligible inspections are traced once per acceptance round, mirroring
    // the one-notice-per-process narration of the scan.
    let mut noticed = vec![false; processes];

    let mut found = true;
    while found {
        found = false;
        for i in 0..processes {
            if finish[i] {
                continue;
            }
            if fits(&need[i], &work) {
                let work_before = work.clone();
                for (w, units) in work.iter_mut().zip(&allocation[i]) {
                    *w += units;
                }
                finish[i] = true;
                sequence.push(i);
                trace.push(SafetyStep {
                    process: i,
                    eligible: true,
                    need: need[i].clone(),
                    work: work_before,
                    work_after: Some(work.clone()),
                });
                noticed = vec![false; processes];
                found = true;
                break;
            }
            if !noticed[i] {
                noticed[i] = true;
                trace.push(SafetyStep {
                    process: i,
                    eligible: false,
                    need: need[i].clone(),
                    work: work.clone(),
                    work_after: None,
                });
            }
        }
    }

    let blocked: Vec<usize> = (0..processes).filter(|&i| !finish[i]).collect();
    let verdict = if blocked.is_empty() { Verdict::Safe } else { Verdict::Unsafe };
    SafetyReport { verdict, sequence, blocked, trace }
}
