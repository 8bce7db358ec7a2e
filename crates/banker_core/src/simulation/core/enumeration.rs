//! Exhaustive exploration of every safe completion order.
//!
//! Depth-first search over the `(work, finish, path)` state: at every node
//! each currently eligible unfinished process spawns a branch. The only
//! pruning is the natural dead end of a node with unfinished processes and no
//! eligible one. Exponential in the worst case, acceptable because both
//! dimensions are capped at [`MAX_DIMENSION`](super::state::MAX_DIMENSION).

use super::safety::fits;

/// Enumerates all safe sequences reachable from the snapshot.
///
/// Each returned sequence is a full permutation of process indices in which
/// every process, taken in turn, can have its need met by the availability at
/// that point. The result is empty iff the snapshot is unsafe. Branches are
/// explored in ascending process index, so the output is lexicographically
/// ordered.
pub fn enumerate_safe_sequences(
    available: &[u64],
    allocation: &[Vec<u64>],
    maximum: &[Vec<u64>],
) -> Vec<Vec<usize>> {
    let need: Vec<Vec<u64>> = allocation
        .iter()
        .zip(maximum)
        .map(|(alloc, max)| max.iter().zip(alloc).map(|(m, a)| m - a).collect())
        .collect();

    let mut sequences = Vec::new();
    let mut path = Vec::with_capacity(allocation.len());
    explore(
        available.to_vec(),
        vec![false; allocation.len()],
        &mut path,
        allocation,
        &need,
        &mut sequences,
    );
    sequences
}

fn explore(
    work: Vec<u64>,
    finish: Vec<bool>,
    path: &mut Vec<usize>,
    allocation: &[Vec<u64>],
    need: &[Vec<u64>],
    sequences: &mut Vec<Vec<usize>>,
) {
    if finish.iter().all(|&f| f) {
        // Distinct branches cannot reconverge to the same ordering, but the
        // duplicate guard is kept as a safety net.
        if !sequences.iter().any(|s| s == path) {
            sequences.push(path.clone());
        }
        return;
    }

    for i in 0..finish.len() {
        if finish[i] || !fits(&need[i], &work) {
            continue;
        }
        let mut next_work = work.clone();
        for (w, units) in next_work.iter_mut().zip(&allocation[i]) {
            *w += units;
        }
        let mut next_finish = finish.clone();
        next_finish[i] = true;
        path.push(i);
        explore(next_work, next_finish, path, allocation, need, sequences);
        path.pop();
    }
    // A node with unfinished processes and no eligible branch is a dead end;
    // nothing below it can be a safe sequence.
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::core::safety::check_safety;

    fn simple_snapshot() -> (Vec<Vec<u64>>, Vec<u64>, Vec<Vec<u64>>) {
        (
            vec![vec![2, 1], vec![3, 3], vec![2, 2]],
            vec![3, 2],
            vec![vec![4, 3], vec![6, 4], vec![4, 4]],
        )
    }

    #[test]
    fn unit_enumeration_finds_all_orders() {
        let (allocation, available, maximum) = simple_snapshot();
        let sequences = enumerate_safe_sequences(&available, &allocation, &maximum);
        // Every process is eligible from the start, so all 3! orders work.
        assert_eq!(sequences.len(), 6);
        for sequence in &sequences {
            let mut sorted = sequence.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, vec![0, 1, 2]);
        }
    }

    #[test]
    fn unit_enumeration_is_lexicographic_and_deduplicated() {
        let (allocation, available, maximum) = simple_snapshot();
        let sequences = enumerate_safe_sequences(&available, &allocation, &maximum);
        let mut sorted = sequences.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sequences, sorted);
    }

    #[test]
    fn unit_enumeration_respects_eligibility_constraints() {
        // P1 must come first; P0 and P2 only become eligible afterwards.
        let allocation = vec![vec![0, 0], vec![2, 2], vec![1, 1]];
        let available = vec![1, 1];
        let maximum = vec![vec![3, 3], vec![3, 3], vec![4, 4]];
        let sequences = enumerate_safe_sequences(&available, &allocation, &maximum);
        assert_eq!(sequences, vec![vec![1, 0, 2], vec![1, 2, 0]]);
    }

    #[test]
    fn unit_enumeration_empty_iff_unsafe() {
        let allocation = vec![vec![3, 2, 2], vec![2, 3, 2], vec![3, 2, 3], vec![2, 2, 1]];
        let available = vec![2, 1, 0];
        let maximum = vec![vec![5, 4, 4], vec![4, 5, 4], vec![5, 4, 5], vec![4, 4, 3]];
        let sequences = enumerate_safe_sequences(&available, &allocation, &maximum);
        assert!(sequences.is_empty());
        assert!(!check_safety(&allocation, &available, &maximum).is_safe());
    }

    #[test]
    fn unit_enumeration_agrees_with_checker() {
        for (allocation, available, maximum) in [
            simple_snapshot(),
            (vec![vec![0, 0], vec![2, 2], vec![1, 1]], vec![1, 1], vec![
                vec![3, 3],
                vec![3, 3],
                vec![4, 4],
            ]),
        ] {
            let report = check_safety(&allocation, &available, &maximum);
            let sequences = enumerate_safe_sequences(&available, &allocation, &maximum);
            assert_eq!(report.is_safe(), !sequences.is_empty());
            if report.is_safe() {
                assert!(sequences.contains(&report.sequence));
            }
        }
    }
}
