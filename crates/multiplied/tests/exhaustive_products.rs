//! Exhaustive product checks.
//!
//! Every operand pair of both supported bitwidths is multiplied through the
//! greedy plan. The final stage must hold the product in row 0 alone, and
//! every intermediate stage must preserve the matrix value.

use multiplied::{Algorithm, Matrix};

fn greedy(bits: usize) -> Algorithm {
    let mut algorithm = Algorithm::new(bits).unwrap();
    algorithm.auto_resolve_stage(true).unwrap();
    algorithm
}

fn check_pair(algorithm: &mut Algorithm, a: u32, b: u32) {
    let expected = u64::from(a) * u64::from(b);
    let trace = algorithm.exec(a, b).unwrap();
    for (stage, matrix) in &trace {
        assert_eq!(matrix.value(), expected, "{a}*{b} at stage {stage}");
    }
    let last = trace.values().last().unwrap();
    assert_eq!(last.row_value(0), expected, "{a}*{b}");
    assert!(
        (1..last.bits().bits()).all(|row| last.row_value(row) == 0),
        "{a}*{b} left bits outside row 0"
    );
}

// ============================================================================
// 4-bit
// ============================================================================

#[test]
fn four_bit_all_pairs() {
    let mut algorithm = greedy(4);
    for a in 1..=15 {
        for b in 1..=15 {
            check_pair(&mut algorithm, a, b);
        }
    }
}

#[test]
fn four_bit_trace_has_one_entry_per_stage() {
    let mut algorithm = greedy(4);
    let trace = algorithm.exec(15, 15).unwrap();
    assert_eq!(trace.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    assert_eq!(trace[&0], Matrix::from_operands(4, 15, 15).unwrap());
}

// ============================================================================
// 8-bit
// ============================================================================

#[test]
fn eight_bit_all_pairs() {
    let mut algorithm = greedy(8);
    for a in 1..=255 {
        for b in 1..=255 {
            check_pair(&mut algorithm, a, b);
        }
    }
}

#[test]
fn plan_is_reusable_across_calls() {
    let mut algorithm = greedy(8);
    let first = algorithm.exec(200, 3).unwrap();
    algorithm.exec(17, 99).unwrap();
    let again = algorithm.exec(200, 3).unwrap();
    assert_eq!(first, again);
    assert_eq!(algorithm.state(), 0);
}
