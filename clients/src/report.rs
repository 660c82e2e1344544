//! Verification report types and the sequential verifier.

use multiplied::Algorithm;
use tracing::{debug, info};

/// Outcome of one verified operand pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Every stage held the product and the last stage held it in row 0.
    Pass,
    /// Execution failed or a stage lost the product.
    Failure,
}

/// Result for a single operand pair.
#[derive(Debug, Clone)]
pub struct CaseResult {
    /// Multiplicand.
    pub a: u32,
    /// Multiplier.
    pub b: u32,
    /// Human-readable message describing the outcome.
    pub message: String,
    /// Severity of the result.
    pub severity: Severity,
    /// Optional additional detail lines.
    pub details: Vec<String>,
}

impl CaseResult {
    /// Creates a passing result.
    pub fn pass(a: u32, b: u32, message: impl Into<String>) -> Self {
        Self {
            a,
            b,
            message: message.into(),
            severity: Severity::Pass,
            details: Vec::new(),
        }
    }

    /// Creates a failure result with additional detail lines.
    pub fn fail_with_details(
        a: u32,
        b: u32,
        message: impl Into<String>,
        details: Vec<String>,
    ) -> Self {
        Self {
            a,
            b,
            message: message.into(),
            severity: Severity::Failure,
            details,
        }
    }

    /// Returns true if this result represents a failure.
    pub fn is_failure(&self) -> bool {
        self.severity == Severity::Failure
    }
}

/// Aggregated results of a verification run.
#[derive(Debug, Default)]
pub struct VerificationReport {
    /// One result per verified operand pair, in scope order.
    pub results: Vec<CaseResult>,
}

impl VerificationReport {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a result to this report.
    pub fn push(&mut self, result: CaseResult) {
        self.results.push(result);
    }

    /// Returns the count of failed pairs.
    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_failure()).count()
    }

    /// Returns the count of passed pairs.
    pub fn pass_count(&self) -> usize {
        self.results.len() - self.failure_count()
    }

    /// Returns true if no pair failed.
    pub fn all_passed(&self) -> bool {
        self.failure_count() == 0
    }

    /// Failed results only.
    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> + '_ {
        self.results.iter().filter(|r| r.is_failure())
    }
}

/// Execute `algorithm` for every pair in `scope`, one after another, and
/// compare each stage against native multiplication.
pub fn verify(
    algorithm: &mut Algorithm,
    scope: impl IntoIterator<Item = (u32, u32)>,
) -> VerificationReport {
    let mut report = VerificationReport::new();
    for (a, b) in scope {
        let result = check(algorithm, a, b);
        if result.is_failure() {
            debug!(a, b, message = %result.message, "verification failure");
        }
        report.push(result);
    }
    info!(
        passed = report.pass_count(),
        failed = report.failure_count(),
        "verification finished"
    );
    report
}

fn check(algorithm: &mut Algorithm, a: u32, b: u32) -> CaseResult {
    let expected = u64::from(a) * u64::from(b);
    let trace = match algorithm.exec(a, b) {
        Ok(trace) => trace,
        Err(err) => {
            return CaseResult::fail_with_details(a, b, "execution failed", vec![err.to_string()])
        }
    };

    let mut details: Vec<String> = trace
        .iter()
        .filter(|(_, matrix)| matrix.value() != expected)
        .map(|(stage, matrix)| {
            format!("stage {stage} holds {}, expected {expected}", matrix.value())
        })
        .collect();
    if let Some(last) = trace.values().last() {
        let product = last.row_value(0);
        if product != expected {
            details.push(format!(
                "row 0 of the last stage holds {product}, expected {expected}"
            ));
        }
    }

    if details.is_empty() {
        CaseResult::pass(a, b, format!("{a} * {b} = {expected}"))
    } else {
        CaseResult::fail_with_details(a, b, format!("{a} * {b} lost the product"), details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::truth::truth_scope;

    fn greedy(bits: usize) -> Algorithm {
        let mut algorithm = Algorithm::new(bits).unwrap();
        algorithm.auto_resolve_stage(true).unwrap();
        algorithm
    }

    #[test]
    fn full_four_bit_scope_passes() {
        let mut algorithm = greedy(4);
        let report = verify(&mut algorithm, truth_scope((1, 15), (1, 225)).unwrap());
        assert_eq!(report.results.len(), 225);
        assert!(report.all_passed());
        assert_eq!(report.pass_count(), 225);
    }

    #[test]
    fn incomplete_plans_fail_on_row_zero() {
        let mut algorithm = Algorithm::new(4).unwrap();
        algorithm.auto_resolve_stage(false).unwrap();
        let report = verify(&mut algorithm, [(15, 15)]);
        assert_eq!(report.failure_count(), 1);
        let failure = report.failures().next().unwrap();
        assert_eq!(failure.details.len(), 1);
        assert!(failure.details[0].starts_with("row 0 of the last stage"));
    }

    #[test]
    fn execution_errors_are_recorded() {
        let mut algorithm = greedy(4);
        let report = verify(&mut algorithm, [(3, 3), (16, 1)]);
        assert_eq!(report.failure_count(), 1);
        assert_eq!(report.results[1].message, "execution failed");
        assert_eq!(report.results[1].details.len(), 1);
    }
}
