//! Multiplied client tooling.
//!
//! Everything outside the reduction model itself: operand scopes for truth
//! tables, sequential verification against native multiplication, settings
//! files, and logging setup for the `multiplied` binary.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod logging;
pub mod report;
pub mod settings;
pub mod truth;

pub use report::{verify, CaseResult, Severity, VerificationReport};
pub use settings::Settings;
pub use truth::{truth_scope, Bounds, ScopeError};

use multiplied::{Algorithm, Pattern};

/// Build a plan: `patterns` are pushed first, in order, then the remaining
/// stages are resolved greedily.
///
/// # Errors
///
/// Returns any error of pattern parsing, [`Algorithm::push`], or
/// [`Algorithm::auto_resolve_stage`].
pub fn build_plan(settings: &Settings, bits: usize) -> multiplied::Result<Algorithm> {
    let mut algorithm = Algorithm::with_config(bits, settings.algorithm)?;
    for text in &settings.patterns {
        let pattern: Pattern = text.parse()?;
        algorithm.push(pattern, None)?;
    }
    algorithm.auto_resolve_stage(true)?;
    Ok(algorithm)
}
