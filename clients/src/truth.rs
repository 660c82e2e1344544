//! Operand scopes for truth tables.
//!
//! A scope is every operand pair `(a, b)` with both operands in an input
//! range and the product in an output range.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Invalid scope arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// A lower bound is zero.
    #[error("minimum input and output values must be greater than zero")]
    NonPositive,

    /// Input range is reversed.
    #[error("minimum input {min} greater than maximum input {max}")]
    InputOrder {
        /// Lower input bound.
        min: u32,
        /// Upper input bound.
        max: u32,
    },

    /// Output range is reversed.
    #[error("minimum output {min} greater than maximum output {max}")]
    OutputOrder {
        /// Lower output bound.
        min: u64,
        /// Upper output bound.
        max: u64,
    },

    /// No product can reach the output range.
    #[error("minimum input {min_in} greater than maximum output {max_out}")]
    Unreachable {
        /// Lower input bound.
        min_in: u32,
        /// Upper output bound.
        max_out: u64,
    },

    /// A bound does not fit the operand type.
    #[error("bound {0} does not fit an operand")]
    OperandOverflow(u64),

    /// Text is not `MIN..MAX` or `MIN..=MAX`.
    #[error("invalid range {0:?}, expected MIN..MAX")]
    Syntax(String),
}

/// Inclusive `min..=max` bounds, parsed from `MIN..MAX` or `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// Lower bound.
    pub min: u64,
    /// Upper bound, inclusive.
    pub max: u64,
}

impl Bounds {
    /// Bounds as an operand pair.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::OperandOverflow`] if a bound exceeds `u32`.
    pub fn operands(self) -> Result<(u32, u32), ScopeError> {
        let narrow =
            |value: u64| u32::try_from(value).map_err(|_| ScopeError::OperandOverflow(value));
        Ok((narrow(self.min)?, narrow(self.max)?))
    }
}

impl FromStr for Bounds {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let syntax = || ScopeError::Syntax(s.to_string());
        let (min, max) = s.split_once("..").ok_or_else(syntax)?;
        let max = max.strip_prefix('=').unwrap_or(max);
        Ok(Self {
            min: min.trim().parse().map_err(|_| syntax())?,
            max: max.trim().parse().map_err(|_| syntax())?,
        })
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.min, self.max)
    }
}

/// Operand pairs with `a, b` in `domain` and `a * b` in `range`, both
/// inclusive, ordered by `a` then `b`.
///
/// # Errors
///
/// - [`ScopeError::NonPositive`] if either lower bound is zero
/// - [`ScopeError::InputOrder`] or [`ScopeError::OutputOrder`] for a
///   reversed range
/// - [`ScopeError::Unreachable`] if the smallest operand exceeds the
///   largest product
///
/// # Example
///
/// ```
/// use multiplied_clients::truth_scope;
///
/// let pairs: Vec<_> = truth_scope((2, 4), (8, 9)).unwrap().collect();
/// assert_eq!(pairs, vec![(2, 4), (3, 3), (4, 2)]);
/// ```
pub fn truth_scope(
    domain: (u32, u32),
    range: (u64, u64),
) -> Result<impl Iterator<Item = (u32, u32)>, ScopeError> {
    let (min_in, max_in) = domain;
    let (min_out, max_out) = range;
    if min_in == 0 || min_out == 0 {
        return Err(ScopeError::NonPositive);
    }
    if min_in > max_in {
        return Err(ScopeError::InputOrder {
            min: min_in,
            max: max_in,
        });
    }
    if min_out > max_out {
        return Err(ScopeError::OutputOrder {
            min: min_out,
            max: max_out,
        });
    }
    if u64::from(min_in) > max_out {
        return Err(ScopeError::Unreachable { min_in, max_out });
    }

    Ok((min_in..=max_in).flat_map(move |a| {
        let wide = u64::from(a);
        let lower = (min_out / wide).max(u64::from(min_in));
        let upper = (max_out / wide).min(u64::from(max_in));
        (lower..=upper).filter_map(move |b| {
            let product = wide * b;
            if (min_out..=max_out).contains(&product) {
                u32::try_from(b).ok().map(|b| (a, b))
            } else {
                None
            }
        })
    }))
}
