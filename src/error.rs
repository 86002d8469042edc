//! Error types shared by every simulator in the crate.

use thiserror::Error;

/// Failure modes of the simulators, calculators and aggregator.
///
/// Reaching an absorbing state (zero wealth, no chickens with legs) is
/// never an error; it is recorded in the returned data instead.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SimError {
    /// A parameter is outside its domain (probability not in [0, 1],
    /// negative count, non-finite state, ...).
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        reason: String,
    },

    /// Statistics requested over zero samples.
    #[error("Cannot aggregate an empty sample set")]
    EmptyInput,
}

impl SimError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Checks that `value` is a probability in [0, 1].
pub(crate) fn check_probability(name: &'static str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(SimError::invalid(
            name,
            format!("{value} is not a probability in [0, 1]"),
        ));
    }
    Ok(())
}

/// Checks that `value` is finite and non-negative.
pub(crate) fn check_non_negative(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(SimError::invalid(
            name,
            format!("{value} must be finite and non-negative"),
        ));
    }
    Ok(())
}

pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SimError::invalid("win_probability", "1.5 is not a probability in [0, 1]");
        assert!(err.to_string().contains("win_probability"));
        assert!(err.to_string().contains("1.5"));

        assert!(SimError::EmptyInput.to_string().contains("empty"));
    }

    #[test]
    fn test_probability_bounds() {
        assert!(check_probability("p", 0.0).is_ok());
        assert!(check_probability("p", 1.0).is_ok());
        assert!(check_probability("p", -0.01).is_err());
        assert!(check_probability("p", 1.01).is_err());
        assert!(check_probability("p", f64::NAN).is_err());
    }

    #[test]
    fn test_non_negative() {
        assert!(check_non_negative("x", 0.0).is_ok());
        assert!(check_non_negative("x", -1.0).is_err());
        assert!(check_non_negative("x", f64::INFINITY).is_err());
    }
}
