//! Test body outcomes
//!
//! Test methods return [`TestOutcome`]. A failed assumption is reported as an
//! error variant of its own; deciding that it means "skipped" is left to the
//! harness.

use thiserror::Error;

/// Error returned from a test body
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TestFailure {
    #[error("{0}")]
    Failed(String),

    #[error("assumption violated: {0}")]
    AssumptionViolated(String),
}

/// Result type of every registered test method
pub type TestOutcome = Result<(), TestFailure>;

/// Signal that the rest of the test does not apply when `condition` is false
pub fn assume(condition: bool, reason: impl Into<String>) -> TestOutcome {
    if condition {
        Ok(())
    } else {
        Err(TestFailure::AssumptionViolated(reason.into()))
    }
}

/// Fail the test with `message` when `condition` is false
pub fn check(condition: bool, message: impl Into<String>) -> TestOutcome {
    if condition {
        Ok(())
    } else {
        Err(TestFailure::Failed(message.into()))
    }
}

/// Fail the test unless both values are equal
pub fn check_eq<T>(actual: T, expected: T) -> TestOutcome
where
    T: PartialEq + std::fmt::Debug,
{
    if actual == expected {
        Ok(())
    } else {
        Err(TestFailure::Failed(format!(
            "expected {expected:?}, got {actual:?}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assume() {
        assert!(assume(true, "holds").is_ok());
        assert_eq!(
            assume(false, "no FTL drive"),
            Err(TestFailure::AssumptionViolated("no FTL drive".to_string()))
        );
    }

    #[test]
    fn test_check_eq_message() {
        let err = check_eq(2, 3).unwrap_err();
        assert_eq!(err.to_string(), "expected 3, got 2");
    }
}
