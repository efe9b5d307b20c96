use std::fmt;
use std::str::FromStr;

/// What a batch does when one of its items fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BatchPolicy {
    /// Log the failure, skip the item, keep going.
    #[default]
    ContinueOnError,
    /// Abort the whole batch on the first failure.
    FailFast,
}

impl BatchPolicy {
    pub fn continues(self) -> bool {
        matches!(self, BatchPolicy::ContinueOnError)
    }
}

impl FromStr for BatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continue" | "continue-on-error" => Ok(BatchPolicy::ContinueOnError),
            "fail-fast" | "failfast" => Ok(BatchPolicy::FailFast),
            other => Err(format!(
                "expected `continue` or `fail-fast`, got `{}`",
                other
            )),
        }
    }
}

impl fmt::Display for BatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchPolicy::ContinueOnError => f.write_str("continue"),
            BatchPolicy::FailFast => f.write_str("fail-fast"),
        }
    }
}
