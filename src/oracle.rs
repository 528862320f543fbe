//! Oracles: deciding whether solver output is correct.
//!
//! - **Fixed-answer**: the output must equal a known literal.
//! - **Differential**: two binaries must print the same thing for the same instance.
//!
//! Comparison is exact string equality on the trimmed output, no numeric parsing: `100` and
//! `100.0` disagree. Only [`SolverResult::Success`] is a comparable scalar unless the
//! [`AbnormalExitPolicy`] says otherwise.

use clap::ValueEnum;

use crate::invoker::SolverResult;

/// How to treat a solver that ran but exited non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AbnormalExitPolicy {
    /// The case cannot be judged; it counts as a failure.
    #[default]
    Inconclusive,
    /// Compare whatever the solver printed as if it had succeeded.
    CompareOutput,
}

/// The judgement for one test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass {
        value: String,
    },
    /// For the fixed-answer oracle `left` is the expected literal and `right` the solver output.
    /// For the differential oracle they are the first and second binary's outputs.
    Mismatch {
        left: String,
        right: String,
    },
    Inconclusive {
        reason: String,
    },
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass { .. })
    }

    /// Short upper-case label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Pass { .. } => "PASSED",
            Verdict::Mismatch { .. } => "FAILED",
            Verdict::Inconclusive { .. } => "INCONCLUSIVE",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OutcomeComparator {
    policy: AbnormalExitPolicy,
}

impl OutcomeComparator {
    pub fn new(policy: AbnormalExitPolicy) -> Self {
        Self { policy }
    }

    /// The comparable scalar in `result`, or why there is none.
    fn scalar(&self, result: SolverResult) -> Result<String, String> {
        match result {
            SolverResult::Success { output } => Ok(output),
            SolverResult::AbnormalExit { output, code } => match self.policy {
                AbnormalExitPolicy::CompareOutput => Ok(output),
                AbnormalExitPolicy::Inconclusive => Err(match code {
                    Some(code) => format!("solver exited with status {code} (output: {output:?})"),
                    None => format!("solver was terminated by a signal (output: {output:?})"),
                }),
            },
            SolverResult::LaunchFailure { reason } => Err(reason),
        }
    }

    /// Fixed-answer oracle.
    pub fn against_expected(&self, result: SolverResult, expected: &str) -> Verdict {
        match self.scalar(result) {
            Ok(actual) if actual == expected => Verdict::Pass { value: actual },
            Ok(actual) => Verdict::Mismatch {
                left: expected.to_string(),
                right: actual,
            },
            Err(reason) => Verdict::Inconclusive { reason },
        }
    }

    /// Differential oracle.
    pub fn between(&self, first: SolverResult, second: SolverResult) -> Verdict {
        match (self.scalar(first), self.scalar(second)) {
            (Ok(left), Ok(right)) if left == right => Verdict::Pass { value: left },
            (Ok(left), Ok(right)) => Verdict::Mismatch { left, right },
            (Err(reason), Ok(_)) => Verdict::Inconclusive {
                reason: format!("first solver: {reason}"),
            },
            (Ok(_), Err(reason)) => Verdict::Inconclusive {
                reason: format!("second solver: {reason}"),
            },
            (Err(first), Err(second)) => Verdict::Inconclusive {
                reason: format!("first solver: {first}; second solver: {second}"),
            },
        }
    }
}
