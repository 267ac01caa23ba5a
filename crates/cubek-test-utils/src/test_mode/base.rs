//! # Test Mode
//!
//! Control how kernel tests treat launch and numerical failures via the environment
//! variable `CUBE_TEST_MODE`.
//!
//! ## Modes
//! - `Correct` (default): numerical errors fail the test, launch errors are ignored.
//! - `Strict`: numerical and launch errors both fail the test.
//! - `PrintAll[:filter]`: every test fails and the selected elements are printed.
//! - `PrintFail[:filter]`: only numerical errors fail, their selected elements are printed.
//! - `FailIfRun`: a test fails only when it ran and passed, to isolate what actually runs.
//!
//! ## Filters
//! A filter is a comma-separated list with one entry per tensor dimension, each being
//! `.` (any index), `N` (one index) or `M-K` (inclusive range). For an NCHW output,
//! `.,3,0-1,.` selects the first two rows of channel 3 in every batch.
//!
//! ```bash
//! export CUBE_TEST_MODE=Strict
//! export CUBE_TEST_MODE=PrintFail:.,.,13,.
//! ```

use crate::correctness::{TensorFilter, parse_tensor_filter};

const CUBE_TEST_MODE_ENV: &str = "CUBE_TEST_MODE";

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub enum TestMode {
    #[default]
    Correct,
    Strict,
    Print {
        filter: TensorFilter,
        fail_only: bool,
    },
    FailIfRun,
}

/// What happened when a kernel test was executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    /// The kernel ran and its output was compared against the reference.
    Validated(ValidationResult),
    /// The kernel could not be prepared or launched on this device.
    LaunchError(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Pass,
    Fail(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestDecision {
    Accept,
    Reject(String),
}

impl TestDecision {
    /// Panics on rejection, so a test can end with `mode.decide(outcome).enforce()`.
    pub fn enforce(self) {
        if let TestDecision::Reject(reason) = self {
            panic!("{reason}");
        }
    }
}

impl TestMode {
    pub fn decide(&self, outcome: TestOutcome) -> TestDecision {
        use TestDecision::*;

        match (self, outcome) {
            (TestMode::FailIfRun, TestOutcome::Validated(ValidationResult::Pass)) => {
                Reject("Test passed while FailIfRun mode is active".to_string())
            }
            (TestMode::FailIfRun, _) => Accept,

            (_, TestOutcome::Validated(ValidationResult::Fail(reason))) => Reject(reason),
            (TestMode::Print { fail_only, .. }, TestOutcome::Validated(ValidationResult::Pass)) => {
                if *fail_only {
                    Accept
                } else {
                    Reject("printed".to_string())
                }
            }
            (_, TestOutcome::Validated(ValidationResult::Pass)) => Accept,

            (TestMode::Strict, TestOutcome::LaunchError(reason)) => Reject(reason),
            (TestMode::Print { fail_only: false, .. }, TestOutcome::LaunchError(reason)) => {
                Reject(reason)
            }
            (_, TestOutcome::LaunchError(_)) => Accept,
        }
    }

    pub fn should_fail_on_launch_error(&self) -> bool {
        matches!(
            self,
            TestMode::Strict
                | TestMode::Print {
                    fail_only: false,
                    ..
                }
        )
    }

    /// Filter of elements to print, if the mode prints at all.
    pub fn print_filter(&self) -> Option<(&TensorFilter, bool)> {
        match self {
            TestMode::Print { filter, fail_only } => Some((filter, *fail_only)),
            _ => None,
        }
    }
}

pub fn current_test_mode() -> TestMode {
    match std::env::var(CUBE_TEST_MODE_ENV) {
        Ok(value) => parse_test_mode(&value),
        Err(_) => TestMode::Correct,
    }
}

fn parse_test_mode(value: &str) -> TestMode {
    let value = value.to_lowercase();

    if let Some(rest) = value.strip_prefix("printall") {
        parse_print_mode(rest, false)
    } else if let Some(rest) = value.strip_prefix("printfail") {
        parse_print_mode(rest, true)
    } else {
        match value.as_str() {
            "strict" => TestMode::Strict,
            "failifrun" => TestMode::FailIfRun,
            _ => TestMode::Correct,
        }
    }
}

fn parse_print_mode(suffix: &str, fail_only: bool) -> TestMode {
    let filter = match suffix.strip_prefix(':') {
        Some(rest) => parse_tensor_filter(rest).unwrap_or_else(|err| {
            eprintln!("Invalid print filter '{rest}': {err}");
            Vec::new()
        }),
        None => Vec::new(),
    };

    TestMode::Print { filter, fail_only }
}
