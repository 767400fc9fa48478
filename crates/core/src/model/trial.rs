use serde::{Deserialize, Serialize};

/// Outcome of a single test case during a trial run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseOutcome {
    pub passed: bool,
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub expected_output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_output: Option<String>,
}

/// Result of running code against a question's test cases.
///
/// Either `success` with per-case outcomes, or an `error` string (compile
/// error, timeout, service-side failure).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialRunReport {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub test_results: Vec<TestCaseOutcome>,
}

impl TrialRunReport {
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            test_results: Vec::new(),
        }
    }

    #[must_use]
    pub fn passed_count(&self) -> u32 {
        let passed = self.test_results.iter().filter(|r| r.passed).count();
        u32::try_from(passed).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn total_count(&self) -> usize {
        self.test_results.len()
    }
}
