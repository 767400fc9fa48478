use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RubricError {
    #[error("rubric criterion {criterion} out of range: {value} (expected 0-5)")]
    OutOfRange { criterion: &'static str, value: u8 },
}

//
// ─── RUBRIC ────────────────────────────────────────────────────────────────────
//

/// Five-criterion programming rubric, each scored 0-5 (total 0-25).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawRubric")]
pub struct ProgrammingRubric {
    correctness: u8,
    efficiency: u8,
    code_quality: u8,
    edge_cases: u8,
    best_practices: u8,
}

impl ProgrammingRubric {
    pub const MAX_PER_CRITERION: u8 = 5;
    pub const MAX_TOTAL: u8 = 25;

    /// # Errors
    ///
    /// Returns `RubricError::OutOfRange` if any criterion exceeds 5.
    pub fn new(
        correctness: u8,
        efficiency: u8,
        code_quality: u8,
        edge_cases: u8,
        best_practices: u8,
    ) -> Result<Self, RubricError> {
        for (criterion, value) in [
            ("correctness", correctness),
            ("efficiency", efficiency),
            ("codeQuality", code_quality),
            ("edgeCases", edge_cases),
            ("bestPractices", best_practices),
        ] {
            if value > Self::MAX_PER_CRITERION {
                return Err(RubricError::OutOfRange { criterion, value });
            }
        }
        Ok(Self {
            correctness,
            efficiency,
            code_quality,
            edge_cases,
            best_practices,
        })
    }

    /// Criteria in display order with their human labels.
    #[must_use]
    pub fn criteria(&self) -> [(&'static str, u8); 5] {
        [
            ("Correctness", self.correctness),
            ("Efficiency", self.efficiency),
            ("Code quality", self.code_quality),
            ("Edge cases", self.edge_cases),
            ("Best practices", self.best_practices),
        ]
    }

    #[must_use]
    pub fn total(&self) -> u8 {
        self.criteria().iter().map(|(_, value)| value).sum()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRubric {
    correctness: u8,
    efficiency: u8,
    code_quality: u8,
    edge_cases: u8,
    best_practices: u8,
}

impl TryFrom<RawRubric> for ProgrammingRubric {
    type Error = RubricError;

    fn try_from(raw: RawRubric) -> Result<Self, Self::Error> {
        Self::new(
            raw.correctness,
            raw.efficiency,
            raw.code_quality,
            raw.edge_cases,
            raw.best_practices,
        )
    }
}

//
// ─── RESULTS ───────────────────────────────────────────────────────────────────
//

/// Per-question breakdown returned by the evaluation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedResult {
    pub question: String,
    pub user_answer: String,
    pub is_correct: bool,
    #[serde(default)]
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_solution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rubric: Option<ProgrammingRubric>,
}

/// Scored outcome of a submitted session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    #[serde(deserialize_with = "clamped_score")]
    score: u8,
    #[serde(default)]
    pub overall_feedback: String,
    #[serde(default)]
    pub detailed_results: Vec<DetailedResult>,
}

impl EvaluationResult {
    pub const MAX_SCORE: u8 = 100;

    /// Build a result, clamping `score` to 0-100.
    #[must_use]
    pub fn new(
        score: u32,
        overall_feedback: impl Into<String>,
        detailed_results: Vec<DetailedResult>,
    ) -> Self {
        Self {
            score: clamp_score(f64::from(score)),
            overall_feedback: overall_feedback.into(),
            detailed_results,
        }
    }

    #[must_use]
    pub fn score(&self) -> u8 {
        self.score
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.detailed_results.iter().filter(|r| r.is_correct).count()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, f64::from(EvaluationResult::MAX_SCORE)) as u8
}

// Services occasionally return fractional or out-of-range scores.
fn clamped_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    Ok(clamp_score(raw))
}
