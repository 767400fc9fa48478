use assess_core::charts::{LineLayout, LinePoint, line_layout};
use assess_core::model::{ActivityRecord, DetailedResult, EvaluationResult};

use super::time_fmt::format_short_date;

/// Number of assessment/quiz records shown in a score trend.
pub const TREND_LIMIT: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RubricRowVm {
    pub label: &'static str,
    pub score_label: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BreakdownRowVm {
    pub number: usize,
    pub question: String,
    pub user_answer: String,
    pub is_correct: bool,
    pub verdict: &'static str,
    pub explanation: String,
    pub correct_answer: Option<String>,
    pub model_solution: Option<String>,
    pub rubric: Vec<RubricRowVm>,
    pub rubric_total: Option<String>,
}

impl BreakdownRowVm {
    fn from_detail(number: usize, detail: &DetailedResult) -> Self {
        let rubric = detail
            .rubric
            .as_ref()
            .map(|rubric| {
                rubric
                    .criteria()
                    .into_iter()
                    .map(|(label, score)| RubricRowVm {
                        label,
                        score_label: format!("{score} / 5"),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            number,
            question: detail.question.clone(),
            user_answer: detail.user_answer.clone(),
            is_correct: detail.is_correct,
            verdict: if detail.is_correct { "Correct" } else { "Incorrect" },
            explanation: detail.explanation.clone(),
            correct_answer: detail.correct_answer.clone(),
            model_solution: detail.model_solution.clone(),
            rubric,
            rubric_total: detail
                .rubric
                .as_ref()
                .map(|rubric| format!("{} / 25", rubric.total())),
        }
    }
}

/// Read-only projection of an evaluation for the result page.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultVm {
    pub score_label: String,
    pub correct_label: String,
    pub feedback: String,
    pub rows: Vec<BreakdownRowVm>,
    pub trend: LineLayout,
}

impl ResultVm {
    /// `history` is the activity log, oldest first.
    #[must_use]
    pub fn new(result: &EvaluationResult, history: &[ActivityRecord]) -> Self {
        let rows: Vec<_> = result
            .detailed_results
            .iter()
            .enumerate()
            .map(|(i, detail)| BreakdownRowVm::from_detail(i + 1, detail))
            .collect();

        Self {
            score_label: format!("{}%", result.score()),
            correct_label: format!("{} of {} correct", result.correct_count(), rows.len()),
            feedback: result.overall_feedback.clone(),
            rows,
            trend: score_trend(history),
        }
    }
}

/// Line layout over the most recent scored records, most recent last.
#[must_use]
pub fn score_trend(history: &[ActivityRecord]) -> LineLayout {
    let scored: Vec<&ActivityRecord> = history.iter().filter(|r| r.kind.is_scored()).collect();
    let recent = &scored[scored.len().saturating_sub(TREND_LIMIT)..];
    let points: Vec<LinePoint> = recent
        .iter()
        .map(|record| {
            LinePoint::new(
                format_short_date(record.timestamp),
                f64::from(record.score),
            )
        })
        .collect();
    line_layout(&points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assess_core::model::{ActivityKind, ProgrammingRubric};
    use assess_core::time::fixed_now;
    use chrono::Duration;

    fn row(question: &str, correct: bool) -> DetailedResult {
        DetailedResult {
            question: question.into(),
            user_answer: "x".into(),
            is_correct: correct,
            explanation: "because".into(),
            correct_answer: None,
            model_solution: None,
            rubric: None,
        }
    }

    #[test]
    fn score_and_breakdown_labels() {
        let mut coded = row("Write fizzbuzz", false);
        coded.model_solution = Some("fn main() {}".into());
        coded.rubric = Some(ProgrammingRubric::new(4, 3, 5, 2, 4).unwrap());
        let result = EvaluationResult::new(67, "Solid", vec![row("a", true), row("b", true), coded]);

        let vm = ResultVm::new(&result, &[]);
        assert_eq!(vm.score_label, "67%");
        assert_eq!(vm.correct_label, "2 of 3 correct");
        assert_eq!(vm.rows.len(), 3);
        assert_eq!(vm.rows[2].verdict, "Incorrect");
        assert_eq!(vm.rows[2].rubric.len(), 5);
        assert_eq!(vm.rows[2].rubric_total.as_deref(), Some("18 / 25"));
        assert!(vm.rows[0].rubric.is_empty());
        assert_eq!(vm.trend, LineLayout::Empty);
    }

    #[test]
    fn trend_keeps_last_ten_scored_records() {
        let start = fixed_now();
        let mut history: Vec<_> = (0..12)
            .map(|i| {
                ActivityRecord::new(
                    ActivityKind::Quiz,
                    "Rust",
                    u8::try_from(i * 5).unwrap(),
                    start + Duration::days(i),
                )
            })
            .collect();
        history.push(ActivityRecord::new(
            ActivityKind::Other,
            "Rust",
            0,
            start + Duration::days(20),
        ));

        let trend = score_trend(&history);
        let points = trend.points();
        assert_eq!(points.len(), TREND_LIMIT);
        assert!((points[0].value - 10.0).abs() < 1e-9);
        assert!((points[9].value - 55.0).abs() < 1e-9);
        assert!((points[9].x - 1.0).abs() < 1e-9);
    }
}
