use assess_core::model::{ActivityKind, ActivityRecord};

use super::time_fmt::format_datetime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRowVm {
    pub kind_label: &'static str,
    pub language: String,
    pub score_label: Option<String>,
    pub completed_at_str: String,
}

/// Rows for the history list, most recent first.
#[must_use]
pub fn map_history_rows(records: &[ActivityRecord]) -> Vec<HistoryRowVm> {
    records
        .iter()
        .rev()
        .map(|record| HistoryRowVm {
            kind_label: match record.kind {
                ActivityKind::Assessment => "Assessment",
                ActivityKind::Quiz => "Quiz",
                ActivityKind::Other => "Activity",
            },
            language: record.language.clone(),
            score_label: record
                .kind
                .is_scored()
                .then(|| format!("{}%", record.score)),
            completed_at_str: format_datetime(record.timestamp),
        })
        .collect()
}
