use std::collections::BTreeMap;

use assess_core::charts::{
    BarLayout, BarPoint, BarScale, LineLayout, PieEntry, PieLayout, bar_layout, pie_layout,
};
use assess_core::model::ActivityRecord;

use super::result_vm::score_trend;

/// Slice colours, cycled when there are more languages than entries.
pub const PALETTE: [&str; 8] = [
    "#4f46e5", "#0ea5e9", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#14b8a6", "#f97316",
];

#[derive(Clone, Debug, PartialEq)]
pub struct AnalyticsVm {
    pub total_sessions: usize,
    pub average_label: Option<String>,
    pub languages: PieLayout,
    pub language_scores: BarLayout,
    pub trend: LineLayout,
}

#[derive(Default)]
struct LanguageStats {
    sessions: u32,
    scored: u32,
    score_sum: u32,
}

impl AnalyticsVm {
    /// `history` is the activity log, oldest first.
    #[must_use]
    pub fn new(history: &[ActivityRecord]) -> Self {
        let mut by_language: BTreeMap<&str, LanguageStats> = BTreeMap::new();
        for record in history {
            let stats = by_language.entry(record.language.as_str()).or_default();
            stats.sessions += 1;
            if record.kind.is_scored() {
                stats.scored += 1;
                stats.score_sum += u32::from(record.score);
            }
        }

        let pie_entries: Vec<PieEntry> = by_language
            .iter()
            .enumerate()
            .map(|(i, (language, stats))| {
                PieEntry::new(
                    *language,
                    f64::from(stats.sessions),
                    PALETTE[i % PALETTE.len()],
                )
            })
            .collect();

        let bar_points: Vec<BarPoint> = by_language
            .iter()
            .filter(|(_, stats)| stats.scored > 0)
            .map(|(language, stats)| {
                BarPoint::new(
                    *language,
                    f64::from(stats.score_sum) / f64::from(stats.scored),
                )
            })
            .collect();

        let (scored, score_sum) = by_language
            .values()
            .fold((0, 0), |(n, sum), stats| (n + stats.scored, sum + stats.score_sum));
        let average_label = (scored > 0).then(|| {
            format!("{:.0}%", f64::from(score_sum) / f64::from(scored))
        });

        Self {
            total_sessions: history.len(),
            average_label,
            languages: pie_layout(&pie_entries),
            language_scores: bar_layout(&bar_points, &BarScale::Derived),
            trend: score_trend(history),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_sessions == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assess_core::model::ActivityKind;
    use assess_core::time::fixed_now;

    fn record(kind: ActivityKind, language: &str, score: u8) -> ActivityRecord {
        ActivityRecord::new(kind, language, score, fixed_now())
    }

    #[test]
    fn empty_history_has_empty_charts() {
        let vm = AnalyticsVm::new(&[]);
        assert!(vm.is_empty());
        assert!(vm.average_label.is_none());
        assert_eq!(vm.languages, PieLayout::Empty);
        assert_eq!(vm.language_scores, BarLayout::Empty);
        assert_eq!(vm.trend, LineLayout::Empty);
    }

    #[test]
    fn groups_sessions_by_language() {
        let vm = AnalyticsVm::new(&[
            record(ActivityKind::Quiz, "Rust", 80),
            record(ActivityKind::Assessment, "Rust", 60),
            record(ActivityKind::Quiz, "Go", 90),
            record(ActivityKind::Other, "Go", 0),
            record(ActivityKind::Other, "Go", 0),
        ]);
        assert_eq!(vm.total_sessions, 5);
        assert_eq!(vm.average_label.as_deref(), Some("77%"));

        let PieLayout::Slices(slices) = &vm.languages else {
            panic!("expected slices");
        };
        assert_eq!(slices[0].name, "Go");
        assert!((slices[0].fraction - 0.6).abs() < 1e-9);

        let BarLayout::Bars { bars, .. } = &vm.language_scores else {
            panic!("expected bars");
        };
        let averages: Vec<_> = bars.iter().map(|b| (b.label.as_str(), b.value)).collect();
        assert_eq!(averages, vec![("Go", 90.0), ("Rust", 70.0)]);
        assert_eq!(vm.trend.points().len(), 3);
    }
}
