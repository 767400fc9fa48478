use std::f64::consts::TAU;

use super::sanitize;

#[derive(Debug, Clone, PartialEq)]
pub struct PieEntry {
    pub name: String,
    pub value: f64,
    pub color: String,
}

impl PieEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, value: f64, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value,
            color: color.into(),
        }
    }
}

/// One arc of the pie. Angles are radians clockwise from 12 o'clock.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub name: String,
    pub color: String,
    pub value: f64,
    pub fraction: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl PieSlice {
    #[must_use]
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    #[must_use]
    pub fn percent_label(&self) -> String {
        format!("{:.0}%", self.fraction * 100.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PieLayout {
    /// Nothing to draw: no entries, or all values are zero.
    Empty,
    Slices(Vec<PieSlice>),
}

/// Lay out pie slices largest-first, each spanning `value / total` of a full turn.
///
/// ```
/// use assess_core::charts::{PieEntry, PieLayout, pie_layout};
///
/// let layout = pie_layout(&[PieEntry::new("Rust", 1.0, "#f74c00"), PieEntry::new("Go", 3.0, "#00add8")]);
/// let PieLayout::Slices(slices) = layout else { panic!("expected slices") };
/// assert_eq!(slices[0].name, "Go");
/// assert!((slices[0].fraction - 0.75).abs() < 1e-9);
/// ```
#[must_use]
pub fn pie_layout(entries: &[PieEntry]) -> PieLayout {
    let mut ordered: Vec<(&PieEntry, f64)> = entries
        .iter()
        .map(|entry| (entry, sanitize(entry.value)))
        .filter(|(_, value)| *value > 0.0)
        .collect();
    let total: f64 = ordered.iter().map(|(_, value)| value).sum();
    if ordered.is_empty() || total <= 0.0 {
        return PieLayout::Empty;
    }

    ordered.sort_by(|a, b| b.1.total_cmp(&a.1));

    let last = ordered.len() - 1;
    let mut cursor = 0.0;
    let slices = ordered
        .into_iter()
        .enumerate()
        .map(|(i, (entry, value))| {
            let fraction = value / total;
            let start_angle = cursor;
            // Pin the final edge so rounding never leaves a gap at 12 o'clock.
            let end_angle = if i == last {
                TAU
            } else {
                cursor + fraction * TAU
            };
            cursor = end_angle;
            PieSlice {
                name: entry.name.clone(),
                color: entry.color.clone(),
                value,
                fraction,
                start_angle,
                end_angle,
            }
        })
        .collect();

    PieLayout::Slices(slices)
}
