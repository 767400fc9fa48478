use super::{AxisTick, sanitize};

/// Only the most recent points are drawn.
pub const MAX_BARS: usize = 12;
pub const DERIVED_TICK_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct BarPoint {
    pub label: String,
    pub value: f64,
}

impl BarPoint {
    #[must_use]
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// How the value axis is labelled.
#[derive(Debug, Clone, PartialEq)]
pub enum BarScale {
    /// Values are positions in this label list (e.g. skill levels).
    Ordinal(Vec<String>),
    /// Numeric axis from 0 to the largest value, with four ticks.
    Derived,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    /// Horizontal center of the bar.
    pub x_center: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BarLayout {
    Empty,
    Bars { bars: Vec<Bar>, ticks: Vec<AxisTick> },
}

#[must_use]
pub fn bar_layout(points: &[BarPoint], scale: &BarScale) -> BarLayout {
    if points.is_empty() {
        return BarLayout::Empty;
    }
    let visible = &points[points.len().saturating_sub(MAX_BARS)..];

    let (ticks, axis_max) = match scale {
        BarScale::Ordinal(labels) => ordinal_ticks(labels),
        BarScale::Derived => {
            let max = visible
                .iter()
                .map(|p| sanitize(p.value))
                .fold(0.0_f64, f64::max);
            derived_ticks(max)
        }
    };

    #[allow(clippy::cast_precision_loss)]
    let slot = 1.0 / visible.len() as f64;
    let bars = visible
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let value = sanitize(point.value);
            #[allow(clippy::cast_precision_loss)]
            let x_center = (i as f64 + 0.5) * slot;
            Bar {
                label: point.label.clone(),
                value,
                x_center,
                width: slot * 0.6,
                height: (value / axis_max).clamp(0.0, 1.0),
            }
        })
        .collect();

    BarLayout::Bars { bars, ticks }
}

fn ordinal_ticks(labels: &[String]) -> (Vec<AxisTick>, f64) {
    // Value 0 is the first label, sitting on the baseline.
    let steps = labels.len().saturating_sub(1).max(1);
    #[allow(clippy::cast_precision_loss)]
    let axis_max = steps as f64;
    let ticks = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            #[allow(clippy::cast_precision_loss)]
            let fraction = if labels.len() == 1 {
                1.0
            } else {
                i as f64 / axis_max
            };
            AxisTick {
                label: label.clone(),
                fraction,
            }
        })
        .collect();
    (ticks, axis_max)
}

fn derived_ticks(max: f64) -> (Vec<AxisTick>, f64) {
    let axis_max = if max > 0.0 { max } else { 1.0 };
    #[allow(clippy::cast_precision_loss)]
    let last = (DERIVED_TICK_COUNT - 1) as f64;
    let ticks = (0..DERIVED_TICK_COUNT)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let fraction = i as f64 / last;
            AxisTick {
                label: format_tick(axis_max * fraction),
                fraction,
            }
        })
        .collect();
    (ticks, axis_max)
}

fn format_tick(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_points_render_empty_state() {
        assert_eq!(bar_layout(&[], &BarScale::Derived), BarLayout::Empty);
    }

    #[test]
    fn keeps_last_twelve_points() {
        let points: Vec<_> = (0..20)
            .map(|i| BarPoint::new(format!("p{i}"), f64::from(i)))
            .collect();
        let BarLayout::Bars { bars, .. } = bar_layout(&points, &BarScale::Derived) else {
            panic!("expected bars");
        };
        assert_eq!(bars.len(), MAX_BARS);
        assert_eq!(bars[0].label, "p8");
        assert!((bars[11].height - 1.0).abs() < 1e-9);
    }

    #[test]
    fn derived_scale_has_four_ticks_and_survives_zero_max() {
        let points = vec![BarPoint::new("a", 0.0), BarPoint::new("b", 0.0)];
        let BarLayout::Bars { bars, ticks } = bar_layout(&points, &BarScale::Derived) else {
            panic!("expected bars");
        };
        assert_eq!(ticks.len(), DERIVED_TICK_COUNT);
        assert!(bars.iter().all(|bar| bar.height == 0.0));
        assert_eq!(ticks.last().unwrap().label, "1");
    }

    #[test]
    fn derived_tick_labels_follow_max() {
        let points = vec![BarPoint::new("a", 30.0), BarPoint::new("b", 90.0)];
        let BarLayout::Bars { bars, ticks } = bar_layout(&points, &BarScale::Derived) else {
            panic!("expected bars");
        };
        let labels: Vec<_> = ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["0", "30", "60", "90"]);
        assert!((bars[0].height - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn ordinal_scale_places_values_on_labels() {
        let labels = vec![
            "Beginner".to_string(),
            "Intermediate".to_string(),
            "Advanced".to_string(),
        ];
        let points = vec![BarPoint::new("Rust", 2.0), BarPoint::new("Go", 1.0)];
        let BarLayout::Bars { bars, ticks } = bar_layout(&points, &BarScale::Ordinal(labels))
        else {
            panic!("expected bars");
        };
        assert!((bars[0].height - 1.0).abs() < 1e-9);
        assert!((bars[1].height - 0.5).abs() < 1e-9);
        assert!((ticks[1].fraction - 0.5).abs() < 1e-9);
    }

    #[test]
    fn single_bar_is_centered() {
        let BarLayout::Bars { bars, .. } =
            bar_layout(&[BarPoint::new("only", 5.0)], &BarScale::Derived)
        else {
            panic!("expected bars");
        };
        assert!((bars[0].x_center - 0.5).abs() < 1e-9);
    }
}
