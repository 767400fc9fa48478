//! SVG geometry for the chart layouts in `assess_core::charts`.
//!
//! Layout fractions are mapped into a fixed plot box; the components only
//! interpolate the strings produced here.

use std::f64::consts::TAU;

use assess_core::charts::{AxisTick, Bar, LINE_TICKS, PieSlice, PlacedPoint};

pub const PLOT_WIDTH: f64 = 320.0;
pub const PLOT_HEIGHT: f64 = 160.0;
pub const PIE_RADIUS: f64 = 80.0;

#[derive(Clone, Debug, PartialEq)]
pub struct SlicePath {
    pub d: String,
    pub color: String,
    pub legend: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BarRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label: String,
    pub label_x: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TickLine {
    pub y: f64,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineGeometry {
    pub polyline: String,
    pub dots: Vec<(f64, f64)>,
    pub labels: Vec<(f64, String)>,
}

/// Point on the pie rim; angle 0 is 12 o'clock, increasing clockwise.
fn rim(angle: f64) -> (f64, f64) {
    (
        PIE_RADIUS + PIE_RADIUS * angle.sin(),
        PIE_RADIUS - PIE_RADIUS * angle.cos(),
    )
}

#[must_use]
pub fn slice_path(slice: &PieSlice) -> SlicePath {
    let r = PIE_RADIUS;
    let d = if slice.sweep() >= TAU - 1e-9 {
        // A single arc cannot close on itself, so draw two halves.
        format!(
            "M {r} 0 A {r} {r} 0 1 1 {r} {d2} A {r} {r} 0 1 1 {r} 0 Z",
            d2 = 2.0 * r
        )
    } else {
        let (x0, y0) = rim(slice.start_angle);
        let (x1, y1) = rim(slice.end_angle);
        let large = u8::from(slice.sweep() > TAU / 2.0);
        format!("M {r} {r} L {x0:.2} {y0:.2} A {r} {r} 0 {large} 1 {x1:.2} {y1:.2} Z")
    };
    SlicePath {
        d,
        color: slice.color.clone(),
        legend: format!("{} ({})", slice.name, slice.percent_label()),
    }
}

#[must_use]
pub fn bar_rect(bar: &Bar) -> BarRect {
    let width = bar.width * PLOT_WIDTH;
    let height = bar.height * PLOT_HEIGHT;
    let label_x = bar.x_center * PLOT_WIDTH;
    BarRect {
        x: label_x - width / 2.0,
        y: PLOT_HEIGHT - height,
        width,
        height,
        label: bar.label.clone(),
        label_x,
    }
}

#[must_use]
pub fn tick_lines(ticks: &[AxisTick]) -> Vec<TickLine> {
    ticks
        .iter()
        .map(|tick| TickLine {
            y: PLOT_HEIGHT - tick.fraction * PLOT_HEIGHT,
            label: tick.label.clone(),
        })
        .collect()
}

/// Gridlines of the fixed 0-100 score axis.
#[must_use]
pub fn score_tick_lines() -> Vec<TickLine> {
    LINE_TICKS
        .iter()
        .map(|tick| TickLine {
            y: PLOT_HEIGHT - f64::from(*tick) / 100.0 * PLOT_HEIGHT,
            label: tick.to_string(),
        })
        .collect()
}

#[must_use]
pub fn line_geometry(points: &[PlacedPoint]) -> LineGeometry {
    let dots: Vec<(f64, f64)> = points
        .iter()
        .map(|p| (p.x * PLOT_WIDTH, PLOT_HEIGHT - p.y * PLOT_HEIGHT))
        .collect();
    let polyline = dots
        .iter()
        .map(|(x, y)| format!("{x:.1},{y:.1}"))
        .collect::<Vec<_>>()
        .join(" ");
    let labels = points
        .iter()
        .map(|p| (p.x * PLOT_WIDTH, p.label.clone()))
        .collect();
    LineGeometry {
        polyline,
        dots,
        labels,
    }
}
