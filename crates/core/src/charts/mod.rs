//! Chart layout for the results and analytics screens.
//!
//! Everything here is geometry in unit space: angles in radians for pies,
//! fractions in `0.0..=1.0` for bar and line positions. Renderers scale these
//! into whatever viewport they draw on. Datasets are small (a few dozen
//! points), so each layout is computed eagerly into a `Vec`.

mod bar;
mod line;
mod pie;

pub use bar::{Bar, BarLayout, BarPoint, BarScale, DERIVED_TICK_COUNT, MAX_BARS, bar_layout};
pub use line::{LINE_TICKS, LineLayout, LinePoint, PlacedPoint, line_layout};
pub use pie::{PieEntry, PieLayout, PieSlice, pie_layout};

/// A labelled position along a value axis; `fraction` is 0.0 at the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub label: String,
    pub fraction: f64,
}

/// Replace negative and non-finite values with zero.
pub(crate) fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
