/// Fixed value axis for score trends.
pub const LINE_TICKS: [u8; 5] = [0, 25, 50, 75, 100];

const SCALE_MAX: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub struct LinePoint {
    pub label: String,
    pub value: f64,
}

impl LinePoint {
    #[must_use]
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// A point placed in unit space; `y` is 0.0 at the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedPoint {
    pub label: String,
    pub value: f64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LineLayout {
    Empty,
    Points(Vec<PlacedPoint>),
}

impl LineLayout {
    #[must_use]
    pub fn points(&self) -> &[PlacedPoint] {
        match self {
            Self::Empty => &[],
            Self::Points(points) => points,
        }
    }
}

/// Place points at even horizontal intervals on a 0-100 scale.
///
/// A single point lands in the horizontal middle.
#[must_use]
pub fn line_layout(points: &[LinePoint]) -> LineLayout {
    if points.is_empty() {
        return LineLayout::Empty;
    }
    let last = points.len() - 1;
    let placed = points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let value = if point.value.is_finite() {
                point.value.clamp(0.0, SCALE_MAX)
            } else {
                0.0
            };
            #[allow(clippy::cast_precision_loss)]
            let x = if last == 0 { 0.5 } else { i as f64 / last as f64 };
            PlacedPoint {
                label: point.label.clone(),
                value,
                x,
                y: value / SCALE_MAX,
            }
        })
        .collect();
    LineLayout::Points(placed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_empty_layout() {
        assert_eq!(line_layout(&[]), LineLayout::Empty);
        assert!(LineLayout::Empty.points().is_empty());
    }

    #[test]
    fn single_point_sits_in_the_middle() {
        let layout = line_layout(&[LinePoint::new("only", 80.0)]);
        let points = layout.points();
        assert_eq!(points.len(), 1);
        assert!((points[0].x - 0.5).abs() < 1e-9);
        assert!((points[0].y - 0.8).abs() < 1e-9);
    }

    #[test]
    fn points_are_evenly_spaced_and_clamped() {
        let layout = line_layout(&[
            LinePoint::new("a", -10.0),
            LinePoint::new("b", 50.0),
            LinePoint::new("c", 140.0),
        ]);
        let xs: Vec<_> = layout.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 0.5, 1.0]);
        let ys: Vec<_> = layout.points().iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![0.0, 0.5, 1.0]);
    }
}
