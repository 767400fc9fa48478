use assess_core::charts::{BarLayout, LineLayout, PieLayout};
use dioxus::prelude::*;

use crate::vm::{
    PIE_RADIUS, PLOT_HEIGHT, PLOT_WIDTH, bar_rect, line_geometry, score_tick_lines, slice_path,
    tick_lines,
};

const AXIS_GUTTER: f64 = 28.0;
const LABEL_BAND: f64 = 20.0;

#[component]
pub fn PieChart(title: &'static str, layout: PieLayout) -> Element {
    let PieLayout::Slices(slices) = layout else {
        return rsx! {
            div { class: "chart",
                h3 { "{title}" }
                p { class: "chart-empty", "No data yet." }
            }
        };
    };
    let paths: Vec<_> = slices.iter().map(slice_path).collect();
    let size = PIE_RADIUS * 2.0;

    rsx! {
        div { class: "chart chart--pie",
            h3 { "{title}" }
            svg {
                width: "{size}",
                height: "{size}",
                view_box: "0 0 {size} {size}",
                for slice in paths.iter() {
                    path { d: "{slice.d}", fill: "{slice.color}" }
                }
            }
            ul { class: "legend",
                for slice in paths {
                    li {
                        span { class: "legend-swatch", style: "background: {slice.color}" }
                        "{slice.legend}"
                    }
                }
            }
        }
    }
}

#[component]
pub fn BarChart(title: &'static str, layout: BarLayout) -> Element {
    let BarLayout::Bars { bars, ticks } = layout else {
        return rsx! {
            div { class: "chart",
                h3 { "{title}" }
                p { class: "chart-empty", "No data yet." }
            }
        };
    };
    let rects: Vec<_> = bars.iter().map(bar_rect).collect();
    let grid = tick_lines(&ticks);
    let width = PLOT_WIDTH + AXIS_GUTTER;
    let height = PLOT_HEIGHT + LABEL_BAND;
    let label_y = PLOT_HEIGHT + 14.0;

    rsx! {
        div { class: "chart chart--bar",
            h3 { "{title}" }
            svg {
                width: "{width}",
                height: "{height}",
                view_box: "-{AXIS_GUTTER} 0 {width} {height}",
                for tick in grid {
                    line { class: "chart-grid", x1: "0", x2: "{PLOT_WIDTH}", y1: "{tick.y}", y2: "{tick.y}" }
                    text { class: "chart-label", x: "-4", y: "{tick.y}", text_anchor: "end", "{tick.label}" }
                }
                for bar in rects {
                    rect {
                        class: "chart-bar",
                        x: "{bar.x}",
                        y: "{bar.y}",
                        width: "{bar.width}",
                        height: "{bar.height}",
                    }
                    text {
                        class: "chart-label",
                        x: "{bar.label_x}",
                        y: "{label_y}",
                        text_anchor: "middle",
                        "{bar.label}"
                    }
                }
            }
        }
    }
}

/// Score line on the fixed 0-100 axis.
#[component]
pub fn LineChart(title: &'static str, layout: LineLayout) -> Element {
    if layout == LineLayout::Empty {
        return rsx! {
            div { class: "chart",
                h3 { "{title}" }
                p { class: "chart-empty", "No scored sessions yet." }
            }
        };
    }
    let geometry = line_geometry(layout.points());
    let grid = score_tick_lines();
    let width = PLOT_WIDTH + AXIS_GUTTER;
    let height = PLOT_HEIGHT + LABEL_BAND;
    let label_y = PLOT_HEIGHT + 14.0;

    rsx! {
        div { class: "chart chart--line",
            h3 { "{title}" }
            svg {
                width: "{width}",
                height: "{height}",
                view_box: "-{AXIS_GUTTER} 0 {width} {height}",
                for tick in grid {
                    line { class: "chart-grid", x1: "0", x2: "{PLOT_WIDTH}", y1: "{tick.y}", y2: "{tick.y}" }
                    text { class: "chart-label", x: "-4", y: "{tick.y}", text_anchor: "end", "{tick.label}" }
                }
                polyline { class: "chart-line", points: "{geometry.polyline}" }
                for (x, y) in geometry.dots {
                    circle { class: "chart-dot", cx: "{x}", cy: "{y}", r: "3" }
                }
                for (x, label) in geometry.labels {
                    text {
                        class: "chart-label",
                        x: "{x}",
                        y: "{label_y}",
                        text_anchor: "middle",
                        "{label}"
                    }
                }
            }
        }
    }
}
