mod analytics_vm;
mod chart_vm;
mod config_form_vm;
mod history_vm;
mod markdown_vm;
mod result_vm;
mod session_vm;
mod time_fmt;

pub use analytics_vm::{AnalyticsVm, PALETTE};
pub use chart_vm::{
    BarRect, LineGeometry, PIE_RADIUS, PLOT_HEIGHT, PLOT_WIDTH, SlicePath, TickLine, bar_rect,
    line_geometry, score_tick_lines, slice_path, tick_lines,
};
pub use config_form_vm::{CUSTOM_LANGUAGE, ConfigFormVm, LANGUAGE_PRESETS};
pub use history_vm::{HistoryRowVm, map_history_rows};
pub use markdown_vm::{markdown_to_html, sanitize_html};
pub use result_vm::{BreakdownRowVm, ResultVm, RubricRowVm, TREND_LIMIT, score_trend};
pub use session_vm::{
    ExplanationVm, FailureVm, OptionVm, QuestionBodyVm, QuestionVm, SampleCaseVm, SessionVm,
    TrialVm, user_message,
};
pub use time_fmt::{format_countdown, format_datetime, format_short_date};
