mod analytics;
mod charts;
mod history;
mod home;
mod result;
mod session;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use analytics::AnalyticsView;
pub use charts::{BarChart, LineChart, PieChart};
pub use history::HistoryView;
pub use home::HomeView;
pub use result::{ResultPanel, ResultView};
pub use session::SessionView;
pub use state::{ViewError, ViewState, view_state_from_resource};
