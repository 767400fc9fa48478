use dioxus::prelude::*;
use services::{InsightsError, ResultError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    NotFound,
    NoActivity,
    InsightsUnavailable,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Unknown => "Something went wrong. Please try again.",
            Self::NotFound => "That result could not be found. It may have been removed.",
            Self::NoActivity => "Complete an assessment or quiz to unlock insights.",
            Self::InsightsUnavailable => "Could not generate insights right now. Please try again.",
        }
    }

    /// Whether a retry can change the outcome.
    #[must_use]
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Unknown | Self::InsightsUnavailable)
    }
}

impl From<ResultError> for ViewError {
    fn from(err: ResultError) -> Self {
        match err {
            ResultError::NotFound(_) => Self::NotFound,
            _ => Self::Unknown,
        }
    }
}

impl From<InsightsError> for ViewError {
    fn from(err: InsightsError) -> Self {
        match err {
            InsightsError::NoActivity => Self::NoActivity,
            _ => Self::InsightsUnavailable,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assess_core::model::ResultId;

    #[test]
    fn service_errors_map_to_view_errors() {
        assert_eq!(
            ViewError::from(ResultError::NotFound(ResultId::new(3))),
            ViewError::NotFound
        );
        assert_eq!(
            ViewError::from(InsightsError::Unavailable),
            ViewError::InsightsUnavailable
        );
        assert!(ViewError::InsightsUnavailable.is_retryable());
        assert!(!ViewError::NotFound.is_retryable());
    }

    #[test]
    fn insight_messages_match_service_messages() {
        assert_eq!(
            ViewError::InsightsUnavailable.message(),
            InsightsError::Unavailable.to_string()
        );
        assert_eq!(
            ViewError::NoActivity.message(),
            InsightsError::NoActivity.to_string()
        );
    }
}
