use serde::{Deserialize, Serialize};

use crate::model::ActivityRecord;

/// Input for insight generation: who the user is and what they did.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub activities: Vec<ActivityRecord>,
}

/// AI-generated narrative about the user's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressInsights {
    pub progress_summary: String,
    #[serde(default)]
    pub language_analysis: String,
    #[serde(default)]
    pub inactivity_analysis: String,
    #[serde(default)]
    pub next_steps: Vec<String>,
}
