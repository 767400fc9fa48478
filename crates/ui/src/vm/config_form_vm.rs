use assess_core::model::{Difficulty, SessionConfig, SessionKind};

/// Languages offered in the picker; anything else goes through the custom field.
pub const LANGUAGE_PRESETS: [&str; 8] = [
    "Python",
    "JavaScript",
    "TypeScript",
    "Rust",
    "Go",
    "Java",
    "C++",
    "SQL",
];

/// Picker value selecting the free-text skill field.
pub const CUSTOM_LANGUAGE: &str = "custom";

/// Raw form input for a new session, as typed by the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigFormVm {
    pub kind: SessionKind,
    pub language_choice: String,
    pub custom_language: String,
    pub difficulty: Difficulty,
    pub topic: String,
    pub total: String,
    pub programming: String,
}

impl Default for ConfigFormVm {
    fn default() -> Self {
        Self {
            kind: SessionKind::Assessment,
            language_choice: LANGUAGE_PRESETS[0].to_string(),
            custom_language: String::new(),
            difficulty: Difficulty::Beginner,
            topic: String::new(),
            total: "5".to_string(),
            programming: "1".to_string(),
        }
    }
}

impl ConfigFormVm {
    #[must_use]
    pub fn uses_custom_language(&self) -> bool {
        self.language_choice == CUSTOM_LANGUAGE
    }

    fn language(&self) -> &str {
        if self.uses_custom_language() {
            self.custom_language.trim()
        } else {
            &self.language_choice
        }
    }

    /// Parse and validate the form.
    ///
    /// # Errors
    ///
    /// Returns the inline message for the first invalid field.
    pub fn build(&self) -> Result<SessionConfig, String> {
        let total = parse_count(&self.total, "Number of questions")?;
        let programming = parse_count(&self.programming, "Programming questions")?;
        let mut config = SessionConfig::new(self.kind, self.language(), self.difficulty)
            .with_counts(total, programming);
        if self.kind == SessionKind::Assessment {
            config = config.with_topic(self.topic.trim());
        }
        config.validate().map_err(|err| capitalize(&err.to_string()))?;
        Ok(config)
    }
}

fn parse_count(raw: &str, field: &str) -> Result<u32, String> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| format!("{field} must be a whole number."))
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>() + ".",
        None => String::new(),
    }
}
