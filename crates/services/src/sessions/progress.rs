/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    /// Zero-based index of the active question.
    pub index: usize,
    pub answered: usize,
    pub is_last: bool,
}

impl SessionProgress {
    /// One-based position, for "Question 2 of 5" labels.
    #[must_use]
    pub fn position(&self) -> usize {
        self.index + 1
    }
}
