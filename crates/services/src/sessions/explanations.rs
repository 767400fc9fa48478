use std::collections::HashMap;
use std::fmt;

/// Which auxiliary explanation the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExplanationKind {
    Clarification,
    Hint,
}

impl ExplanationKind {
    pub const ALL: [Self; 2] = [Self::Clarification, Self::Hint];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Clarification => "Clarification",
            Self::Hint => "Hint",
        }
    }
}

impl fmt::Display for ExplanationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fetch-once memo of explanations keyed by question index and kind.
///
/// Entries are never replaced or evicted within a session. At most one request
/// is outstanding at a time.
#[derive(Debug, Clone, Default)]
pub struct ExplanationCache {
    entries: HashMap<(usize, ExplanationKind), String>,
    pending: Option<(usize, ExplanationKind)>,
    last_error: Option<(usize, String)>,
}

impl ExplanationCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, index: usize, kind: ExplanationKind) -> Option<&str> {
        self.entries.get(&(index, kind)).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, index: usize, kind: ExplanationKind) -> bool {
        self.entries.contains_key(&(index, kind))
    }

    #[must_use]
    pub fn pending(&self) -> Option<(usize, ExplanationKind)> {
        self.pending
    }

    /// Message from the most recent failed request, if it was for `index`.
    #[must_use]
    pub fn error_for(&self, index: usize) -> Option<&str> {
        self.last_error
            .as_ref()
            .filter(|(failed, _)| *failed == index)
            .map(|(_, message)| message.as_str())
    }

    /// Mark a request as in flight. Returns `false` if another one already is.
    pub(crate) fn begin(&mut self, index: usize, kind: ExplanationKind) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some((index, kind));
        self.last_error = None;
        true
    }

    /// Store a response for the in-flight request. Returns `false` when the
    /// response does not match it.
    pub(crate) fn resolve(&mut self, index: usize, kind: ExplanationKind, text: String) -> bool {
        if self.pending != Some((index, kind)) {
            return false;
        }
        self.pending = None;
        self.entries.entry((index, kind)).or_insert(text);
        true
    }

    pub(crate) fn fail(&mut self, index: usize, kind: ExplanationKind, message: String) -> bool {
        if self.pending != Some((index, kind)) {
            return false;
        }
        self.pending = None;
        self.last_error = Some((index, message));
        true
    }
}
