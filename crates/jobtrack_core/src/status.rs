/// Severity of the single status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Neutral,
    Ok,
    Error,
}

/// The one visible status line. Every write replaces the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusMessage {
    pub text: String,
    pub severity: Severity,
}

impl StatusMessage {
    pub fn neutral(text: impl Into<String>) -> Self {
        Self::with(text, Severity::Neutral)
    }

    pub fn ok(text: impl Into<String>) -> Self {
        Self::with(text, Severity::Ok)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::with(text, Severity::Error)
    }

    fn with(text: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.into(),
            severity,
        }
    }
}
