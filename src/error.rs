use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error("OpenAI error: {0}")]
    Provider(String),

    #[error("OpenAI request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("could not parse the model reply as JSON: {0}")]
    Parse(String),

    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("{book} has {max} chapter(s); chapter {chapter} is out of range")]
    ChapterOutOfRange { book: String, chapter: u32, max: u32 },

    #[error("please paste some text first")]
    EmptyInput,

    #[error("a summary is already in progress for this session")]
    Busy,
}

impl SummaryError {
    // Failures of the completion round-trip itself. These clear the session result.
    pub fn is_completion_failure(&self) -> bool {
        matches!(self, Self::Provider(_) | Self::Timeout(_) | Self::Parse(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "{var} is not set. Export it in your shell or add `{var}=...` to a .env file next to the binary, then restart."
    )]
    NotConfigured { var: &'static str },

    #[error("the OpenAI client is unavailable: {0}")]
    DependencyUnavailable(String),

    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_configured_names_the_variable() {
        let err = ConfigError::NotConfigured { var: "OPENAI_API_KEY" };
        let msg = err.to_string();
        assert!(msg.contains("OPENAI_API_KEY is not set"));
        assert!(msg.contains(".env"));
    }

    #[test]
    fn dependency_message_differs_from_not_configured() {
        let err = ConfigError::DependencyUnavailable("tls backend".into());
        assert!(err.to_string().contains("unavailable"));
        assert!(!err.to_string().contains("not set"));
    }

    #[test]
    fn completion_failures() {
        assert!(SummaryError::Provider("x".into()).is_completion_failure());
        assert!(SummaryError::Timeout(Duration::from_secs(3)).is_completion_failure());
        assert!(SummaryError::Parse("x".into()).is_completion_failure());
        assert!(!SummaryError::EmptyInput.is_completion_failure());
        assert!(!SummaryError::Busy.is_completion_failure());
    }

    #[test]
    fn timeout_display() {
        let err = SummaryError::Timeout(Duration::from_secs(45));
        assert_eq!(err.to_string(), "OpenAI request timed out after 45s");
    }
}
