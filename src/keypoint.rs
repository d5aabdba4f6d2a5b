use serde::Serialize;

use crate::error::SummaryError;

pub const MAX_KEY_POINT_CHARS: usize = 220;

pub const TRANSLATIONS: &[&str] = &["KJV", "NIV", "ESV", "NRSV", "NASB", "NLT"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyPoint {
    pub text: String,
}

impl KeyPoint {
    pub fn display(&self) -> String {
        format!("{}…", self.text)
    }
}

pub fn key_point(text: &str) -> Result<KeyPoint, SummaryError> {
    if text.trim().is_empty() {
        return Err(SummaryError::EmptyInput);
    }
    let first = text.split('.').next().unwrap_or_default().trim();
    Ok(KeyPoint { text: first.chars().take(MAX_KEY_POINT_CHARS).collect() })
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
