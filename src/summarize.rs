use std::sync::Arc;

use serde::Serialize;

use crate::catalog;
use crate::error::SummaryError;
use crate::openai::CompletionClient;
use crate::parser::{self, SummaryResult};
use crate::prompt::{build_prompt, LengthTier};
use crate::render::{self, Display};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    pub reference: String,
    pub focus: String,
    pub length: LengthTier,
}

impl SummaryRequest {
    pub fn resolve(
        canon: &str,
        book: &str,
        chapter: u32,
        search: &str,
        focus: &str,
        length: &str,
    ) -> Result<Self, SummaryError> {
        let search = search.trim();
        let reference = if search.is_empty() {
            catalog::chapter_reference(catalog::find_canon(canon)?, book, chapter)?
        } else {
            search.to_string()
        };
        Ok(Self {
            reference,
            focus: focus.trim().to_string(),
            length: LengthTier::parse(length),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub result: SummaryResult,
    pub display: Display,
    pub markdown: String,
    pub file_name: String,
}

impl Summary {
    pub fn render(result: SummaryResult) -> Self {
        Self {
            display: render::to_display(&result),
            markdown: render::to_markdown(&result),
            file_name: render::export_file_name(&result),
            result,
        }
    }
}

#[derive(Clone)]
pub struct Summarizer {
    client: Arc<dyn CompletionClient>,
}

impl Summarizer {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    pub async fn summarize(&self, request: &SummaryRequest) -> Result<Summary, SummaryError> {
        let prompt = build_prompt(&request.reference, &request.focus, request.length.as_str());
        tracing::debug!(chars = prompt.len(), "prompt built");
        let raw = self.client.complete(&prompt).await?;
        let result = parser::parse(&raw)?;
        Ok(Summary::render(result))
    }
}
