//! Direct completion over the course name.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Answer, ChatEntry, Course, RetrievalStrategy};
use crate::domain::ports::{CompletionClient, CompletionRequest, Retriever};

/// Asks the model directly, without retrieved context
pub struct LlmRetriever {
    client: Arc<dyn CompletionClient>,
    max_tokens: u32,
    temperature: f32,
}

impl LlmRetriever {
    pub fn new(client: Arc<dyn CompletionClient>, max_tokens: u32, temperature: f32) -> Self {
        Self {
            client,
            max_tokens,
            temperature,
        }
    }
}

pub(crate) fn course_prompt(course: &str, question: &str) -> String {
    format!("Answer the following question based on the course '{course}': {question}")
}

#[async_trait]
impl Retriever for LlmRetriever {
    fn strategy(&self) -> RetrievalStrategy {
        RetrievalStrategy::Llm
    }

    async fn answer(&self, course: &Course, question: &str, _history: &[ChatEntry]) -> DomainResult<Answer> {
        let request = CompletionRequest::prompt(course_prompt(&course.name, question))
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature);
        let text = self.client.complete(request).await?;
        Ok(Answer::matched(RetrievalStrategy::Llm, text.trim()))
    }
}
