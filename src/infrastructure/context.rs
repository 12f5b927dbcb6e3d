//! Service wiring shared by the CLI and the HTTP server.

use std::sync::Arc;
use tracing::debug;

use crate::adapters::embeddings::OpenAiEmbeddingProvider;
use crate::adapters::json::{FsMaterialStore, JsonChatHistory, JsonCourseRepository, JsonIndexStore};
use crate::adapters::llm::OpenAiChatClient;
use crate::domain::errors::DomainResult;
use crate::domain::models::Config;
use crate::domain::ports::{CompletionClient, CourseRepository, VectorIndexStore};
use crate::infrastructure::openai::{ApiRateLimiter, RetryPolicy};
use crate::infrastructure::vector::Chunker;
use crate::services::retrieval::{LlmRetriever, RetrieverRegistry, VectorRetriever, VectorSettings};
use crate::services::{ChatService, CourseService, ResourceService};

/// Services built from one configuration
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub courses: Arc<CourseService>,
    pub chat: Arc<ChatService>,
    pub resources: Arc<ResourceService>,
}

impl AppContext {
    /// Wire JSON stores, OpenAI clients and services.
    ///
    /// No network access happens here; an API key is only required once a
    /// network strategy answers a question.
    pub fn from_config(config: Config) -> DomainResult<Self> {
        let course_repo: Arc<dyn CourseRepository> = Arc::new(JsonCourseRepository::new(
            config.storage.layout,
            config.courses_path(),
            config.storage.pretty,
        ));
        let history = Arc::new(JsonChatHistory::new(config.chat_history_path(), config.storage.pretty));
        let index_store: Arc<dyn VectorIndexStore> = Arc::new(JsonIndexStore::new(config.index_dir()));
        let materials = Arc::new(FsMaterialStore::new(config.materials_dir()));

        let retry = RetryPolicy::from_config(&config.retry);
        let limiter = ApiRateLimiter::new(config.rate_limit.requests_per_minute);

        let completion: Arc<dyn CompletionClient> = Arc::new(OpenAiChatClient::new(
            config.llm.clone(),
            retry.clone(),
            limiter.clone(),
        )?);
        let embeddings = Arc::new(OpenAiEmbeddingProvider::new(
            config.embeddings.clone(),
            &config.llm.base_url,
            config.llm.api_key.clone(),
            retry,
            limiter,
        )?);

        let mut retrievers = RetrieverRegistry::offline(config.retrieval.tfidf_threshold);
        retrievers.register(Arc::new(LlmRetriever::new(
            completion.clone(),
            config.llm.completion_max_tokens,
            config.llm.completion_temperature,
        )));
        retrievers.register(Arc::new(VectorRetriever::new(
            embeddings,
            completion,
            index_store.clone(),
            Chunker::with_config(config.retrieval.chunking.clone())?,
            VectorSettings {
                top_k: config.retrieval.top_k,
                temperature: config.llm.context_temperature,
            },
        )));

        let courses = CourseService::new(course_repo.clone()).with_index_store(index_store);
        let chat = ChatService::new(
            course_repo,
            history,
            retrievers,
            config.retrieval.default_strategy,
        )
        .with_history_turns(config.retrieval.history_turns);
        let resources = ResourceService::new(materials, config.resources.links.clone());

        debug!(
            data_dir = %config.data_dir,
            layout = %config.storage.layout,
            default_strategy = %config.retrieval.default_strategy,
            "application context ready"
        );

        Ok(Self {
            config: Arc::new(config),
            courses: Arc::new(courses),
            chat: Arc::new(chat),
            resources: Arc::new(resources),
        })
    }
}
