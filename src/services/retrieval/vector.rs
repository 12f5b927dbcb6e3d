//! Retrieval-augmented answers over embedded lesson chunks.
//!
//! Lessons are chunked and embedded once per content fingerprint. The index
//! is cached on disk, so later questions only embed the question itself.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    format_transcript, Answer, AnswerSource, ChatEntry, Chunk, Course, IndexedChunk, RetrievalStrategy,
    VectorIndex,
};
use crate::domain::ports::{
    CompletionClient, CompletionRequest, EmbeddingInput, EmbeddingProvider, Retriever, VectorIndexStore,
};
use crate::infrastructure::vector::Chunker;

pub(crate) const NO_MATERIAL: &str = "Please upload course material first!";

/// Settings for [`VectorRetriever`]
#[derive(Debug, Clone, Copy)]
pub struct VectorSettings {
    pub top_k: usize,
    pub temperature: f32,
}

/// Answers from the chunks most similar to the question, via a language model
pub struct VectorRetriever {
    embeddings: Arc<dyn EmbeddingProvider>,
    completion: Arc<dyn CompletionClient>,
    index_store: Arc<dyn VectorIndexStore>,
    chunker: Chunker,
    settings: VectorSettings,
}

impl VectorRetriever {
    pub fn new(
        embeddings: Arc<dyn EmbeddingProvider>,
        completion: Arc<dyn CompletionClient>,
        index_store: Arc<dyn VectorIndexStore>,
        chunker: Chunker,
        settings: VectorSettings,
    ) -> Self {
        Self {
            embeddings,
            completion,
            index_store,
            chunker,
            settings,
        }
    }

    /// Load the cached index for `course`, rebuilding it when the lesson
    /// content or embedding model changed.
    pub async fn ensure_index(&self, course: &Course) -> DomainResult<VectorIndex> {
        let fingerprint = course.content_fingerprint();
        let model = self.embeddings.model();

        match self.index_store.load(&course.name).await {
            Ok(Some(index)) if index.is_current(&fingerprint, model) => {
                debug!(course = %course.name, chunks = index.len(), "using cached vector index");
                return Ok(index);
            }
            Ok(_) => {}
            Err(err) => warn!(course = %course.name, error = %err, "discarding unreadable vector index"),
        }

        let index = self.build_index(course, &fingerprint).await?;
        self.index_store.save(&index).await?;
        Ok(index)
    }

    async fn build_index(&self, course: &Course, fingerprint: &str) -> DomainResult<VectorIndex> {
        let chunks: Vec<Chunk> = course
            .lessons
            .iter()
            .flat_map(|lesson| {
                self.chunker
                    .split_text(&lesson.content)
                    .into_iter()
                    .map(move |content| (lesson.topic.clone(), content))
            })
            .enumerate()
            .map(|(i, (topic, content))| Chunk::new(topic, content, i))
            .collect();

        let inputs: Vec<EmbeddingInput> = chunks
            .iter()
            .map(|c| EmbeddingInput {
                id: c.id.clone(),
                text: c.content.clone(),
            })
            .collect();
        let outputs = self.embeddings.embed_batch(&inputs).await?;
        if outputs.len() != chunks.len() {
            return Err(DomainError::Embedding(format!(
                "expected {} embeddings, got {}",
                chunks.len(),
                outputs.len()
            )));
        }

        let entries = chunks
            .into_iter()
            .zip(outputs)
            .map(|(chunk, output)| IndexedChunk {
                chunk,
                vector: output.vector,
            })
            .collect::<Vec<_>>();

        info!(course = %course.name, chunks = entries.len(), model = self.embeddings.model(), "built vector index");
        Ok(VectorIndex::new(&course.name, fingerprint, self.embeddings.model(), entries))
    }
}

pub(crate) fn context_prompt(context: &str, history: &str, question: &str) -> String {
    format!(
        "You are a helpful assistant. Use the provided context and chat history to answer the user's question.\n\n\
         Context: {context}\n\
         Chat history: {history}\n\
         User question: {question}"
    )
}

#[async_trait]
impl Retriever for VectorRetriever {
    fn strategy(&self) -> RetrievalStrategy {
        RetrievalStrategy::Vector
    }

    #[instrument(skip_all, fields(course = %course.name))]
    async fn answer(&self, course: &Course, question: &str, history: &[ChatEntry]) -> DomainResult<Answer> {
        if !course.has_lesson_content() {
            return Ok(Answer::fallback(RetrievalStrategy::Vector, NO_MATERIAL));
        }

        let index = self.ensure_index(course).await?;
        let query = self.embeddings.embed(question).await?;
        let hits = index.search(&query, self.settings.top_k);

        let context = hits
            .iter()
            .map(|(entry, _)| entry.chunk.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let sources = hits
            .iter()
            .map(|(entry, score)| AnswerSource {
                label: entry.chunk.parent_id.clone(),
                excerpt: entry.chunk.preview(),
                score: Some(*score),
            })
            .collect();

        let prompt = context_prompt(&context, &format_transcript(history), question);
        let request = CompletionRequest::prompt(prompt).with_temperature(self.settings.temperature);
        let text = self.completion.complete(request).await?;

        Ok(Answer::matched(RetrievalStrategy::Vector, text.trim()).with_sources(sources))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::json::JsonIndexStore;
    use crate::domain::models::{ChunkingConfig, Lesson};
    use crate::services::retrieval::testing::{KeywordEmbeddings, RecordingCompletion};
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        embeddings: Arc<KeywordEmbeddings>,
        completion: Arc<RecordingCompletion>,
        retriever: VectorRetriever,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let embeddings = Arc::new(KeywordEmbeddings::new(&["lens", "force", "wave"]));
        let completion = Arc::new(RecordingCompletion::replying("Lenses focus light."));
        let chunker = Chunker::with_config(ChunkingConfig {
            chunk_size: 40,
            chunk_overlap: 0,
            ..ChunkingConfig::default()
        })
        .unwrap();
        let retriever = VectorRetriever::new(
            embeddings.clone(),
            completion.clone(),
            Arc::new(JsonIndexStore::new(dir.path().join("index"))),
            chunker,
            VectorSettings {
                top_k: 1,
                temperature: 0.7,
            },
        );
        Fixture {
            _dir: dir,
            embeddings,
            completion,
            retriever,
        }
    }

    fn physics() -> Course {
        let mut course = Course::new("Physics", vec!["Optics".to_string()]).unwrap();
        course.add_lesson(
            Lesson::new(
                "Optics",
                "A lens bends light toward a focus.\n\nSound is a pressure wave in air.".to_string(),
                None,
            )
            .unwrap(),
        );
        course.add_lesson(Lesson::new("Mechanics", "Force equals mass times acceleration.".to_string(), None).unwrap());
        course
    }

    #[tokio::test]
    async fn test_no_material_skips_model() {
        let f = fixture();
        let course = Course::new("Empty", vec!["Topic".to_string()]).unwrap();
        let answer = f.retriever.answer(&course, "anything", &[]).await.unwrap();
        assert!(!answer.matched);
        assert_eq!(answer.text, NO_MATERIAL);
        assert!(f.completion.last_request().is_none());
        assert_eq!(f.embeddings.calls(), 0);
    }

    #[tokio::test]
    async fn test_context_uses_nearest_chunk() {
        let f = fixture();
        let history = vec![ChatEntry::new(
            "Physics",
            "hi",
            &Answer::matched(RetrievalStrategy::Vector, "hello"),
        )];
        let answer = f
            .retriever
            .answer(&physics(), "how does a lens work", &history)
            .await
            .unwrap();

        assert!(answer.matched);
        assert_eq!(answer.text, "Lenses focus light.");
        assert_eq!(answer.sources.len(), 1);
        assert_eq!(answer.sources[0].label, "Optics");

        let request = f.completion.last_request().unwrap();
        let prompt = &request.messages[0].content;
        assert!(prompt.contains("Context: A lens bends light toward a focus."));
        assert!(!prompt.contains("pressure wave"));
        assert!(prompt.contains("Chat history: Student: hi\nTeacher: hello"));
        assert!(prompt.ends_with("User question: how does a lens work"));
        assert_eq!(request.temperature, Some(0.7));
    }

    #[tokio::test]
    async fn test_index_cached_until_content_changes() {
        let f = fixture();
        let mut course = physics();

        f.retriever.answer(&course, "lens", &[]).await.unwrap();
        let batches_after_first = f.embeddings.batch_calls();
        f.retriever.answer(&course, "force", &[]).await.unwrap();
        assert_eq!(f.embeddings.batch_calls(), batches_after_first);

        course.add_lesson(Lesson::new("Waves", "A wave carries energy.".to_string(), None).unwrap());
        let index = f.retriever.ensure_index(&course).await.unwrap();
        assert_eq!(f.embeddings.batch_calls(), batches_after_first + 1);
        assert_eq!(index.fingerprint, course.content_fingerprint());
        assert_eq!(index.len(), 4);
    }
}
