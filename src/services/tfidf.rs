//! TF-IDF cosine ranking of a question against course lines.
//!
//! Scoring runs on `tf-idf-vectorizer` with an engine configured for the
//! conventional lexical-retrieval defaults:
//! - tokens are lower-cased runs of two or more word characters
//! - term frequency is the raw count
//! - idf is smoothed: `ln((1 + n) / (1 + df)) + 1`
//! - similarity is the cosine of the tf-idf vectors
//!
//! The vocabulary and document frequencies are fitted on the question
//! together with the documents.

use std::sync::Arc;

use tf_idf_vectorizer::utils::datastruct::map::IndexSet;
use tf_idf_vectorizer::utils::datastruct::vector::TFVector;
use tf_idf_vectorizer::{
    Corpus, DefaultTFIDFEngine, Query, SimilarityAlgorithm, TFIDFEngine, TFIDFVectorizer, TermFrequency,
};

/// Lower-case `text` and split it into tokens of at least two word characters.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    lowered
        .split(|c: char| !is_word_char(c))
        .filter(|token| token.chars().nth(1).is_some())
        .map(str::to_string)
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Raw-count term frequency with smoothed idf.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmoothedIdfEngine;

impl TFIDFEngine<f32> for SmoothedIdfEngine {
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn idf_vec(corpus: &Corpus, term_dim_sample: &Vec<Box<str>>) -> Vec<f32> {
        let n = corpus.get_doc_num() as f64;
        term_dim_sample
            .iter()
            .map(|term| {
                let df = corpus.get_term_count(term) as f64;
                (((1.0 + n) / (1.0 + df)).ln() + 1.0) as f32
            })
            .collect()
    }

    fn tf_vec(freq: &TermFrequency, term_dim_sample: &IndexSet<Box<str>>) -> TFVector<f32> {
        <DefaultTFIDFEngine as TFIDFEngine<f32>>::tf_vec(freq, term_dim_sample)
    }

    fn tf_denorm(val: f32) -> u32 {
        <DefaultTFIDFEngine as TFIDFEngine<f32>>::tf_denorm(val)
    }
}

type LineVectorizer = TFIDFVectorizer<f32, usize, SmoothedIdfEngine>;

fn term_frequency(text: &str) -> TermFrequency {
    let mut freq = TermFrequency::new();
    freq.add_terms(&tokenize(text));
    freq
}

fn add_document(vectorizer: &mut LineVectorizer, corpus: &Corpus, key: usize, freq: &TermFrequency) {
    if freq.term_num() == 0 {
        // Token-less lines still count towards the document total.
        corpus.add_set::<&str>(&[]);
    } else {
        vectorizer.add_doc(key, freq);
    }
}

/// A ranked document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredDocument {
    pub index: usize,
    pub score: f32,
}

/// Cosine similarity of `query` against each document, in document order.
#[allow(clippy::cast_possible_truncation)]
pub fn similarity_scores<S: AsRef<str>>(query: &str, documents: &[S]) -> Vec<f32> {
    if documents.is_empty() {
        return Vec::new();
    }

    let corpus = Arc::new(Corpus::new());
    let mut vectorizer = LineVectorizer::new(Arc::clone(&corpus));

    let query_freq = term_frequency(query);
    // Documents are keyed by position; the question takes the next free key.
    add_document(&mut vectorizer, &corpus, documents.len(), &query_freq);
    for (index, document) in documents.iter().enumerate() {
        add_document(&mut vectorizer, &corpus, index, &term_frequency(document.as_ref()));
    }

    let mut scores = vec![0.0_f32; documents.len()];
    let hits = vectorizer.similarity(&SimilarityAlgorithm::CosineSimilarity, &query_freq, Some(&Query::all()));
    for hit in hits.list {
        if let Some(score) = scores.get_mut(hit.key) {
            *score = hit.score as f32;
        }
    }
    scores
}

/// The best-scoring document if its score is strictly above `threshold`.
/// Ties go to the earliest document.
pub fn best_match<S: AsRef<str>>(query: &str, documents: &[S], threshold: f32) -> Option<ScoredDocument> {
    let mut best: Option<ScoredDocument> = None;
    for (index, score) in similarity_scores(query, documents).into_iter().enumerate() {
        if best.is_none_or(|b| score > b.score) {
            best = Some(ScoredDocument { index, score });
        }
    }
    best.filter(|b| b.score > threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_scores(actual: &[f32], expected: &[f32]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-4, "score {a} differs from {e}");
        }
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("What is a CNN? It's deep_learning, 2024!"),
            vec!["what", "is", "cnn", "it", "deep_learning", "2024"]
        );
        assert!(tokenize("a b c ?").is_empty());
        assert_eq!(tokenize("Ünïcode wörds"), vec!["ünïcode", "wörds"]);
    }

    #[test]
    fn test_reference_scores_for_sample_topics() {
        let docs = [
            "Introduction to ML",
            "Supervised Learning",
            "Unsupervised Learning",
            "Neural Networks",
        ];
        let scores = similarity_scores("what is supervised learning", &docs);
        assert_scores(&scores, &[0.0, 0.595_583_8, 0.211_676_9, 0.0]);
    }

    #[test]
    fn test_reference_scores_count_repeats_and_empty_lines() {
        // "?" has no tokens but still counts as a document for idf.
        let docs = ["?", "deep deep learning", "learning"];
        let scores = similarity_scores("deep learning", &docs);
        assert_scores(&scores, &[0.0, 0.956_532_1, 0.629_227_5]);
    }

    #[test]
    fn test_best_match_picks_overlap() {
        let docs = ["Introduction to ML", "Supervised Learning", "Neural Networks"];
        let hit = best_match("what are neural networks", &docs, 0.0).unwrap();
        assert_eq!(hit.index, 2);
        assert!(hit.score > 0.0 && hit.score <= 1.0 + 1e-6);
    }

    #[test]
    fn test_best_match_requires_score_above_threshold() {
        let docs = ["CNN", "RNN"];
        assert!(best_match("explain transformers", &docs, 0.0).is_none());
        assert!(best_match("anything", &Vec::<String>::new(), 0.0).is_none());

        let hit = best_match("cnn", &docs, 0.0).unwrap();
        assert!(best_match("cnn", &docs, hit.score).is_none());
    }

    #[test]
    fn test_ties_go_to_earliest_document() {
        let docs = ["deep learning", "deep learning", "shallow"];
        let hit = best_match("deep learning", &docs, 0.0).unwrap();
        assert_eq!(hit.index, 0);
    }

    #[test]
    fn test_query_without_tokens_scores_zero() {
        let scores = similarity_scores("?!", &["CNN", "RNN"]);
        assert_scores(&scores, &[0.0, 0.0]);
    }
}
