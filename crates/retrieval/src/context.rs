//! Merge policy for the two retrieval sources.
//!
//! The curated Q&A section always comes first, the document section second.
//! A source whose index is empty contributes an empty section instead of
//! failing the whole query.

use std::fmt;

use tracing::{debug, warn};

use pakar_core::{ChunkRecord, ContextLabels, QaRecord};
use pakar_ingest::Embedder;

use crate::retriever::{Corpus, RetrievalError};

/// Combined grounding context for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedContext {
    pub qa_header: String,
    pub doc_header: String,
    pub qa_section: String,
    pub doc_section: String,
    pub qa_hits: usize,
    pub doc_hits: usize,
}

impl MergedContext {
    /// `[qa header]`, Q&A entries, a blank line, `[doc header]`, excerpts.
    pub fn render(&self) -> String {
        format!(
            "[{}]\n{}\n\n[{}]\n{}",
            self.qa_header, self.qa_section, self.doc_header, self.doc_section
        )
    }

    pub fn is_empty(&self) -> bool {
        self.qa_hits == 0 && self.doc_hits == 0
    }
}

impl fmt::Display for MergedContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[derive(Debug, Clone)]
pub struct ContextMerger {
    pub doc_top_k: usize,
    pub qa_top_k: usize,
    labels: ContextLabels,
}

impl Default for ContextMerger {
    fn default() -> Self {
        Self::new(2, 1)
    }
}

impl ContextMerger {
    pub fn new(doc_top_k: usize, qa_top_k: usize) -> Self {
        Self {
            doc_top_k,
            qa_top_k,
            labels: ContextLabels::default(),
        }
    }

    pub fn with_labels(mut self, labels: ContextLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn labels(&self) -> &ContextLabels {
        &self.labels
    }

    /// Retrieve from both corpora and format the result.
    ///
    /// Embedding and search failures propagate; an index that is not ready
    /// yields an empty section.
    pub async fn merge(
        &self,
        embedder: &dyn Embedder,
        query: &str,
        docs: &Corpus<ChunkRecord>,
        qa: &Corpus<QaRecord>,
    ) -> Result<MergedContext, RetrievalError> {
        let qa_hits = tolerate_unready(qa.retrieve(embedder, query, self.qa_top_k).await, "qa")?;
        let doc_hits = tolerate_unready(docs.retrieve(embedder, query, self.doc_top_k).await, "document")?;

        let qa_section = qa_hits
            .iter()
            .map(|r| self.format_qa(r))
            .collect::<Vec<_>>()
            .join(&self.labels.entry_separator);
        let doc_section = doc_hits
            .iter()
            .map(|r| self.format_chunk(r))
            .collect::<Vec<_>>()
            .join(&self.labels.entry_separator);

        debug!(qa_hits = qa_hits.len(), doc_hits = doc_hits.len(), "merged context");

        Ok(MergedContext {
            qa_header: self.labels.qa_header.clone(),
            doc_header: self.labels.doc_header.clone(),
            qa_section,
            doc_section,
            qa_hits: qa_hits.len(),
            doc_hits: doc_hits.len(),
        })
    }

    fn format_qa(&self, record: &QaRecord) -> String {
        format!(
            "{}: {}\n{}: {}",
            self.labels.similar_question, record.question, self.labels.suggested_answer, record.answer
        )
    }

    fn format_chunk(&self, record: &ChunkRecord) -> String {
        format!("{} {}:\n{}", self.labels.excerpt_from, record.source_id, record.content)
    }
}

fn tolerate_unready<T>(result: Result<Vec<T>, RetrievalError>, source: &str) -> Result<Vec<T>, RetrievalError> {
    match result {
        Err(RetrievalError::IndexNotReady(reason)) => {
            warn!(source, %reason, "index not ready, section left empty");
            Ok(Vec::new())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{DownEmbedder, HashEmbedder};

    fn docs() -> Vec<ChunkRecord> {
        vec![
            ChunkRecord {
                source_id: "UU_6_2011.pdf".into(),
                content: "Foreigners who overstay are charged an administrative fee per day.".into(),
            },
            ChunkRecord {
                source_id: "sponsor.pptx".into(),
                content: "A guarantor is responsible for the foreigner.".into(),
            },
            ChunkRecord {
                source_id: "passport.pdf".into(),
                content: "A passport must be valid for at least six months.".into(),
            },
        ]
    }

    fn qa() -> Vec<QaRecord> {
        vec![
            QaRecord {
                question: "What is the overstay fine per day?".into(),
                answer: "IDR 1,000,000 per day.".into(),
            },
            QaRecord {
                question: "Can a visit visa be extended?".into(),
                answer: "Yes, at the immigration office.".into(),
            },
        ]
    }

    #[tokio::test]
    async fn overstay_question_pulls_both_sources() {
        let embedder = HashEmbedder::default();
        let docs = Corpus::build(&embedder, docs()).await.unwrap();
        let qa = Corpus::build(&embedder, qa()).await.unwrap();

        let merged = ContextMerger::default()
            .merge(&embedder, "What is the overstay fine per day?", &docs, &qa)
            .await
            .unwrap();

        assert_eq!(merged.qa_hits, 1);
        assert_eq!(merged.doc_hits, 2);
        assert_eq!(
            merged.qa_section,
            "Pertanyaan Serupa: What is the overstay fine per day?\nJawaban yang Disarankan: IDR 1,000,000 per day."
        );
        assert!(merged.doc_section.starts_with("Kutipan dari UU_6_2011.pdf:\n"));
        assert!(merged.doc_section.contains("\n---\n"));
    }

    #[tokio::test]
    async fn qa_section_precedes_documents() {
        let embedder = HashEmbedder::default();
        let docs = Corpus::build(&embedder, docs()).await.unwrap();
        let qa = Corpus::build(&embedder, qa()).await.unwrap();

        let rendered = ContextMerger::default()
            .merge(&embedder, "overstay fine", &docs, &qa)
            .await
            .unwrap()
            .render();

        let qa_at = rendered.find("[KONTEKS DARI JAWABAN SERUPA YANG SUDAH ADA]").unwrap();
        let doc_at = rendered.find("[KONTEKS DARI DOKUMEN HUKUM]").unwrap();
        assert_eq!(qa_at, 0);
        assert!(qa_at < doc_at);
        assert!(rendered.find("IDR 1,000,000").unwrap() < doc_at);
    }

    #[tokio::test]
    async fn empty_indices_render_both_headers() {
        let embedder = HashEmbedder::default();
        let merged = ContextMerger::default()
            .merge(&embedder, "anything", &Corpus::empty(), &Corpus::empty())
            .await
            .unwrap();

        assert!(merged.is_empty());
        assert_eq!(
            merged.render(),
            "[KONTEKS DARI JAWABAN SERUPA YANG SUDAH ADA]\n\n\n[KONTEKS DARI DOKUMEN HUKUM]\n"
        );
    }

    #[tokio::test]
    async fn missing_qa_source_still_returns_documents() {
        let embedder = HashEmbedder::default();
        let docs = Corpus::build(&embedder, docs()).await.unwrap();

        let merged = ContextMerger::default()
            .merge(&embedder, "guarantor", &docs, &Corpus::empty())
            .await
            .unwrap();
        assert_eq!(merged.qa_hits, 0);
        assert!(merged.qa_section.is_empty());
        assert!(merged.doc_section.contains("sponsor.pptx"));
    }

    #[tokio::test]
    async fn labels_are_configurable() {
        let embedder = HashEmbedder::default();
        let qa = Corpus::build(&embedder, qa()).await.unwrap();
        let labels = ContextLabels {
            qa_header: "CURATED ANSWERS".into(),
            similar_question: "Similar question".into(),
            suggested_answer: "Suggested answer".into(),
            ..ContextLabels::default()
        };

        let merged = ContextMerger::new(2, 1)
            .with_labels(labels)
            .merge(&embedder, "visit visa extended", &Corpus::empty(), &qa)
            .await
            .unwrap();
        assert!(merged.render().starts_with("[CURATED ANSWERS]\nSimilar question: Can a visit visa"));
    }

    #[tokio::test]
    async fn embedding_failure_is_not_swallowed() {
        let embedder = HashEmbedder::default();
        let docs = Corpus::build(&embedder, docs()).await.unwrap();
        let qa = Corpus::build(&embedder, qa()).await.unwrap();

        let err = ContextMerger::default()
            .merge(&DownEmbedder, "overstay", &docs, &qa)
            .await
            .unwrap_err();
        assert!(matches!(err, RetrievalError::Embedding(_)));
    }
}
