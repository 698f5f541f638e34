//! Process-lifetime orchestrator: builds both indices once, then answers
//! questions against them.

use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use pakar_core::{ChunkRecord, Config, QaRecord};
use pakar_ingest::{
    build_document_corpus, build_qa_corpus, create_embedder, list_source_files, load_qa_items,
    Embedder, FileExtractor, TextExtractor,
};
use pakar_llm::{build_prompt, create_provider, LlmProvider, Message};
use pakar_retrieval::{ContextMerger, Corpus, MergedContext};

use crate::error::PipelineError;
use crate::settings::PipelineSettings;

/// Observable lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "lowercase")]
pub enum PipelineState {
    Unbuilt,
    /// A build is in progress; queries wait for it.
    Building,
    Ready,
    Failed(String),
}

/// Counts gathered while building, available once Ready.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CorpusStats {
    pub files_indexed: usize,
    pub files_skipped: usize,
    pub chunks: usize,
    pub qa_records: usize,
    pub qa_skipped: usize,
}

/// Immutable after build; shared by every query.
struct ReadyState {
    docs: Corpus<ChunkRecord>,
    qa: Corpus<QaRecord>,
    stats: CorpusStats,
}

enum BuildState {
    Unbuilt,
    Ready(Arc<ReadyState>),
    Failed(String),
}

/// Copy of the lifecycle kept outside the build lock, so observers never
/// wait on a running build.
#[derive(Debug, Clone)]
struct StatusSnapshot {
    state: PipelineState,
    stats: Option<CorpusStats>,
}

pub struct Pipeline {
    settings: PipelineSettings,
    merger: ContextMerger,
    embedder: Arc<dyn Embedder>,
    extractor: Arc<dyn TextExtractor>,
    generator: Arc<dyn LlmProvider>,
    state: Mutex<BuildState>,
    status: RwLock<StatusSnapshot>,
}

impl Pipeline {
    pub fn new(
        settings: PipelineSettings,
        embedder: Arc<dyn Embedder>,
        extractor: Arc<dyn TextExtractor>,
        generator: Arc<dyn LlmProvider>,
    ) -> Self {
        let merger = ContextMerger::new(settings.doc_top_k, settings.qa_top_k)
            .with_labels(settings.template.labels.clone());
        Self {
            settings,
            merger,
            embedder,
            extractor,
            generator,
            state: Mutex::new(BuildState::Unbuilt),
            status: RwLock::new(StatusSnapshot {
                state: PipelineState::Unbuilt,
                stats: None,
            }),
        }
    }

    /// Wire up the configured embedding and generation backends and the
    /// on-disk extractor. Nothing is built yet.
    pub fn from_config(config: &Config) -> Result<Self, PipelineError> {
        let settings = PipelineSettings::from_config(config)?;
        let embedder = create_embedder(config)?;
        let generator = create_provider(config)?;
        Ok(Self::new(settings, embedder, Arc::new(FileExtractor), generator))
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Build both indices now instead of on the first question.
    pub async fn build(&self) -> Result<CorpusStats, PipelineError> {
        Ok(self.ensure_ready().await?.stats)
    }

    /// Grounded answer to `query`, returned verbatim from the generator.
    pub async fn answer(&self, query: &str) -> Result<String, PipelineError> {
        let ready = self.ensure_ready().await?;
        let started = Instant::now();

        let context = self.merge(&ready, query).await?;
        let prompt = build_prompt(&self.settings.template, &context.render(), query);

        let answer = self
            .timed(
                "generation",
                self.settings.request_timeout,
                self.generator.complete(
                    vec![Message::user(prompt)],
                    self.settings.temperature,
                    self.settings.max_tokens,
                ),
            )
            .await?;

        info!(
            qa_hits = context.qa_hits,
            doc_hits = context.doc_hits,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "answered query"
        );
        Ok(answer)
    }

    /// The merged retrieval context for `query`, without generation.
    pub async fn context(&self, query: &str) -> Result<MergedContext, PipelineError> {
        let ready = self.ensure_ready().await?;
        self.merge(&ready, query).await
    }

    /// Current lifecycle state. Never waits for a running build.
    pub fn state(&self) -> PipelineState {
        self.snapshot().state
    }

    /// `None` until the pipeline is Ready.
    pub fn stats(&self) -> Option<CorpusStats> {
        self.snapshot().stats
    }

    fn snapshot(&self) -> StatusSnapshot {
        self.status
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn publish(&self, state: PipelineState, stats: Option<CorpusStats>) {
        let mut status = self.status.write().unwrap_or_else(PoisonError::into_inner);
        *status = StatusSnapshot { state, stats };
    }

    async fn merge(&self, ready: &ReadyState, query: &str) -> Result<MergedContext, PipelineError> {
        self.timed(
            "retrieval",
            self.settings.request_timeout,
            self.merger
                .merge(self.embedder.as_ref(), query, &ready.docs, &ready.qa),
        )
        .await
    }

    /// The lock is held across the build, so concurrent first callers wait
    /// for one build instead of starting their own.
    async fn ensure_ready(&self) -> Result<Arc<ReadyState>, PipelineError> {
        let mut state = self.state.lock().await;
        match &*state {
            BuildState::Ready(ready) => return Ok(Arc::clone(ready)),
            BuildState::Failed(reason) => return Err(PipelineError::BuildFailed(reason.clone())),
            BuildState::Unbuilt => {}
        }

        self.publish(PipelineState::Building, None);
        match self.build_indices().await {
            Ok(ready) => {
                let ready = Arc::new(ready);
                *state = BuildState::Ready(Arc::clone(&ready));
                self.publish(PipelineState::Ready, Some(ready.stats));
                Ok(ready)
            }
            Err(e) => {
                error!(error = %e, "pipeline build failed; queries are disabled until restart");
                let reason = e.to_string();
                *state = BuildState::Failed(reason.clone());
                self.publish(PipelineState::Failed(reason), None);
                Err(e)
            }
        }
    }

    async fn build_indices(&self) -> Result<ReadyState, PipelineError> {
        let started = Instant::now();
        let sources = self.settings.sources.clone();
        let chunking = self.settings.chunking;
        let extractor = Arc::clone(&self.extractor);

        info!(
            docs_dir = %sources.docs_dir.display(),
            qa_file = %sources.qa_file.display(),
            "building corpora"
        );

        let (documents, qa) = tokio::task::spawn_blocking(move || {
            let files = list_source_files(&sources.docs_dir, &sources.extensions)?;
            info!(files = files.len(), "found source files");
            let documents = build_document_corpus(&files, extractor.as_ref(), &chunking)?;
            let qa = build_qa_corpus(load_qa_items(&sources.qa_file)?);
            Ok::<_, PipelineError>((documents, qa))
        })
        .await
        .map_err(|e| PipelineError::Task(e.to_string()))??;

        if qa.records.is_empty() {
            warn!("no Q&A records; answers will use document context only");
        }

        let stats = CorpusStats {
            files_indexed: documents.files_indexed,
            files_skipped: documents.skipped.len(),
            chunks: documents.chunks.len(),
            qa_records: qa.records.len(),
            qa_skipped: qa.skipped.len(),
        };

        let limit = self.settings.build_timeout;
        let docs = self
            .timed(
                "document indexing",
                limit,
                Corpus::build(self.embedder.as_ref(), documents.chunks),
            )
            .await?;
        let qa = self
            .timed("Q&A indexing", limit, Corpus::build(self.embedder.as_ref(), qa.records))
            .await?;

        info!(
            chunks = stats.chunks,
            files = stats.files_indexed,
            skipped_files = stats.files_skipped,
            qa_records = stats.qa_records,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "pipeline ready"
        );

        Ok(ReadyState { docs, qa, stats })
    }

    async fn timed<T, E>(
        &self,
        stage: &'static str,
        limit: Duration,
        call: impl Future<Output = Result<T, E>>,
    ) -> Result<T, PipelineError>
    where
        PipelineError: From<E>,
    {
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result.map_err(PipelineError::from),
            Err(_) => {
                warn!(stage, timeout_s = limit.as_secs_f32(), "collaborator call timed out");
                Err(PipelineError::Timeout { stage, after: limit })
            }
        }
    }
}
