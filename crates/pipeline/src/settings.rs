use std::path::PathBuf;
use std::time::Duration;

use pakar_core::{Config, PromptTemplate};
use pakar_ingest::ChunkConfig;

use crate::error::PipelineError;

/// Where the two corpora are read from.
#[derive(Debug, Clone)]
pub struct SourceSettings {
    pub docs_dir: PathBuf,
    pub qa_file: PathBuf,
    /// Lowercase file extensions to index, without the dot.
    pub extensions: Vec<String>,
}

/// Everything the pipeline needs besides its collaborators.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub sources: SourceSettings,
    pub chunking: ChunkConfig,
    pub doc_top_k: usize,
    pub qa_top_k: usize,
    pub template: PromptTemplate,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Upper bound for each query-time embedding or generation call.
    pub request_timeout: Duration,
    /// Upper bound for embedding each corpus during the build.
    pub build_timeout: Duration,
}

impl PipelineSettings {
    /// Defaults for a given pair of sources.
    pub fn new(docs_dir: impl Into<PathBuf>, qa_file: impl Into<PathBuf>) -> Self {
        Self {
            sources: SourceSettings {
                docs_dir: docs_dir.into(),
                qa_file: qa_file.into(),
                extensions: vec!["pdf".to_string(), "pptx".to_string()],
            },
            chunking: ChunkConfig::default(),
            doc_top_k: 2,
            qa_top_k: 1,
            template: PromptTemplate::default(),
            temperature: 0.1,
            max_tokens: 2048,
            request_timeout: Duration::from_secs(60),
            build_timeout: Duration::from_secs(600),
        }
    }

    /// Read settings from config, loading the prompt template file if one is set.
    pub fn from_config(config: &Config) -> Result<Self, PipelineError> {
        let chunking = ChunkConfig::new(config.corpus.chunk_size, config.corpus.chunk_overlap);
        chunking
            .validate()
            .map_err(|e| PipelineError::Config(e.to_string()))?;
        if config.timeouts.request_secs == 0 {
            return Err(PipelineError::Config("REQUEST_TIMEOUT_SECS must be at least 1".into()));
        }
        if config.timeouts.build_secs == 0 {
            return Err(PipelineError::Config("BUILD_TIMEOUT_SECS must be at least 1".into()));
        }

        Ok(Self {
            sources: SourceSettings {
                docs_dir: config.corpus.docs_dir.clone(),
                qa_file: config.corpus.qa_file.clone(),
                extensions: config.corpus.extensions.clone(),
            },
            chunking,
            doc_top_k: config.retrieval.doc_top_k,
            qa_top_k: config.retrieval.qa_top_k,
            template: PromptTemplate::resolve(config.prompt_file.as_deref())?,
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
            request_timeout: config.timeouts.request(),
            build_timeout: config.timeouts.build(),
        })
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_build_timeout(mut self, timeout: Duration) -> Self {
        self.build_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_values_flow_through() {
        let mut config = Config::for_profile("");
        config.corpus.chunk_size = 1000;
        config.corpus.chunk_overlap = 100;
        config.retrieval.doc_top_k = 4;
        config.prompt_file = None;

        let settings = PipelineSettings::from_config(&config).unwrap();
        assert_eq!(settings.chunking, ChunkConfig::new(1000, 100));
        assert_eq!(settings.doc_top_k, 4);
        assert_eq!(settings.template, PromptTemplate::default());
        assert_eq!(settings.request_timeout, config.timeouts.request());
        assert_eq!(settings.build_timeout, config.timeouts.build());
    }

    #[test]
    fn invalid_chunking_is_a_config_error() {
        let mut config = Config::for_profile("");
        config.corpus.chunk_size = 100;
        config.corpus.chunk_overlap = 100;
        assert!(matches!(
            PipelineSettings::from_config(&config),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn zero_timeouts_are_rejected() {
        let mut config = Config::for_profile("");
        config.prompt_file = None;
        config.timeouts.request_secs = 0;
        assert!(matches!(
            PipelineSettings::from_config(&config),
            Err(PipelineError::Config(msg)) if msg.contains("REQUEST_TIMEOUT_SECS")
        ));

        config.timeouts.request_secs = 60;
        config.timeouts.build_secs = 0;
        assert!(matches!(
            PipelineSettings::from_config(&config),
            Err(PipelineError::Config(msg)) if msg.contains("BUILD_TIMEOUT_SECS")
        ));
    }
}
