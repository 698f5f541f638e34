use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u32(profile: &str, key: &str, default: u32) -> u32 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u64(profile: &str, key: &str, default: u64) -> u64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Comma-separated list, lowercased, blanks dropped.
fn profiled_env_list(profile: &str, key: &str, default: &str) -> Vec<String> {
    profiled_env_or(profile, key, default)
        .split(',')
        .map(|s| s.trim().trim_start_matches('.').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub corpus: CorpusConfig,
    pub retrieval: RetrievalConfig,
    pub llm: LlmConfig,
    pub ollama: OllamaConfig,
    pub gemini: GeminiConfig,
    pub embedding: EmbeddingConfig,
    pub timeouts: TimeoutConfig,
    /// Optional TOML file overriding the built-in prompt template.
    pub prompt_file: Option<PathBuf>,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `PAKAR_PROFILE` env var. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("PAKAR_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            corpus: CorpusConfig::from_env_profiled(p),
            retrieval: RetrievalConfig::from_env_profiled(p),
            llm: LlmConfig::from_env_profiled(p),
            ollama: OllamaConfig::from_env_profiled(p),
            gemini: GeminiConfig::from_env_profiled(p),
            embedding: EmbeddingConfig::from_env_profiled(p),
            timeouts: TimeoutConfig::from_env_profiled(p),
            prompt_file: profiled_env_opt(p, "PROMPT_FILE").map(PathBuf::from),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  corpus:      docs_dir={}, qa_file={}, extensions={:?}",
            self.corpus.docs_dir.display(),
            self.corpus.qa_file.display(),
            self.corpus.extensions
        );
        tracing::info!(
            "  chunking:    size={}, overlap={}",
            self.corpus.chunk_size,
            self.corpus.chunk_overlap
        );
        tracing::info!(
            "  retrieval:   doc_top_k={}, qa_top_k={}",
            self.retrieval.doc_top_k,
            self.retrieval.qa_top_k
        );
        tracing::info!(
            "  llm:         provider={}, configured={}",
            self.llm.provider,
            self.llm.is_configured()
        );
        tracing::info!(
            "  embedding:   provider={}, model={}",
            self.embedding.provider,
            self.embedding.model
        );
        tracing::info!(
            "  timeouts:    request={}s, build={}s",
            self.timeouts.request_secs,
            self.timeouts.build_secs
        );
    }
}

// ── Corpus ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Flat directory holding the source documents.
    pub docs_dir: PathBuf,
    /// JSON array of `{question, answer}` items.
    pub qa_file: PathBuf,
    /// File extensions (lowercase, no dot) picked up from `docs_dir`.
    pub extensions: Vec<String>,
    /// Chunk window in characters.
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters.
    pub chunk_overlap: usize,
}

impl CorpusConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            docs_dir: PathBuf::from(profiled_env_or(p, "DOCS_DIR", "dokumen_hukum")),
            qa_file: PathBuf::from(profiled_env_or(p, "QA_FILE", "database_qa.json")),
            extensions: profiled_env_list(p, "DOC_EXTENSIONS", "pdf,pptx"),
            chunk_size: profiled_env_usize(p, "CHUNK_SIZE", 2000),
            chunk_overlap: profiled_env_usize(p, "CHUNK_OVERLAP", 400),
        }
    }
}

// ── Retrieval ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    pub doc_top_k: usize,
    pub qa_top_k: usize,
    /// Capacity of the query-embedding LRU cache (0 disables it).
    pub query_cache_size: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            doc_top_k: 2,
            qa_top_k: 1,
            query_cache_size: 256,
        }
    }
}

impl RetrievalConfig {
    fn from_env_profiled(p: &str) -> Self {
        let defaults = Self::default();
        Self {
            doc_top_k: profiled_env_usize(p, "DOC_TOP_K", defaults.doc_top_k),
            qa_top_k: profiled_env_usize(p, "QA_TOP_K", defaults.qa_top_k),
            query_cache_size: profiled_env_usize(p, "QUERY_CACHE_SIZE", defaults.query_cache_size),
        }
    }
}

// ── LLM (generation) ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "gemini", "openai", "anthropic", "ollama"
    pub provider: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl LlmConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            provider: profiled_env_or(p, "LLM_PROVIDER", "gemini"),
            openai_api_key: profiled_env_opt(p, "OPENAI_API_KEY"),
            openai_model: profiled_env_or(p, "OPENAI_MODEL", "gpt-4o"),
            openai_base_url: profiled_env_opt(p, "OPENAI_BASE_URL"),
            anthropic_api_key: profiled_env_opt(p, "ANTHROPIC_API_KEY"),
            anthropic_model: profiled_env_or(p, "ANTHROPIC_MODEL", "claude-sonnet-4-5-20250929"),
            temperature: profiled_env_or(p, "LLM_TEMPERATURE", "0.1")
                .parse()
                .unwrap_or(0.1),
            max_tokens: profiled_env_u32(p, "LLM_MAX_TOKENS", 2048),
        }
    }

    pub fn is_configured(&self) -> bool {
        match self.provider.as_str() {
            "openai" => self.openai_api_key.is_some(),
            "anthropic" | "claude" => self.anthropic_api_key.is_some(),
            // Gemini keys live in GeminiConfig; checked when the provider is built.
            "gemini" | "ollama" => true,
            _ => false,
        }
    }
}

// ── Ollama (local models) ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub url: String,
    pub model: String,
}

impl OllamaConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            url: profiled_env_or(p, "OLLAMA_URL", "http://localhost:11434"),
            model: profiled_env_or(p, "OLLAMA_MODEL", "llama3.2"),
        }
    }
}

// ── Gemini ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
}

impl GeminiConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            api_key: profiled_env_opt(p, "GOOGLE_API_KEY"),
            model: profiled_env_or(p, "GEMINI_MODEL", "gemini-1.5-flash"),
        }
    }
}

// ── Embedding ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// "gemini", "ollama", "openai"
    pub provider: String,
    pub model: String,
    /// Prepended to query texts by backends without a native task mode.
    pub query_prefix: String,
    /// Prepended to document texts by backends without a native task mode.
    pub document_prefix: String,
}

impl EmbeddingConfig {
    fn from_env_profiled(p: &str) -> Self {
        let provider = profiled_env_or(p, "EMBEDDING_PROVIDER", "gemini");
        let default_model = match provider.as_str() {
            "ollama" => "nomic-embed-text",
            "openai" => "text-embedding-3-small",
            _ => "text-embedding-004",
        };
        Self {
            model: profiled_env_or(p, "EMBEDDING_MODEL", default_model),
            query_prefix: profiled_env_or(p, "EMBEDDING_QUERY_PREFIX", "search_query: "),
            document_prefix: profiled_env_or(p, "EMBEDDING_DOCUMENT_PREFIX", "search_document: "),
            provider,
        }
    }
}

// ── Timeouts ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Upper bound for a single embedding or generation call.
    pub request_secs: u64,
    /// Upper bound for embedding a whole corpus at build time, which may
    /// take many sequential embedding requests.
    pub build_secs: u64,
}

impl TimeoutConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            request_secs: profiled_env_u64(p, "REQUEST_TIMEOUT_SECS", 60),
            build_secs: profiled_env_u64(p, "BUILD_TIMEOUT_SECS", 600),
        }
    }

    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    pub fn build(&self) -> Duration {
        Duration::from_secs(self.build_secs)
    }
}
