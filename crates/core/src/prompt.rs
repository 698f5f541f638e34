//! Prompt template data.
//!
//! The instructional preamble, the few-shot block and the context labels are
//! configuration, not retrieval logic. Built-in defaults are used unless a
//! TOML file overrides some or all of the fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PakarError;

/// Labels used when the two retrieval sections are rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextLabels {
    /// Header of the Q&A-derived section.
    pub qa_header: String,
    /// Header of the document-derived section.
    pub doc_header: String,
    /// Prefix for the matched curated question.
    pub similar_question: String,
    /// Prefix for the curated answer.
    pub suggested_answer: String,
    /// Prefix placed before a document excerpt's source name.
    pub excerpt_from: String,
    /// Separator between entries of one section.
    pub entry_separator: String,
}

impl Default for ContextLabels {
    fn default() -> Self {
        Self {
            qa_header: "KONTEKS DARI JAWABAN SERUPA YANG SUDAH ADA".to_string(),
            doc_header: "KONTEKS DARI DOKUMEN HUKUM".to_string(),
            similar_question: "Pertanyaan Serupa".to_string(),
            suggested_answer: "Jawaban yang Disarankan".to_string(),
            excerpt_from: "Kutipan dari".to_string(),
            entry_separator: "\n---\n".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptTemplate {
    pub preamble: String,
    pub few_shot: String,
    pub context_open: String,
    pub context_close: String,
    pub question_intro: String,
    pub question_label: String,
    pub answer_cue: String,
    pub labels: ContextLabels,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            preamble: "Anda adalah Sistem Pakar Keimigrasian Indonesia. Jawab pertanyaan pengguna \
                       dengan akurat, jelas, dan relevan berdasarkan informasi yang tersedia.\n\
                       Prioritaskan informasi dari \"KONTEKS DARI JAWABAN SERUPA\". Gunakan \
                       \"KONTEKS DARI DOKUMEN HUKUM\" sebagai pendukung.\n\
                       Tiru gaya jawaban dari \"CONTOH CARA MENJAWAB\"."
                .to_string(),
            few_shot: "--- CONTOH CARA MENJAWAB ---\n\
                       Pertanyaan: Apa itu penjamin?\n\
                       Jawaban: Penjamin adalah orang atau korporasi yang bertanggung jawab atas \
                       keberadaan dan kegiatan Orang Asing selama berada di Wilayah Indonesia.\n\
                       --- AKHIR CONTOH ---"
                .to_string(),
            context_open: "--- KONTEKS YANG DITEMUKAN ---".to_string(),
            context_close: "--- AKHIR KONTEKS ---".to_string(),
            question_intro: "Berdasarkan semua informasi di atas, jawablah pertanyaan pengguna berikut."
                .to_string(),
            question_label: "PERTANYAAN PENGGUNA:".to_string(),
            answer_cue: "JAWABAN PAKAR:".to_string(),
            labels: ContextLabels::default(),
        }
    }
}

impl PromptTemplate {
    /// Parse a TOML template. Missing fields keep their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, PakarError> {
        toml::from_str(raw).map_err(|e| PakarError::Config(format!("prompt template: {e}")))
    }

    /// Load a TOML template from disk.
    pub fn load(path: &Path) -> Result<Self, PakarError> {
        let raw = std::fs::read_to_string(path)?;
        let template = Self::from_toml_str(&raw)?;
        tracing::info!(path = %path.display(), "loaded prompt template");
        Ok(template)
    }

    /// Load from `path` when given, otherwise use the built-in defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self, PakarError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
