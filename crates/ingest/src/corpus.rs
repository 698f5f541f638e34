//! Corpus builders.
//!
//! Turns a flat directory of source files into chunk records, and a raw list
//! of Q&A items into question/answer records. Bad inputs are skipped and
//! reported; only an entirely empty document corpus is fatal.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use pakar_core::{ChunkRecord, QaRecord};

use crate::document::chunker::{chunk_text, ChunkConfig, ChunkError};
use crate::document::{file_extension, TextExtractor};

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("no document produced any chunk; nothing to index")]
    NoCorpusData,
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid Q&A file {path}: {reason}")]
    InvalidQaFile { path: PathBuf, reason: String },
    #[error(transparent)]
    Chunk(#[from] ChunkError),
}

/// Why a source file contributed nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSkip {
    /// Extraction succeeded but produced no text.
    Empty,
    /// Extraction failed.
    ExtractionFailed(String),
}

#[derive(Debug, Clone)]
pub struct SkippedSource {
    pub source_id: String,
    pub reason: SourceSkip,
}

/// Chunk records plus the files that were left out.
#[derive(Debug, Clone, Default)]
pub struct DocumentCorpus {
    pub chunks: Vec<ChunkRecord>,
    pub skipped: Vec<SkippedSource>,
    /// Number of files that contributed at least one chunk.
    pub files_indexed: usize,
}

#[derive(Debug, Clone)]
pub struct SkippedQaItem {
    /// Position of the item in the raw list.
    pub position: usize,
    pub reason: String,
}

/// Valid Q&A records in their original order, plus rejected items.
#[derive(Debug, Clone, Default)]
pub struct QaCorpus {
    pub records: Vec<QaRecord>,
    pub skipped: Vec<SkippedQaItem>,
}

// ── Documents ───────────────────────────────────────────────────────────────

/// Files directly inside `dir` whose extension is in `extensions`, sorted by
/// name so that index positions are reproducible.
pub fn list_source_files(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, CorpusError> {
    let entries = std::fs::read_dir(dir).map_err(|source| CorpusError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry_path(dir, entry))
        .filter(|path| path.is_file())
        .filter(|path| {
            let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
            extensions.contains(&file_extension(&name))
        })
        .collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Unreadable entries are skipped with a warning instead of failing the listing.
fn entry_path(dir: &Path, entry: std::io::Result<std::fs::DirEntry>) -> Option<PathBuf> {
    match entry {
        Ok(entry) => Some(entry.path()),
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "skipping unreadable directory entry");
            None
        }
    }
}

fn source_id(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Extract, chunk and tag every file. One file failing never stops the rest.
pub fn build_document_corpus(
    files: &[PathBuf],
    extractor: &dyn TextExtractor,
    config: &ChunkConfig,
) -> Result<DocumentCorpus, CorpusError> {
    config.validate()?;
    let mut corpus = DocumentCorpus::default();

    for path in files {
        let source_id = source_id(path);

        let text = match extractor.extract(path) {
            Ok(text) => text,
            Err(e) => {
                warn!(source = %source_id, error = %e, "skipping file: extraction failed");
                corpus.skipped.push(SkippedSource {
                    source_id,
                    reason: SourceSkip::ExtractionFailed(e.to_string()),
                });
                continue;
            }
        };

        if text.trim().is_empty() {
            warn!(source = %source_id, "skipping file: no text extracted");
            corpus.skipped.push(SkippedSource {
                source_id,
                reason: SourceSkip::Empty,
            });
            continue;
        }

        let chunks = chunk_text(&text, config)?;
        info!(source = %source_id, chunks = chunks.len(), "chunked document");
        corpus.files_indexed += 1;
        corpus
            .chunks
            .extend(chunks.into_iter().map(|c| ChunkRecord {
                source_id: source_id.clone(),
                content: c.content,
            }));
    }

    if corpus.chunks.is_empty() {
        return Err(CorpusError::NoCorpusData);
    }
    Ok(corpus)
}

// ── Q&A ─────────────────────────────────────────────────────────────────────

/// Accepts both English and Indonesian field names.
#[derive(Debug, Deserialize)]
struct RawQaItem {
    #[serde(default, alias = "pertanyaan")]
    question: Option<String>,
    #[serde(default, alias = "jawaban")]
    answer: Option<String>,
}

/// Read a JSON array of Q&A items. A missing file is not fatal: the pipeline
/// runs with an empty Q&A set and says so.
pub fn load_qa_items(path: &Path) -> Result<Vec<Value>, CorpusError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "Q&A file not found; continuing without curated answers");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(CorpusError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let parsed: Value = serde_json::from_str(&raw).map_err(|e| CorpusError::InvalidQaFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    match parsed {
        Value::Array(items) => Ok(items),
        other => Err(CorpusError::InvalidQaFile {
            path: path.to_path_buf(),
            reason: format!("expected a JSON array, found {}", json_kind(&other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Keep items with a non-empty question, in order; report the rest.
pub fn build_qa_corpus(raw_items: Vec<Value>) -> QaCorpus {
    let mut corpus = QaCorpus::default();

    for (position, item) in raw_items.into_iter().enumerate() {
        let reason = match serde_json::from_value::<RawQaItem>(item) {
            Ok(RawQaItem {
                question: Some(question),
                answer,
            }) if !question.trim().is_empty() => {
                corpus.records.push(QaRecord {
                    question,
                    answer: answer.unwrap_or_default(),
                });
                continue;
            }
            Ok(_) => "missing or empty question".to_string(),
            Err(e) => format!("malformed item: {e}"),
        };

        warn!(position, reason = %reason, "skipping Q&A item");
        corpus.skipped.push(SkippedQaItem { position, reason });
    }

    info!(
        records = corpus.records.len(),
        skipped = corpus.skipped.len(),
        "built Q&A corpus"
    );
    corpus
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ExtractionError;
    use serde_json::json;
    use std::collections::HashMap;

    /// Serves canned text per file name; `None` simulates an extraction failure.
    struct FakeExtractor {
        files: HashMap<String, Option<String>>,
    }

    impl FakeExtractor {
        fn new(files: &[(&str, Option<&str>)]) -> Self {
            Self {
                files: files
                    .iter()
                    .map(|(name, text)| (name.to_string(), text.map(str::to_string)))
                    .collect(),
            }
        }
    }

    impl TextExtractor for FakeExtractor {
        fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
            let name = source_id(path);
            match self.files.get(&name) {
                Some(Some(text)) => Ok(text.clone()),
                Some(None) => Err(ExtractionError::PdfError("corrupt xref table".into())),
                None => Err(ExtractionError::Io(std::io::Error::from(
                    std::io::ErrorKind::NotFound,
                ))),
            }
        }
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|n| PathBuf::from("docs").join(n)).collect()
    }

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pakar-corpus-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn failing_file_is_skipped_and_reported() {
        let extractor = FakeExtractor::new(&[
            ("a.pdf", Some("Visa kunjungan berlaku 60 hari.")),
            ("b.pdf", None),
            ("c.pptx", Some("Izin tinggal tetap.")),
        ]);
        let corpus = build_document_corpus(
            &paths(&["a.pdf", "b.pdf", "c.pptx"]),
            &extractor,
            &ChunkConfig::default(),
        )
        .unwrap();

        let sources: Vec<&str> = corpus.chunks.iter().map(|c| c.source_id.as_str()).collect();
        assert_eq!(sources, vec!["a.pdf", "c.pptx"]);
        assert_eq!(corpus.files_indexed, 2);
        assert_eq!(corpus.skipped.len(), 1);
        assert_eq!(corpus.skipped[0].source_id, "b.pdf");
        assert!(matches!(corpus.skipped[0].reason, SourceSkip::ExtractionFailed(_)));
    }

    #[test]
    fn empty_text_is_skipped_with_warning() {
        let extractor = FakeExtractor::new(&[("scan.pdf", Some("  \n ")), ("ok.pdf", Some("text"))]);
        let corpus =
            build_document_corpus(&paths(&["scan.pdf", "ok.pdf"]), &extractor, &ChunkConfig::default())
                .unwrap();
        assert_eq!(corpus.chunks.len(), 1);
        assert_eq!(corpus.skipped[0].reason, SourceSkip::Empty);
    }

    #[test]
    fn long_document_is_chunked_and_tagged() {
        let long = "Pasal tentang izin tinggal. ".repeat(200);
        let extractor = FakeExtractor::new(&[("uu.pdf", Some(long.as_str()))]);
        let corpus =
            build_document_corpus(&paths(&["uu.pdf"]), &extractor, &ChunkConfig::default()).unwrap();
        assert!(corpus.chunks.len() >= 3);
        assert!(corpus.chunks.iter().all(|c| c.source_id == "uu.pdf"));
        assert!(corpus.chunks.iter().all(|c| c.content.chars().count() <= 2000));
    }

    #[test]
    fn no_chunks_at_all_is_fatal() {
        let extractor = FakeExtractor::new(&[("a.pdf", None), ("b.pdf", Some(""))]);
        let err = build_document_corpus(&paths(&["a.pdf", "b.pdf"]), &extractor, &ChunkConfig::default())
            .unwrap_err();
        assert!(matches!(err, CorpusError::NoCorpusData));

        let err = build_document_corpus(&[], &extractor, &ChunkConfig::default()).unwrap_err();
        assert!(matches!(err, CorpusError::NoCorpusData));
    }

    #[test]
    fn invalid_chunk_config_is_rejected_up_front() {
        let extractor = FakeExtractor::new(&[("a.pdf", Some("text"))]);
        let err = build_document_corpus(&paths(&["a.pdf"]), &extractor, &ChunkConfig::new(10, 10))
            .unwrap_err();
        assert!(matches!(err, CorpusError::Chunk(_)));
    }

    #[test]
    fn list_source_files_filters_and_sorts() {
        let dir = temp_dir();
        for name in ["b.pdf", "a.PPTX", "notes.txt", "c.pdf"] {
            std::fs::write(dir.join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.join("nested.pdf")).unwrap();

        let files = list_source_files(&dir, &["pdf".to_string(), "pptx".to_string()]).unwrap();
        let names: Vec<String> = files.iter().map(|p| source_id(p)).collect();
        assert_eq!(names, vec!["a.PPTX", "b.pdf", "c.pdf"]);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn unreadable_entry_is_skipped() {
        let dir = temp_dir();
        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");
        assert!(entry_path(&dir, Err(denied)).is_none());

        std::fs::write(dir.join("a.pdf"), b"x").unwrap();
        let entry = std::fs::read_dir(&dir).unwrap().next().unwrap();
        assert_eq!(entry_path(&dir, entry), Some(dir.join("a.pdf")));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn list_source_files_missing_dir_is_io_error() {
        let dir = std::env::temp_dir().join(format!("pakar-none-{}", uuid::Uuid::new_v4()));
        assert!(matches!(list_source_files(&dir, &[]), Err(CorpusError::Io { .. })));
    }

    #[test]
    fn qa_corpus_filters_invalid_items_in_order() {
        let raw = vec![
            json!({"question": "Apa itu ITAS?", "answer": "Izin tinggal terbatas."}),
            json!({"question": "", "answer": "orphan"}),
            json!({"answer": "no question"}),
            json!({"pertanyaan": "Berapa denda overstay?", "jawaban": "Rp1.000.000 per hari"}),
            json!("not an object"),
            json!({"question": "Tanpa jawaban?"}),
        ];
        let corpus = build_qa_corpus(raw);

        let questions: Vec<&str> = corpus.records.iter().map(|r| r.question.as_str()).collect();
        assert_eq!(
            questions,
            vec!["Apa itu ITAS?", "Berapa denda overstay?", "Tanpa jawaban?"]
        );
        assert_eq!(corpus.records[1].answer, "Rp1.000.000 per hari");
        assert_eq!(corpus.records[2].answer, "");

        let skipped: Vec<usize> = corpus.skipped.iter().map(|s| s.position).collect();
        assert_eq!(skipped, vec![1, 2, 4]);
        assert!(corpus.skipped[2].reason.starts_with("malformed item"));
    }

    #[test]
    fn whitespace_question_is_rejected() {
        let corpus = build_qa_corpus(vec![json!({"question": "   ", "answer": "x"})]);
        assert!(corpus.records.is_empty());
        assert_eq!(corpus.skipped.len(), 1);
    }

    #[test]
    fn load_qa_items_reads_array() {
        let dir = temp_dir();
        let path = dir.join("qa.json");
        std::fs::write(&path, r#"[{"pertanyaan": "A?", "jawaban": "B"}]"#).unwrap();
        let items = load_qa_items(&path).unwrap();
        assert_eq!(items.len(), 1);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn load_qa_items_missing_file_is_empty() {
        let path = std::env::temp_dir().join(format!("pakar-qa-{}.json", uuid::Uuid::new_v4()));
        assert!(load_qa_items(&path).unwrap().is_empty());
    }

    #[test]
    fn load_qa_items_rejects_non_array() {
        let dir = temp_dir();
        let path = dir.join("qa.json");
        std::fs::write(&path, r#"{"question": "A?"}"#).unwrap();
        let err = load_qa_items(&path).unwrap_err();
        assert!(matches!(err, CorpusError::InvalidQaFile { .. }));
        std::fs::remove_dir_all(&dir).ok();
    }
}
