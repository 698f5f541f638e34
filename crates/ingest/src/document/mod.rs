pub mod chunker;
mod pdf;
mod pptx;
mod txt;

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("PDF extraction failed: {0}")]
    PdfError(String),
    #[error("PPTX extraction failed: {0}")]
    PptxError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A page (PDF) or slide (PPTX) of extracted text.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// 1-based page or slide number. For TXT/MD, always 1.
    pub page_number: usize,
    /// The extracted text content.
    pub text: String,
}

/// Result of extracting text from a document.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// Original filename.
    pub filename: String,
    /// File type: "pdf", "pptx", "txt", "md"
    pub file_type: String,
    /// Extracted pages with text.
    pub pages: Vec<PageContent>,
}

impl ExtractedDocument {
    /// Get all text concatenated.
    pub fn full_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Total character count across all pages.
    pub fn total_chars(&self) -> usize {
        self.pages.iter().map(|p| p.text.chars().count()).sum()
    }
}

/// Lowercased extension of `filename`, empty when there is none.
pub fn file_extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Extract text from file bytes based on file type.
pub fn extract_text(bytes: &[u8], filename: &str) -> Result<ExtractedDocument, ExtractionError> {
    let ext = file_extension(filename);
    let file_type = ext.as_str();

    let pages = match file_type {
        "pdf" => pdf::extract_pdf(bytes)?,
        "pptx" => pptx::extract_pptx(bytes)?,
        "txt" | "text" | "md" | "markdown" => txt::extract_txt(bytes)?,
        other => return Err(ExtractionError::UnsupportedType(other.to_string())),
    };

    Ok(ExtractedDocument {
        filename: filename.to_string(),
        file_type: file_type.to_string(),
        pages,
    })
}

/// Source of raw document text for the corpus builder.
pub trait TextExtractor: Send + Sync {
    /// Full text of the file at `path`. An empty string means "nothing usable".
    fn extract(&self, path: &Path) -> Result<String, ExtractionError>;
}

/// Reads files from disk and dispatches on their extension.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileExtractor;

impl TextExtractor for FileExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let bytes = std::fs::read(path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let doc = extract_text(&bytes, &filename)?;
        tracing::debug!(
            file = %doc.filename,
            pages = doc.pages.len(),
            chars = doc.total_chars(),
            "extracted document text"
        );
        Ok(doc.full_text())
    }
}
