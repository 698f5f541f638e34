use super::{ExtractionError, PageContent};

pub fn extract_pdf(bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
    // pdf-extract panics on some malformed documents; treat that as a failed file.
    let text = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
        .map_err(|_| ExtractionError::PdfError("parser panicked".to_string()))?
        .map_err(|e| ExtractionError::PdfError(e.to_string()))?;
    Ok(split_pages(&text))
}

/// pdf-extract returns all text as one string; form feeds (`\x0C`) separate pages.
/// Blank pages are dropped but numbering follows the original page order.
/// A scanned PDF with no text layer yields no pages.
pub(crate) fn split_pages(text: &str) -> Vec<PageContent> {
    text.split('\x0C')
        .enumerate()
        .filter(|(_, page_text)| !page_text.trim().is_empty())
        .map(|(i, page_text)| PageContent {
            page_number: i + 1,
            text: page_text.trim().to_string(),
        })
        .collect()
}
