use super::{ExtractionError, PageContent};

/// Plain text and markdown are taken as-is, one page.
pub fn extract_txt(bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
    // Try UTF-8 first, fall back to lossy conversion
    let text = String::from_utf8(bytes.to_vec())
        .unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned());

    Ok(vec![PageContent {
        page_number: 1,
        text: text.trim().to_string(),
    }])
}
