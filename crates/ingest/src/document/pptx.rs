use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use super::{ExtractionError, PageContent};

const SLIDE_PREFIX: &str = "ppt/slides/slide";

/// Extract slide text from a PowerPoint (OOXML) deck, one page per slide.
pub fn extract_pptx(bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::PptxError(format!("not a pptx archive: {e}")))?;

    // Slide entries are numbered, but zip order is arbitrary.
    let mut slides: Vec<(usize, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
        .collect();
    slides.sort_by_key(|(n, _)| *n);

    let mut pages = Vec::with_capacity(slides.len());
    for (number, name) in slides {
        let mut xml = String::new();
        archive
            .by_name(&name)
            .map_err(|e| ExtractionError::PptxError(format!("{name}: {e}")))?
            .read_to_string(&mut xml)?;

        let text = slide_text(&xml)?;
        if !text.is_empty() {
            pages.push(PageContent {
                page_number: number,
                text,
            });
        }
    }
    Ok(pages)
}

fn slide_number(entry: &str) -> Option<usize> {
    entry
        .strip_prefix(SLIDE_PREFIX)?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

/// Text runs (`<a:t>`) of one slide; each paragraph (`<a:p>`) becomes a line.
fn slide_text(xml: &str) -> Result<String, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut lines: Vec<String> = Vec::new();
    let mut paragraph = String::new();
    let mut in_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"a:t" => in_run = true,
            Ok(Event::Empty(e)) if e.name().as_ref() == b"a:br" => paragraph.push('\n'),
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"a:t" => in_run = false,
                b"a:p" => {
                    let line = paragraph.trim();
                    if !line.is_empty() {
                        lines.push(line.to_string());
                    }
                    paragraph.clear();
                }
                _ => {}
            },
            Ok(Event::Text(t)) if in_run => {
                let text = t
                    .unescape()
                    .map_err(|e| ExtractionError::PptxError(e.to_string()))?;
                paragraph.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractionError::PptxError(format!(
                    "malformed slide xml at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    let tail = paragraph.trim();
    if !tail.is_empty() {
        lines.push(tail.to_string());
    }
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn slide(paragraphs: &[&str]) -> String {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<a:p><a:r><a:t>{p}</a:t></a:r></a:p>"))
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><p:sld xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree><p:sp><p:txBody>{body}</p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#
        )
    }

    fn make_pptx(entries: &[(&str, String)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn slides_are_read_in_numeric_order() {
        let bytes = make_pptx(&[
            ("ppt/slides/slide10.xml", slide(&["Ten"])),
            ("ppt/slides/slide2.xml", slide(&["Two"])),
            ("ppt/slides/_rels/slide2.xml.rels", "<Relationships/>".to_string()),
            ("ppt/presentation.xml", "<p:presentation/>".to_string()),
        ]);
        let pages = extract_pptx(&bytes).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page_number, 2);
        assert_eq!(pages[0].text, "Two");
        assert_eq!(pages[1].page_number, 10);
    }

    #[test]
    fn paragraphs_become_lines_and_entities_are_unescaped() {
        let bytes = make_pptx(&[(
            "ppt/slides/slide1.xml",
            slide(&["Izin Tinggal Terbatas", "ITAS &amp; ITAP"]),
        )]);
        let pages = extract_pptx(&bytes).unwrap();
        assert_eq!(pages[0].text, "Izin Tinggal Terbatas\nITAS & ITAP");
    }

    #[test]
    fn empty_slides_are_skipped() {
        let bytes = make_pptx(&[
            ("ppt/slides/slide1.xml", slide(&[])),
            ("ppt/slides/slide2.xml", slide(&["Content"])),
        ]);
        let pages = extract_pptx(&bytes).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].page_number, 2);
    }

    #[test]
    fn non_zip_bytes_are_rejected() {
        let err = extract_pptx(b"plain text").unwrap_err();
        assert!(matches!(err, ExtractionError::PptxError(_)));
    }

    #[test]
    fn slide_number_parsing() {
        assert_eq!(slide_number("ppt/slides/slide7.xml"), Some(7));
        assert_eq!(slide_number("ppt/slides/_rels/slide7.xml.rels"), None);
        assert_eq!(slide_number("ppt/slideLayouts/slideLayout1.xml"), None);
    }
}
