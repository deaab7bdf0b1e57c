use std::path::Path;

use lopdf::Document;
use tracing::debug;

use crate::domain::{PageText, RagError};

/// Loads a PDF and extracts its text page by page, in page order.
///
/// Pages whose extraction yields only whitespace are skipped. Page numbers
/// are 1-based.
pub fn load_pdf(path: impl AsRef<Path>) -> Result<Vec<PageText>, RagError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(RagError::not_found(format!(
            "PDF file not found: {}",
            path.display()
        )));
    }

    let doc = Document::load(path)
        .map_err(|e| RagError::external(format!("failed to parse PDF: {e}")))?;

    let mut pages = Vec::new();
    for (page_number, _) in doc.get_pages() {
        let content = doc.extract_text(&[page_number]).map_err(|e| {
            RagError::external(format!(
                "failed to extract text from page {page_number}: {e}"
            ))
        })?;

        if content.trim().is_empty() {
            debug!(page = page_number, "page has no extractable text");
            continue;
        }
        pages.push(PageText::new(page_number as usize, content));
    }

    debug!(pages = pages.len(), "extracted text pages");
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_not_found() {
        let err = load_pdf("/nonexistent/missing.pdf").unwrap_err();
        assert!(matches!(err, RagError::NotFound(_)));
    }

    #[test]
    fn test_malformed_pdf_is_external_error() {
        let path = std::env::temp_dir().join("pdf_rag_malformed_test.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let err = load_pdf(&path).unwrap_err();
        assert!(matches!(err, RagError::ExternalService(_)));

        std::fs::remove_file(&path).ok();
    }
}
