use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Text extracted from one PDF page, before chunking.
///
/// Page numbers are 1-based, matching how PDF viewers report them.
#[derive(Debug, Clone)]
pub struct PageText {
    pub number: usize,
    pub content: String,
}

impl PageText {
    pub fn new(number: usize, content: impl Into<String>) -> Self {
        Self {
            number,
            content: content.into(),
        }
    }
}

/// The unit of storage and retrieval: a bounded span of the source
/// document's text. Immutable once stored; removed only when the whole
/// collection is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: Uuid,
    pub content: String,
    pub chunk_index: usize,
    pub metadata: ChunkMetadata,
    pub created_at: DateTime<Utc>,
}

impl DocumentChunk {
    pub fn new(content: impl Into<String>, chunk_index: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            chunk_index,
            metadata: ChunkMetadata::default(),
            created_at: Utc::now(),
        }
    }

    pub fn with_metadata(mut self, metadata: ChunkMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub source: Option<String>,
    pub page: Option<usize>,
    pub start_offset: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk: DocumentChunk,
    pub score: f32,
}

/// Splits page texts into overlapping character windows.
///
/// Each page is walked with a window of `chunk_size` characters advancing
/// by `chunk_size - chunk_overlap`, so adjacent chunks share their tail and
/// head. Windows are cut on char boundaries; windows that trim to nothing
/// are dropped. Chunk indices are global across pages, starting from 0.
///
/// The chunk count is a pure function of the per-page text lengths, the
/// chunk size, and the overlap.
pub fn chunk_pages(
    source: &str,
    pages: &[PageText],
    chunk_size: usize,
    chunk_overlap: usize,
) -> Vec<DocumentChunk> {
    let stride = chunk_size.saturating_sub(chunk_overlap).max(1);

    let mut chunks = Vec::new();
    let mut chunk_index = 0;

    for page in pages {
        let chars: Vec<char> = page.content.chars().collect();
        let mut start = 0;

        while start < chars.len() {
            let end = (start + chunk_size).min(chars.len());
            let window: String = chars[start..end].iter().collect();
            let trimmed = window.trim();

            if !trimmed.is_empty() {
                // Empty metadata values are dropped rather than stored.
                let metadata = ChunkMetadata {
                    source: Some(source.to_string()).filter(|s| !s.is_empty()),
                    page: Some(page.number),
                    start_offset: Some(start),
                };
                chunks.push(DocumentChunk::new(trimmed, chunk_index).with_metadata(metadata));
                chunk_index += 1;
            }

            if end == chars.len() {
                break;
            }
            start += stride;
        }
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(len: usize) -> PageText {
        let content: String = ('a'..='z').cycle().take(len).collect();
        PageText::new(1, content)
    }

    #[test]
    fn test_short_page_yields_single_chunk() {
        let pages = [PageText::new(1, "hello world")];
        let chunks = chunk_pages("doc.pdf", &pages, 100, 10);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "hello world");
        assert_eq!(chunks[0].chunk_index, 0);
        assert_eq!(chunks[0].metadata.page, Some(1));
        assert_eq!(chunks[0].metadata.source.as_deref(), Some("doc.pdf"));
    }

    #[test]
    fn test_chunk_count_is_deterministic() {
        // 25 chars, window 10, stride 6: windows at 0, 6, 12, 18.
        let pages = [page_of(25)];
        let chunks = chunk_pages("doc.pdf", &pages, 10, 4);

        assert_eq!(chunks.len(), 4);
        let again = chunk_pages("doc.pdf", &pages, 10, 4);
        assert_eq!(again.len(), chunks.len());
    }

    #[test]
    fn test_adjacent_chunks_overlap() {
        let pages = [page_of(25)];
        let chunks = chunk_pages("doc.pdf", &pages, 10, 4);

        let tail: String = chunks[0].content.chars().skip(6).collect();
        assert_eq!(tail.len(), 4);
        assert!(chunks[1].content.starts_with(&tail));
        assert_eq!(chunks[1].metadata.start_offset, Some(6));
    }

    #[test]
    fn test_empty_pages_yield_no_chunks() {
        assert!(chunk_pages("doc.pdf", &[], 100, 10).is_empty());

        let blank = [PageText::new(1, "   \n\t  ")];
        assert!(chunk_pages("doc.pdf", &blank, 100, 10).is_empty());
    }

    #[test]
    fn test_chunk_index_is_global_across_pages() {
        let pages = [
            PageText::new(1, "first page text"),
            PageText::new(2, "second page text"),
        ];
        let chunks = chunk_pages("doc.pdf", &pages, 100, 10);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chunk_index, 0);
        assert_eq!(chunks[0].metadata.page, Some(1));
        assert_eq!(chunks[1].chunk_index, 1);
        assert_eq!(chunks[1].metadata.page, Some(2));
    }

    #[test]
    fn test_empty_source_is_not_stored_in_metadata() {
        let pages = [PageText::new(1, "some text")];
        let chunks = chunk_pages("", &pages, 100, 10);

        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].metadata.source.is_none());
    }
}
