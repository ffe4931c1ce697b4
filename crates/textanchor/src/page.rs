//! Page type for locating text on a single rendered page.

use textanchor_core::{
    ChunkCollector, CoreError, Fragment, MatchSpan, PageAnchor, TextChunk, assemble_runs,
    find_all, find_first, sort_chunks,
};

/// The text of one page, in reading order.
///
/// Built once from the page's fragments and read-only afterwards. Runs are
/// assembled on demand.
#[derive(Debug, Clone)]
pub struct PageText {
    /// Page number (1-based).
    page_number: u32,
    /// Chunks sorted into reading order.
    chunks: Vec<TextChunk>,
}

impl PageText {
    /// Build a page from fragments in arrival order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPageNumber`] for page `0`.
    pub fn new(page_number: u32, fragments: Vec<Fragment>) -> Result<Self, CoreError> {
        let mut chunks: Vec<TextChunk> = fragments.into_iter().map(Fragment::into_chunk).collect();
        sort_chunks(&mut chunks);
        Self::from_sorted(page_number, chunks)
    }

    /// Build a page from a collector that was fed by a renderer.
    pub fn from_collector(page_number: u32, collector: ChunkCollector) -> Result<Self, CoreError> {
        Self::from_sorted(page_number, collector.into_chunks())
    }

    fn from_sorted(page_number: u32, chunks: Vec<TextChunk>) -> Result<Self, CoreError> {
        if page_number == 0 {
            return Err(CoreError::InvalidPageNumber(page_number));
        }
        Ok(Self {
            page_number,
            chunks,
        })
    }

    /// Returns the page number (1-based).
    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    /// Returns the chunks in reading order.
    pub fn chunks(&self) -> &[TextChunk] {
        &self.chunks
    }

    /// Same-line runs of this page.
    pub fn runs(&self) -> Vec<TextChunk> {
        assemble_runs(&self.chunks)
    }

    /// Page text with one run per line.
    pub fn extract_text(&self) -> String {
        self.runs()
            .iter()
            .map(TextChunk::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// First occurrence of `query` on this page.
    pub fn find_first(&self, query: &str) -> Option<MatchSpan> {
        find_first(&self.chunks, query)
    }

    /// Every occurrence of `query` on this page, in reading order.
    pub fn find_all(&self, query: &str) -> Vec<MatchSpan> {
        find_all(&self.chunks, query)
    }

    /// Where the first occurrence of `query` ends.
    pub fn locate_first(&self, query: &str) -> Option<PageAnchor> {
        self.find_first(query)
            .and_then(|span| PageAnchor::at_end(self.page_number, &span).ok())
    }

    /// Where each occurrence of `query` ends.
    pub fn locate_all(&self, query: &str) -> Vec<PageAnchor> {
        // page_number is non-zero here; at_end cannot fail
        self.find_all(query)
            .iter()
            .filter_map(|span| PageAnchor::at_end(self.page_number, span).ok())
            .collect()
    }
}
