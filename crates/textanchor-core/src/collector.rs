//! Render-listener seam between a page renderer and the chunk pipeline.
//!
//! A renderer reports each shown text run through [`RenderListener`].
//! [`ChunkCollector`] turns those runs into [`TextChunk`]s and keeps them in
//! reading order at the end of every text block.

use crate::chunk::{Fragment, TextChunk, sort_chunks};
use crate::geometry::Vector3;

/// A text run as reported by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRenderEvent {
    /// Decoded text of the run.
    pub text: String,
    /// Baseline start, in page space.
    pub baseline_start: Vector3,
    /// Baseline end, in page space.
    pub baseline_end: Vector3,
    /// Text rise (superscript/subscript offset) already applied to the baseline.
    pub rise: f32,
    /// Width of a single space character in the current font.
    pub single_space_width: f32,
}

impl TextRenderEvent {
    /// The baseline with rise removed, as a fragment.
    ///
    /// Super- and subscripts are placed back on the line they belong to.
    pub fn to_fragment(&self) -> Fragment {
        let (start, end) = if self.rise != 0.0 {
            (
                self.baseline_start.translate(0.0, -self.rise),
                self.baseline_end.translate(0.0, -self.rise),
            )
        } else {
            (self.baseline_start, self.baseline_end)
        };
        Fragment::new(self.text.clone(), start, end, self.single_space_width)
    }
}

/// Callbacks from a page renderer.
///
/// All methods default to no-ops so listeners only implement what they need.
pub trait RenderListener {
    /// A `BT` operator opened a text block.
    fn begin_text_block(&mut self) {}

    /// A text run was shown.
    fn render_text(&mut self, _event: TextRenderEvent) {}

    /// An `ET` operator closed the text block.
    fn end_text_block(&mut self) {}
}

/// Collects chunks for one page.
#[derive(Debug, Clone, Default)]
pub struct ChunkCollector {
    chunks: Vec<TextChunk>,
}

impl ChunkCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fragment directly, without waiting for a text block to end.
    ///
    /// The collection is not re-sorted; call [`ChunkCollector::into_chunks`]
    /// or end a text block to restore reading order.
    pub fn push_fragment(&mut self, fragment: Fragment) {
        self.chunks.push(fragment.into_chunk());
    }

    /// Chunks seen so far, in reading order as of the last text block.
    pub fn chunks(&self) -> &[TextChunk] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Finish the page and take the chunks in reading order.
    pub fn into_chunks(mut self) -> Vec<TextChunk> {
        sort_chunks(&mut self.chunks);
        self.chunks
    }
}

impl RenderListener for ChunkCollector {
    fn render_text(&mut self, event: TextRenderEvent) {
        self.chunks.push(event.to_fragment().into_chunk());
    }

    fn end_text_block(&mut self) {
        sort_chunks(&mut self.chunks);
    }
}

impl Extend<Fragment> for ChunkCollector {
    fn extend<I: IntoIterator<Item = Fragment>>(&mut self, iter: I) {
        self.chunks.extend(iter.into_iter().map(Fragment::into_chunk));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(text: &str, x0: f32, x1: f32, y: f32, rise: f32) -> TextRenderEvent {
        TextRenderEvent {
            text: text.to_string(),
            baseline_start: Vector3::planar(x0, y),
            baseline_end: Vector3::planar(x1, y),
            rise,
            single_space_width: 2.5,
        }
    }

    #[test]
    fn test_rise_removed_from_baseline() {
        let f = event("2", 10.0, 14.0, 704.0, 4.0).to_fragment();
        assert_eq!(f.start, Vector3::planar(10.0, 700.0));
        assert_eq!(f.end, Vector3::planar(14.0, 700.0));
        assert_eq!(f.char_space_width, 2.5);
    }

    #[test]
    fn test_superscript_lands_on_base_line() {
        let mut collector = ChunkCollector::new();
        collector.begin_text_block();
        collector.render_text(event("m", 0.0, 10.0, 700.0, 0.0));
        collector.render_text(event("2", 10.0, 14.0, 704.0, 4.0));
        collector.end_text_block();
        let chunks = collector.chunks();
        assert!(chunks[0].same_line(&chunks[1]));
    }

    #[test]
    fn test_end_text_block_sorts() {
        let mut collector = ChunkCollector::new();
        collector.begin_text_block();
        collector.render_text(event("bottom", 0.0, 30.0, 100.0, 0.0));
        collector.render_text(event("top", 0.0, 20.0, 700.0, 0.0));
        assert_eq!(collector.chunks()[0].text(), "bottom");
        collector.end_text_block();
        assert_eq!(collector.chunks()[0].text(), "top");
        assert_eq!(collector.len(), 2);
    }

    #[test]
    fn test_resort_after_second_block() {
        let mut collector = ChunkCollector::new();
        collector.render_text(event("b", 20.0, 30.0, 500.0, 0.0));
        collector.end_text_block();
        collector.render_text(event("a", 0.0, 10.0, 500.0, 0.0));
        collector.end_text_block();
        let texts: Vec<&str> = collector.chunks().iter().map(|c| c.text()).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[test]
    fn test_extend_and_into_chunks_sorts() {
        let mut collector = ChunkCollector::new();
        assert!(collector.is_empty());
        collector.extend(vec![
            Fragment::new("y", Vector3::planar(50.0, 0.0), Vector3::planar(60.0, 0.0), 1.0),
            Fragment::new("x", Vector3::planar(0.0, 0.0), Vector3::planar(10.0, 0.0), 1.0),
        ]);
        collector.push_fragment(Fragment::new(
            "w",
            Vector3::planar(0.0, 10.0),
            Vector3::planar(5.0, 10.0),
            1.0,
        ));
        let chunks = collector.into_chunks();
        let texts: Vec<&str> = chunks.iter().map(|c| c.text()).collect();
        assert_eq!(texts, vec!["w", "x", "y"]);
    }

    struct Counter(usize);

    impl RenderListener for Counter {
        fn render_text(&mut self, _event: TextRenderEvent) {
            self.0 += 1;
        }
    }

    #[test]
    fn test_default_methods_are_noops() {
        let mut counter = Counter(0);
        counter.begin_text_block();
        counter.render_text(event("a", 0.0, 1.0, 0.0, 0.0));
        counter.end_text_block();
        assert_eq!(counter.0, 1);
    }
}
