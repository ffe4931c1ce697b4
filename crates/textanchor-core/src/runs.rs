//! Merge ordered chunks into same-line runs.

use crate::boundary::{SpaceWidthPolicy, WordBoundaryPolicy, separator_needed};
use crate::chunk::TextChunk;

/// Append `current` to `text`, inserting a space if the boundary calls for one.
pub(crate) fn append_joined<P: WordBoundaryPolicy + ?Sized>(
    text: &mut String,
    current: &TextChunk,
    previous: &TextChunk,
    policy: &P,
) {
    if separator_needed(current, previous, policy) {
        text.push(' ');
    }
    text.push_str(current.text());
}

/// Accumulator for a run in progress.
struct OpenRun<'a> {
    text: String,
    first: &'a TextChunk,
    last: &'a TextChunk,
}

impl<'a> OpenRun<'a> {
    fn open(chunk: &'a TextChunk) -> Self {
        Self {
            text: chunk.text().to_string(),
            first: chunk,
            last: chunk,
        }
    }

    fn close(self) -> TextChunk {
        self.first.extended_to(self.text, self.last)
    }
}

/// Merges consecutive same-line chunks into runs.
///
/// Input must already be in reading order (see [`sort_chunks`](crate::sort_chunks)).
/// Each output chunk spans from the start of its first input chunk to the
/// end of its last, and carries the last chunk's space width.
#[derive(Debug, Clone, Default)]
pub struct RunAssembler<P = SpaceWidthPolicy> {
    policy: P,
}

impl RunAssembler<SpaceWidthPolicy> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: WordBoundaryPolicy> RunAssembler<P> {
    /// Use a custom boundary policy.
    pub fn with_policy(policy: P) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Assemble runs in a single left-to-right pass.
    pub fn assemble(&self, chunks: &[TextChunk]) -> Vec<TextChunk> {
        let mut runs = Vec::new();
        let mut open: Option<OpenRun<'_>> = None;

        for chunk in chunks {
            open = Some(match open.take() {
                None => OpenRun::open(chunk),
                Some(mut run) if chunk.same_line(run.last) => {
                    append_joined(&mut run.text, chunk, run.last, &self.policy);
                    run.last = chunk;
                    run
                }
                Some(run) => {
                    runs.push(run.close());
                    OpenRun::open(chunk)
                }
            });
        }

        if let Some(run) = open {
            runs.push(run.close());
        }
        runs
    }
}

/// Assemble runs with the default [`SpaceWidthPolicy`].
pub fn assemble_runs(chunks: &[TextChunk]) -> Vec<TextChunk> {
    RunAssembler::new().assemble(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{build_chunk, sort_chunks};
    use crate::geometry::Vector3;

    fn chunk(text: &str, x0: f32, x1: f32, y: f32) -> TextChunk {
        build_chunk(text, Vector3::planar(x0, y), Vector3::planar(x1, y), 1.0)
    }

    #[test]
    fn test_empty_input() {
        assert!(assemble_runs(&[]).is_empty());
    }

    #[test]
    fn test_visible_gap_inserts_space() {
        let chunks = vec![chunk("AB", 0.0, 10.0, 0.0), chunk("CD", 10.6, 20.0, 0.0)];
        let runs = assemble_runs(&chunks);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text(), "AB CD");
        assert_eq!(runs[0].start_location(), Vector3::planar(0.0, 0.0));
        assert_eq!(runs[0].end_location(), Vector3::planar(20.0, 0.0));
    }

    #[test]
    fn test_small_gap_joins_without_space() {
        let chunks = vec![chunk("AB", 0.0, 10.0, 0.0), chunk("CD", 10.3, 20.0, 0.0)];
        let runs = assemble_runs(&chunks);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text(), "ABCD");
    }

    #[test]
    fn test_different_lines_never_merge() {
        let chunks = vec![chunk("AB", 0.0, 10.0, 100.0), chunk("CD", 10.0, 20.0, 80.0)];
        let runs = assemble_runs(&chunks);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text(), "AB");
        assert_eq!(runs[1].text(), "CD");
        assert_eq!(runs[0].end_location(), Vector3::planar(10.0, 100.0));
    }

    #[test]
    fn test_existing_spaces_not_doubled() {
        let chunks = vec![chunk("Total ", 0.0, 30.0, 0.0), chunk("Due", 35.0, 50.0, 0.0)];
        assert_eq!(assemble_runs(&chunks)[0].text(), "Total Due");
    }

    #[test]
    fn test_run_takes_last_space_width() {
        let chunks = vec![
            build_chunk("a", Vector3::planar(0.0, 0.0), Vector3::planar(5.0, 0.0), 1.0),
            build_chunk("b", Vector3::planar(5.0, 0.0), Vector3::planar(9.0, 0.0), 2.5),
        ];
        let runs = assemble_runs(&chunks);
        assert_eq!(runs[0].char_space_width(), 2.5);
    }

    #[test]
    fn test_three_way_join_matches_incremental_join() {
        let a = chunk("one", 0.0, 10.0, 0.0);
        let b = chunk("two", 12.0, 20.0, 0.0);
        let c = chunk("three", 20.1, 40.0, 0.0);

        let all = assemble_runs(&[a.clone(), b.clone(), c.clone()]);
        let ab = assemble_runs(&[a, b]);
        let merged_then_c = assemble_runs(&[ab[0].clone(), c]);
        assert_eq!(all[0].text(), "one twothree");
        assert_eq!(all[0].text(), merged_then_c[0].text());
    }

    #[test]
    fn test_skewed_baselines_rerun_stays_one_line() {
        let a = chunk("one", 0.0, 5.0, 10.9);
        let b = chunk("two", 5.0, 9.0, 10.1);
        let c = chunk("three", 9.0, 14.0, 10.5);

        let all = assemble_runs(&[a.clone(), b.clone(), c.clone()]);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].text(), "onetwothree");

        let ab = assemble_runs(&[a.clone(), b]);
        assert_eq!(ab[0].orientation_key(), a.orientation_key());
        assert_eq!(ab[0].perp_offset(), a.perp_offset());
        assert!(ab[0].same_line(&c));

        let merged_then_c = assemble_runs(&[ab[0].clone(), c]);
        assert_eq!(merged_then_c.len(), 1);
        assert_eq!(merged_then_c[0].text(), "onetwothree");
        assert_eq!(merged_then_c[0].end_location(), Vector3::planar(14.0, 10.5));
    }

    #[test]
    fn test_sorted_page_assembles_in_reading_order() {
        let mut chunks = vec![
            chunk("Subtotal", 0.0, 40.0, 100.0),
            chunk("World", 32.0, 60.0, 700.0),
            chunk("Hello", 0.0, 30.0, 700.0),
        ];
        sort_chunks(&mut chunks);
        let texts: Vec<String> = assemble_runs(&chunks)
            .iter()
            .map(|r| r.text().to_string())
            .collect();
        assert_eq!(texts, vec!["Hello World", "Subtotal"]);
    }

    struct AlwaysSplit;

    impl WordBoundaryPolicy for AlwaysSplit {
        fn needs_space(&self, _current: &TextChunk, _previous: &TextChunk) -> bool {
            true
        }
    }

    #[test]
    fn test_custom_policy() {
        let chunks = vec![chunk("A", 0.0, 5.0, 0.0), chunk("B", 5.0, 10.0, 0.0)];
        let runs = RunAssembler::with_policy(AlwaysSplit).assemble(&chunks);
        assert_eq!(runs[0].text(), "A B");
    }
}
