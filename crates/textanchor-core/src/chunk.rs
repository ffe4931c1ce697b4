use std::cmp::Ordering;

use crate::geometry::{Axis, Vector3};

/// A raw text run as emitted by the page render stream.
///
/// Fragments arrive in content-stream order, not reading order. `start` and
/// `end` are the baseline endpoints of the run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fragment {
    /// Decoded text of the run. May be empty.
    pub text: String,
    /// Baseline start point.
    pub start: Vector3,
    /// Baseline end point.
    pub end: Vector3,
    /// Width of a single space character in the run's font (non-negative).
    pub char_space_width: f32,
}

impl Fragment {
    pub fn new(
        text: impl Into<String>,
        start: Vector3,
        end: Vector3,
        char_space_width: f32,
    ) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            char_space_width,
        }
    }

    /// Derive the chunk metrics for this fragment.
    pub fn into_chunk(self) -> TextChunk {
        build_chunk(self.text, self.start, self.end, self.char_space_width)
    }
}

/// A run of text together with its orientation and line metrics.
///
/// Built once per fragment (or per merged run) and never mutated. The
/// orientation key and perpendicular offset are quantized to integers so
/// that line membership is an exact comparison.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Fragment", into = "Fragment")
)]
pub struct TextChunk {
    text: String,
    start_location: Vector3,
    end_location: Vector3,
    char_space_width: f32,
    /// Unit vector from start to end.
    orientation_unit: Vector3,
    /// `atan2` of the orientation in milliradians, truncated.
    orientation_key: i32,
    /// Distance of the baseline from the origin, perpendicular to the orientation.
    perp_offset: i32,
    /// Start position along the orientation vector.
    parallel_start: f32,
    /// End position along the orientation vector.
    parallel_end: f32,
}

/// One located occurrence of a query string.
///
/// `start_location` is where the first contributing fragment began and
/// `end_location` where the last one ended. The text is the accumulated
/// buffer, which may carry characters beyond the query itself.
pub type MatchSpan = TextChunk;

/// Build a [`TextChunk`] from raw fragment parts.
///
/// Total for any finite input: a zero-length baseline is given the
/// orientation `(1, 0, 0)` so zero-width glyphs still order deterministically.
pub fn build_chunk(
    text: impl Into<String>,
    start: Vector3,
    end: Vector3,
    char_space_width: f32,
) -> TextChunk {
    let mut direction = end.sub(&start);
    if direction.length() == 0.0 {
        direction = Vector3::UNIT_X;
    }
    let orientation_unit = direction.normalize();

    let angle = f64::from(orientation_unit.get(Axis::Perpendicular))
        .atan2(f64::from(orientation_unit.get(Axis::Parallel)));
    let orientation_key = (angle * 1000.0) as i32;

    // Both operands lie in the page plane, so the cross product only has a
    // component along the third axis: the signed point-line distance.
    let origin = Vector3::new(0.0, 0.0, 1.0);
    let perp_offset = start.sub(&origin).cross(&orientation_unit).get(Axis::Third) as i32;

    TextChunk {
        text: text.into(),
        start_location: start,
        end_location: end,
        char_space_width,
        orientation_unit,
        orientation_key,
        perp_offset,
        parallel_start: orientation_unit.dot(&start),
        parallel_end: orientation_unit.dot(&end),
    }
}

impl TextChunk {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn start_location(&self) -> Vector3 {
        self.start_location
    }

    pub fn end_location(&self) -> Vector3 {
        self.end_location
    }

    pub fn char_space_width(&self) -> f32 {
        self.char_space_width
    }

    pub fn orientation_unit(&self) -> Vector3 {
        self.orientation_unit
    }

    pub fn orientation_key(&self) -> i32 {
        self.orientation_key
    }

    pub fn perp_offset(&self) -> i32 {
        self.perp_offset
    }

    pub fn parallel_start(&self) -> f32 {
        self.parallel_start
    }

    pub fn parallel_end(&self) -> f32 {
        self.parallel_end
    }

    /// A chunk running from this chunk's start to the end of `last`.
    ///
    /// Line metrics stay those of `self`, so the result remains on the same
    /// line as every chunk it was built from.
    pub(crate) fn extended_to(&self, text: String, last: &TextChunk) -> TextChunk {
        TextChunk {
            text,
            start_location: self.start_location,
            end_location: last.end_location,
            char_space_width: last.char_space_width,
            orientation_unit: self.orientation_unit,
            orientation_key: self.orientation_key,
            perp_offset: self.perp_offset,
            parallel_start: self.parallel_start,
            parallel_end: last.parallel_end,
        }
    }

    /// Whether both chunks share orientation and perpendicular offset.
    pub fn same_line(&self, other: &TextChunk) -> bool {
        self.orientation_key == other.orientation_key && self.perp_offset == other.perp_offset
    }

    /// Signed distance from the end of `other` to the start of this chunk,
    /// measured along the orientation.
    ///
    /// Only meaningful when both chunks are on the same line; this is not checked.
    pub fn distance_from_end_of(&self, other: &TextChunk) -> f32 {
        self.parallel_start - other.parallel_end
    }

    /// Reading order: orientation, then line offset, then position along the line.
    pub fn cmp_reading_order(&self, other: &TextChunk) -> Ordering {
        self.orientation_key
            .cmp(&other.orientation_key)
            .then(self.perp_offset.cmp(&other.perp_offset))
            .then(self.parallel_start.total_cmp(&other.parallel_start))
    }

    /// Whether the text begins with an ASCII space.
    pub fn starts_with_space(&self) -> bool {
        self.text.starts_with(' ')
    }

    /// Whether the text ends with an ASCII space.
    pub fn ends_with_space(&self) -> bool {
        self.text.ends_with(' ')
    }
}

impl From<Fragment> for TextChunk {
    fn from(fragment: Fragment) -> Self {
        fragment.into_chunk()
    }
}

impl From<TextChunk> for Fragment {
    fn from(chunk: TextChunk) -> Self {
        Fragment {
            text: chunk.text,
            start: chunk.start_location,
            end: chunk.end_location,
            char_space_width: chunk.char_space_width,
        }
    }
}

/// Sort chunks into reading order.
///
/// The sort is stable: chunks with equal keys keep their arrival order.
pub fn sort_chunks(chunks: &mut [TextChunk]) {
    chunks.sort_by(TextChunk::cmp_reading_order);
}
