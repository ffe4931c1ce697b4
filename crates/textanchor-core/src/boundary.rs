//! Word boundary detection between consecutive chunks on a line.

use crate::chunk::TextChunk;

/// Space widths below this are treated as undefined by the font.
///
/// Seen with content like `-.232 Tc [( P)-226.2(r)-231.8(e)]TJ`, where the
/// character spacing cancels the space width and the render stream reports
/// zero. Every boundary is then treated as contiguous.
pub const MIN_SPACE_WIDTH: f32 = 0.1;

/// Decides whether two same-line chunks belong to different words.
///
/// Callers must only ask about chunks for which [`TextChunk::same_line`] holds.
pub trait WordBoundaryPolicy {
    /// Returns `true` if a space separates `previous` from `current`.
    fn needs_space(&self, current: &TextChunk, previous: &TextChunk) -> bool;
}

/// The default policy, based on the previous chunk's space width.
///
/// A boundary is reported when the gap exceeds half a space, or when the
/// current chunk starts more than a full space *before* the previous one ends
/// (overlapping text drawn out of order).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpaceWidthPolicy;

impl WordBoundaryPolicy for SpaceWidthPolicy {
    fn needs_space(&self, current: &TextChunk, previous: &TextChunk) -> bool {
        let space = previous.char_space_width();
        if space < MIN_SPACE_WIDTH {
            return false;
        }

        let gap = current.distance_from_end_of(previous);
        gap < -space || gap > space / 2.0
    }
}

impl<P: WordBoundaryPolicy + ?Sized> WordBoundaryPolicy for &P {
    fn needs_space(&self, current: &TextChunk, previous: &TextChunk) -> bool {
        (**self).needs_space(current, previous)
    }
}

/// Whether a synthetic space must be written between `previous` and `current`.
///
/// Applies the geometric policy, then suppresses the space when the literal
/// text already carries one on either side of the join.
pub fn separator_needed<P: WordBoundaryPolicy + ?Sized>(
    current: &TextChunk,
    previous: &TextChunk,
    policy: &P,
) -> bool {
    policy.needs_space(current, previous)
        && !current.starts_with_space()
        && !previous.ends_with_space()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::build_chunk;
    use crate::geometry::Vector3;

    fn chunk(text: &str, x0: f32, x1: f32, space: f32) -> TextChunk {
        build_chunk(text, Vector3::planar(x0, 0.0), Vector3::planar(x1, 0.0), space)
    }

    #[test]
    fn test_gap_over_half_space_is_boundary() {
        let prev = chunk("AB", 0.0, 10.0, 1.0);
        let cur = chunk("CD", 10.6, 20.0, 1.0);
        assert!(SpaceWidthPolicy.needs_space(&cur, &prev));
    }

    #[test]
    fn test_small_gap_is_contiguous() {
        let prev = chunk("AB", 0.0, 10.0, 1.0);
        let cur = chunk("CD", 10.3, 20.0, 1.0);
        assert!(!SpaceWidthPolicy.needs_space(&cur, &prev));
    }

    #[test]
    fn test_exactly_half_space_is_contiguous() {
        let prev = chunk("AB", 0.0, 10.0, 1.0);
        let cur = chunk("CD", 10.5, 20.0, 1.0);
        assert!(!SpaceWidthPolicy.needs_space(&cur, &prev));
    }

    #[test]
    fn test_small_overlap_is_contiguous() {
        let prev = chunk("AB", 0.0, 10.0, 1.0);
        let cur = chunk("CD", 9.5, 20.0, 1.0);
        assert!(!SpaceWidthPolicy.needs_space(&cur, &prev));
    }

    #[test]
    fn test_large_overlap_is_boundary() {
        let prev = chunk("AB", 0.0, 10.0, 1.0);
        let cur = chunk("CD", 8.0, 20.0, 1.0);
        assert!(SpaceWidthPolicy.needs_space(&cur, &prev));
    }

    #[test]
    fn test_undefined_space_width_never_splits() {
        let prev = chunk("P", 0.0, 5.0, 0.05);
        let cur = chunk("r", 50.0, 55.0, 1.0);
        assert!(!SpaceWidthPolicy.needs_space(&cur, &prev));
    }

    #[test]
    fn test_uses_previous_space_width() {
        // A wide space on the current chunk does not hide the gap.
        let prev = chunk("AB", 0.0, 10.0, 1.0);
        let cur = chunk("CD", 10.8, 20.0, 4.0);
        assert!(SpaceWidthPolicy.needs_space(&cur, &prev));
    }

    #[test]
    fn test_literal_spaces_suppress_separator() {
        let prev = chunk("AB ", 0.0, 10.0, 1.0);
        let cur = chunk("CD", 12.0, 20.0, 1.0);
        assert!(SpaceWidthPolicy.needs_space(&cur, &prev));
        assert!(!separator_needed(&cur, &prev, &SpaceWidthPolicy));

        let prev = chunk("AB", 0.0, 10.0, 1.0);
        let cur = chunk(" CD", 12.0, 20.0, 1.0);
        assert!(!separator_needed(&cur, &prev, &SpaceWidthPolicy));

        let cur = chunk("CD", 12.0, 20.0, 1.0);
        assert!(separator_needed(&cur, &prev, &SpaceWidthPolicy));
    }

    struct NeverSplit;

    impl WordBoundaryPolicy for NeverSplit {
        fn needs_space(&self, _current: &TextChunk, _previous: &TextChunk) -> bool {
            false
        }
    }

    #[test]
    fn test_custom_policy_through_reference() {
        let prev = chunk("AB", 0.0, 10.0, 1.0);
        let cur = chunk("CD", 30.0, 40.0, 1.0);
        let policy = &NeverSplit;
        assert!(!separator_needed(&cur, &prev, &policy));
    }
}
