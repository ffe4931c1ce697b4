//! Page-qualified positions handed to overlay consumers.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::chunk::TextChunk;
use crate::error::CoreError;
use crate::geometry::Vector3;

/// A location on a specific page (1-based).
///
/// Ordered by page number, then by `x`, `y`, `z` using IEEE total ordering.
/// Equality follows the same ordering, so two anchors are equal exactly when
/// their coordinates are bitwise-equivalent floats.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "AnchorParts")
)]
pub struct PageAnchor {
    page_number: u32,
    location: Vector3,
}

impl PageAnchor {
    /// Create an anchor. Fails for page `0`.
    pub fn new(page_number: u32, location: Vector3) -> Result<Self, CoreError> {
        if page_number == 0 {
            return Err(CoreError::InvalidPageNumber(page_number));
        }
        Ok(Self {
            page_number,
            location,
        })
    }

    /// Anchor at the start of a chunk or match span.
    pub fn at_start(page_number: u32, chunk: &TextChunk) -> Result<Self, CoreError> {
        Self::new(page_number, chunk.start_location())
    }

    /// Anchor at the end of a chunk or match span.
    pub fn at_end(page_number: u32, chunk: &TextChunk) -> Result<Self, CoreError> {
        Self::new(page_number, chunk.end_location())
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn location(&self) -> Vector3 {
        self.location
    }

    pub fn x(&self) -> f32 {
        self.location.x
    }

    pub fn y(&self) -> f32 {
        self.location.y
    }

    /// The same page, shifted within the page plane.
    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self {
            page_number: self.page_number,
            location: self.location.translate(dx, dy),
        }
    }
}

/// Unvalidated form used when deserializing.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct AnchorParts {
    page_number: u32,
    location: Vector3,
}

#[cfg(feature = "serde")]
impl TryFrom<AnchorParts> for PageAnchor {
    type Error = CoreError;

    fn try_from(parts: AnchorParts) -> Result<Self, CoreError> {
        PageAnchor::new(parts.page_number, parts.location)
    }
}

impl Ord for PageAnchor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.page_number
            .cmp(&other.page_number)
            .then(self.location.x.total_cmp(&other.location.x))
            .then(self.location.y.total_cmp(&other.location.y))
            .then(self.location.z.total_cmp(&other.location.z))
    }
}

impl PartialOrd for PageAnchor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PageAnchor {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PageAnchor {}

impl Hash for PageAnchor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.page_number.hash(state);
        self.location.x.to_bits().hash(state);
        self.location.y.to_bits().hash(state);
        self.location.z.to_bits().hash(state);
    }
}

impl fmt::Display for PageAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page [{}] at ({})", self.page_number, self.location)
    }
}
