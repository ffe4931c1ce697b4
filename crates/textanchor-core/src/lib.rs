//! textanchor-core: Backend-independent text fragment geometry and matching.
//!
//! This crate turns the positioned text fragments of a rendered page into
//! reading-order chunks, merges them into same-line runs, and locates query
//! strings in that stream, reporting where a match starts and ends on the
//! page. It has no required dependencies; `serde` and `tracing` are optional.

pub mod anchor;
pub mod boundary;
pub mod chunk;
pub mod collector;
pub mod error;
pub mod geometry;
pub mod matcher;
pub mod runs;

pub use anchor::PageAnchor;
pub use boundary::{MIN_SPACE_WIDTH, SpaceWidthPolicy, WordBoundaryPolicy, separator_needed};
pub use chunk::{Fragment, MatchSpan, TextChunk, build_chunk, sort_chunks};
pub use collector::{ChunkCollector, RenderListener, TextRenderEvent};
pub use error::CoreError;
pub use geometry::{Axis, Vector3};
pub use matcher::{Matches, SubstringMatcher, either_contains, find_all, find_first};
pub use runs::{RunAssembler, assemble_runs};
