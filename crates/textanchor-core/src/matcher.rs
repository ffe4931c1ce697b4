//! Locate a query string in an ordered chunk stream.
//!
//! The matcher walks the chunks once, growing a buffer of same-line text for
//! as long as it can still lead to the query. A query split over several
//! fragments (`"ITEM"`, `"-"`, `"1"`) is found incrementally because a buffer
//! that is a prefix of the query stays alive.
//!
//! The reported span covers whole fragments. When the query starts in the
//! middle of a fragment the span text carries the extra characters too.

use crate::boundary::{SpaceWidthPolicy, WordBoundaryPolicy};
use crate::chunk::{MatchSpan, TextChunk};
use crate::runs::append_joined;

/// Whether either string contains the other.
///
/// Keeps a candidate alive both while it is still shorter than the query
/// and once it has grown past it.
pub fn either_contains(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// What a chunk did to the match buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
pub(crate) enum Transition {
    /// The buffer was empty and the chunk did not seed a candidate.
    Skip,
    /// The buffer was empty and the chunk started a candidate.
    Seed,
    /// The chunk extended the candidate on the same line.
    Append,
    /// The candidate was dropped (dead end or new line).
    /// `reseeded` tells whether the chunk started a new one.
    Reset { reseeded: bool },
}

/// Candidate text being accumulated.
#[derive(Debug, Clone)]
struct MatchBuffer<'a> {
    text: String,
    first: &'a TextChunk,
    last: &'a TextChunk,
}

impl<'a> MatchBuffer<'a> {
    fn seed(chunk: &'a TextChunk, query: &str) -> Option<Self> {
        either_contains(chunk.text(), query).then(|| Self {
            text: chunk.text().to_string(),
            first: chunk,
            last: chunk,
        })
    }

    fn into_span(self) -> MatchSpan {
        self.first.extended_to(self.text, self.last)
    }
}

/// Apply one chunk to the buffer.
fn step<'a, P: WordBoundaryPolicy + ?Sized>(
    buffer: Option<MatchBuffer<'a>>,
    chunk: &'a TextChunk,
    query: &str,
    policy: &P,
) -> (Transition, Option<MatchBuffer<'a>>) {
    match buffer {
        None => match MatchBuffer::seed(chunk, query) {
            Some(seeded) => (Transition::Seed, Some(seeded)),
            None => (Transition::Skip, None),
        },
        Some(mut candidate) if chunk.same_line(candidate.last) => {
            append_joined(&mut candidate.text, chunk, candidate.last, policy);
            if either_contains(&candidate.text, query) {
                candidate.last = chunk;
                (Transition::Append, Some(candidate))
            } else {
                let next = MatchBuffer::seed(chunk, query);
                (
                    Transition::Reset {
                        reseeded: next.is_some(),
                    },
                    next,
                )
            }
        }
        Some(_) => {
            let next = MatchBuffer::seed(chunk, query);
            (
                Transition::Reset {
                    reseeded: next.is_some(),
                },
                next,
            )
        }
    }
}

/// Lazily yields every match of a query, in scan order.
///
/// Created by [`SubstringMatcher::matches`]. Taking only the first item
/// stops the scan there.
pub struct Matches<'a, 'q, P: ?Sized = SpaceWidthPolicy> {
    chunks: std::slice::Iter<'a, TextChunk>,
    query: &'q str,
    policy: &'a P,
    buffer: Option<MatchBuffer<'a>>,
}

impl<'a, P: WordBoundaryPolicy + ?Sized> Iterator for Matches<'a, '_, P> {
    type Item = MatchSpan;

    fn next(&mut self) -> Option<MatchSpan> {
        if self.query.is_empty() {
            return None;
        }

        for chunk in self.chunks.by_ref() {
            let (_transition, buffer) = step(self.buffer.take(), chunk, self.query, self.policy);

            match buffer {
                Some(candidate) if candidate.text.contains(self.query) => {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(
                        query = self.query,
                        text = %candidate.text,
                        transition = ?_transition,
                        "match emitted"
                    );
                    return Some(candidate.into_span());
                }
                other => self.buffer = other,
            }
        }
        None
    }
}

/// Finds occurrences of a query in an ordered chunk stream.
///
/// Chunks must be in reading order. Same-line joins use the same boundary
/// rule as [`RunAssembler`](crate::RunAssembler).
#[derive(Debug, Clone, Default)]
pub struct SubstringMatcher<P = SpaceWidthPolicy> {
    policy: P,
}

impl SubstringMatcher<SpaceWidthPolicy> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: WordBoundaryPolicy> SubstringMatcher<P> {
    pub fn with_policy(policy: P) -> Self {
        Self { policy }
    }

    /// Iterate over every match of `query`. An empty query yields nothing.
    pub fn matches<'a, 'q>(&'a self, chunks: &'a [TextChunk], query: &'q str) -> Matches<'a, 'q, P> {
        Matches {
            chunks: chunks.iter(),
            query,
            policy: &self.policy,
            buffer: None,
        }
    }

    /// The first match of `query`, or `None`.
    pub fn find_first(&self, chunks: &[TextChunk], query: &str) -> Option<MatchSpan> {
        self.matches(chunks, query).next()
    }

    /// All matches of `query`, in scan order.
    pub fn find_all(&self, chunks: &[TextChunk], query: &str) -> Vec<MatchSpan> {
        self.matches(chunks, query).collect()
    }
}

/// [`SubstringMatcher::find_first`] with the default policy.
pub fn find_first(chunks: &[TextChunk], query: &str) -> Option<MatchSpan> {
    SubstringMatcher::new().find_first(chunks, query)
}

/// [`SubstringMatcher::find_all`] with the default policy.
pub fn find_all(chunks: &[TextChunk], query: &str) -> Vec<MatchSpan> {
    SubstringMatcher::new().find_all(chunks, query)
}
