//! textanchor: locate reference text on rendered pages and place text next to it.
//!
//! This is the public API facade crate. It re-exports the geometry, ordering and
//! matching types from textanchor-core and adds documents, overlay placement and
//! invoice layout on top.
//!
//! # Architecture
//!
//! - **textanchor-core**: Fragment metrics, reading order, run assembly and matching
//! - **textanchor** (this crate): Pages, documents, overlays and invoices
//!
//! # Example
//!
//! ```
//! use textanchor::{Alignment, Document, Fragment, MemorySource, RecordingSink, Vector3};
//!
//! let page = vec![
//!     Fragment::new("INVOICE", Vector3::planar(72.0, 740.0), Vector3::planar(140.0, 740.0), 3.0),
//! ];
//! let document = Document::load(&MemorySource::new(vec![page])).unwrap();
//!
//! let mut sink = RecordingSink::new();
//! let written = textanchor::write_text_at_offset(
//!     &document, &mut sink, "Hello World!", "INVOICE", 10.0, Alignment::Left, false,
//! ).unwrap();
//! assert_eq!(written, 1);
//! assert_eq!(sink.commands()[0].x, 150.0);
//! ```

pub use textanchor_core;

mod document;
mod error;
mod invoice;
mod overlay;
mod page;

pub use document::{Document, DocumentMatch, FragmentSource, MemorySource};
#[cfg(feature = "serde")]
pub use document::{DumpPage, FragmentDump};
pub use error::Error;
pub use invoice::{
    DEFAULT_ITEM_ROW_PATTERN, InvoiceEditor, InvoiceLayout, InvoicePage, InvoiceSettings,
    InvoiceWriter, ItemLocation, format_currency,
};
pub use overlay::{Alignment, OverlaySink, OverlayText, RecordingSink, write_text_at_offset};
pub use page::PageText;
pub use textanchor_core::{
    ChunkCollector, CoreError, Fragment, MatchSpan, PageAnchor, RenderListener, RunAssembler,
    SpaceWidthPolicy, SubstringMatcher, TextChunk, TextRenderEvent, Vector3, WordBoundaryPolicy,
};
