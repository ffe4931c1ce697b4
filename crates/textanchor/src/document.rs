//! Multi-page documents assembled from a fragment source.

#[cfg(feature = "serde")]
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use textanchor_core::CoreError;
use textanchor_core::{Fragment, MatchSpan, PageAnchor};
use tracing::debug;

use crate::error::Error;
use crate::page::PageText;

/// Produces the raw fragments of each page.
///
/// Implemented by whatever renders the document's pages (a PDF content
/// stream interpreter, a test fixture, a JSON dump). Pages are 1-based.
pub trait FragmentSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Fragments of `page_number`, in the order the renderer emitted them.
    fn fragments(&self, page_number: u32) -> Result<Vec<Fragment>, Error>;
}

/// A fragment source held in memory, one `Vec` per page.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pages: Vec<Vec<Fragment>>,
}

impl MemorySource {
    pub fn new(pages: Vec<Vec<Fragment>>) -> Self {
        Self { pages }
    }

    /// Append a page; returns its 1-based number.
    pub fn push_page(&mut self, fragments: Vec<Fragment>) -> u32 {
        self.pages.push(fragments);
        self.pages.len() as u32
    }
}

impl FragmentSource for MemorySource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn fragments(&self, page_number: u32) -> Result<Vec<Fragment>, Error> {
        page_index(page_number, self.pages.len())
            .map(|idx| self.pages[idx].clone())
    }
}

/// Convert a 1-based page number into an index, checking bounds.
fn page_index(page_number: u32, page_count: usize) -> Result<usize, Error> {
    if page_number == 0 || page_number as usize > page_count {
        return Err(Error::PageOutOfRange {
            page: page_number,
            page_count,
        });
    }
    Ok(page_number as usize - 1)
}

/// A serialized fragment stream: `{"pages":[{"page":1,"fragments":[...]}]}`.
///
/// Pages may appear in any order, and entries for the same page are
/// concatenated. Page numbers must run from 1 without gaps, so the page count
/// is the number of distinct pages listed.
#[cfg(feature = "serde")]
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "DumpFile", into = "DumpFile")]
pub struct FragmentDump {
    pages: BTreeMap<u32, Vec<Fragment>>,
}

/// One page of a [`FragmentDump`].
#[cfg(feature = "serde")]
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DumpPage {
    /// Page number (1-based).
    pub page: u32,
    pub fragments: Vec<Fragment>,
}

/// On-disk shape of a dump, before page numbers are checked.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct DumpFile {
    pages: Vec<DumpPage>,
}

#[cfg(feature = "serde")]
impl FragmentDump {
    /// Index dump pages by number.
    ///
    /// # Errors
    ///
    /// Page 0 is rejected as [`Error::Core`]. A page number beyond the number
    /// of distinct pages listed is rejected as [`Error::PageOutOfRange`].
    pub fn from_pages(pages: impl IntoIterator<Item = DumpPage>) -> Result<Self, Error> {
        let mut index: BTreeMap<u32, Vec<Fragment>> = BTreeMap::new();
        for entry in pages {
            if entry.page == 0 {
                return Err(CoreError::InvalidPageNumber(entry.page).into());
            }
            index.entry(entry.page).or_default().extend(entry.fragments);
        }
        if let Some(&highest) = index.keys().next_back() {
            if highest as usize > index.len() {
                return Err(Error::PageOutOfRange {
                    page: highest,
                    page_count: index.len(),
                });
            }
        }
        Ok(Self { pages: index })
    }

    /// Parse a dump from JSON text.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let file: DumpFile = serde_json::from_str(json)?;
        Self::from_pages(file.pages)
    }

    /// Read and parse a dump file.
    pub fn open_file(path: impl AsRef<std::path::Path>) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(feature = "serde")]
impl TryFrom<DumpFile> for FragmentDump {
    type Error = Error;

    fn try_from(file: DumpFile) -> Result<Self, Error> {
        Self::from_pages(file.pages)
    }
}

#[cfg(feature = "serde")]
impl From<FragmentDump> for DumpFile {
    fn from(dump: FragmentDump) -> Self {
        DumpFile {
            pages: dump
                .pages
                .into_iter()
                .map(|(page, fragments)| DumpPage { page, fragments })
                .collect(),
        }
    }
}

#[cfg(feature = "serde")]
impl FragmentSource for FragmentDump {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn fragments(&self, page_number: u32) -> Result<Vec<Fragment>, Error> {
        page_index(page_number, self.pages.len())?;
        Ok(self.pages.get(&page_number).cloned().unwrap_or_default())
    }
}

/// A match together with the page it was found on.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentMatch {
    /// Page number (1-based).
    pub page_number: u32,
    /// The matched span, in page coordinates.
    pub span: MatchSpan,
}

impl DocumentMatch {
    /// Anchor at the end of the match.
    pub fn end_anchor(&self) -> Result<PageAnchor, Error> {
        Ok(PageAnchor::at_end(self.page_number, &self.span)?)
    }

    /// Anchor at the start of the match.
    pub fn start_anchor(&self) -> Result<PageAnchor, Error> {
        Ok(PageAnchor::at_start(self.page_number, &self.span)?)
    }
}

/// Every page of a document, processed into reading order.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pages: Vec<PageText>,
}

impl Document {
    /// Load every page from `source`, one after another.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the source.
    pub fn load<S: FragmentSource + ?Sized>(source: &S) -> Result<Self, Error> {
        let pages = (1..=source.page_count() as u32)
            .map(|n| load_page(source, n))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { pages })
    }

    /// Load every page concurrently using rayon.
    ///
    /// Pages are independent, so the result is identical to [`Document::load`].
    #[cfg(feature = "parallel")]
    pub fn load_parallel<S: FragmentSource + Sync + ?Sized>(source: &S) -> Result<Self, Error> {
        use rayon::prelude::*;

        let pages = (1..=source.page_count() as u32)
            .into_par_iter()
            .map(|n| load_page(source, n))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { pages })
    }

    /// Build a document from already-processed pages.
    pub fn from_pages(mut pages: Vec<PageText>) -> Self {
        pages.sort_by_key(PageText::page_number);
        Self { pages }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All pages, in page order.
    pub fn pages(&self) -> &[PageText] {
        &self.pages
    }

    /// A page by 1-based number.
    pub fn page(&self, page_number: u32) -> Result<&PageText, Error> {
        self.pages
            .iter()
            .find(|p| p.page_number() == page_number)
            .ok_or(Error::PageOutOfRange {
                page: page_number,
                page_count: self.pages.len(),
            })
    }

    /// The first match of `query`, scanning pages in order.
    pub fn find_first(&self, query: &str) -> Option<DocumentMatch> {
        self.pages.iter().find_map(|page| {
            page.find_first(query).map(|span| DocumentMatch {
                page_number: page.page_number(),
                span,
            })
        })
    }

    /// Every match of `query`, in page order then reading order.
    pub fn find_all(&self, query: &str) -> Vec<DocumentMatch> {
        self.pages
            .iter()
            .flat_map(|page| {
                page.find_all(query).into_iter().map(|span| DocumentMatch {
                    page_number: page.page_number(),
                    span,
                })
            })
            .collect()
    }
}

fn load_page<S: FragmentSource + ?Sized>(source: &S, page_number: u32) -> Result<PageText, Error> {
    let fragments = source.fragments(page_number)?;
    debug!(page = page_number, fragments = fragments.len(), "loaded page");
    Ok(PageText::new(page_number, fragments)?)
}
