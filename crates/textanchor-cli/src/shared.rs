use std::io::{self, IsTerminal, Write};
use std::path::Path;

use textanchor::{Document, FragmentDump, FragmentSource, PageText, TextChunk};

use crate::page_range::parse_page_range;

/// Load a fragment dump and process every page, with user-friendly errors.
///
/// Page processing is reported on stderr when it is a terminal.
///
/// Returns `Err(1)` with a message printed to stderr if the file is missing
/// or is not a valid dump.
pub fn open_document(file: &Path) -> Result<Document, i32> {
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }

    let dump = FragmentDump::open_file(file).map_err(|e| {
        eprintln!("Error: failed to read fragment dump: {e}");
        1
    })?;

    let page_count = dump.page_count();
    let progress = ProgressReporter::new(page_count);
    let mut pages = Vec::with_capacity(page_count);
    for number in 1..=page_count as u32 {
        progress.report(number as usize);
        let page = dump
            .fragments(number)
            .and_then(|fragments| Ok(PageText::new(number, fragments)?))
            .map_err(|e| {
                eprintln!("Error: failed to load page {number}: {e}");
                1
            })?;
        pages.push(page);
    }
    progress.finish();

    Ok(Document::from_pages(pages))
}

/// Resolve an optional page range string into 1-based page numbers.
///
/// If `pages` is `None`, returns every page.
pub fn resolve_pages(pages: Option<&str>, page_count: usize) -> Result<Vec<u32>, i32> {
    match pages {
        Some(range) => parse_page_range(range, page_count).map_err(|e| {
            eprintln!("Error: {e}");
            1
        }),
        None => Ok((1..=page_count as u32).collect()),
    }
}

/// Escape a string for CSV output.
///
/// If the text contains commas, double quotes, or newlines, wraps it in
/// double quotes and escapes any internal double quotes by doubling them.
pub fn csv_escape(text: &str) -> String {
    if text.contains(',') || text.contains('"') || text.contains('\n') {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

/// Print a JSON value on one line.
pub fn print_json(value: &serde_json::Value) -> Result<(), i32> {
    let json = serde_json::to_string(value).map_err(|e| {
        eprintln!("Error: failed to serialize output: {e}");
        1
    })?;
    println!("{json}");
    Ok(())
}

/// Start and end of a chunk as a JSON object.
pub fn span_json(page_number: u32, chunk: &TextChunk) -> serde_json::Value {
    let start = chunk.start_location();
    let end = chunk.end_location();
    serde_json::json!({
        "page": page_number,
        "text": chunk.text(),
        "start_x": start.x,
        "start_y": start.y,
        "end_x": end.x,
        "end_y": end.y,
    })
}

/// Prints "Loading page N/M..." to stderr, but only when stderr is a
/// terminal.
pub struct ProgressReporter {
    total: usize,
    is_tty: bool,
}

impl ProgressReporter {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            is_tty: io::stderr().is_terminal(),
        }
    }

    /// Report progress for the `current`th page loaded (1-based).
    pub fn report(&self, current: usize) {
        if self.is_tty {
            eprint!("\rLoading page {}/{}...", current, self.total);
            let _ = io::stderr().flush();
        }
    }

    /// Clear the progress line.
    pub fn finish(&self) {
        if self.is_tty && self.total > 0 {
            eprint!("\r\x1b[K");
            let _ = io::stderr().flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textanchor::{Fragment, Vector3};

    #[test]
    fn test_csv_escape_plain() {
        assert_eq!(csv_escape("Subtotal"), "Subtotal");
    }

    #[test]
    fn test_csv_escape_comma_and_quote() {
        assert_eq!(csv_escape("$1,000.00"), "\"$1,000.00\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_resolve_all_pages() {
        assert_eq!(resolve_pages(None, 3).unwrap(), vec![1, 2, 3]);
        assert_eq!(resolve_pages(Some("2"), 3).unwrap(), vec![2]);
        assert_eq!(resolve_pages(Some("4"), 3), Err(1));
    }

    #[test]
    fn test_span_json_fields() {
        let chunk = Fragment::new("Total", Vector3::planar(10.0, 20.0), Vector3::planar(40.0, 20.0), 2.0)
            .into_chunk();
        let json = span_json(2, &chunk);
        assert_eq!(json["page"], 2);
        assert_eq!(json["text"], "Total");
        assert_eq!(json["end_x"], 40.0);
    }

    #[test]
    fn test_open_document_loads_every_page() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"pages":[{{"page":2,"fragments":[{{"text":"Total","start":{{"x":0.0,"y":0.0,"z":0.0}},"end":{{"x":20.0,"y":0.0,"z":0.0}},"char_space_width":1.0}}]}},{{"page":1,"fragments":[]}}]}}"#
        )
        .unwrap();
        let document = open_document(file.path()).unwrap();
        assert_eq!(document.page_count(), 2);
        assert_eq!(document.find_first("Total").unwrap().page_number, 2);
    }

    #[test]
    fn test_sparse_dump_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"pages":[{{"page":4000000000,"fragments":[]}}]}}"#).unwrap();
        assert_eq!(open_document(file.path()).err(), Some(1));
    }

    #[test]
    fn test_missing_file_is_error() {
        assert_eq!(open_document(Path::new("/nonexistent/dump.json")).err(), Some(1));
    }
}
