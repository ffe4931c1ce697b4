use std::path::Path;

use textanchor::{Document, DocumentMatch};

use crate::cli::OutputFormat;
use crate::shared::{csv_escape, open_document, print_json, resolve_pages, span_json};

pub fn run(
    file: &Path,
    query: &str,
    all: bool,
    pages: Option<&str>,
    format: &OutputFormat,
) -> Result<(), i32> {
    let document = open_document(file)?;
    let page_numbers = resolve_pages(pages, document.page_count())?;
    let matches = collect_matches(&document, &page_numbers, query, all)?;

    match format {
        OutputFormat::Text => {
            println!("page\ttext\tstart_x\tstart_y\tend_x\tend_y");
            for m in &matches {
                let (start, end) = (m.span.start_location(), m.span.end_location());
                println!(
                    "{}\t{}\t{:.2}\t{:.2}\t{:.2}\t{:.2}",
                    m.page_number,
                    m.span.text(),
                    start.x,
                    start.y,
                    end.x,
                    end.y,
                );
            }
            Ok(())
        }
        OutputFormat::Json => {
            let rows: Vec<serde_json::Value> = matches
                .iter()
                .map(|m| span_json(m.page_number, &m.span))
                .collect();
            print_json(&serde_json::Value::Array(rows))
        }
        OutputFormat::Csv => {
            println!("page,text,start_x,start_y,end_x,end_y");
            for m in &matches {
                let (start, end) = (m.span.start_location(), m.span.end_location());
                println!(
                    "{},{},{:.2},{:.2},{:.2},{:.2}",
                    m.page_number,
                    csv_escape(m.span.text()),
                    start.x,
                    start.y,
                    end.x,
                    end.y,
                );
            }
            Ok(())
        }
    }
}

/// First match per page, or every match with `all`.
fn collect_matches(
    document: &Document,
    page_numbers: &[u32],
    query: &str,
    all: bool,
) -> Result<Vec<DocumentMatch>, i32> {
    let mut matches = Vec::new();

    for &number in page_numbers {
        let page = document.page(number).map_err(|e| {
            eprintln!("Error reading page {number}: {e}");
            1
        })?;

        let spans = if all {
            page.find_all(query)
        } else {
            page.find_first(query).into_iter().collect()
        };
        matches.extend(spans.into_iter().map(|span| DocumentMatch {
            page_number: number,
            span,
        }));
    }

    Ok(matches)
}
