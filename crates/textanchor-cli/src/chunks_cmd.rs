use std::path::Path;

use textanchor::{Document, TextChunk};

use crate::cli::OutputFormat;
use crate::shared::{csv_escape, open_document, print_json, resolve_pages};

pub fn run(file: &Path, pages: Option<&str>, format: &OutputFormat) -> Result<(), i32> {
    let document = open_document(file)?;
    let page_numbers = resolve_pages(pages, document.page_count())?;

    match format {
        OutputFormat::Text => write_text(&document, &page_numbers),
        OutputFormat::Json => write_json(&document, &page_numbers),
        OutputFormat::Csv => write_csv(&document, &page_numbers),
    }
}

/// Chunks of each requested page, tagged with the page number.
fn page_chunks<'a>(document: &'a Document, page_numbers: &[u32]) -> Result<Vec<(u32, &'a [TextChunk])>, i32> {
    page_numbers
        .iter()
        .map(|&number| {
            document
                .page(number)
                .map(|page| (number, page.chunks()))
                .map_err(|e| {
                    eprintln!("Error reading page {number}: {e}");
                    1
                })
        })
        .collect()
}

fn write_text(document: &Document, page_numbers: &[u32]) -> Result<(), i32> {
    println!("page\ttext\tx0\ty0\tx1\ty1\torientation\tperp\tpar_start\tpar_end");

    for (number, chunks) in page_chunks(document, page_numbers)? {
        for c in chunks {
            let (start, end) = (c.start_location(), c.end_location());
            println!(
                "{}\t{}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{}\t{}\t{:.2}\t{:.2}",
                number,
                c.text(),
                start.x,
                start.y,
                end.x,
                end.y,
                c.orientation_key(),
                c.perp_offset(),
                c.parallel_start(),
                c.parallel_end(),
            );
        }
    }
    Ok(())
}

fn write_json(document: &Document, page_numbers: &[u32]) -> Result<(), i32> {
    let mut all = Vec::new();

    for (number, chunks) in page_chunks(document, page_numbers)? {
        for c in chunks {
            let (start, end) = (c.start_location(), c.end_location());
            all.push(serde_json::json!({
                "page": number,
                "text": c.text(),
                "x0": start.x,
                "y0": start.y,
                "x1": end.x,
                "y1": end.y,
                "char_space_width": c.char_space_width(),
                "orientation": c.orientation_key(),
                "perp": c.perp_offset(),
                "par_start": c.parallel_start(),
                "par_end": c.parallel_end(),
            }));
        }
    }

    print_json(&serde_json::Value::Array(all))
}

fn write_csv(document: &Document, page_numbers: &[u32]) -> Result<(), i32> {
    println!("page,text,x0,y0,x1,y1,orientation,perp,par_start,par_end");

    for (number, chunks) in page_chunks(document, page_numbers)? {
        for c in chunks {
            let (start, end) = (c.start_location(), c.end_location());
            println!(
                "{},{},{:.2},{:.2},{:.2},{:.2},{},{},{:.2},{:.2}",
                number,
                csv_escape(c.text()),
                start.x,
                start.y,
                end.x,
                end.y,
                c.orientation_key(),
                c.perp_offset(),
                c.parallel_start(),
                c.parallel_end(),
            );
        }
    }
    Ok(())
}
