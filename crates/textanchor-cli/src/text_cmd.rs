use std::path::Path;

use crate::cli::TextFormat;
use crate::shared::{open_document, print_json, resolve_pages};

pub fn run(file: &Path, pages: Option<&str>, format: &TextFormat) -> Result<(), i32> {
    let document = open_document(file)?;
    let page_numbers = resolve_pages(pages, document.page_count())?;

    for &number in &page_numbers {
        let page = document.page(number).map_err(|e| {
            eprintln!("Error reading page {number}: {e}");
            1
        })?;

        match format {
            TextFormat::Text => {
                println!("--- Page {number} ---");
                println!("{}", page.extract_text());
            }
            TextFormat::Json => {
                let assembled = page.runs();
                let runs: Vec<&str> = assembled.iter().map(|r| r.text()).collect();
                print_json(&serde_json::json!({
                    "page": number,
                    "text": runs.join("\n"),
                    "runs": runs,
                }))?;
            }
        }
    }

    Ok(())
}
