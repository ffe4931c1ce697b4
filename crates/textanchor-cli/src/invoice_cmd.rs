use std::path::Path;

use textanchor::{InvoiceLayout, InvoiceSettings, PageAnchor};

use crate::cli::TextFormat;
use crate::shared::{open_document, print_json};

pub fn run(file: &Path, settings: Option<&Path>, format: &TextFormat) -> Result<(), i32> {
    let settings = load_settings(settings)?;
    let document = open_document(file)?;

    let layout = InvoiceLayout::locate(&document, &settings).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;

    match format {
        TextFormat::Text => {
            println!("field\tname\tpage\tx\ty");
            for item in &layout.items {
                println!("item\t{}\t{}", item.item_id, anchor_columns(item.anchor.as_ref()));
            }
            println!("subtotal\t-\t{}", anchor_columns(layout.subtotal.as_ref()));
            println!(
                "total_funded_amount\t-\t{}",
                anchor_columns(layout.total_funded_amount.as_ref())
            );
            Ok(())
        }
        TextFormat::Json => {
            let json = serde_json::to_value(&layout).map_err(|e| {
                eprintln!("Error: failed to serialize output: {e}");
                1
            })?;
            print_json(&json)
        }
    }
}

fn load_settings(path: Option<&Path>) -> Result<InvoiceSettings, i32> {
    let Some(path) = path else {
        return Ok(InvoiceSettings::default());
    };
    let json = std::fs::read_to_string(path).map_err(|e| {
        eprintln!("Error: failed to read settings {}: {e}", path.display());
        1
    })?;
    InvoiceSettings::from_json(&json).map_err(|e| {
        eprintln!("Error: invalid settings {}: {e}", path.display());
        1
    })
}

/// `page\tx\ty`, or dashes when the location was not identified.
fn anchor_columns(anchor: Option<&PageAnchor>) -> String {
    match anchor {
        Some(a) => format!("{}\t{:.2}\t{:.2}", a.page_number(), a.x(), a.y()),
        None => "-\t-\t-".to_string(),
    }
}
