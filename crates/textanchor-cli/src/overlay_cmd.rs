use std::path::Path;

use textanchor::{Alignment, RecordingSink, write_text_at_offset};

use crate::shared::{open_document, print_json};

pub fn run(
    file: &Path,
    text: &str,
    reference: &str,
    offset: f32,
    align: Alignment,
    all: bool,
) -> Result<(), i32> {
    let document = open_document(file)?;

    let mut sink = RecordingSink::new();
    let written = write_text_at_offset(&document, &mut sink, text, reference, offset, align, all)
        .map_err(|e| {
            eprintln!("Error: {e}");
            1
        })?;
    if written == 0 {
        eprintln!("Warning: reference text '{reference}' not found");
    }

    let json = serde_json::to_value(sink.commands()).map_err(|e| {
        eprintln!("Error: failed to serialize output: {e}");
        1
    })?;
    print_json(&json)
}
