/// Parse a page range string like "1,3-5" into sorted, de-duplicated page
/// numbers.
///
/// Pages are 1-based on both sides. Returns an error for page 0, pages past
/// `page_count`, reversed ranges, and anything that is not a number.
pub fn parse_page_range(input: &str, page_count: usize) -> Result<Vec<u32>, String> {
    let mut pages = Vec::new();

    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.split_once('-') {
            Some((start, end)) => {
                let start = page_number(start, page_count)?;
                let end = page_number(end, page_count)?;
                if start > end {
                    return Err(format!("invalid page range: '{part}'"));
                }
                pages.extend(start..=end);
            }
            None => pages.push(page_number(part, page_count)?),
        }
    }

    pages.sort_unstable();
    pages.dedup();
    Ok(pages)
}

fn page_number(text: &str, page_count: usize) -> Result<u32, String> {
    let text = text.trim();
    let page: u32 = text
        .parse()
        .map_err(|_| format!("invalid page number: '{text}'"))?;
    if page == 0 {
        return Err("page 0 is invalid (pages start at 1)".to_string());
    }
    if page as usize > page_count {
        return Err(format!(
            "page {page} exceeds document page count ({page_count})"
        ));
    }
    Ok(page)
}
