//! Invoice layout detection and amount placement.
//!
//! An invoice page has a "Cumulative Cost" column heading, item rows that start
//! with an item id followed by a separator, and "Subtotal" / "Total Funded
//! Amount" labels. [`InvoicePage::parse`] finds where amounts belong on one
//! page; [`InvoiceLayout::locate`] merges those positions across a document
//! and [`InvoiceWriter`] draws formatted amounts there.

use regex::Regex;
use textanchor_core::{PageAnchor, TextChunk, Vector3};
use tracing::{debug, warn};

use crate::document::Document;
use crate::error::Error;
use crate::overlay::{Alignment, OverlaySink, OverlayText};
use crate::page::PageText;

/// Default pattern for a priced item row: a quantity, a unit price and an
/// extended price.
pub const DEFAULT_ITEM_ROW_PATTERN: &str = r".*[0-9]+.[0-9]{2} \$(\d{1,3}(\,\d{3})*|(\d+))(\.\d{2})? \$(\d{1,3}(\,\d{3})*|(\d+))(\.\d{2})?";

/// Labels and placement options used to read an invoice.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InvoiceSettings {
    /// Heading of the column that receives cumulative cost amounts.
    pub cumulative_cost_heading_text: String,
    pub subtotal_label_text: String,
    pub total_funded_amount_label_text: String,
    /// Regex an assembled item row must match in full.
    pub item_row_pattern: String,
    /// Text that ends the item id at the start of an item line.
    pub item_id_separator: String,
    pub cumulative_cost_alignment: Alignment,
    pub cumulative_cost_subtotal_alignment: Alignment,
    pub total_funded_amount_alignment: Alignment,
    /// Distance to the right of the total funded label.
    pub total_funded_amount_offset: f32,
}

impl Default for InvoiceSettings {
    fn default() -> Self {
        Self {
            cumulative_cost_heading_text: "Cumulative Cost".to_string(),
            subtotal_label_text: "Subtotal".to_string(),
            total_funded_amount_label_text: "Total Funded Amount".to_string(),
            item_row_pattern: DEFAULT_ITEM_ROW_PATTERN.to_string(),
            item_id_separator: "|".to_string(),
            cumulative_cost_alignment: Alignment::Right,
            cumulative_cost_subtotal_alignment: Alignment::Right,
            total_funded_amount_alignment: Alignment::Left,
            total_funded_amount_offset: 5.0,
        }
    }
}

impl InvoiceSettings {
    /// Compile the item row pattern, anchored at both ends.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRowPattern`] if the pattern does not compile.
    pub fn compile(&self) -> Result<Regex, Error> {
        Ok(Regex::new(&format!("^(?:{})$", self.item_row_pattern))?)
    }

    /// Parse settings from JSON; absent fields keep their defaults.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let settings: InvoiceSettings = serde_json::from_str(json)?;
        settings.compile()?;
        Ok(settings)
    }
}

/// Amount positions found on a single page.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoicePage {
    page_number: u32,
    /// Item ids in discovery order, with their cumulative cost position.
    items: Vec<(String, Option<Vector3>)>,
    subtotal: Option<Vector3>,
    total_funded_amount: Option<Vector3>,
}

impl InvoicePage {
    /// Locate item rows and totals on `page`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRowPattern`] if the settings' pattern is invalid.
    pub fn parse(page: &PageText, settings: &InvoiceSettings) -> Result<Self, Error> {
        let row_pattern = settings.compile()?;
        Ok(Self::parse_with(page, settings, &row_pattern))
    }

    fn parse_with(page: &PageText, settings: &InvoiceSettings, row_pattern: &Regex) -> Self {
        let page_number = page.page_number();
        let heading = page.find_first(&settings.cumulative_cost_heading_text);
        if heading.is_none() {
            warn!(
                page = page_number,
                heading = %settings.cumulative_cost_heading_text,
                "cumulative cost heading not found"
            );
        }
        // amounts are right-aligned under the heading's end
        let column_x = heading.as_ref().map(|h| h.end_location().x);

        let mut parsed = Self {
            page_number,
            items: Vec::new(),
            subtotal: None,
            total_funded_amount: None,
        };

        let mut pending: Option<String> = None;
        for run in page.runs() {
            if let Some(item_id) = item_id_of(&run, &settings.item_id_separator) {
                parsed.set_item(item_id.clone(), None);
                pending = Some(item_id);
            }
            if let Some(item_id) = pending.as_ref() {
                if row_pattern.is_match(run.text()) {
                    let location = column_x.map(|x| Vector3::planar(x, run.end_location().y));
                    parsed.set_item(item_id.clone(), location);
                    pending = None;
                }
            }
        }

        for (item_id, location) in parsed.items.iter_mut().filter(|(_, l)| l.is_none()) {
            match (column_x, page.find_first(item_id)) {
                (Some(x), Some(span)) => {
                    debug!(page = page_number, item_id = %item_id, "item row located by id");
                    *location = Some(Vector3::planar(x, span.end_location().y));
                }
                _ => warn!(page = page_number, item_id = %item_id, "failed to locate item row"),
            }
        }

        if let Some(label) = page.find_first(&settings.subtotal_label_text) {
            match column_x {
                Some(x) => parsed.subtotal = Some(Vector3::planar(x, label.end_location().y)),
                None => warn!(page = page_number, "subtotal found without cumulative cost column"),
            }
        }

        if let Some(label) = page.find_first(&settings.total_funded_amount_label_text) {
            let end = label.end_location();
            parsed.total_funded_amount = Some(Vector3::planar(
                end.x + settings.total_funded_amount_offset,
                end.y,
            ));
        }

        parsed
    }

    fn set_item(&mut self, item_id: String, location: Option<Vector3>) {
        match self.items.iter_mut().find(|(id, _)| *id == item_id) {
            Some(entry) => entry.1 = location,
            None => self.items.push((item_id, location)),
        }
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    /// Item ids found on this page, in reading order.
    pub fn item_ids(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|(id, _)| id.as_str())
    }

    /// Where the cumulative cost of `item_id` goes, if resolved.
    pub fn item_location(&self, item_id: &str) -> Option<Vector3> {
        self.items
            .iter()
            .find(|(id, _)| id == item_id)
            .and_then(|(_, location)| *location)
    }

    pub fn subtotal_location(&self) -> Option<Vector3> {
        self.subtotal
    }

    pub fn total_funded_amount_location(&self) -> Option<Vector3> {
        self.total_funded_amount
    }
}

/// Text before the separator, when the separator is not the first thing on
/// the line.
fn item_id_of(run: &TextChunk, separator: &str) -> Option<String> {
    if separator.is_empty() {
        return None;
    }
    match run.text().find(separator) {
        Some(idx) if idx > 0 => Some(run.text()[..idx].trim_end().to_string()),
        _ => None,
    }
}

/// One item and where its cumulative cost goes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemLocation {
    pub item_id: String,
    pub anchor: Option<PageAnchor>,
}

/// Amount positions for a whole document.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InvoiceLayout {
    pub items: Vec<ItemLocation>,
    pub subtotal: Option<PageAnchor>,
    pub total_funded_amount: Option<PageAnchor>,
}

impl InvoiceLayout {
    /// Parse every page and merge the results.
    ///
    /// An item resolved on several pages keeps its latest position. The
    /// subtotal and total funded amount keep the first page that has them.
    pub fn locate(document: &Document, settings: &InvoiceSettings) -> Result<Self, Error> {
        let row_pattern = settings.compile()?;
        let mut layout = Self::default();
        for page in document.pages() {
            let parsed = InvoicePage::parse_with(page, settings, &row_pattern);
            layout.merge(&parsed)?;
        }
        Ok(layout)
    }

    fn merge(&mut self, parsed: &InvoicePage) -> Result<(), Error> {
        let page_number = parsed.page_number;
        for (item_id, location) in &parsed.items {
            let anchor = location
                .map(|l| PageAnchor::new(page_number, l))
                .transpose()?;
            match self.items.iter_mut().find(|item| item.item_id == *item_id) {
                Some(item) => {
                    if anchor.is_some() {
                        item.anchor = anchor;
                    }
                }
                None => self.items.push(ItemLocation {
                    item_id: item_id.clone(),
                    anchor,
                }),
            }
        }
        if self.subtotal.is_none() {
            self.subtotal = parsed
                .subtotal
                .map(|l| PageAnchor::new(page_number, l))
                .transpose()?;
        }
        if self.total_funded_amount.is_none() {
            self.total_funded_amount = parsed
                .total_funded_amount
                .map(|l| PageAnchor::new(page_number, l))
                .transpose()?;
        }
        Ok(())
    }

    pub fn item_anchor(&self, item_id: &str) -> Option<&PageAnchor> {
        self.items
            .iter()
            .find(|item| item.item_id == item_id)
            .and_then(|item| item.anchor.as_ref())
    }
}

/// Writes amounts into an invoice.
pub trait InvoiceEditor {
    /// Every item id found in the invoice.
    fn list_item_ids(&self) -> Vec<String>;

    /// Write the cumulative cost on the row of `item_id`.
    fn write_cumulative_cost(&mut self, item_id: &str, amount: f64) -> Result<(), Error>;

    /// Write the cumulative cost subtotal.
    fn write_cumulative_cost_subtotal(&mut self, amount: f64) -> Result<(), Error>;

    /// Write the total funded amount.
    fn write_total_funded_amount(&mut self, amount: f64) -> Result<(), Error>;
}

/// [`InvoiceEditor`] that draws formatted amounts into an [`OverlaySink`].
///
/// Amounts whose location was not identified are skipped with a warning.
#[derive(Debug)]
pub struct InvoiceWriter<S> {
    layout: InvoiceLayout,
    cumulative_cost_alignment: Alignment,
    subtotal_alignment: Alignment,
    total_funded_amount_alignment: Alignment,
    sink: S,
}

impl<S: OverlaySink> InvoiceWriter<S> {
    pub fn new(layout: InvoiceLayout, settings: &InvoiceSettings, sink: S) -> Self {
        Self {
            layout,
            cumulative_cost_alignment: settings.cumulative_cost_alignment,
            subtotal_alignment: settings.cumulative_cost_subtotal_alignment,
            total_funded_amount_alignment: settings.total_funded_amount_alignment,
            sink,
        }
    }

    /// Locate the layout of `document` and write into `sink`.
    pub fn open(document: &Document, settings: &InvoiceSettings, sink: S) -> Result<Self, Error> {
        let layout = InvoiceLayout::locate(document, settings)?;
        Ok(Self::new(layout, settings, sink))
    }

    pub fn layout(&self) -> &InvoiceLayout {
        &self.layout
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn write_at(&mut self, anchor: &PageAnchor, amount: f64, alignment: Alignment) -> Result<(), Error> {
        let command = OverlayText::new(
            anchor.page_number(),
            format_currency(amount),
            alignment,
            anchor.x(),
            anchor.y(),
        );
        self.sink.write_text(command)
    }
}

impl<S: OverlaySink> InvoiceEditor for InvoiceWriter<S> {
    fn list_item_ids(&self) -> Vec<String> {
        self.layout.items.iter().map(|item| item.item_id.clone()).collect()
    }

    fn write_cumulative_cost(&mut self, item_id: &str, amount: f64) -> Result<(), Error> {
        match self.layout.item_anchor(item_id).copied() {
            Some(anchor) => self.write_at(&anchor, amount, self.cumulative_cost_alignment),
            None => {
                warn!(item_id, "failed to write the cumulative cost: location not identified");
                Ok(())
            }
        }
    }

    fn write_cumulative_cost_subtotal(&mut self, amount: f64) -> Result<(), Error> {
        match self.layout.subtotal {
            Some(anchor) => self.write_at(&anchor, amount, self.subtotal_alignment),
            None => {
                warn!("failed to write the cumulative cost subtotal: location not identified");
                Ok(())
            }
        }
    }

    fn write_total_funded_amount(&mut self, amount: f64) -> Result<(), Error> {
        match self.layout.total_funded_amount {
            Some(anchor) => self.write_at(&anchor, amount, self.total_funded_amount_alignment),
            None => {
                warn!("failed to write the total funded amount: location not identified");
                Ok(())
            }
        }
    }
}

/// Format `amount` as US currency, e.g. `$1,234.56` or `-$5.00`.
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = (cents / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, c) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::RecordingSink;
    use textanchor_core::Fragment;

    fn frag(text: &str, x0: f32, x1: f32, y: f32) -> Fragment {
        Fragment::new(text, Vector3::planar(x0, y), Vector3::planar(x1, y), 2.5)
    }

    fn invoice_page(page_number: u32) -> PageText {
        PageText::new(
            page_number,
            vec![
                frag("Cumulative Cost", 400.0, 480.0, 650.0),
                frag("BOOK | Paperback", 72.0, 200.0, 600.0),
                frag("2 5.00 $10.00 $10.00", 72.0, 300.0, 590.0),
                frag("GB3-White | Gift box", 72.0, 200.0, 560.0),
                frag("Subtotal", 72.0, 120.0, 300.0),
                frag("Total Funded Amount", 72.0, 190.0, 250.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_default_settings() {
        let settings = InvoiceSettings::default();
        assert_eq!(settings.cumulative_cost_heading_text, "Cumulative Cost");
        assert_eq!(settings.subtotal_label_text, "Subtotal");
        assert_eq!(settings.total_funded_amount_label_text, "Total Funded Amount");
        assert_eq!(settings.item_id_separator, "|");
        assert_eq!(settings.cumulative_cost_alignment, Alignment::Right);
        assert_eq!(settings.cumulative_cost_subtotal_alignment, Alignment::Right);
        assert_eq!(settings.total_funded_amount_alignment, Alignment::Left);
        assert_eq!(settings.total_funded_amount_offset, 5.0);
    }

    #[test]
    fn test_default_row_pattern_matches_whole_row() {
        let regex = InvoiceSettings::default().compile().unwrap();
        assert!(regex.is_match("2 5.00 $10.00 $10.00"));
        assert!(regex.is_match("Widgets 12 1,000.00 $1,000.00 $12,000.00"));
        assert!(!regex.is_match("2 5.00 $10.00 $10.00 trailing"));
        assert!(!regex.is_match("Subtotal"));
    }

    #[test]
    fn test_invalid_row_pattern() {
        let settings = InvoiceSettings {
            item_row_pattern: "(".to_string(),
            ..InvoiceSettings::default()
        };
        assert!(matches!(settings.compile(), Err(Error::InvalidRowPattern(_))));
        assert!(InvoicePage::parse(&invoice_page(1), &settings).is_err());
    }

    #[test]
    fn test_parse_finds_rows_and_totals() {
        let parsed = InvoicePage::parse(&invoice_page(1), &InvoiceSettings::default()).unwrap();
        assert_eq!(parsed.page_number(), 1);
        assert_eq!(parsed.item_ids().collect::<Vec<_>>(), vec!["BOOK", "GB3-White"]);
        // priced row below the id line
        assert_eq!(parsed.item_location("BOOK"), Some(Vector3::planar(480.0, 590.0)));
        // no priced row: falls back to the id's own line
        assert_eq!(parsed.item_location("GB3-White"), Some(Vector3::planar(480.0, 560.0)));
        assert_eq!(parsed.subtotal_location(), Some(Vector3::planar(480.0, 300.0)));
        assert_eq!(parsed.total_funded_amount_location(), Some(Vector3::planar(195.0, 250.0)));
    }

    #[test]
    fn test_row_on_the_item_line() {
        let page = PageText::new(
            1,
            vec![
                frag("Cumulative Cost", 400.0, 480.0, 650.0),
                frag("PM-BR | Pen 1 2.00 $2.00 $2.00", 72.0, 380.0, 600.0),
            ],
        )
        .unwrap();
        let parsed = InvoicePage::parse(&page, &InvoiceSettings::default()).unwrap();
        assert_eq!(parsed.item_location("PM-BR"), Some(Vector3::planar(480.0, 600.0)));
    }

    #[test]
    fn test_separator_at_line_start_is_not_an_item() {
        let page = PageText::new(1, vec![frag("| note", 72.0, 120.0, 600.0)]).unwrap();
        let parsed = InvoicePage::parse(&page, &InvoiceSettings::default()).unwrap();
        assert_eq!(parsed.item_ids().count(), 0);
    }

    #[test]
    fn test_missing_heading_leaves_column_unresolved() {
        let page = PageText::new(
            1,
            vec![
                frag("BOOK | Paperback", 72.0, 200.0, 600.0),
                frag("Subtotal", 72.0, 120.0, 300.0),
                frag("Total Funded Amount", 72.0, 190.0, 250.0),
            ],
        )
        .unwrap();
        let parsed = InvoicePage::parse(&page, &InvoiceSettings::default()).unwrap();
        assert_eq!(parsed.item_ids().collect::<Vec<_>>(), vec!["BOOK"]);
        assert_eq!(parsed.item_location("BOOK"), None);
        assert_eq!(parsed.subtotal_location(), None);
        assert!(parsed.total_funded_amount_location().is_some());
    }

    #[test]
    fn test_currency_formatting() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(100.0), "$100.00");
        assert_eq!(format_currency(999.99), "$999.99");
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(14573.0), "$14,573.00");
        assert_eq!(format_currency(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_currency(-5.0), "-$5.00");
        assert_eq!(format_currency(-0.001), "$0.00");
    }

    #[test]
    fn test_writer_draws_formatted_amounts() {
        let document = Document::from_pages(vec![invoice_page(1)]);
        let settings = InvoiceSettings::default();
        let mut writer = InvoiceWriter::open(&document, &settings, RecordingSink::new()).unwrap();
        assert_eq!(writer.list_item_ids(), vec!["BOOK", "GB3-White"]);

        writer.write_cumulative_cost("BOOK", 100.0).unwrap();
        writer.write_cumulative_cost("UNKNOWN", 1.0).unwrap();
        writer.write_cumulative_cost_subtotal(100.0).unwrap();
        writer.write_total_funded_amount(999.99).unwrap();

        let commands = writer.into_sink().into_commands();
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0], OverlayText::new(1, "$100.00", Alignment::Right, 480.0, 590.0));
        assert_eq!(commands[1].y, 300.0);
        assert_eq!(commands[2], OverlayText::new(1, "$999.99", Alignment::Left, 195.0, 250.0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_settings_from_json_keeps_defaults() {
        let settings = InvoiceSettings::from_json(r#"{"subtotal_label_text":"Sub Total","cumulative_cost_alignment":"center"}"#)
            .unwrap();
        assert_eq!(settings.subtotal_label_text, "Sub Total");
        assert_eq!(settings.cumulative_cost_alignment, Alignment::Center);
        assert_eq!(settings.item_id_separator, "|");
        assert!(InvoiceSettings::from_json(r#"{"item_row_pattern":"("}"#).is_err());
    }
}
