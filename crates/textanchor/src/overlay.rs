//! Overlay text placement relative to located reference text.

use std::fmt;
use std::str::FromStr;

use tracing::warn;

use crate::document::Document;
use crate::error::Error;

/// Horizontal alignment of overlay text about its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Alignment {
    /// Text starts at the anchor.
    #[default]
    Left,
    /// Text ends at the anchor.
    Right,
    /// Text is centered on the anchor.
    Center,
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alignment::Left => write!(f, "left"),
            Alignment::Right => write!(f, "right"),
            Alignment::Center => write!(f, "center"),
        }
    }
}

impl FromStr for Alignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Alignment::Left),
            "right" => Ok(Alignment::Right),
            "center" | "centre" => Ok(Alignment::Center),
            other => Err(format!("unknown alignment '{other}'")),
        }
    }
}

/// A single text drawing command.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverlayText {
    /// Page number (1-based).
    pub page_number: u32,
    pub text: String,
    pub alignment: Alignment,
    pub x: f32,
    pub y: f32,
    /// Rotation in degrees.
    pub rotation: f32,
}

impl OverlayText {
    /// An unrotated command.
    pub fn new(page_number: u32, text: impl Into<String>, alignment: Alignment, x: f32, y: f32) -> Self {
        Self {
            page_number,
            text: text.into(),
            alignment,
            x,
            y,
            rotation: 0.0,
        }
    }
}

/// Receives drawing commands, e.g. a PDF stamper.
pub trait OverlaySink {
    fn write_text(&mut self, command: OverlayText) -> Result<(), Error>;
}

impl<S: OverlaySink + ?Sized> OverlaySink for &mut S {
    fn write_text(&mut self, command: OverlayText) -> Result<(), Error> {
        (**self).write_text(command)
    }
}

/// A sink that keeps every command in memory.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecordingSink {
    commands: Vec<OverlayText>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands in the order they were written.
    pub fn commands(&self) -> &[OverlayText] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<OverlayText> {
        self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl OverlaySink for RecordingSink {
    fn write_text(&mut self, command: OverlayText) -> Result<(), Error> {
        self.commands.push(command);
        Ok(())
    }
}

/// Draw `text` to the right of `reference` on every page.
///
/// The command is placed at the end of the match, shifted by `offset` along
/// x. Only the first match per page is used unless `find_all` is set. Matched
/// spans may extend beyond the reference text, so the offset may need tuning
/// for a given layout.
///
/// Returns the number of commands written; pages without the reference are
/// skipped.
///
/// # Errors
///
/// Stops at the first error returned by `sink`.
pub fn write_text_at_offset<S: OverlaySink + ?Sized>(
    document: &Document,
    sink: &mut S,
    text: &str,
    reference: &str,
    offset: f32,
    alignment: Alignment,
    find_all: bool,
) -> Result<usize, Error> {
    let mut written = 0;
    for page in document.pages() {
        let spans = if find_all {
            page.find_all(reference)
        } else {
            page.find_first(reference).into_iter().collect()
        };
        for span in spans {
            let end = span.end_location();
            let command = OverlayText::new(page.page_number(), text, alignment, end.x + offset, end.y);
            if let Err(err) = sink.write_text(command) {
                warn!(page = page.page_number(), %err, "overlay write failed");
                return Err(err);
            }
            written += 1;
        }
    }
    Ok(written)
}
