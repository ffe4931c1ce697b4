//! Error type for textanchor-core.
//!
//! Locating text never fails: a missing match is `None` or an empty list.
//! [`CoreError`] only covers invalid values handed to constructors.

use std::fmt;

/// Errors raised by core constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Page numbers are 1-based; the given value was out of range.
    InvalidPageNumber(u32),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::InvalidPageNumber(page) => {
                write!(f, "invalid page number: {page} (pages start at 1)")
            }
        }
    }
}

impl std::error::Error for CoreError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invalid_page() {
        let err = CoreError::InvalidPageNumber(0);
        assert_eq!(err.to_string(), "invalid page number: 0 (pages start at 1)");
    }

    #[test]
    fn test_implements_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(CoreError::InvalidPageNumber(0));
        assert!(err.to_string().contains("page"));
    }
}
