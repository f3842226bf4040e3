//! Layout reconstruction: positioned text boxes to typed rows.

mod cell;
mod rows;
pub mod xml;

pub use cell::Cell;
pub use rows::{Row, reconstruct_rows};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// Result type for layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// A fragment of text at a position on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    /// Vertical position of the top edge.
    pub top: f64,
    /// Horizontal position of the left edge.
    pub left: f64,
    /// Text content.
    pub value: String,
}

impl TextBox {
    pub fn new(top: f64, left: f64, value: impl Into<String>) -> Self {
        Self {
            top,
            left,
            value: value.into(),
        }
    }
}

/// Text boxes of a single converted page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page number as written by the converter (1-based).
    pub number: u32,
    /// All text boxes on the page, in document order.
    pub boxes: Vec<TextBox>,
}

impl Page {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            boxes: Vec::new(),
        }
    }
}

/// A converted document, pages keyed by their number.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pages: BTreeMap<u32, Page>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Look up a page by its number.
    pub fn page(&self, number: u32) -> Result<&Page> {
        self.pages
            .get(&number)
            .ok_or(LayoutError::MissingPage(number))
    }

    /// Take ownership of a page by its number.
    pub fn into_page(mut self, number: u32) -> Result<Page> {
        self.pages
            .remove(&number)
            .ok_or(LayoutError::MissingPage(number))
    }
}
