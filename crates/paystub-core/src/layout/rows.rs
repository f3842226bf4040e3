//! Row reconstruction from loosely positioned text boxes.

use std::fmt;

use serde::Serialize;
use tracing::trace;

use super::{Cell, TextBox};

/// One visual row of a page: cells ordered left to right.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    /// Build a row from already typed cells.
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// Build a row from raw tokens.
    ///
    /// Tokens containing commas are split in place, then every resulting
    /// token is coerced: `["asdf", "bla,oie", "fdsa"]` yields four cells.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let cells = tokens
            .into_iter()
            .flat_map(|token| {
                token
                    .as_ref()
                    .split(',')
                    .map(Cell::coerce)
                    .collect::<Vec<_>>()
            })
            .collect();

        Self { cells }
    }

    /// All cells in order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// First cell (the row label on a statement).
    pub fn first(&self) -> Option<&Cell> {
        self.cells.first()
    }

    /// Second cell.
    pub fn second(&self) -> Option<&Cell> {
        self.cells.get(1)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether the first cell is the given label.
    pub fn starts_with(&self, label: &str) -> bool {
        self.first().is_some_and(|c| c.is_label(label))
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{}", cell)?;
        }
        Ok(())
    }
}

/// Group text boxes into rows.
///
/// Boxes sharing exactly the same `top` form one row; rows are ordered top to
/// bottom and cells left to right. No tolerance is applied to near-equal
/// positions.
pub fn reconstruct_rows(boxes: &[TextBox]) -> Vec<Row> {
    let mut sorted: Vec<&TextBox> = boxes.iter().collect();
    sorted.sort_by(|a, b| {
        a.top
            .total_cmp(&b.top)
            .then_with(|| a.left.total_cmp(&b.left))
    });

    let rows: Vec<Row> = sorted
        .chunk_by(|a, b| a.top.total_cmp(&b.top).is_eq())
        .map(|group| {
            trace!("row at top={}: {} boxes", group[0].top, group.len());
            Row::from_tokens(group.iter().map(|b| b.value.as_str()))
        })
        .collect();

    rows
}
