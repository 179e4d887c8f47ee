use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Axis of a 2-D grid, used to report which half of a request is invalid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeAxis {
    Row,
    Column,
}

impl std::fmt::Display for RangeAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeAxis::Row => write!(f, "row"),
            RangeAxis::Column => write!(f, "column"),
        }
    }
}

/// Rectangular window request in grid coordinates.
///
/// Both ranges are half-open (`start..end`) and may lie partly or wholly
/// outside the grid, including at negative indices. Only the ordering
/// `start < end` is required on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowRequest {
    pub row_start: isize,
    pub row_end: isize,
    pub col_start: isize,
    pub col_end: isize,
}

/// Intersection of a request with a grid, in both coordinate frames
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlap {
    /// Rows of the grid that are copied
    pub src_rows: Range<usize>,
    /// Columns of the grid that are copied
    pub src_cols: Range<usize>,
    /// Rows of the window that receive grid data
    pub dst_rows: Range<usize>,
    /// Columns of the window that receive grid data
    pub dst_cols: Range<usize>,
}

impl WindowRequest {
    /// Create a validated request
    pub fn new(row_start: isize, row_end: isize, col_start: isize, col_end: isize) -> WindowResult<Self> {
        let request = Self {
            row_start,
            row_end,
            col_start,
            col_end,
        };
        request.validate()?;
        Ok(request)
    }

    /// Request of `height x width` cells around `(center_row, center_col)`.
    ///
    /// The center lands at window index `(height / 2, width / 2)`.
    pub fn centered(center_row: isize, center_col: isize, height: usize, width: usize) -> WindowResult<Self> {
        let (row_start, row_end) = centered_span(center_row, height, RangeAxis::Row)
            .ok_or(WindowError::TooLarge {
                rows: height,
                cols: width,
                bands: 1,
            })??;
        let (col_start, col_end) = centered_span(center_col, width, RangeAxis::Column)
            .ok_or(WindowError::TooLarge {
                rows: height,
                cols: width,
                bands: 1,
            })??;
        Self::new(row_start, row_end, col_start, col_end)
    }

    /// Check the ordering of both ranges and that the cell count fits an array.
    ///
    /// The byte size depends on the element type and is checked again by the
    /// extraction functions.
    pub fn validate(&self) -> WindowResult<()> {
        if self.row_end <= self.row_start {
            return Err(WindowError::InvalidRange {
                axis: RangeAxis::Row,
                start: self.row_start,
                end: self.row_end,
            });
        }
        if self.col_end <= self.col_start {
            return Err(WindowError::InvalidRange {
                axis: RangeAxis::Column,
                start: self.col_start,
                end: self.col_end,
            });
        }

        let (rows, cols) = self.shape();
        match rows.checked_mul(cols) {
            Some(cells) if cells <= isize::MAX as usize => Ok(()),
            _ => Err(WindowError::TooLarge { rows, cols, bands: 1 }),
        }
    }

    /// Output shape `(rows, cols)`; only meaningful for a valid request
    pub fn shape(&self) -> (usize, usize) {
        (
            self.row_end.abs_diff(self.row_start),
            self.col_end.abs_diff(self.col_start),
        )
    }

    /// Clip the request against a `rows x cols` grid.
    ///
    /// Returns `None` when the request and the grid share no cell.
    pub fn overlap(&self, rows: usize, cols: usize) -> Option<Overlap> {
        let (src_rows, dst_rows) = clip_axis(self.row_start, self.row_end, rows)?;
        let (src_cols, dst_cols) = clip_axis(self.col_start, self.col_end, cols)?;

        Some(Overlap {
            src_rows,
            src_cols,
            dst_rows,
            dst_cols,
        })
    }
}

impl std::fmt::Display for WindowRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}..{}, {}..{}]",
            self.row_start, self.row_end, self.col_start, self.col_end
        )
    }
}

fn centered_span(center: isize, size: usize, axis: RangeAxis) -> Option<WindowResult<(isize, isize)>> {
    if size == 0 {
        return Some(Err(WindowError::InvalidRange {
            axis,
            start: center,
            end: center,
        }));
    }
    let size = isize::try_from(size).ok()?;
    let start = center.checked_sub(size / 2)?;
    let end = start.checked_add(size)?;
    Some(Ok((start, end)))
}

// Grid lengths never exceed isize::MAX (ndarray invariant).
fn clip_axis(start: isize, end: isize, len: usize) -> Option<(Range<usize>, Range<usize>)> {
    let src_start = start.max(0);
    let src_end = end.min(len as isize);
    if src_start >= src_end {
        return None;
    }

    let dst_start = src_start.abs_diff(start);
    let dst_end = src_end.abs_diff(start);
    Some((src_start as usize..src_end as usize, dst_start..dst_end))
}

/// Error types for window extraction
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    #[error("Invalid {axis} range: end ({end}) must be greater than start ({start})")]
    InvalidRange {
        axis: RangeAxis,
        start: isize,
        end: isize,
    },

    #[error("Window {rows}x{cols}x{bands} is too large to allocate")]
    TooLarge { rows: usize, cols: usize, bands: usize },

    #[error("Output buffer is {actual:?}, expected {expected:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
}

/// Result type for window operations
pub type WindowResult<T> = Result<T, WindowError>;
