use crate::unit::Length;

/// Overall geometry computed by a layout strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalleryDimensions {
    pub width: f64,
    pub height: f64,
    /// Height of the title band across the top.
    pub title_band: f64,
    pub cell_width: f64,
    pub cell_height: f64,
}

const TITLE_BAND: f64 = 50.0;

/// How a gallery arranges its cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GalleryLayout {
    /// All cells in one row.
    SingleRow { cell_width: f64, cell_height: f64 },
    /// cols x rows grid. Cell positions are computed as fractions of the
    /// content box rather than by accumulating cell widths, so rounding
    /// never drifts across a row.
    Grid { cols: usize, rows: usize, cell_width: f64, cell_height: f64 },
    /// One column with explicit spacing between rows.
    VerticalStack { cell_width: f64, cell_height: f64, spacing: f64 },
}

impl GalleryLayout {
    /// Overall dimensions for `n` cells.
    pub fn dimensions(&self, n: usize) -> GalleryDimensions {
        match *self {
            GalleryLayout::SingleRow { cell_width, cell_height } => GalleryDimensions {
                width: cell_width * n.max(1) as f64,
                height: TITLE_BAND + cell_height,
                title_band: TITLE_BAND,
                cell_width,
                cell_height,
            },
            GalleryLayout::Grid { cols, rows, cell_width, cell_height } => GalleryDimensions {
                width: cell_width * cols.max(1) as f64,
                height: TITLE_BAND + cell_height * rows.max(1) as f64,
                title_band: TITLE_BAND,
                cell_width,
                cell_height,
            },
            GalleryLayout::VerticalStack { cell_width, cell_height, spacing } => {
                let n = n.max(1) as f64;
                GalleryDimensions {
                    width: cell_width,
                    height: TITLE_BAND + cell_height * n + spacing * (n - 1.0),
                    title_band: TITLE_BAND,
                    cell_width,
                    cell_height,
                }
            }
        }
    }

    /// Top-left corner of cell `i`, relative to the content box (the title
    /// band is added by the engine).
    pub fn cell_position(&self, i: usize) -> (f64, f64) {
        match *self {
            GalleryLayout::SingleRow { cell_width, .. } => (cell_width * i as f64, 0.0),
            GalleryLayout::Grid { cols, cell_width, cell_height, .. } => {
                let cols = cols.max(1);
                let col = i % cols;
                let row = i / cols;
                // Each column edge is a percentage of the full content
                // width resolved at the end, so positions never accumulate
                // per-cell rounding.
                let total = cell_width * cols as f64;
                let x = Length::percent(100.0 * col as f64 / cols as f64).resolve(total, 0.0);
                (x, cell_height * row as f64)
            }
            GalleryLayout::VerticalStack { cell_height, spacing, .. } => {
                (0.0, (cell_height + spacing) * i as f64)
            }
        }
    }
}
