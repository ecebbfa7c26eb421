//! Terminal preview of a crosshair.
//!
//! 1. **Rasterize** - paint draw primitives into an RGB buffer
//! 2. **Downsample** - reduce to the character grid
//! 3. **Map** - brightness to characters, or braille dots
//!
//! Outline strokes are black and read as background in text form; the
//! preview shows the colored shape.

mod charset;
mod raster;
mod text;

pub use charset::{CharSet, BLOCKS_CHARSET, MINIMAL_CHARSET, STANDARD_CHARSET};
pub use raster::{rasterize, Raster, BACKGROUND, GRID};
pub use text::{
    downsample, grid_to_braille, map_to_chars, render_braille, rows_for, to_grayscale, to_text,
    BRAILLE_BASE, BRAILLE_THRESHOLD, CHAR_ASPECT_RATIO,
};

use crate::render::{Canvas, DrawPrimitive};

/// Default preview width in terminal columns.
pub const DEFAULT_PREVIEW_COLUMNS: u32 = 44;

/// Widest preview, in terminal columns.
pub const MAX_PREVIEW_COLUMNS: u32 = 1000;

/// Tallest preview, in terminal rows.
pub const MAX_PREVIEW_ROWS: u32 = 1000;

/// How [`preview_lines`] turns a raster into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewOptions {
    pub columns: u32,
    pub charset: CharSet,
    pub invert: bool,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            columns: DEFAULT_PREVIEW_COLUMNS,
            charset: CharSet::Standard,
            invert: false,
        }
    }
}

/// Rasterize `primitives` and return the preview as text lines.
///
/// Columns are capped at [`MAX_PREVIEW_COLUMNS`] and rows at
/// [`MAX_PREVIEW_ROWS`].
pub fn preview_lines(
    primitives: &[DrawPrimitive],
    canvas: Canvas,
    options: &PreviewOptions,
) -> Vec<String> {
    let raster = rasterize(primitives, canvas);
    let columns = options.columns.min(MAX_PREVIEW_COLUMNS);
    let rows = rows_for(&raster, columns).min(MAX_PREVIEW_ROWS);
    to_text(&raster, columns, rows, options.charset, options.invert)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ParameterRecord;
    use crate::render::render;

    #[test]
    fn test_preview_has_requested_shape() {
        let prims = render(&ParameterRecord::DEFAULT, Canvas::PREVIEW);
        let lines = preview_lines(&prims, Canvas::PREVIEW, &PreviewOptions::default());
        assert_eq!(lines.len(), 22);
        assert!(lines.iter().all(|l| l.chars().count() == 44));
    }

    #[test]
    fn test_crosshair_is_visible() {
        let record = ParameterRecord {
            size: 8.0,
            thickness: 3.0,
            gap: 2.0,
            ..ParameterRecord::DEFAULT
        };
        let empty = preview_lines(&[], Canvas::PREVIEW, &PreviewOptions::default());
        let drawn = preview_lines(
            &render(&record, Canvas::PREVIEW),
            Canvas::PREVIEW,
            &PreviewOptions::default(),
        );
        assert_ne!(empty, drawn);
    }

    #[test]
    fn test_oversized_canvas_does_not_overflow() {
        let canvas = Canvas::new(70_000.0, 70_000.0);
        let prims = render(&ParameterRecord::DEFAULT, canvas);
        let lines = preview_lines(&prims, canvas, &PreviewOptions::default());
        assert_eq!(lines.len(), 22);
        assert!(lines.iter().all(|l| l.chars().count() == 44));
    }

    #[test]
    fn test_huge_column_count_is_capped() {
        let options = PreviewOptions {
            columns: 3_000_000_000,
            charset: CharSet::Braille,
            invert: false,
        };
        let prims = render(&ParameterRecord::DEFAULT, Canvas::PREVIEW);
        let lines = preview_lines(&prims, Canvas::PREVIEW, &options);
        assert_eq!(lines.len(), (MAX_PREVIEW_COLUMNS / 2) as usize);
        assert!(lines
            .iter()
            .all(|l| l.chars().count() == MAX_PREVIEW_COLUMNS as usize));
    }
}
