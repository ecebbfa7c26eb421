//! Raster to terminal text: luminance, downsampling, character mapping and
//! braille.

use super::charset::CharSet;
use super::raster::Raster;

/// Braille base character (U+2800, empty pattern).
pub const BRAILLE_BASE: char = '\u{2800}';

/// Luminance above which a braille dot is lit. Sits above the preview
/// background and grid.
pub const BRAILLE_THRESHOLD: u8 = 48;

/// Terminal cells are roughly twice as tall as wide.
pub const CHAR_ASPECT_RATIO: f64 = 2.0;

/// ITU-R BT.601 luminance with integer math (coefficients scaled by 1000).
pub fn to_grayscale(raster: &Raster) -> Vec<u8> {
    raster
        .data
        .chunks_exact(3)
        .map(|rgb| {
            let (r, g, b) = (u32::from(rgb[0]), u32::from(rgb[1]), u32::from(rgb[2]));
            ((299 * r + 587 * g + 114 * b) / 1000) as u8
        })
        .collect()
}

/// Area-average `gray` down to `out_w` x `out_h` cells.
///
/// # Arguments
///
/// * `gray` - Row-major luminance, `width * height` samples
/// * `width`, `height` - Source dimensions
/// * `out_w`, `out_h` - Target dimensions
///
/// # Returns
///
/// `out_w * out_h` averaged samples, or an empty vector if any dimension
/// is zero or `gray` is too short for the source dimensions.
pub fn downsample(gray: &[u8], width: u32, height: u32, out_w: u32, out_h: u32) -> Vec<u8> {
    let (width, height) = (width as usize, height as usize);
    let (out_w, out_h) = (out_w as usize, out_h as usize);
    if width == 0 || height == 0 || out_w == 0 || out_h == 0 {
        return Vec::new();
    }
    if width.checked_mul(height).map_or(true, |n| gray.len() < n) {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(out_w.saturating_mul(out_h));
    for cy in 0..out_h {
        let y0 = span_start(cy, height, out_h);
        let y1 = span_start(cy + 1, height, out_h).max(y0 + 1).min(height);
        for cx in 0..out_w {
            let x0 = span_start(cx, width, out_w);
            let x1 = span_start(cx + 1, width, out_w).max(x0 + 1).min(width);

            let mut sum = 0u64;
            let mut count = 0u64;
            for y in y0..y1 {
                for x in x0..x1 {
                    sum += u64::from(gray[y * width + x]);
                    count += 1;
                }
            }
            out.push(if count == 0 { 0 } else { (sum / count) as u8 });
        }
    }
    out
}

// First source index covered by output cell `i`.
fn span_start(i: usize, len: usize, out_len: usize) -> usize {
    (i as u128 * len as u128 / out_len as u128) as usize
}

/// Map brightness to characters from a darkest-first ramp.
pub fn map_to_chars(brightness: &[u8], charset: &[char], invert: bool) -> Vec<char> {
    if charset.is_empty() {
        return vec![' '; brightness.len()];
    }

    let levels = charset.len();
    brightness
        .iter()
        .map(|&b| {
            let b = if invert { 255 - b } else { b };
            charset[(b as usize * (levels - 1)) / 255]
        })
        .collect()
}

/// Convert a 2x4 dot grid (`grid[x][y]`) into a braille character.
///
/// ```text
/// [0,0]=1   [1,0]=8
/// [0,1]=2   [1,1]=16
/// [0,2]=4   [1,2]=32
/// [0,3]=64  [1,3]=128
/// ```
pub fn grid_to_braille(grid: [[bool; 4]; 2]) -> char {
    const BITS: [[u8; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];

    let mut code = 0u32;
    for (column, bits) in grid.iter().zip(BITS.iter()) {
        for (&on, &bit) in column.iter().zip(bits.iter()) {
            if on {
                code |= u32::from(bit);
            }
        }
    }
    char::from_u32(BRAILLE_BASE as u32 + code).unwrap_or(BRAILLE_BASE)
}

/// Render grayscale data as braille, one character per 2x4 sample block.
pub fn render_braille(
    gray: &[u8],
    width: u32,
    height: u32,
    cols: u32,
    rows: u32,
    threshold: u8,
    invert: bool,
) -> Vec<char> {
    let (Some(dot_w), Some(dot_h)) = (cols.checked_mul(2), rows.checked_mul(4)) else {
        return Vec::new();
    };
    let dots = downsample(gray, width, height, dot_w, dot_h);
    if dots.is_empty() {
        return Vec::new();
    }

    let (cols, rows, dot_w) = (cols as usize, rows as usize, dot_w as usize);
    let mut out = Vec::with_capacity(cols.saturating_mul(rows));
    for cy in 0..rows {
        for cx in 0..cols {
            let mut grid = [[false; 4]; 2];
            for (dx, column) in grid.iter_mut().enumerate() {
                for (dy, dot) in column.iter_mut().enumerate() {
                    let x = cx * 2 + dx;
                    let y = cy * 4 + dy;
                    let lum = dots[y * dot_w + x];
                    *dot = (lum > threshold) != invert;
                }
            }
            out.push(grid_to_braille(grid));
        }
    }
    out
}

/// Rows that keep the raster's aspect for `cols` terminal columns.
pub fn rows_for(raster: &Raster, cols: u32) -> u32 {
    if raster.width == 0 {
        return 0;
    }
    let rows =
        f64::from(cols) * f64::from(raster.height) / f64::from(raster.width) / CHAR_ASPECT_RATIO;
    (rows.round() as u32).max(1)
}

/// Render a raster as `rows` lines of `cols` characters.
///
/// Callers bound `cols` and `rows`; see [`crate::preview::preview_lines`].
pub fn to_text(
    raster: &Raster,
    cols: u32,
    rows: u32,
    charset: CharSet,
    invert: bool,
) -> Vec<String> {
    let gray = to_grayscale(raster);
    let chars = if charset.is_braille() {
        render_braille(
            &gray,
            raster.width,
            raster.height,
            cols,
            rows,
            BRAILLE_THRESHOLD,
            invert,
        )
    } else {
        let cells = downsample(&gray, raster.width, raster.height, cols, rows);
        map_to_chars(&cells, charset.chars(), invert)
    };

    if cols == 0 {
        return Vec::new();
    }
    chars
        .chunks(cols as usize)
        .map(|line| line.iter().collect())
        .collect()
}
