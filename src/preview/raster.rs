//! Software rasterizer for draw primitives.

use crate::record::Rgb;
use crate::render::{Canvas, DrawPrimitive, Point, Rgba, MAX_CANVAS_EDGE};

/// Preview background.
pub const BACKGROUND: Rgb = Rgb::new(0x0f, 0x11, 0x15);

/// Center reference lines drawn under the crosshair.
pub const GRID: Rgb = Rgb::new(0x1b, 0x1f, 0x28);

/// RGB8 pixel buffer, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Raster {
    /// Create a `width` x `height` raster filled with one color.
    pub fn new(width: u32, height: u32, fill: Rgb) -> Self {
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels.saturating_mul(3));
        for _ in 0..pixels {
            data.extend_from_slice(&[fill.r, fill.g, fill.b]);
        }
        Self {
            width,
            height,
            data,
        }
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 3
    }

    /// Color at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate lies outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        let i = self.offset(x, y);
        Rgb::new(self.data[i], self.data[i + 1], self.data[i + 2])
    }

    /// Overwrite one pixel.
    pub fn set(&mut self, x: u32, y: u32, color: Rgb) {
        let i = self.offset(x, y);
        self.data[i] = color.r;
        self.data[i + 1] = color.g;
        self.data[i + 2] = color.b;
    }

    /// Source-over blend of `color` onto one pixel.
    pub fn blend(&mut self, x: u32, y: u32, color: Rgba) {
        let a = color.a.clamp(0.0, 1.0);
        let dst = self.pixel(x, y);
        let mix = |src: u8, dst: u8| -> u8 {
            (f64::from(src) * a + f64::from(dst) * (1.0 - a)).round() as u8
        };
        self.set(
            x,
            y,
            Rgb::new(mix(color.r, dst.r), mix(color.g, dst.g), mix(color.b, dst.b)),
        );
    }

    /// Visit every pixel whose center lies in the box, clipped to the raster.
    fn for_each_in(
        &mut self,
        min: Point,
        max: Point,
        mut f: impl FnMut(&mut Self, u32, u32, Point),
    ) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let x0 = (min.x - 0.5).ceil().max(0.0) as u32;
        let y0 = (min.y - 0.5).ceil().max(0.0) as u32;
        let x1 = ((max.x - 0.5).floor().min(f64::from(self.width - 1))).max(-1.0);
        let y1 = ((max.y - 0.5).floor().min(f64::from(self.height - 1))).max(-1.0);
        if x1 < 0.0 || y1 < 0.0 {
            return;
        }
        for y in y0..=y1 as u32 {
            for x in x0..=x1 as u32 {
                let center = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                f(self, x, y, center);
            }
        }
    }

    /// Stroke a segment with butt ends. Zero-length or zero-width segments
    /// cover nothing.
    pub fn stroke_segment(&mut self, from: Point, to: Point, width: f64, color: Rgba) {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let len_sq = dx * dx + dy * dy;
        let half = width / 2.0;
        if len_sq == 0.0 || half <= 0.0 {
            return;
        }

        let min = Point::new(from.x.min(to.x) - half, from.y.min(to.y) - half);
        let max = Point::new(from.x.max(to.x) + half, from.y.max(to.y) + half);
        self.for_each_in(min, max, |raster, x, y, p| {
            let t = ((p.x - from.x) * dx + (p.y - from.y) * dy) / len_sq;
            if !(0.0..=1.0).contains(&t) {
                return;
            }
            let qx = from.x + t * dx - p.x;
            let qy = from.y + t * dy - p.y;
            if qx * qx + qy * qy <= half * half {
                raster.blend(x, y, color);
            }
        });
    }

    /// Fill a disc, clipped to the raster.
    pub fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
        if radius <= 0.0 {
            return;
        }
        let min = Point::new(center.x - radius, center.y - radius);
        let max = Point::new(center.x + radius, center.y + radius);
        self.for_each_in(min, max, |raster, x, y, p| {
            let dx = p.x - center.x;
            let dy = p.y - center.y;
            if dx * dx + dy * dy <= radius * radius {
                raster.blend(x, y, color);
            }
        });
    }
}

/// Paint the preview background, the center grid and then every primitive
/// in order.
///
/// Each canvas dimension is capped at [`MAX_CANVAS_EDGE`]; anything beyond
/// the cap is clipped.
pub fn rasterize(primitives: &[DrawPrimitive], canvas: Canvas) -> Raster {
    let width = raster_edge(canvas.width);
    let height = raster_edge(canvas.height);
    let mut raster = Raster::new(width, height, BACKGROUND);

    if width > 0 && height > 0 {
        let center = canvas.center();
        let cx = (center.x.floor() as u32).min(width - 1);
        let cy = (center.y.floor() as u32).min(height - 1);
        for y in 0..height {
            raster.set(cx, y, GRID);
        }
        for x in 0..width {
            raster.set(x, cy, GRID);
        }
    }

    for primitive in primitives {
        match *primitive {
            DrawPrimitive::Segment {
                from,
                to,
                color,
                width,
            } => raster.stroke_segment(from, to, width, color),
            DrawPrimitive::Circle {
                center,
                radius,
                color,
            } => raster.fill_circle(center, radius, color),
        }
    }

    raster
}

fn raster_edge(edge: f64) -> u32 {
    if edge.is_nan() {
        return 0;
    }
    edge.clamp(0.0, MAX_CANVAS_EDGE).round() as u32
}
