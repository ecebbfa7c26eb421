//! Crosshair geometry as draw primitives.
//!
//! [`render`] is a pure function of a record and a canvas size. It performs no
//! drawing itself; the primitives it returns can be fed to any surface (see
//! [`crate::preview`] for the terminal one).

use crate::record::{ParameterRecord, Rgb};

/// World-to-pixel factor applied to `gap` and `size`.
pub const PREVIEW_SCALE: f64 = 4.0;

/// Preview canvas edge, in pixels.
pub const PREVIEW_CANVAS_EDGE: f64 = 220.0;

/// Largest canvas edge the preview will rasterize.
pub const MAX_CANVAS_EDGE: f64 = 4096.0;

/// Preset colors selected by color types 0-4.
pub const PRESET_COLORS: [Rgb; 5] = [
    Rgb::new(50, 250, 50),  // green
    Rgb::new(250, 50, 50),  // red
    Rgb::new(250, 250, 50), // yellow
    Rgb::new(50, 50, 250),  // blue
    Rgb::new(50, 250, 250), // cyan
];

pub const OUTLINE_COLOR: Rgb = Rgb::new(0, 0, 0);

/// Drawing surface size in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    pub const PREVIEW: Canvas = Canvas {
        width: PREVIEW_CANVAS_EDGE,
        height: PREVIEW_CANVAS_EDGE,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Crosshair origin.
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::PREVIEW
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// RGB color with opacity in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub fn from_rgb(rgb: Rgb, a: f64) -> Self {
        Self {
            r: rgb.r,
            g: rgb.g,
            b: rgb.b,
            a,
        }
    }

    pub fn rgb(&self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawPrimitive {
    /// Stroked line with butt ends, `width` pixels across.
    Segment {
        from: Point,
        to: Point,
        color: Rgba,
        width: f64,
    },
    /// Filled disc.
    Circle {
        center: Point,
        radius: f64,
        color: Rgba,
    },
}

/// One of the four crosshair arms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arm {
    Up,
    Down,
    Left,
    Right,
}

impl Arm {
    /// Emission order.
    pub const ALL: [Arm; 4] = [Arm::Up, Arm::Down, Arm::Left, Arm::Right];

    /// Endpoints from the inner end (at the gap) to the outer end.
    pub fn endpoints(self, center: Point, gap_px: f64, size_px: f64) -> (Point, Point) {
        let Point { x: cx, y: cy } = center;
        let inner = gap_px;
        let outer = gap_px + size_px;
        match self {
            Arm::Up => (Point::new(cx, cy - outer), Point::new(cx, cy - inner)),
            Arm::Down => (Point::new(cx, cy + inner), Point::new(cx, cy + outer)),
            Arm::Left => (Point::new(cx - outer, cy), Point::new(cx - inner, cy)),
            Arm::Right => (Point::new(cx + inner, cy), Point::new(cx + outer, cy)),
        }
    }
}

/// Preset for `color_type`, falling back to preset 0 for unknown types.
pub fn preset_color(color_type: u8) -> Rgb {
    PRESET_COLORS
        .get(usize::from(color_type))
        .copied()
        .unwrap_or(PRESET_COLORS[0])
}

/// Opacity applied to every primitive.
pub fn opacity(record: &ParameterRecord) -> f64 {
    if record.alpha_enabled {
        f64::from(record.alpha) / 255.0
    } else {
        1.0
    }
}

/// Stroke color of the arms and dot.
pub fn stroke_color(record: &ParameterRecord) -> Rgba {
    let rgb = if record.uses_custom_color() {
        record.color
    } else {
        preset_color(record.color_type)
    };
    Rgba::from_rgb(rgb, opacity(record))
}

fn outline_active(record: &ParameterRecord) -> bool {
    record.draw_outline && record.outline > 0.0
}

/// Compute the crosshair's draw primitives on `canvas`.
///
/// Each arm contributes an optional outline segment immediately followed by
/// its colored segment. Dot primitives always come after the arms.
pub fn render(record: &ParameterRecord, canvas: Canvas) -> Vec<DrawPrimitive> {
    let center = canvas.center();
    let gap_px = record.gap * PREVIEW_SCALE;
    let size_px = record.size * PREVIEW_SCALE;

    let stroke = stroke_color(record);
    let outline = Rgba::from_rgb(OUTLINE_COLOR, stroke.a.min(1.0));
    let with_outline = outline_active(record);

    let mut primitives = Vec::with_capacity(10);

    for arm in Arm::ALL {
        if arm == Arm::Up && record.t_style {
            continue;
        }
        let (from, to) = arm.endpoints(center, gap_px, size_px);
        if with_outline {
            primitives.push(DrawPrimitive::Segment {
                from,
                to,
                color: outline,
                width: record.thickness + record.outline * 2.0,
            });
        }
        primitives.push(DrawPrimitive::Segment {
            from,
            to,
            color: stroke,
            width: record.thickness,
        });
    }

    if record.dot {
        let radius = (record.thickness / 2.0).max(1.0);
        if with_outline {
            primitives.push(DrawPrimitive::Circle {
                center,
                radius: radius + record.outline,
                color: outline,
            });
        }
        primitives.push(DrawPrimitive::Circle {
            center,
            radius,
            color: stroke,
        });
    }

    primitives
}
