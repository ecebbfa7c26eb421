//! Canonical crosshair parameters and the decode/normalize step.
//!
//! A [`ParameterRecord`] is always fully within its domain: every field is
//! clamped, missing fields take their defaults, and nothing is mutated after
//! construction.

use serde::Serialize;

use crate::codec::{RawFields, ShareCodec};

pub const SIZE_RANGE: (f64, f64) = (0.0, 10.0);
pub const THICKNESS_RANGE: (f64, f64) = (0.0, 5.0);
pub const GAP_RANGE: (f64, f64) = (-10.0, 10.0);
pub const OUTLINE_RANGE: (f64, f64) = (0.0, 3.0);

/// Highest color type; 0-4 are presets, 5 is custom RGB.
pub const COLOR_TYPE_MAX: u8 = 5;
pub const CUSTOM_COLOR_TYPE: u8 = 5;

/// Message shown for any share code the codec refuses.
pub const INVALID_SHARE_CODE_MESSAGE: &str = "Invalid share code or unsupported format.";

/// RGB triple, each channel 0-255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Validated crosshair description.
///
/// Only [`normalize`] builds one from untrusted data, so there is no
/// `Deserialize` impl.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterRecord {
    /// Arm length, game units.
    pub size: f64,
    /// Arm width.
    pub thickness: f64,
    /// Distance from center to arm start. May be negative.
    pub gap: f64,
    /// Outline width.
    pub outline: f64,
    pub draw_outline: bool,
    /// 0-4 select a preset color, 5 selects `color`.
    pub color_type: u8,
    /// Custom color, only meaningful when `color_type` is 5.
    pub color: Rgb,
    pub alpha_enabled: bool,
    /// Opacity, only meaningful when `alpha_enabled`.
    pub alpha: u8,
    /// Suppress the top arm.
    pub t_style: bool,
    /// Draw a center dot.
    pub dot: bool,
}

impl ParameterRecord {
    pub const DEFAULT: ParameterRecord = ParameterRecord {
        size: 2.0,
        thickness: 0.5,
        gap: 0.0,
        outline: 1.0,
        draw_outline: true,
        color_type: 0,
        color: Rgb::new(0, 255, 0),
        alpha_enabled: true,
        alpha: 255,
        t_style: false,
        dot: false,
    };

    /// Whether `color` is in effect rather than a preset.
    pub fn uses_custom_color(&self) -> bool {
        self.color_type == CUSTOM_COLOR_TYPE
    }

    /// Flatten into the raw field names the codec produces.
    pub fn to_raw(&self) -> RawFields {
        RawFields::new()
            .with("size", self.size)
            .with("thickness", self.thickness)
            .with("gap", self.gap)
            .with("outline", self.outline)
            .with("drawOutline", self.draw_outline)
            .with("colorType", self.color_type)
            .with("r", self.color.r)
            .with("g", self.color.g)
            .with("b", self.color.b)
            .with("alphaEnabled", self.alpha_enabled)
            .with("alpha", self.alpha)
            .with("tStyle", self.t_style)
            .with("dot", self.dot)
    }
}

impl Default for ParameterRecord {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Failure surfaced by [`decode`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The codec rejected the input. Codec detail is not carried.
    #[error("{}", INVALID_SHARE_CODE_MESSAGE)]
    InvalidShareCode,
}

impl DecodeError {
    /// User-facing message.
    pub fn message(&self) -> &'static str {
        match self {
            DecodeError::InvalidShareCode => INVALID_SHARE_CODE_MESSAGE,
        }
    }
}

/// Saturating clamp. NaN collapses to `min`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.max(min).min(max)
}

fn clamp_range(value: f64, (min, max): (f64, f64)) -> f64 {
    clamp(value, min, max)
}

fn clamp_u8(value: f64, max: u8) -> u8 {
    clamp(value.round(), 0.0, f64::from(max)) as u8
}

/// Coerce, clamp and default every field into a [`ParameterRecord`].
///
/// Total over any input: out-of-range values are silently corrected, unknown
/// keys are ignored and missing or unusable values take the defaults.
pub fn normalize(raw: &RawFields) -> ParameterRecord {
    let d = ParameterRecord::DEFAULT;

    ParameterRecord {
        size: clamp_range(raw.number("size").unwrap_or(d.size), SIZE_RANGE),
        thickness: clamp_range(
            raw.number("thickness").unwrap_or(d.thickness),
            THICKNESS_RANGE,
        ),
        gap: clamp_range(raw.number("gap").unwrap_or(d.gap), GAP_RANGE),
        outline: clamp_range(raw.number("outline").unwrap_or(d.outline), OUTLINE_RANGE),
        draw_outline: raw.flag("drawOutline").unwrap_or(d.draw_outline),
        color_type: clamp_u8(
            raw.number("colorType").unwrap_or(f64::from(d.color_type)),
            COLOR_TYPE_MAX,
        ),
        color: Rgb {
            r: clamp_u8(raw.channel("r").unwrap_or(f64::from(d.color.r)), u8::MAX),
            g: clamp_u8(raw.channel("g").unwrap_or(f64::from(d.color.g)), u8::MAX),
            b: clamp_u8(raw.channel("b").unwrap_or(f64::from(d.color.b)), u8::MAX),
        },
        alpha_enabled: raw.flag("alphaEnabled").unwrap_or(d.alpha_enabled),
        alpha: clamp_u8(raw.number("alpha").unwrap_or(f64::from(d.alpha)), u8::MAX),
        t_style: raw.flag("tStyle").unwrap_or(d.t_style),
        dot: raw.flag("dot").unwrap_or(d.dot),
    }
}

/// Run the codec on `code` and normalize its output.
///
/// Any codec failure becomes [`DecodeError::InvalidShareCode`].
pub fn decode(codec: &dyn ShareCodec, code: &str) -> Result<ParameterRecord, DecodeError> {
    let raw = codec.decode(code).map_err(|e| {
        log::debug!("codec rejected share code {:?}: {}", code, e);
        DecodeError::InvalidShareCode
    })?;
    Ok(normalize(&raw))
}
