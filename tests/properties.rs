//! Property-based tests for normalization, rendering and serialization.
//!
//! - Every normalized field lies in its domain, whatever the raw input
//! - Normalizing an already-normalized record is a fixed point
//! - Rendering and serializing are deterministic
//! - T-style suppresses exactly the up arm
//! - The codec never panics on arbitrary input

use crosshair_cfg::cfg::serialize;
use crosshair_cfg::codec::{CsShareCodec, RawFields, ShareCodec};
use crosshair_cfg::record::{
    normalize, ParameterRecord, COLOR_TYPE_MAX, GAP_RANGE, OUTLINE_RANGE, SIZE_RANGE,
    THICKNESS_RANGE,
};
use crosshair_cfg::render::{render, Arm, Canvas, DrawPrimitive, Point, PREVIEW_SCALE};
use proptest::prelude::*;
use serde_json::Value;

const FIELDS: [&str; 13] = [
    "size",
    "thickness",
    "gap",
    "outline",
    "drawOutline",
    "colorType",
    "r",
    "g",
    "b",
    "alphaEnabled",
    "alpha",
    "tStyle",
    "dot",
];

// Strategy for loosely-typed field values, including out-of-range numbers.
fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        (-1.0e6f64..1.0e6).prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        Just(Value::Null),
        "[a-z0-9.-]{0,6}".prop_map(Value::from),
        (-300i32..300).prop_map(|n| Value::from(n.to_string())),
    ]
}

// Strategy for sparse raw field maps.
fn raw_strategy() -> impl Strategy<Value = RawFields> {
    proptest::collection::vec(
        (proptest::sample::select(FIELDS.to_vec()), value_strategy()),
        0..FIELDS.len(),
    )
    .prop_map(|pairs| {
        let mut raw = RawFields::new();
        for (key, value) in pairs {
            raw.insert(key, value);
        }
        raw
    })
}

// Strategy for records already inside their domains.
fn record_strategy() -> impl Strategy<Value = ParameterRecord> {
    raw_strategy().prop_map(|raw| normalize(&raw))
}

fn in_range(value: f64, (min, max): (f64, f64)) -> bool {
    (min..=max).contains(&value)
}

fn outlined(record: &ParameterRecord) -> bool {
    record.draw_outline && record.outline > 0.0
}

// Endpoints of the colored arm strokes, in emission order.
fn stroke_endpoints(
    primitives: &[DrawPrimitive],
    record: &ParameterRecord,
) -> Vec<(Point, Point)> {
    let segments: Vec<(Point, Point)> = primitives
        .iter()
        .filter_map(|p| match *p {
            DrawPrimitive::Segment { from, to, .. } => Some((from, to)),
            DrawPrimitive::Circle { .. } => None,
        })
        .collect();
    let per_arm = if outlined(record) { 2 } else { 1 };
    segments
        .chunks(per_arm)
        .filter_map(|pair| pair.last().copied())
        .collect()
}

fn expected_endpoints(arms: &[Arm], record: &ParameterRecord) -> Vec<(Point, Point)> {
    let center = Canvas::PREVIEW.center();
    let gap_px = record.gap * PREVIEW_SCALE;
    let size_px = record.size * PREVIEW_SCALE;
    arms.iter()
        .map(|arm| arm.endpoints(center, gap_px, size_px))
        .collect()
}

#[test]
fn prop_normalized_fields_stay_in_domain() {
    proptest!(|(raw in raw_strategy())| {
        let record = normalize(&raw);
        prop_assert!(in_range(record.size, SIZE_RANGE));
        prop_assert!(in_range(record.thickness, THICKNESS_RANGE));
        prop_assert!(in_range(record.gap, GAP_RANGE));
        prop_assert!(in_range(record.outline, OUTLINE_RANGE));
        prop_assert!(record.color_type <= COLOR_TYPE_MAX);
    });
}

#[test]
fn prop_normalize_is_idempotent() {
    proptest!(|(record in record_strategy())| {
        prop_assert_eq!(normalize(&record.to_raw()), record);
    });
}

#[test]
fn prop_render_and_serialize_are_deterministic() {
    proptest!(|(record in record_strategy())| {
        prop_assert_eq!(
            render(&record, Canvas::PREVIEW),
            render(&record, Canvas::PREVIEW)
        );
        prop_assert_eq!(serialize(&record), serialize(&record));
    });
}

#[test]
fn prop_t_style_suppresses_up_arm() {
    proptest!(|(record in record_strategy())| {
        let with_t = ParameterRecord { t_style: true, ..record };
        let without_t = ParameterRecord { t_style: false, ..record };

        prop_assert_eq!(
            stroke_endpoints(&render(&with_t, Canvas::PREVIEW), &with_t),
            expected_endpoints(&[Arm::Down, Arm::Left, Arm::Right], &with_t)
        );
        prop_assert_eq!(
            stroke_endpoints(&render(&without_t, Canvas::PREVIEW), &without_t),
            expected_endpoints(&Arm::ALL, &without_t)
        );
    });
}

#[test]
fn prop_outline_precedes_its_stroke() {
    proptest!(|(record in record_strategy())| {
        let primitives = render(&record, Canvas::PREVIEW);
        let has_outline = outlined(&record);
        let arms = if record.t_style { 3 } else { 4 };
        let per_arm = if has_outline { 2 } else { 1 };
        let dots = match (record.dot, has_outline) {
            (false, _) => 0,
            (true, false) => 1,
            (true, true) => 2,
        };
        prop_assert_eq!(primitives.len(), arms * per_arm + dots);

        if has_outline {
            for pair in primitives[..arms * 2].chunks(2) {
                match (pair[0], pair[1]) {
                    (
                        DrawPrimitive::Segment { from: f0, to: t0, width: w0, .. },
                        DrawPrimitive::Segment { from: f1, to: t1, width: w1, .. },
                    ) => {
                        prop_assert_eq!(f0, f1);
                        prop_assert_eq!(t0, t1);
                        prop_assert!(w0 >= w1);
                    }
                    _ => prop_assert!(false, "arm primitives must be segments"),
                }
            }
        }
    });
}

#[test]
fn prop_codec_never_panics() {
    proptest!(|(code in "(CSGO)?(-?[A-Za-z0-9]{5}){0,6}")| {
        let _ = CsShareCodec::new().decode(&code);
    });
}

#[test]
fn prop_encoded_records_decode_into_domain() {
    proptest!(|(record in record_strategy())| {
        let code = CsShareCodec::new().encode(&record);
        let raw = CsShareCodec::new().decode(&code);
        prop_assert!(raw.is_ok());
        let decoded = normalize(&raw.unwrap());
        prop_assert_eq!(decoded.t_style, record.t_style);
        prop_assert_eq!(decoded.dot, record.dot);
        prop_assert_eq!(decoded.color_type, record.color_type);
        prop_assert!((decoded.size - record.size).abs() <= 0.05 + f64::EPSILON);
    });
}
