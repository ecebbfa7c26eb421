//! Cvar config export.
//!
//! Emission order is fixed; tooling downstream may depend on line order.

use std::fmt;

use crate::record::{
    clamp, ParameterRecord, COLOR_TYPE_MAX, CUSTOM_COLOR_TYPE, GAP_RANGE, OUTLINE_RANGE,
    SIZE_RANGE, THICKNESS_RANGE,
};

/// Extension of exported config files.
pub const CFG_EXTENSION: &str = "cfg";

const DECIMALS: i32 = 3;

/// A single `name "value"` config line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDirective {
    pub name: &'static str,
    pub value: String,
}

impl ConfigDirective {
    pub fn new(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }

    fn flag(name: &'static str, on: bool) -> Self {
        Self::new(name, if on { "1" } else { "0" })
    }

    fn real(name: &'static str, value: f64, (min, max): (f64, f64)) -> Self {
        Self::new(name, format_real(clamp(value, min, max)))
    }

    fn integer(name: &'static str, value: f64, max: u8) -> Self {
        let n = clamp(value.round(), 0.0, f64::from(max)) as u8;
        Self::new(name, n.to_string())
    }
}

impl fmt::Display for ConfigDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \"{}\"", self.name, self.value)
    }
}

/// Round half away from zero at the third decimal and print without
/// trailing zeros.
fn format_real(value: f64) -> String {
    let factor = 10f64.powi(DECIMALS);
    let rounded = (value * factor).round() / factor;
    // Avoid "-0".
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    rounded.to_string()
}

/// Project a record into its ordered cvar directives.
///
/// Every value is clamped again before formatting.
pub fn serialize(record: &ParameterRecord) -> Vec<ConfigDirective> {
    let mut lines = vec![
        ConfigDirective::real("cl_crosshairsize", record.size, SIZE_RANGE),
        ConfigDirective::real("cl_crosshairthickness", record.thickness, THICKNESS_RANGE),
        ConfigDirective::real("cl_crosshairgap", record.gap, GAP_RANGE),
        ConfigDirective::flag("cl_crosshair_drawoutline", record.draw_outline),
        ConfigDirective::real("cl_crosshair_outlinethickness", record.outline, OUTLINE_RANGE),
        ConfigDirective::flag("cl_crosshairdot", record.dot),
        ConfigDirective::flag("cl_crosshair_t", record.t_style),
        ConfigDirective::flag("cl_crosshairusealpha", record.alpha_enabled),
        ConfigDirective::integer("cl_crosshairalpha", f64::from(record.alpha), u8::MAX),
    ];

    let color_type = record.color_type.min(COLOR_TYPE_MAX);
    lines.push(ConfigDirective::new(
        "cl_crosshaircolor",
        color_type.to_string(),
    ));
    if color_type == CUSTOM_COLOR_TYPE {
        let c = record.color;
        lines.push(ConfigDirective::integer("cl_crosshaircolor_r", f64::from(c.r), u8::MAX));
        lines.push(ConfigDirective::integer("cl_crosshaircolor_g", f64::from(c.g), u8::MAX));
        lines.push(ConfigDirective::integer("cl_crosshaircolor_b", f64::from(c.b), u8::MAX));
    }

    lines.push(ConfigDirective::new("cl_crosshairgap_useweaponvalue", "0"));
    lines.push(ConfigDirective::new("echo", "Crosshair loaded"));
    lines
}

/// Render directives as file content: one per line, `\n`-terminated.
pub fn to_cfg_text(directives: &[ConfigDirective]) -> String {
    let mut out = String::new();
    for directive in directives {
        out.push_str(&directive.to_string());
        out.push('\n');
    }
    out
}

/// `alias "<name>" "exec <file_name>"`
pub fn format_alias(name: &str, file_name: &str) -> String {
    format!("alias \"{}\" \"exec {}\"", name, file_name)
}

/// File name a config is exported under.
pub fn cfg_file_name(name: &str) -> String {
    format!("{}.{}", name, CFG_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Rgb;

    fn lines(record: &ParameterRecord) -> Vec<String> {
        serialize(record).iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_default_preset_output() {
        let record = ParameterRecord {
            dot: true,
            ..ParameterRecord::DEFAULT
        };
        assert_eq!(
            lines(&record),
            vec![
                r#"cl_crosshairsize "2""#,
                r#"cl_crosshairthickness "0.5""#,
                r#"cl_crosshairgap "0""#,
                r#"cl_crosshair_drawoutline "1""#,
                r#"cl_crosshair_outlinethickness "1""#,
                r#"cl_crosshairdot "1""#,
                r#"cl_crosshair_t "0""#,
                r#"cl_crosshairusealpha "1""#,
                r#"cl_crosshairalpha "255""#,
                r#"cl_crosshaircolor "0""#,
                r#"cl_crosshairgap_useweaponvalue "0""#,
                r#"echo "Crosshair loaded""#,
            ]
        );
    }

    #[test]
    fn test_custom_color_adds_channels_after_color_type() {
        let record = ParameterRecord {
            color_type: 5,
            color: Rgb::new(10, 20, 30),
            ..ParameterRecord::DEFAULT
        };
        let out = lines(&record);
        let idx = out
            .iter()
            .position(|l| l == r#"cl_crosshaircolor "5""#)
            .unwrap();
        assert_eq!(out[idx + 1], r#"cl_crosshaircolor_r "10""#);
        assert_eq!(out[idx + 2], r#"cl_crosshaircolor_g "20""#);
        assert_eq!(out[idx + 3], r#"cl_crosshaircolor_b "30""#);
        assert_eq!(out.len(), 15);
    }

    #[test]
    fn test_preset_omits_channels() {
        let record = ParameterRecord {
            color_type: 3,
            color: Rgb::new(10, 20, 30),
            ..ParameterRecord::DEFAULT
        };
        assert!(!lines(&record).iter().any(|l| l.starts_with("cl_crosshaircolor_")));
    }

    #[test]
    fn test_real_values_round_to_three_decimals() {
        assert_eq!(format_real(1.23449), "1.234");
        // 0.0625 is exact in binary, so the tie is real.
        assert_eq!(format_real(0.0625), "0.063");
        assert_eq!(format_real(-0.0625), "-0.063");
        assert_eq!(format_real(0.0001), "0");
        assert_eq!(format_real(-0.0001), "0");
        assert_eq!(format_real(-3.5), "-3.5");
        assert_eq!(format_real(10.0), "10");
    }

    #[test]
    fn test_values_are_clamped_again() {
        // Records built by hand can bypass normalization.
        let record = ParameterRecord {
            size: 99.0,
            gap: -50.0,
            color_type: 9,
            ..ParameterRecord::DEFAULT
        };
        let out = lines(&record);
        assert_eq!(out[0], r#"cl_crosshairsize "10""#);
        assert_eq!(out[2], r#"cl_crosshairgap "-10""#);
        assert!(out.contains(&r#"cl_crosshaircolor "5""#.to_string()));
    }

    #[test]
    fn test_cfg_text_is_newline_terminated() {
        let text = to_cfg_text(&serialize(&ParameterRecord::DEFAULT));
        assert!(text.ends_with("echo \"Crosshair loaded\"\n"));
        assert_eq!(text.lines().count(), 12);
        assert!(!text.contains('\r'));
    }

    #[test]
    fn test_format_alias() {
        assert_eq!(
            format_alias("crosshair_58h2b", "crosshair_58h2b.cfg"),
            r#"alias "crosshair_58h2b" "exec crosshair_58h2b.cfg""#
        );
        assert_eq!(cfg_file_name("crosshair_58h2b"), "crosshair_58h2b.cfg");
    }

    #[test]
    fn test_serialize_is_deterministic() {
        let record = ParameterRecord {
            gap: -1.125,
            color_type: 5,
            ..ParameterRecord::DEFAULT
        };
        assert_eq!(serialize(&record), serialize(&record));
    }
}
