//! Share code boundary.
//!
//! The rest of the crate only sees [`ShareCodec`] and the loosely-typed
//! [`RawFields`] it returns. [`CsShareCodec`] is the shipped implementation
//! for the game's `CSGO-xxxxx-xxxxx-xxxxx-xxxxx-xxxxx` crosshair codes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::record::ParameterRecord;

/// Symbols used by share codes, in digit order (base 57).
pub const DICTIONARY: &str = "ABCDEFGHJKLMNOPQRSTUVWXYZabcdefhijkmnopqrstuvwxyz23456789";

/// Prefix every share code starts with.
pub const SHARE_CODE_PREFIX: &str = "CSGO";

const GROUPS: usize = 5;
const GROUP_LEN: usize = 5;
const SYMBOLS: usize = GROUPS * GROUP_LEN;
const BASE: u32 = 57;

/// Width of the decoded payload in bytes.
pub const PAYLOAD_LEN: usize = 18;

/// Payload format marker written into byte 1 by the encoder.
const FORMAT_VERSION: u8 = 1;

/// Errors raised by a codec. Only their presence is observed by the decoder.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Input does not look like `CSGO-xxxxx-xxxxx-xxxxx-xxxxx-xxxxx`.
    #[error("share code does not match the CSGO-xxxxx-xxxxx-xxxxx-xxxxx-xxxxx pattern")]
    Pattern,
    /// A symbol outside the share code dictionary.
    #[error("'{0}' is not a share code symbol")]
    Alphabet(char),
    /// Decoded value does not fit the payload.
    #[error("share code value exceeds the 18-byte payload")]
    Overflow,
    /// Byte 0 does not match the sum of the payload.
    #[error("checksum mismatch: expected {expected}, found {found}")]
    Checksum { expected: u8, found: u8 },
    /// Failure reported by a third-party codec implementation.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Narrow capability turning a share code into raw fields.
///
/// Implementations may be native or wrap a foreign decoder; the pipeline
/// never depends on anything beyond this trait.
pub trait ShareCodec: Send + Sync {
    fn decode(&self, code: &str) -> Result<RawFields, CodecError>;
}

impl<F> ShareCodec for F
where
    F: Fn(&str) -> Result<RawFields, CodecError> + Send + Sync,
{
    fn decode(&self, code: &str) -> Result<RawFields, CodecError> {
        self(code)
    }
}

/// Sparse, loosely-typed field map produced by a codec.
///
/// Any subset of the record's field names may be present; unknown keys are
/// carried but ignored by normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawFields(Map<String, Value>);

impl RawFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Numeric view of a field.
    ///
    /// Numbers pass through, booleans become 1/0 and numeric strings are
    /// parsed. `null`, non-finite and non-numeric values count as absent.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(coerce_number)
    }

    /// Boolean view of a field. `null` counts as absent.
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(coerce_flag)
    }

    /// Color channel, read from a nested `color` object first, then from a
    /// flat top-level key.
    pub fn channel(&self, key: &str) -> Option<f64> {
        self.get("color")
            .and_then(Value::as_object)
            .and_then(|color| color.get(key))
            .and_then(coerce_number)
            .or_else(|| self.number(key))
    }
}

impl From<Map<String, Value>> for RawFields {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn coerce_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(*b),
        Value::Number(n) => Some(n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan())),
        Value::String(s) => Some(!s.is_empty()),
        Value::Array(_) | Value::Object(_) => Some(true),
    }
}

/// Codec for the game's crosshair share codes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsShareCodec;

impl CsShareCodec {
    pub fn new() -> Self {
        Self
    }

    /// Encode a record as a share code.
    ///
    /// Values are quantized to the payload's resolution: tenths for size,
    /// thickness and gap, halves for outline.
    pub fn encode(&self, record: &ParameterRecord) -> String {
        let mut bytes = [0u8; PAYLOAD_LEN];
        bytes[1] = FORMAT_VERSION;
        bytes[2] = ((record.gap * 10.0).round() as i8) as u8;
        bytes[3] = (record.outline * 2.0).round() as u8;
        bytes[4] = record.color.r;
        bytes[5] = record.color.g;
        bytes[6] = record.color.b;
        bytes[7] = record.alpha;
        bytes[10] = (record.color_type & 0x07) | if record.draw_outline { 0x08 } else { 0 };
        bytes[12] = (record.thickness * 10.0).round() as u8;

        let mut flags = 0u8;
        if record.dot {
            flags |= 0x01;
        }
        if record.alpha_enabled {
            flags |= 0x04;
        }
        if record.t_style {
            flags |= 0x08;
        }
        bytes[13] = flags << 4;

        let size = (record.size * 10.0).round() as u16;
        bytes[14] = (size & 0xff) as u8;
        bytes[15] = ((size >> 8) & 0x1f) as u8;

        bytes[0] = checksum(&bytes);
        bytes_to_code(bytes)
    }
}

impl ShareCodec for CsShareCodec {
    fn decode(&self, code: &str) -> Result<RawFields, CodecError> {
        let bytes = code_to_bytes(code)?;

        let expected = checksum(&bytes);
        if bytes[0] != expected {
            return Err(CodecError::Checksum {
                expected,
                found: bytes[0],
            });
        }

        let flags = bytes[13] >> 4;
        let size = (u16::from(bytes[15] & 0x1f) << 8) | u16::from(bytes[14]);

        Ok(RawFields::new()
            .with("gap", f64::from(bytes[2] as i8) / 10.0)
            .with("outline", f64::from(bytes[3]) / 2.0)
            .with("r", bytes[4])
            .with("g", bytes[5])
            .with("b", bytes[6])
            .with("alpha", bytes[7])
            .with("colorType", bytes[10] & 0x07)
            .with("drawOutline", bytes[10] & 0x08 != 0)
            .with("thickness", f64::from(bytes[12]) / 10.0)
            .with("dot", flags & 0x01 != 0)
            .with("alphaEnabled", flags & 0x04 != 0)
            .with("tStyle", flags & 0x08 != 0)
            .with("style", (bytes[13] & 0x0f) >> 1)
            .with("size", f64::from(size) / 10.0))
    }
}

fn checksum(bytes: &[u8; PAYLOAD_LEN]) -> u8 {
    bytes[1..]
        .iter()
        .fold(0u8, |sum, &b| sum.wrapping_add(b))
}

/// Strip the prefix and optional dashes, checking the group layout.
fn symbols(code: &str) -> Result<Vec<char>, CodecError> {
    let rest = code
        .strip_prefix(SHARE_CODE_PREFIX)
        .ok_or(CodecError::Pattern)?;

    let mut chars = rest.chars().peekable();
    let mut out = Vec::with_capacity(SYMBOLS);
    for _ in 0..GROUPS {
        if chars.peek() == Some(&'-') {
            chars.next();
        }
        for _ in 0..GROUP_LEN {
            match chars.next() {
                Some(c) if c.is_ascii_alphanumeric() || c == '_' => out.push(c),
                _ => return Err(CodecError::Pattern),
            }
        }
    }
    if chars.next().is_some() {
        return Err(CodecError::Pattern);
    }
    Ok(out)
}

fn code_to_bytes(code: &str) -> Result<[u8; PAYLOAD_LEN], CodecError> {
    let mut bytes = [0u8; PAYLOAD_LEN];

    // First symbol is the least significant digit.
    for c in symbols(code)?.into_iter().rev() {
        let digit = DICTIONARY.find(c).ok_or(CodecError::Alphabet(c))? as u32;
        let mut carry = digit;
        for byte in bytes.iter_mut().rev() {
            let v = u32::from(*byte) * BASE + carry;
            *byte = (v & 0xff) as u8;
            carry = v >> 8;
        }
        if carry != 0 {
            return Err(CodecError::Overflow);
        }
    }
    Ok(bytes)
}

fn bytes_to_code(mut bytes: [u8; PAYLOAD_LEN]) -> String {
    let dictionary: Vec<char> = DICTIONARY.chars().collect();
    let mut digits = String::with_capacity(SYMBOLS);
    for _ in 0..SYMBOLS {
        let mut rem = 0u32;
        for byte in bytes.iter_mut() {
            let v = (rem << 8) | u32::from(*byte);
            *byte = (v / BASE) as u8;
            rem = v % BASE;
        }
        digits.push(dictionary[rem as usize]);
    }

    let groups: Vec<&str> = (0..GROUPS)
        .map(|i| &digits[i * GROUP_LEN..(i + 1) * GROUP_LEN])
        .collect();
    format!("{}-{}", SHARE_CODE_PREFIX, groups.join("-"))
}
