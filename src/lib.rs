//! crosshair-cfg library crate.
//!
//! Decodes crosshair share codes into validated parameters, renders them as
//! draw primitives and serializes them into game config files.

pub mod cfg;
pub mod cli;
pub mod codec;
pub mod config;
pub mod converter;
pub mod names;
pub mod preview;
pub mod record;
pub mod render;

pub use codec::{CsShareCodec, RawFields, ShareCodec};
pub use converter::{Completion, Conversion, Converter};
pub use record::{decode, normalize, DecodeError, ParameterRecord};
pub use render::{render, Canvas, DrawPrimitive};
