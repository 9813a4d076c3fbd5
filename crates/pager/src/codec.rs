//! Opaque cursor tokens: base64 over `col:value,col:value`.
//!
//! Values escape `%` as `%25` and `,` as `%2C`; anything else is written as is.

use crate::error::CursorDecodeError;
use base64::{
    Engine as _, alphabet,
    engine::{
        DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig, general_purpose::STANDARD_NO_PAD,
    },
};
use model::pagination::cursor::CursorPosition;

/// Accepts tokens with or without trailing `=` padding.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const PAIR_SEPARATOR: &str = ",";
const KEY_SEPARATOR: &str = ":";

fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '%' => escaped.push_str("%25"),
            ',' => escaped.push_str("%2C"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Reverses `escape_value`. A `%` not followed by a known escape is kept
/// literally.
fn unescape_value(value: &str) -> String {
    let mut unescaped = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(index) = rest.find('%') {
        unescaped.push_str(&rest[..index]);
        let tail = &rest[index..];
        if tail.starts_with("%25") {
            unescaped.push('%');
            rest = &tail[3..];
        } else if tail.starts_with("%2C") || tail.starts_with("%2c") {
            unescaped.push(',');
            rest = &tail[3..];
        } else {
            unescaped.push('%');
            rest = &tail[1..];
        }
    }
    unescaped.push_str(rest);
    unescaped
}

pub struct CursorCodec;

impl CursorCodec {
    /// Encodes a position. An empty position encodes to the empty string.
    pub fn encode(position: &CursorPosition) -> String {
        if position.is_empty() {
            return String::new();
        }

        let text = position
            .entries()
            .iter()
            .map(|(column, value)| format!("{column}{KEY_SEPARATOR}{}", escape_value(value)))
            .collect::<Vec<_>>()
            .join(PAIR_SEPARATOR);

        STANDARD_NO_PAD.encode(text)
    }

    /// Decodes a token into its entries, in token order. The empty string is
    /// "no cursor".
    ///
    /// Pairs are split on the first `:` so values may contain colons.
    pub fn decode(cursor: &str) -> Result<Option<CursorPosition>, CursorDecodeError> {
        if cursor.is_empty() {
            return Ok(None);
        }

        let text = String::from_utf8(LENIENT.decode(cursor)?)?;
        if text.is_empty() {
            return Ok(None);
        }

        let mut position = CursorPosition::default();
        for pair in text.split(PAIR_SEPARATOR) {
            let (column, value) = pair
                .split_once(KEY_SEPARATOR)
                .ok_or_else(|| CursorDecodeError::MissingSeparator(pair.to_string()))?;
            position.push(column, &unescape_value(value));
        }
        Ok(Some(position))
    }
}
