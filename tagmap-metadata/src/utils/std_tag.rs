// Tagmap
// Copyright (c) 2026 The Tagmap Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Standard field mapping and value coercion helpers.

// Depending on which features are enabled, some helpers may be unused. Disable this lint as it
// would be too difficult to individually waive the lint.
#![allow(dead_code)]

use std::collections::HashMap;

use tagmap_core::meta::{MetadataKey, Value};
use tagmap_core::util::text::{parse_double_lossy, parse_int_lossy};

/// The type a field's text value is coerced to before it is stored under a canonical key.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Coercion {
    /// Store the text as-is.
    String,
    /// Store the leading integer of the text.
    Integer,
    /// Store `true` if the leading integer of the text is non-zero.
    Boolean,
    /// Store the leading floating point number of the text.
    Double,
}

/// The action taken for a field.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldAction {
    /// Coerce the first value of the field, and store it under a canonical key.
    Store(MetadataKey, Coercion),
    /// Decode every value of the field as an embedded picture.
    Picture,
}

/// Maps a lowercase field name to the action taken for it.
pub type FieldActionMap = HashMap<&'static str, FieldAction>;

/// Coerce a text value into a `Value`. Coercion never fails. Text without a leading number
/// coerces to zero.
pub fn coerce(text: &str, coercion: Coercion) -> Value {
    match coercion {
        Coercion::String => Value::from(text),
        Coercion::Integer => Value::from(parse_int_lossy(text)),
        Coercion::Boolean => Value::from(parse_int_lossy(text) != 0),
        Coercion::Double => Value::from(parse_double_lossy(text)),
    }
}

/// Format a `Value` as text such that coercing the text yields the same value.
///
/// Booleans are formatted as `1` or `0`, and all other values use their display form.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Boolean(true) => "1".to_string(),
        Value::Boolean(false) => "0".to_string(),
        Value::String(string) => string.clone(),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_coerce() {
        assert_eq!(coerce("7 of 12", Coercion::Integer), Value::SignedInt(7));
        assert_eq!(coerce("abc", Coercion::Integer), Value::SignedInt(0));
        assert_eq!(coerce("0", Coercion::Boolean), Value::Boolean(false));
        assert_eq!(coerce("2", Coercion::Boolean), Value::Boolean(true));
        assert_eq!(coerce("yes", Coercion::Boolean), Value::Boolean(false));
        assert_eq!(coerce("-6.50 dB", Coercion::Double), Value::Float(-6.5));
        assert_eq!(coerce(" 7 ", Coercion::String), Value::String(" 7 ".to_string()));
    }

    #[test]
    fn verify_format_value_round_trip() {
        let values = [
            (Value::Boolean(true), Coercion::Boolean),
            (Value::Boolean(false), Coercion::Boolean),
            (Value::SignedInt(-12), Coercion::Integer),
            (Value::Float(0.000001234), Coercion::Double),
            (Value::Float(-6.5), Coercion::Double),
            (Value::Float(1e21), Coercion::Double),
            (Value::String("Title".to_string()), Coercion::String),
        ];

        for (value, coercion) in values {
            assert_eq!(coerce(&format_value(&value), coercion), value);
        }
    }
}
