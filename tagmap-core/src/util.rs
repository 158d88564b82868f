// Tagmap
// Copyright (c) 2026 The Tagmap Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `util` module provides a repository of commonly used utility functions sorted into distinct
//! categories.
//!
//! If a function is used all-over the codebase, and does not belong to specific top-level module,
//! it should be placed here.

pub mod text {
    //! Utilities for text handling, and lenient conversion of text to numbers.
    //!
    //! Tag values are free-form text. Numeric tags are frequently decorated with units or extra
    //! information (e.g., `"7 of 12"` or `"-6.50 dB"`), so the conversions here interpret the
    //! longest leading numeric run of a string and ignore whatever follows. A string with no
    //! leading number converts to zero. These conversions never fail.

    /// Converts the leading decimal integer of a string to an `i32`.
    ///
    /// Leading whitespace is skipped, and an optional `+` or `-` sign is accepted. Conversion stops
    /// at the first non-digit character. If there are no digits, 0 is returned. Values that do not
    /// fit in an `i32` saturate to `i32::MIN` or `i32::MAX`.
    pub fn parse_int_lossy(text: &str) -> i32 {
        let bytes = text.trim_start().as_bytes();

        let (negative, digits) = match bytes.first() {
            Some(b'-') => (true, &bytes[1..]),
            Some(b'+') => (false, &bytes[1..]),
            _ => (false, bytes),
        };

        let mut value: i64 = 0;

        for &digit in digits.iter().take_while(|c| c.is_ascii_digit()) {
            value = value * 10 + i64::from(digit - b'0');

            // Stop accumulating once the value can no longer fit. Any further digits can only
            // increase the magnitude.
            if value > i64::from(i32::MAX) + 1 {
                break;
            }
        }

        let value = if negative { -value } else { value };

        value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }

    /// Converts the leading decimal floating point number of a string to an `f64`.
    ///
    /// Leading whitespace is skipped. The longest prefix of the form
    /// `[+-]digits[.digits][(e|E)[+-]digits]` is converted, where at least one digit must be
    /// present before or after the decimal point. An exponent marker not followed by digits is not
    /// part of the number. If there is no such prefix, 0.0 is returned.
    pub fn parse_double_lossy(text: &str) -> f64 {
        let text = text.trim_start();
        let bytes = text.as_bytes();

        let count_digits = |start: usize| {
            bytes[start.min(bytes.len())..].iter().take_while(|c| c.is_ascii_digit()).count()
        };

        let mut end = 0;

        // Optional sign.
        if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
            end += 1;
        }

        // Integer part.
        let int_digits = count_digits(end);
        end += int_digits;

        // Fractional part.
        let mut frac_digits = 0;

        if bytes.get(end) == Some(&b'.') {
            frac_digits = count_digits(end + 1);
            end += 1 + frac_digits;
        }

        // A number requires at least one mantissa digit.
        if int_digits == 0 && frac_digits == 0 {
            return 0.0;
        }

        // Exponent, only consumed if it contains at least one digit.
        if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
            let mut exp_end = end + 1;

            if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
                exp_end += 1;
            }

            let exp_digits = count_digits(exp_end);

            if exp_digits > 0 {
                end = exp_end + exp_digits;
            }
        }

        // The scanned prefix is always accepted by the standard float parser.
        text[..end].parse::<f64>().unwrap_or(0.0)
    }

    #[cfg(test)]
    mod tests {
        use super::{parse_double_lossy, parse_int_lossy};

        #[test]
        fn verify_parse_int_lossy() {
            assert_eq!(parse_int_lossy("7"), 7);
            assert_eq!(parse_int_lossy("7 of 12"), 7);
            assert_eq!(parse_int_lossy("7/12"), 7);
            assert_eq!(parse_int_lossy("  42"), 42);
            assert_eq!(parse_int_lossy("\t-3"), -3);
            assert_eq!(parse_int_lossy("+15bpm"), 15);
            assert_eq!(parse_int_lossy("007"), 7);
            // No digits.
            assert_eq!(parse_int_lossy(""), 0);
            assert_eq!(parse_int_lossy("abc"), 0);
            assert_eq!(parse_int_lossy("-"), 0);
            assert_eq!(parse_int_lossy("- 5"), 0);
            assert_eq!(parse_int_lossy("x7"), 0);
            // Saturation.
            assert_eq!(parse_int_lossy("2147483647"), i32::MAX);
            assert_eq!(parse_int_lossy("2147483648"), i32::MAX);
            assert_eq!(parse_int_lossy("99999999999999999999999999"), i32::MAX);
            assert_eq!(parse_int_lossy("-2147483648"), i32::MIN);
            assert_eq!(parse_int_lossy("-99999999999999999999999999"), i32::MIN);
        }

        #[test]
        fn verify_parse_double_lossy() {
            assert_eq!(parse_double_lossy("-6.50 dB"), -6.5);
            assert_eq!(parse_double_lossy("0.988312"), 0.988312);
            assert_eq!(parse_double_lossy("89.0 dB"), 89.0);
            assert_eq!(parse_double_lossy("  +1.25"), 1.25);
            assert_eq!(parse_double_lossy(".5"), 0.5);
            assert_eq!(parse_double_lossy("2."), 2.0);
            assert_eq!(parse_double_lossy("12"), 12.0);
            // Exponents.
            assert_eq!(parse_double_lossy("1e3"), 1000.0);
            assert_eq!(parse_double_lossy("1.5E-1x"), 0.15);
            assert_eq!(parse_double_lossy("1e"), 1.0);
            assert_eq!(parse_double_lossy("1e+"), 1.0);
            // No digits.
            assert_eq!(parse_double_lossy(""), 0.0);
            assert_eq!(parse_double_lossy("dB"), 0.0);
            assert_eq!(parse_double_lossy("-"), 0.0);
            assert_eq!(parse_double_lossy("."), 0.0);
            assert_eq!(parse_double_lossy("-.e5"), 0.0);
        }
    }
}
