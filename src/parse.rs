//! Human readable string to number

use std::sync::LazyLock;

use regex::Regex;

use crate::error::Error;
use crate::magnitude::{self, Family, Magnitude};

/// Above this many decimals, exact scaling of the mantissa is not possible
const MAX_EXACT_DECIMALS: usize = 15;

/// Leading symbols, digits with optional group separators and decimals, letter suffix
static HUMAN_NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<prefix>[^0-9.]*)(?P<int>(?:[0-9][0-9_,]*)?)(?:\.(?P<frac>[0-9]*))?[ \t]*(?P<suffix>[A-Za-z]*)$",
    )
    .unwrap()
});

/// Components of a human readable number
struct Parts<'t> {
    negative: bool,
    /// Integer digits, separators removed
    int_part: String,
    frac_part: Option<&'t str>,
    magnitude: &'t Magnitude,
}

fn split<'t>(text: &'t str, table: &'t magnitude::Table) -> Result<Parts<'t>, Error> {
    if text.is_empty() {
        return Err(Error::EmptyInput);
    }

    let caps = HUMAN_NUMBER_REGEX
        .captures(text)
        .ok_or_else(|| Error::MalformedNumber(text.to_owned()))?;
    let prefix = caps.name("prefix").map_or("", |m| m.as_str());
    let int_part: String = caps
        .name("int")
        .map_or("", |m| m.as_str())
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    let frac_part = caps.name("frac").map(|m| m.as_str());
    let suffix = caps.name("suffix").map_or("", |m| m.as_str());

    if int_part.is_empty() && frac_part.map_or(true, str::is_empty) {
        return Err(Error::MalformedNumber(text.to_owned()));
    }

    let magnitude = table.lookup(suffix).ok_or_else(|| Error::UnknownSuffix {
        suffix: suffix.to_owned(),
        valid: table.valid_suffixes(),
    })?;

    Ok(Parts {
        negative: prefix.contains('-'),
        int_part,
        frac_part,
        magnitude,
    })
}

/// Parse human readable string to numeric value, ie. `1.5M` -> `1500000`
pub fn to_numeric(text: &str, family: Family) -> Result<f64, Error> {
    with_table(text, family.table())
}

/// Parse human readable string to numeric value using a specific magnitude table
pub fn with_table(text: &str, table: &magnitude::Table) -> Result<f64, Error> {
    let text = text.trim();
    let parts = split(text, table)?;
    let value = scale(
        &parts.int_part,
        parts.frac_part.unwrap_or_default(),
        parts.magnitude.factor(),
    )
    .ok_or_else(|| Error::MalformedNumber(text.to_owned()))?;
    Ok(if parts.negative { -value } else { value })
}

/// Parse human readable string to its integer part, without going through floats for integers
///
/// Values outside of the `i128` range are rejected.
pub fn to_integer(text: &str, table: &magnitude::Table) -> Result<i128, Error> {
    let text = text.trim();
    let parts = split(text, table)?;
    let out_of_range = || Error::OutOfRange(text.to_owned());
    let factor = parts.magnitude.factor();

    let value = if parts.frac_part.map_or(true, str::is_empty)
        && factor.fract() == 0.0
        && factor < i128::MAX as f64
    {
        let int_value: i128 = if parts.int_part.is_empty() {
            0
        } else {
            parts.int_part.parse().map_err(|_| out_of_range())?
        };
        int_value
            .checked_mul(factor as i128)
            .ok_or_else(out_of_range)?
    } else {
        let value = scale(
            &parts.int_part,
            parts.frac_part.unwrap_or_default(),
            factor,
        )
        .ok_or_else(|| Error::MalformedNumber(text.to_owned()))?
        .trunc();
        if value >= i128::MAX as f64 {
            return Err(out_of_range());
        }
        value as i128
    };

    Ok(if parts.negative { -value } else { value })
}

/// Compute `int.frac * factor`, scaling the integer mantissa so that `4.51 * 1000` is exact
fn scale(int_part: &str, frac_part: &str, factor: f64) -> Option<f64> {
    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let value = if frac_part.len() <= MAX_EXACT_DECIMALS {
        let mantissa: f64 = format!("{int_part}{frac_part}").parse().ok()?;
        let divisor = 10_f64.powi(frac_part.len() as i32);
        mantissa * factor / divisor
    } else {
        let number: f64 = format!("{int_part}.{frac_part}").parse().ok()?;
        number * factor
    };
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::fmt::to_human;

    #[test]
    fn test_to_numeric() {
        assert_eq!(to_numeric("1.2K", Family::Number).unwrap(), 1200.0);
        assert_eq!(to_numeric("4.51k", Family::Number).unwrap(), 4510.0);
        assert_eq!(to_numeric("4.51m", Family::Number).unwrap(), 4_510_000.0);
        assert_eq!(to_numeric("69.420B", Family::Number).unwrap(), 69_420_000_000.0);
        assert_eq!(to_numeric("#@#$220k", Family::Number).unwrap(), 220_000.0);
        assert_eq!(to_numeric("999", Family::Number).unwrap(), 999.0);
        assert_eq!(to_numeric("  1.5 M ", Family::Number).unwrap(), 1_500_000.0);
        assert_eq!(to_numeric(".5K", Family::Number).unwrap(), 500.0);
        assert_eq!(to_numeric("2.K", Family::Number).unwrap(), 2000.0);
        assert_eq!(to_numeric("1_000", Family::Number).unwrap(), 1000.0);
        assert_eq!(to_numeric("1,234,567", Family::Number).unwrap(), 1_234_567.0);
        assert_eq!(to_numeric("-1.5K", Family::Number).unwrap(), -1500.0);
        assert_eq!(to_numeric("-$4.51K", Family::Number).unwrap(), -4510.0);
        assert_eq!(to_numeric("$4.51K", Family::Number).unwrap(), 4510.0);
    }

    #[test]
    fn test_to_numeric_filesize() {
        assert_eq!(to_numeric("4.51KB", Family::Filesize).unwrap(), 4618.24);
        assert_eq!(to_numeric("1kb", Family::Filesize).unwrap(), 1024.0);
        assert_eq!(to_numeric("1K", Family::Filesize).unwrap(), 1024.0);
        assert_eq!(to_numeric("2 MiB", Family::Filesize).unwrap(), 2_097_152.0);
        assert_eq!(to_numeric("512B", Family::Filesize).unwrap(), 512.0);
        assert_eq!(to_numeric("1.5gb", Family::Filesize).unwrap(), 1_610_612_736.0);
    }

    #[test]
    fn test_to_numeric_errors() {
        assert!(matches!(to_numeric("", Family::Number), Err(Error::EmptyInput)));
        assert!(matches!(to_numeric("   ", Family::Number), Err(Error::EmptyInput)));
        assert!(matches!(
            to_numeric("K", Family::Number),
            Err(Error::MalformedNumber(_))
        ));
        assert!(matches!(
            to_numeric(".", Family::Number),
            Err(Error::MalformedNumber(_))
        ));
        assert!(matches!(
            to_numeric("1.2.3K", Family::Number),
            Err(Error::MalformedNumber(_))
        ));
        assert!(matches!(
            to_numeric("1e3", Family::Number),
            Err(Error::MalformedNumber(_))
        ));

        let err = to_numeric("69420kk", Family::Number).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid string suffix: \"kk\". Valid options: K, M, B, T, Q"
        );
        assert!(matches!(
            to_numeric("6942klkl", Family::Number),
            Err(Error::UnknownSuffix { .. })
        ));
        assert!(matches!(
            to_numeric("4.51KB", Family::Number),
            Err(Error::UnknownSuffix { .. })
        ));
    }

    #[test]
    fn test_to_numeric_overflow() {
        assert!(matches!(
            to_numeric(&"9".repeat(400), Family::Number),
            Err(Error::MalformedNumber(_))
        ));
        assert!(matches!(
            to_numeric(&format!("{}Q", "9".repeat(300)), Family::Number),
            Err(Error::MalformedNumber(_))
        ));
        assert!(matches!(
            to_numeric(&format!("1.{}", "5".repeat(400)), Family::Number),
            Ok(v) if v == 1.5555555555555556
        ));
    }

    #[test]
    fn test_with_table_custom() {
        let table = magnitude::Table::custom(Family::Number, ["apple", "banana"]).unwrap();
        assert_eq!(with_table("4.5apple", &table).unwrap(), 4500.0);
        assert_eq!(with_table("2BANANA", &table).unwrap(), 2_000_000.0);
        assert!(matches!(
            with_table("2K", &table),
            Err(Error::UnknownSuffix { .. })
        ));
    }

    #[test]
    fn test_to_integer() {
        let table = Family::Number.table();
        assert_eq!(
            to_integer("123123123123123123123123123", table).unwrap(),
            123_123_123_123_123_123_123_123_123
        );
        assert_eq!(
            to_integer("1,234,567,890,123,456,789,012", table).unwrap(),
            1_234_567_890_123_456_789_012
        );
        assert_eq!(
            to_integer("#-9_007_199_254_740_993", table).unwrap(),
            -9_007_199_254_740_993
        );
        assert_eq!(
            to_integer("123456789012345678901K", table).unwrap(),
            123_456_789_012_345_678_901_000
        );
        assert_eq!(to_integer("1.5K", table).unwrap(), 1500);
        assert_eq!(to_integer("1234.9", table).unwrap(), 1234);
        assert_eq!(to_integer("-12.7", table).unwrap(), -12);
        assert_eq!(to_integer("2KB", Family::Filesize.table()).unwrap(), 2048);
    }

    #[test]
    fn test_to_integer_out_of_range() {
        let table = Family::Number.table();
        assert!(matches!(
            to_integer(&"9".repeat(40), table),
            Err(Error::OutOfRange(_))
        ));
        assert!(matches!(
            to_integer("170141183460469231731687303715884106K", table),
            Err(Error::OutOfRange(_))
        ));
        assert!(matches!(
            to_integer(&format!("{}.5", "1".repeat(40)), table),
            Err(Error::OutOfRange(_))
        ));
        assert!(matches!(
            to_integer("4.5kk", table),
            Err(Error::UnknownSuffix { .. })
        ));
        assert!(matches!(to_integer(" ", table), Err(Error::EmptyInput)));
    }

    #[test]
    fn test_round_trip() {
        for family in Family::ALL {
            for value in [
                0.0,
                0.5,
                7.0,
                999.0,
                1234.5,
                -98_765.4,
                4_510_000.0,
                69_420_090_000.0,
                3.3e14,
            ] {
                let precision = 3;
                let human = to_human(value, precision, family).unwrap();
                let parsed = to_numeric(&human, family).unwrap();
                let factor = family.table().magnitudes()[family.table().locate(value.abs())].factor();
                let tolerance = 0.5e-3 * factor * family.base();
                assert!(
                    (parsed - value).abs() <= tolerance,
                    "{family} {value} -> {human} -> {parsed}"
                );
            }
        }
    }
}
