//! Number to human readable string

use crate::error::Error;
use crate::magnitude::{self, Family};

/// Decimal count used when none is given
pub const DEFAULT_PRECISION: usize = 1;

/// Past this many decimals, f64 rounding is a no-op
const MAX_SIGNIFICANT_DECIMALS: usize = 17;

/// Format numeric value with magnitude suffix, ie. `1500` -> `1.5K`
pub fn to_human(value: f64, precision: usize, family: Family) -> Result<String, Error> {
    HumanFormatter::new(family.table())
        .precision(precision)
        .format(value)
}

/// Configurable human readable formatter
#[derive(Debug, Clone)]
pub struct HumanFormatter<'a> {
    table: &'a magnitude::Table,
    precision: usize,
    currency: Option<&'a str>,
}

impl<'a> HumanFormatter<'a> {
    /// Formatter using `table`, with default precision and no currency symbol
    #[must_use]
    pub fn new(table: &'a magnitude::Table) -> Self {
        Self {
            table,
            precision: DEFAULT_PRECISION,
            currency: None,
        }
    }

    /// Set decimal count
    #[must_use]
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Prefix with a currency symbol, ignored for filesizes
    #[must_use]
    pub fn currency(mut self, symbol: &'a str) -> Self {
        self.currency = Some(symbol);
        self
    }

    /// Format value
    pub fn format(&self, value: f64) -> Result<String, Error> {
        if !value.is_finite() {
            return Err(Error::NotFinite(value));
        }

        let magnitudes = self.table.magnitudes();
        let abs_value = value.abs();
        let mut idx = self.table.locate(abs_value);

        // Rounding may carry into the next magnitude (999_999 -> 1000.0K)
        if let Some(next) = magnitudes.get(idx + 1) {
            let rounded = self.round(abs_value / magnitudes[idx].factor());
            if rounded * magnitudes[idx].factor() >= next.factor() {
                idx += 1;
            }
        }
        let magnitude = &magnitudes[idx];
        let scaled = abs_value / magnitude.factor();

        let mut number = format!("{scaled:.prec$}", prec = self.precision);
        if idx == 0 && number.contains('.') {
            let trimmed_len = number.trim_end_matches('0').trim_end_matches('.').len();
            number.truncate(trimmed_len);
        }

        let negative = value.is_sign_negative() && number.chars().any(|c| matches!(c, '1'..='9'));
        let currency = match self.table.family() {
            Family::Number => self.currency.unwrap_or_default(),
            Family::Filesize => "",
        };

        Ok(format!(
            "{}{}{}{}",
            if negative { "-" } else { "" },
            currency,
            number,
            magnitude.suffix()
        ))
    }

    fn round(&self, value: f64) -> f64 {
        let decimals = self.precision.min(MAX_SIGNIFICANT_DECIMALS) as i32;
        let scale = 10_f64.powi(decimals);
        (value * scale).round() / scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_human() {
        assert_eq!(to_human(0.0, 0, Family::Number).unwrap(), "0");
        assert_eq!(to_human(0.12, 2, Family::Number).unwrap(), "0.12");
        assert_eq!(to_human(999.0, 1, Family::Number).unwrap(), "999");
        assert_eq!(to_human(1500.0, 1, Family::Number).unwrap(), "1.5K");
        assert_eq!(to_human(4500.0, 1, Family::Number).unwrap(), "4.5K");
        assert_eq!(to_human(4510.0, 2, Family::Number).unwrap(), "4.51K");
        assert_eq!(to_human(4510.1234, 2, Family::Number).unwrap(), "4.51K");
        assert_eq!(to_human(4_510_000.0, 2, Family::Number).unwrap(), "4.51M");
        assert_eq!(to_human(69_420_090_000.0, 3, Family::Number).unwrap(), "69.420B");
        assert_eq!(to_human(7.2e12, 1, Family::Number).unwrap(), "7.2T");
        assert_eq!(to_human(1e18, 1, Family::Number).unwrap(), "1000.0Q");
        assert_eq!(to_human(-1500.0, 1, Family::Number).unwrap(), "-1.5K");
        assert_eq!(to_human(-12.7, 0, Family::Number).unwrap(), "-13");
    }

    #[test]
    fn test_to_human_filesize() {
        assert_eq!(to_human(512.0, 1, Family::Filesize).unwrap(), "512");
        assert_eq!(to_human(1000.0, 1, Family::Filesize).unwrap(), "1000");
        assert_eq!(to_human(1024.0, 2, Family::Filesize).unwrap(), "1.00KB");
        assert_eq!(to_human(1536.0, 1, Family::Filesize).unwrap(), "1.5KB");
        assert_eq!(to_human(4_510_000.0, 2, Family::Filesize).unwrap(), "4.30MB");
        assert_eq!(to_human(1_099_511_627_776.0, 1, Family::Filesize).unwrap(), "1.0TB");
    }

    #[test]
    fn test_rounding_carry() {
        assert_eq!(to_human(999_999.0, 1, Family::Number).unwrap(), "1.0M");
        assert_eq!(to_human(999.96, 1, Family::Number).unwrap(), "1.0K");
        assert_eq!(to_human(999.94, 1, Family::Number).unwrap(), "999.9");
        assert_eq!(to_human(999_499.0, 0, Family::Number).unwrap(), "999K");
        assert_eq!(to_human(1_048_575.0, 1, Family::Filesize).unwrap(), "1.0MB");
    }

    #[test]
    fn test_no_negative_zero() {
        assert_eq!(to_human(-0.0, 1, Family::Number).unwrap(), "0");
        assert_eq!(to_human(-0.001, 1, Family::Number).unwrap(), "0");
    }

    #[test]
    fn test_not_finite() {
        assert!(matches!(
            to_human(f64::NAN, 1, Family::Number),
            Err(Error::NotFinite(_))
        ));
        assert!(matches!(
            to_human(f64::INFINITY, 1, Family::Filesize),
            Err(Error::NotFinite(_))
        ));
    }

    #[test]
    fn test_formatter_currency() {
        let formatter = HumanFormatter::new(Family::Number.table())
            .precision(2)
            .currency("$");
        assert_eq!(formatter.format(4510.0).unwrap(), "$4.51K");
        assert_eq!(formatter.format(-4510.0).unwrap(), "-$4.51K");

        let formatter = HumanFormatter::new(Family::Filesize.table())
            .precision(2)
            .currency("$");
        assert_eq!(formatter.format(4510.0).unwrap(), "4.40KB");
    }

    #[test]
    fn test_formatter_custom_table() {
        let table = magnitude::Table::custom(Family::Number, ["apple", "banana"]).unwrap();
        let formatter = HumanFormatter::new(&table);
        assert_eq!(formatter.format(4500.0).unwrap(), "4.5apple");
        assert_eq!(formatter.format(1e12).unwrap(), "1000000.0banana");
    }
}
