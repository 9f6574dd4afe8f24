//! Magnitude tables

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use itertools::Itertools as _;

use crate::error::Error;

/// Unit system, selects the magnitude table
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// Decimal, base 1000 (K, M, B, T, Q)
    #[default]
    Number,
    /// Binary, base 1024 (KB, MB, GB, TB, PB)
    Filesize,
}

impl Family {
    /// All families, in display order
    pub const ALL: [Self; 2] = [Self::Number, Self::Filesize];

    /// Ratio between two consecutive magnitudes
    #[must_use]
    pub fn base(self) -> f64 {
        match self {
            Self::Number => 1000.0,
            Self::Filesize => 1024.0,
        }
    }

    /// Built-in magnitude table, shared by all conversions
    #[must_use]
    pub fn table(self) -> &'static Table {
        match self {
            Self::Number => &NUMBER_TABLE,
            Self::Filesize => &FILESIZE_TABLE,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Filesize => "filesize",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Family {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidFamily {
                name: s.to_owned(),
                valid: Self::ALL.iter().join(", "),
            })
    }
}

/// A power of the family base, and how to write it
#[derive(Debug, Clone, PartialEq)]
pub struct Magnitude {
    factor: f64,
    suffix: String,
    aliases: Vec<String>,
}

impl Magnitude {
    /// Multiplier
    #[must_use]
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Suffix appended when formatting
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    fn matches(&self, suffix: &str) -> bool {
        self.suffix.eq_ignore_ascii_case(suffix)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(suffix))
    }
}

/// Ordered magnitudes of a family, unit first, factors strictly increasing
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    family: Family,
    magnitudes: Vec<Magnitude>,
}

static NUMBER_TABLE: LazyLock<Table> = LazyLock::new(|| {
    Table::build(
        Family::Number,
        &[("K", &[]), ("M", &[]), ("B", &[]), ("T", &[]), ("Q", &[])],
        &[],
    )
});

static FILESIZE_TABLE: LazyLock<Table> = LazyLock::new(|| {
    Table::build(
        Family::Filesize,
        &[
            ("KB", &["K", "KiB"]),
            ("MB", &["M", "MiB"]),
            ("GB", &["G", "GiB"]),
            ("TB", &["T", "TiB"]),
            ("PB", &["P", "PiB"]),
        ],
        &["B"],
    )
});

impl Table {
    fn build(family: Family, suffixes: &[(&str, &[&str])], unit_aliases: &[&str]) -> Self {
        let unit = Magnitude {
            factor: 1.0,
            suffix: String::new(),
            aliases: unit_aliases.iter().map(|&a| a.to_owned()).collect(),
        };
        let magnitudes = std::iter::once(unit)
            .chain(suffixes.iter().zip(1..).map(|((suffix, aliases), exp)| Magnitude {
                factor: family.base().powi(exp),
                suffix: (*suffix).to_owned(),
                aliases: aliases.iter().map(|&a| a.to_owned()).collect(),
            }))
            .collect();
        Self { family, magnitudes }
    }

    /// Build a table with the family base and custom suffixes, replacing the built-in ones
    ///
    /// Suffixes must be non empty, ASCII alphabetic, and unique ignoring case.
    pub fn custom<I, S>(family: Family, suffixes: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let suffixes: Vec<String> = suffixes
            .into_iter()
            .map(|s| s.as_ref().trim().to_owned())
            .collect();
        if suffixes.is_empty() {
            return Err(Error::InvalidTable("suffix list is empty".to_owned()));
        }
        if let Some(bad) = suffixes
            .iter()
            .find(|s| s.is_empty() || !s.chars().all(|c| c.is_ascii_alphabetic()))
        {
            return Err(Error::InvalidTable(format!(
                "suffix {bad:?} must be made of ASCII letters"
            )));
        }
        if let Some(dup) = suffixes
            .iter()
            .map(|s| s.to_ascii_lowercase())
            .duplicates()
            .next()
        {
            return Err(Error::InvalidTable(format!("duplicate suffix {dup:?}")));
        }

        let borrowed: Vec<(&str, &[&str])> =
            suffixes.iter().map(|s| (s.as_str(), &[][..])).collect();
        Ok(Self::build(family, &borrowed, &[]))
    }

    /// Family this table was built for
    #[must_use]
    pub fn family(&self) -> Family {
        self.family
    }

    /// All magnitudes, unit first
    #[must_use]
    pub fn magnitudes(&self) -> &[Magnitude] {
        &self.magnitudes
    }

    /// Index of the largest magnitude whose factor is not above `abs_value`, 0 if below all
    #[must_use]
    pub fn locate(&self, abs_value: f64) -> usize {
        self.magnitudes
            .iter()
            .rposition(|m| m.factor <= abs_value)
            .unwrap_or(0)
    }

    /// Find magnitude by suffix or alias, ignoring case
    #[must_use]
    pub fn lookup(&self, suffix: &str) -> Option<&Magnitude> {
        self.magnitudes.iter().find(|m| m.matches(suffix))
    }

    /// Human readable list of accepted suffixes, for error messages
    pub(crate) fn valid_suffixes(&self) -> String {
        self.magnitudes
            .iter()
            .filter(|m| !m.suffix.is_empty())
            .map(|m| m.suffix.as_str())
            .join(", ")
    }
}
