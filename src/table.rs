//! Apply conversions to table columns

use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;

use ansi_term::Style;
use itertools::Itertools as _;
use regex::Regex;

use crate::color::{default_palette, to_color};
use crate::error::Error;
use crate::fmt::{HumanFormatter, DEFAULT_PRECISION};
use crate::magnitude;
use crate::parse::{to_integer, with_table};

/// Conversion to apply to cells
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Numbers to human readable strings
    #[default]
    Human,
    /// Human readable strings to numbers
    Numeric,
    /// Colorize digit groups
    Color,
}

impl FromStr for Transform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "num" | "numeric" => Ok(Self::Numeric),
            "color" => Ok(Self::Color),
            _ => Err(Error::InvalidTransform(s.to_owned())),
        }
    }
}

/// What to do with a cell that fails to convert
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ErrorMode {
    /// Fail the whole conversion
    #[default]
    Raise,
    /// Replace cell with a missing (empty) value
    Coerce,
}

/// Header and rows of string cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Parameters of a table conversion
#[derive(Debug, Clone)]
pub struct TransformOptions<'a> {
    /// Conversion kind
    pub transform: Transform,
    /// Magnitudes to format with and parse against
    pub table: &'a magnitude::Table,
    /// Decimal count for human readable output
    pub precision: usize,
    /// Currency symbol for human readable output
    pub currency: Option<&'a str>,
    /// Colors for digit groups
    pub palette: Vec<Style>,
    /// Cell failure handling
    pub errors: ErrorMode,
}

impl<'a> TransformOptions<'a> {
    /// Options with defaults for everything except transform and magnitudes
    #[must_use]
    pub fn new(transform: Transform, table: &'a magnitude::Table) -> Self {
        Self {
            transform,
            table,
            precision: DEFAULT_PRECISION,
            currency: None,
            palette: default_palette(),
            errors: ErrorMode::Raise,
        }
    }
}

impl Table {
    /// Build table, all rows must have one cell per column
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, Error> {
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != columns.len())
        {
            return Err(Error::RaggedRow {
                row,
                found: cells.len(),
                expected: columns.len(),
            });
        }
        Ok(Self { columns, rows })
    }

    /// Column names
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Data rows
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    fn column_index(&self, name: &str) -> Result<usize, Error> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| Error::MissingColumn(name.to_owned()))
    }

    /// Read delimited text, first line is the header, blank lines are skipped
    pub fn read_delimited<R: BufRead>(reader: R, delimiter: char) -> Result<Self, Error> {
        let mut lines = reader
            .lines()
            .filter(|r| r.as_ref().map_or(true, |l| !l.trim().is_empty()));
        let header = lines.next().ok_or(Error::EmptyInput)??;
        let columns = split_line(&header, delimiter);
        let rows = lines
            .map(|r| r.map(|l| split_line(&l, delimiter)))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(columns, rows)
    }

    /// Write delimited text, header first
    pub fn write_delimited<W: Write>(&self, mut writer: W, delimiter: char) -> Result<(), Error> {
        writeln!(writer, "{}", self.columns.iter().join(&delimiter.to_string()))?;
        for row in &self.rows {
            writeln!(writer, "{}", row.iter().join(&delimiter.to_string()))?;
        }
        Ok(())
    }
}

impl fmt::Display for Table {
    /// Output table with space aligned columns
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let widths: Vec<usize> = (0..self.columns.len())
            .map(|i| {
                std::iter::once(&self.columns[i])
                    .chain(self.rows.iter().map(|r| &r[i]))
                    .map(|c| display_width(c))
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        for line in std::iter::once(&self.columns).chain(&self.rows) {
            let mut cells = line.iter().zip(&widths).map(|(cell, width)| {
                format!("{}{}", " ".repeat(width - display_width(cell)), cell)
            });
            writeln!(f, "{}", cells.join("  "))?;
        }
        Ok(())
    }
}

fn split_line(line: &str, delimiter: char) -> Vec<String> {
    line.split(delimiter).map(|c| c.trim().to_owned()).collect()
}

/// Printable char count, ANSI escape sequences excluded
fn display_width(s: &str) -> usize {
    let mut width = 0;
    let mut in_escape = false;
    for c in s.chars() {
        match (in_escape, c) {
            (false, '\u{1b}') => in_escape = true,
            (true, 'm') => in_escape = false,
            (true, _) => {}
            (false, _) => width += 1,
        }
    }
    width
}

/// Names of columns not matching any exclusion regex
#[must_use]
pub fn select_columns(table: &Table, exclude: &[Regex]) -> Vec<String> {
    table
        .columns
        .iter()
        .filter(|c| !exclude.iter().any(|r| r.is_match(c)))
        .cloned()
        .collect()
}

/// Convert a single cell
fn convert_cell(cell: &str, options: &TransformOptions<'_>) -> Result<String, Error> {
    match options.transform {
        Transform::Human => {
            let value = with_table(cell, options.table)?;
            let mut formatter = HumanFormatter::new(options.table).precision(options.precision);
            if let Some(currency) = options.currency {
                formatter = formatter.currency(currency);
            }
            formatter.format(value)
        }
        Transform::Numeric => Ok(with_table(cell, options.table)?.to_string()),
        Transform::Color => to_color(to_integer(cell, options.table)?, &options.palette),
    }
}

/// Return a copy of `table` with cells of `columns` converted, all columns if `None`
pub fn apply(
    table: &Table,
    columns: Option<&[String]>,
    options: &TransformOptions<'_>,
) -> Result<Table, Error> {
    let indexes: Vec<usize> = match columns {
        Some(names) => names
            .iter()
            .map(|n| table.column_index(n))
            .collect::<Result<_, _>>()?,
        None => (0..table.columns.len()).collect(),
    };
    tracing::debug!(
        transform = ?options.transform,
        columns = ?indexes.iter().map(|&i| &table.columns[i]).collect::<Vec<_>>(),
        "Converting table"
    );

    let mut converted = table.clone();
    for (row_idx, row) in converted.rows.iter_mut().enumerate() {
        for &col_idx in &indexes {
            let cell = &mut row[col_idx];
            match (convert_cell(cell, options), options.errors) {
                (Ok(new_cell), _) => *cell = new_cell,
                (Err(err), ErrorMode::Coerce) => {
                    tracing::warn!(
                        row = row_idx,
                        column = %table.columns[col_idx],
                        %err,
                        "Coercing cell {cell:?} to missing value"
                    );
                    cell.clear();
                }
                (Err(err), ErrorMode::Raise) => return Err(err),
            }
        }
    }
    Ok(converted)
}
