//! Digit group colorization

use ansi_term::Colour::{Black, Blue, Cyan, Fixed, Green, Purple, Red, White, Yellow};
use ansi_term::Style;

use crate::error::Error;

/// Digits per group
const GROUP_LEN: usize = 3;

/// Palette used when none is configured
#[must_use]
pub fn default_palette() -> Vec<Style> {
    vec![Red.normal(), Green.normal(), Yellow.normal(), Blue.normal()]
}

/// Parse a color name (or 0-255 terminal palette index) to a style
pub fn from_name(name: &str) -> Result<Style, Error> {
    let style = match name.trim().to_ascii_lowercase().as_str() {
        "black" => Black.normal(),
        "red" => Red.normal(),
        "green" => Green.normal(),
        "yellow" => Yellow.normal(),
        "blue" => Blue.normal(),
        "purple" | "magenta" => Purple.normal(),
        "cyan" => Cyan.normal(),
        "white" => White.normal(),
        "bold" => Style::new().bold(),
        "underline" => Style::new().underline(),
        other => other
            .parse::<u8>()
            .map(|idx| Fixed(idx).normal())
            .map_err(|_| Error::UnknownColor(name.to_owned()))?,
    };
    Ok(style)
}

/// Parse a list of color names
pub fn parse_palette<I, S>(names: I) -> Result<Vec<Style>, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names.into_iter().map(|n| from_name(n.as_ref())).collect()
}

/// Split decimal digits of the absolute value in groups of 3, aligned on the right
#[must_use]
pub fn digit_groups(value: i128) -> Vec<String> {
    let digits = value.unsigned_abs().to_string();
    let mut groups = Vec::with_capacity(digits.len().div_ceil(GROUP_LEN));
    let mut rest = digits.as_str();
    let mut split = match digits.len() % GROUP_LEN {
        0 => GROUP_LEN,
        head => head,
    };
    while !rest.is_empty() {
        let (group, tail) = rest.split_at(split);
        groups.push(group.to_owned());
        rest = tail;
        split = GROUP_LEN;
    }
    groups
}

/// Paint each digit group of `value`, cycling through `styles`
pub fn to_color(value: i128, styles: &[Style]) -> Result<String, Error> {
    if styles.is_empty() {
        return Err(Error::EmptyColorList);
    }

    let sign = if value < 0 { "-" } else { "" };
    let painted: String = digit_groups(value)
        .iter()
        .zip(styles.iter().cycle())
        .map(|(group, style)| style.paint(group.as_str()).to_string())
        .collect();
    Ok(format!("{sign}{painted}"))
}
