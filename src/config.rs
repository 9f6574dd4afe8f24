//! Local configuration

use std::path::Path;

use crate::magnitude::Family;

/// Local configuration
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    /// Human readable formatting config
    pub human: HumanSection,

    /// Digit group colorization config
    pub color: ColorSection,

    /// Table conversion config
    pub table: TableSection,
}

/// Human readable formatting config
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct HumanSection {
    /// Decimal count
    pub precision: Option<usize>,
    /// Suffix family
    pub family: Family,
    /// Currency symbol prepended to numbers
    pub currency: Option<String>,
    /// Custom suffixes replacing the family ones
    pub suffixes: Option<Vec<String>>,
}

/// Digit group colorization config
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ColorSection {
    /// Color names, cycled through digit groups
    pub palette: Option<Vec<String>>,
}

/// Table conversion config
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct TableSection {
    /// Exclude columns whose name match any of theses regexs, when no column is explicitly selected
    #[serde(with = "serde_regex")]
    pub column_blacklist: Vec<regex::Regex>,
    /// Cell delimiter
    pub delimiter: Option<char>,
}

/// Parse local configuration, from `path` if set, from XDG config dir otherwise
pub fn parse_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config_filepath = if let Some(path) = path {
        Some(path.to_path_buf())
    } else {
        let binary_name = env!("CARGO_PKG_NAME");
        let xdg_dirs = xdg::BaseDirectories::with_prefix(binary_name);
        xdg_dirs.find_config_file("config.toml")
    };
    let config = if let Some(config_filepath) = config_filepath {
        tracing::debug!("Loading config from {config_filepath:?}");
        let toml_data = std::fs::read_to_string(config_filepath)?;
        toml::from_str(&toml_data)?
    } else {
        Config::default()
    };
    Ok(config)
}
