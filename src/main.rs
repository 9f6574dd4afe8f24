//! Convert numbers to and from human readable magnitude strings

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use ansi_term::Style;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::EnvFilter;

use nicenum::color::{default_palette, parse_palette};
use nicenum::config::{self, Config};
use nicenum::parse::{to_integer, with_table};
use nicenum::table::{self, ErrorMode, Table, Transform, TransformOptions};
use nicenum::{magnitude, to_color, Family, HumanFormatter};

/// Environment variable holding the log filter
const LOG_ENV_VAR: &str = "NICENUM_LOG";

fn family_arg() -> Arg<'static> {
    Arg::new("family")
        .short('f')
        .long("family")
        .help("Suffix family: number or filesize")
        .action(ArgAction::Set)
        .value_parser(value_parser!(String))
}

fn suffixes_arg() -> Arg<'static> {
    Arg::new("suffixes")
        .long("suffixes")
        .help("Comma separated custom suffixes, replacing the family ones")
        .action(ArgAction::Set)
        .value_parser(value_parser!(String))
}

fn precision_arg() -> Arg<'static> {
    Arg::new("precision")
        .short('p')
        .long("precision")
        .help("Decimal count")
        .action(ArgAction::Set)
        .value_parser(value_parser!(usize))
}

fn currency_arg() -> Arg<'static> {
    Arg::new("currency")
        .long("currency")
        .help("Currency symbol, number family only")
        .action(ArgAction::Set)
        .value_parser(value_parser!(String))
}

fn colors_arg() -> Arg<'static> {
    Arg::new("colors")
        .long("colors")
        .help("Comma separated colors cycled through digit groups")
        .action(ArgAction::Set)
        .value_parser(value_parser!(String))
}

fn cli() -> Command<'static> {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log debug messages")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Configuration file path")
                .global(true)
                .action(ArgAction::Set)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("color")
                .long("color")
                .help("When to output ANSI colors")
                .global(true)
                .action(ArgAction::Set)
                .value_parser(["auto", "always", "never"])
                .default_value("auto"),
        )
        .subcommand(
            Command::new("human")
                .allow_negative_numbers(true)
                .about("Format number to human readable string")
                .arg(
                    Arg::new("value")
                        .required(true)
                        .allow_hyphen_values(true)
                        .value_parser(value_parser!(String)),
                )
                .arg(precision_arg())
                .arg(family_arg())
                .arg(suffixes_arg())
                .arg(currency_arg()),
        )
        .subcommand(
            Command::new("numeric")
                .allow_negative_numbers(true)
                .about("Parse human readable string to number")
                .arg(
                    Arg::new("text")
                        .required(true)
                        .allow_hyphen_values(true)
                        .value_parser(value_parser!(String)),
                )
                .arg(family_arg())
                .arg(suffixes_arg()),
        )
        .subcommand(
            Command::new("color")
                .allow_negative_numbers(true)
                .about("Colorize digit groups of a number")
                .arg(
                    Arg::new("value")
                        .required(true)
                        .allow_hyphen_values(true)
                        .value_parser(value_parser!(String)),
                )
                .arg(colors_arg()),
        )
        .subcommand(
            Command::new("table")
                .about("Convert columns of delimited text")
                .arg(
                    Arg::new("file")
                        .help("Input file, stdin if missing or '-'")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("columns")
                        .long("columns")
                        .help("Comma separated columns to convert, default to all")
                        .action(ArgAction::Set)
                        .value_parser(value_parser!(String)),
                )
                .arg(
                    Arg::new("transform")
                        .short('t')
                        .long("transform")
                        .help("Conversion to apply")
                        .action(ArgAction::Set)
                        .value_parser(["human", "num", "numeric", "color"])
                        .default_value("human"),
                )
                .arg(
                    Arg::new("delimiter")
                        .short('d')
                        .long("delimiter")
                        .help("Cell delimiter, 'tab' for tabulation [default: tab]")
                        .action(ArgAction::Set)
                        .value_parser(value_parser!(String)),
                )
                .arg(
                    Arg::new("coerce")
                        .long("coerce")
                        .help("Replace cells failing to convert with empty values")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("align")
                        .long("align")
                        .help("Output space aligned columns instead of delimited text")
                        .action(ArgAction::SetTrue),
                )
                .arg(precision_arg())
                .arg(family_arg())
                .arg(suffixes_arg())
                .arg(currency_arg())
                .arg(colors_arg()),
        )
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn stdout_is_tty() -> bool {
    // SAFETY: isatty only queries the file descriptor
    unsafe { libc::isatty(libc::STDOUT_FILENO) == 1 }
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',').map(|i| i.trim().to_owned()).collect()
}

fn flag(matches: &ArgMatches, id: &str) -> bool {
    matches.get_one::<bool>(id).copied().unwrap_or(false)
}

/// Magnitude table from command line, falling back to config
fn magnitude_table(matches: &ArgMatches, cfg: &Config) -> anyhow::Result<magnitude::Table> {
    let family = match matches.get_one::<String>("family") {
        Some(name) => name.parse::<Family>()?,
        None => cfg.human.family,
    };
    let suffixes = matches
        .get_one::<String>("suffixes")
        .map(|s| split_list(s))
        .or_else(|| cfg.human.suffixes.clone());
    let table = match suffixes {
        Some(suffixes) => magnitude::Table::custom(family, suffixes)?,
        None => family.table().clone(),
    };
    Ok(table)
}

/// Digit group styles from command line, falling back to config
fn palette(matches: &ArgMatches, cfg: &Config, styled: bool) -> anyhow::Result<Vec<Style>> {
    if !styled {
        return Ok(vec![Style::new()]);
    }
    let palette = match matches.get_one::<String>("colors") {
        Some(colors) => parse_palette(split_list(colors))?,
        None => match &cfg.color.palette {
            Some(names) => parse_palette(names)?,
            None => default_palette(),
        },
    };
    Ok(palette)
}

fn precision(matches: &ArgMatches, cfg: &Config) -> usize {
    matches
        .get_one::<usize>("precision")
        .copied()
        .or(cfg.human.precision)
        .unwrap_or(nicenum::fmt::DEFAULT_PRECISION)
}

fn currency<'a>(matches: &'a ArgMatches, cfg: &'a Config) -> Option<&'a str> {
    matches
        .get_one::<String>("currency")
        .or(cfg.human.currency.as_ref())
        .map(String::as_str)
}

fn run_human(matches: &ArgMatches, cfg: &Config) -> anyhow::Result<String> {
    let table = magnitude_table(matches, cfg)?;
    let text = matches
        .get_one::<String>("value")
        .ok_or_else(|| anyhow::anyhow!("Missing value"))?;
    let value = with_table(text, &table)?;
    let mut formatter = HumanFormatter::new(&table).precision(precision(matches, cfg));
    if let Some(currency) = currency(matches, cfg) {
        formatter = formatter.currency(currency);
    }
    Ok(formatter.format(value)?)
}

fn run_numeric(matches: &ArgMatches, cfg: &Config) -> anyhow::Result<String> {
    let table = magnitude_table(matches, cfg)?;
    let text = matches
        .get_one::<String>("text")
        .ok_or_else(|| anyhow::anyhow!("Missing text"))?;
    Ok(with_table(text, &table)?.to_string())
}

fn run_color(matches: &ArgMatches, cfg: &Config, styled: bool) -> anyhow::Result<String> {
    let text = matches
        .get_one::<String>("value")
        .ok_or_else(|| anyhow::anyhow!("Missing value"))?;
    let value = to_integer(text, cfg.human.family.table())?;
    Ok(to_color(value, &palette(matches, cfg, styled)?)?)
}

fn parse_delimiter(s: &str) -> anyhow::Result<char> {
    match s {
        "tab" | "\\t" => Ok('\t'),
        _ => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => anyhow::bail!("Delimiter must be a single char, got {s:?}"),
            }
        }
    }
}

fn run_table<W: Write>(
    matches: &ArgMatches,
    cfg: &Config,
    styled: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    let delimiter = match matches.get_one::<String>("delimiter") {
        Some(d) => parse_delimiter(d)?,
        None => cfg.table.delimiter.unwrap_or('\t'),
    };
    let input: Box<dyn BufRead> = match matches.get_one::<PathBuf>("file") {
        Some(path) if path.as_os_str() != "-" => Box::new(BufReader::new(File::open(path)?)),
        _ => Box::new(io::stdin().lock()),
    };
    let data = Table::read_delimited(input, delimiter)?;

    let columns = match matches.get_one::<String>("columns") {
        Some(columns) => Some(split_list(columns)),
        None if !cfg.table.column_blacklist.is_empty() => {
            Some(table::select_columns(&data, &cfg.table.column_blacklist))
        }
        None => None,
    };

    let transform = matches
        .get_one::<String>("transform")
        .map_or(Ok(Transform::default()), |t| t.parse::<Transform>())?;
    let magnitudes = magnitude_table(matches, cfg)?;
    let options = TransformOptions {
        precision: precision(matches, cfg),
        currency: currency(matches, cfg),
        palette: palette(matches, cfg, styled)?,
        errors: if flag(matches, "coerce") {
            ErrorMode::Coerce
        } else {
            ErrorMode::Raise
        },
        ..TransformOptions::new(transform, &magnitudes)
    };

    let converted = table::apply(&data, columns.as_deref(), &options)?;
    if flag(matches, "align") {
        write!(out, "{converted}")?;
    } else {
        converted.write_delimited(out, delimiter)?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    init_logging(flag(&matches, "verbose"));

    let cfg = config::parse_config(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
    let styled = match matches.get_one::<String>("color").map(String::as_str) {
        Some("always") => true,
        Some("never") => false,
        _ => stdout_is_tty(),
    };
    tracing::debug!(?cfg, styled, "Configuration loaded");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match matches.subcommand() {
        Some(("human", sub)) => writeln!(out, "{}", run_human(sub, &cfg)?)?,
        Some(("numeric", sub)) => writeln!(out, "{}", run_numeric(sub, &cfg)?)?,
        Some(("color", sub)) => writeln!(out, "{}", run_color(sub, &cfg, styled)?)?,
        Some(("table", sub)) => run_table(sub, &cfg, styled, &mut out)?,
        _ => unreachable!("subcommand is required"),
    }

    Ok(())
}
