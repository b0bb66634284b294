use std::fs::{self, OpenOptions};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::{eyre, Result, WrapErr};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::app::Selection;
use crate::calendar::{DateFormat, ViewMode, YearSelection};
use crate::config::Settings;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "econ-calendar",
    version,
    about = "Economic calendar in the terminal, filtered and colored by currency"
)]
pub struct Cli {
    /// Calendar CSV with Date, Currency and Event columns
    pub csv: Option<PathBuf>,

    /// Currencies to show, comma separated (default: first in the file)
    #[arg(short = 'c', long, value_delimiter = ',')]
    pub currencies: Vec<String>,

    /// Year to show: a number or "current"
    #[arg(long)]
    pub year: Option<YearSelection>,

    /// month, week, day or year
    #[arg(long)]
    pub view: Option<ViewMode>,

    /// day-first or iso
    #[arg(long)]
    pub date_format: Option<DateFormat>,

    /// Show bare event names instead of "CCY: Event"
    #[arg(long)]
    pub no_prefix: bool,

    /// Fade everything except key events
    #[arg(long)]
    pub key_events: bool,

    /// Apply the year filter in month, week and day views too
    #[arg(long)]
    pub pin_year: bool,

    /// Bucket the year grid by month only, ignoring the event's year
    #[arg(long)]
    pub loose_year_match: bool,

    /// Config file (default: <config dir>/econ-calendar/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log file for the interactive calendar
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the built view as JSON (events plus calendar options)
    Export {
        #[arg(long)]
        pretty: bool,
    },
}

impl Cli {
    pub fn csv_path(&self, settings: &Settings) -> Result<PathBuf> {
        self.csv
            .clone()
            .or_else(|| settings.csv_path.clone())
            .ok_or_else(|| eyre!("no calendar file given; pass a CSV path or set csv_path in config.toml"))
    }

    pub fn date_format(&self, settings: &Settings) -> DateFormat {
        self.date_format.unwrap_or(settings.date_format)
    }

    /// Initial selection: command line flags win over the config file.
    pub fn selection(&self, settings: &Settings) -> Selection {
        let currencies = if self.currencies.is_empty() {
            &settings.default_currencies
        } else {
            &self.currencies
        };

        Selection {
            currencies: currencies
                .iter()
                .map(|c| c.trim().to_uppercase())
                .filter(|c| !c.is_empty())
                .collect(),
            year: self.year.unwrap_or_default(),
            view_mode: self.view.unwrap_or(settings.view),
            prefix_currency: settings.prefix_currency && !self.no_prefix,
            classify_key_events: settings.classify_key_events || self.key_events,
            strict_year_match: settings.strict_year_match && !self.loose_year_match,
            pin_year: settings.pin_year || self.pin_year,
        }
    }
}

pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

pub fn init_tracing(verbose: u8, target: LogTarget) -> Result<()> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| eyre!("invalid RUST_LOG / log filter: {e}"))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true);

    let init_result = match target {
        LogTarget::Stderr => builder
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .try_init(),
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .wrap_err_with(|| format!("cannot create log directory {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .wrap_err_with(|| format!("cannot open log file {}", path.display()))?;
            builder
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
        }
    };

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("econ-calendar").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn flags_override_settings() {
        let cli = parse(&[
            "events.csv",
            "--currencies",
            "usd, eur",
            "--year",
            "2026",
            "--view",
            "year",
            "--no-prefix",
            "--key-events",
            "--loose-year-match",
        ]);
        let selection = cli.selection(&Settings::default());

        assert_eq!(
            selection.currencies,
            ["USD", "EUR"].iter().map(|s| s.to_string()).collect::<BTreeSet<_>>()
        );
        assert_eq!(selection.year, YearSelection::Year(2026));
        assert_eq!(selection.view_mode, ViewMode::YearGrid);
        assert!(!selection.prefix_currency);
        assert!(selection.classify_key_events);
        assert!(!selection.strict_year_match);
        assert!(!selection.pin_year);
        assert_eq!(cli.csv_path(&Settings::default()).unwrap(), PathBuf::from("events.csv"));
    }

    #[test]
    fn settings_fill_in_missing_flags() {
        let settings = Settings {
            csv_path: Some(PathBuf::from("/data/calendar.csv")),
            date_format: DateFormat::Iso,
            default_currencies: vec!["JPY".to_string()],
            pin_year: true,
            ..Settings::default()
        };
        let cli = parse(&[]);
        let selection = cli.selection(&settings);

        assert_eq!(selection.currencies.iter().collect::<Vec<_>>(), vec!["JPY"]);
        assert_eq!(selection.year, YearSelection::Current);
        assert_eq!(selection.view_mode, ViewMode::Month);
        assert!(selection.pin_year);
        assert_eq!(cli.date_format(&settings), DateFormat::Iso);
        assert_eq!(cli.csv_path(&settings).unwrap(), PathBuf::from("/data/calendar.csv"));
    }

    #[test]
    fn missing_csv_is_an_error() {
        assert!(parse(&[]).csv_path(&Settings::default()).is_err());
    }

    #[test]
    fn export_subcommand_parses() {
        let cli = parse(&["events.csv", "export", "--pretty"]);
        assert!(matches!(cli.command, Some(Command::Export { pretty: true })));
    }

    #[test]
    fn bad_view_is_rejected() {
        assert!(Cli::try_parse_from(["econ-calendar", "--view", "agenda"]).is_err());
    }
}
