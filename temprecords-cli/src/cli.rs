use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use temprecords_core::{
    AggregationMode, Config, QueryRequest, TimeframeKind, TimeframeSpec, Unit,
    model::{parse_day, parse_month, parse_year},
    run_query,
    source::source_from_config,
};

use crate::prompt;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "temprecords",
    version,
    about = "Find the maximum or minimum temperature recorded at a weather station",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub query: QueryArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store default station, time zone and unit for the interactive prompts.
    Configure,
}

/// The nine positional parameters. When any is missing the user is prompted instead.
#[derive(Debug, Default, Args)]
pub struct QueryArgs {
    /// Weather station identifier, e.g. "KDSM".
    pub station: Option<String>,

    /// Time zone name as it appears in the tz database, e.g. "America/Chicago".
    pub time_zone: Option<String>,

    /// Earliest year to download data from (1928 or later).
    pub earliest_year: Option<String>,

    /// "max" or "min".
    pub mode: Option<String>,

    /// all, year, single-month, every-month, single-day or every-day.
    pub timeframe: Option<String>,

    /// Year for year, single-month and single-day; ignored otherwise.
    pub data_year: Option<String>,

    /// Month for the month and day timeframes; ignored otherwise.
    pub data_month: Option<String>,

    /// Day for single-day and every-day; ignored otherwise.
    pub data_day: Option<String>,

    /// "c" for Celsius or "f" for Fahrenheit.
    pub unit: Option<String>,
}

impl QueryArgs {
    pub fn is_complete(&self) -> bool {
        [
            &self.station,
            &self.time_zone,
            &self.earliest_year,
            &self.mode,
            &self.timeframe,
            &self.data_year,
            &self.data_month,
            &self.data_day,
            &self.unit,
        ]
        .iter()
        .all(|arg| arg.is_some())
    }

    /// Build a request from the positionals. Year, month and day are only
    /// parsed when the timeframe uses them.
    pub fn to_request(&self) -> anyhow::Result<QueryRequest> {
        let field = |value: &Option<String>, name: &str| {
            value.clone().with_context(|| format!("Missing argument: {name}"))
        };

        let kind = TimeframeKind::try_from(field(&self.timeframe, "timeframe")?.as_str())?;
        let year = if kind.needs_year() {
            Some(parse_year(&field(&self.data_year, "data year")?)?)
        } else {
            None
        };
        let month = if kind.needs_month() {
            Some(parse_month(&field(&self.data_month, "data month")?)?)
        } else {
            None
        };
        let day = if kind.needs_day() {
            Some(parse_day(&field(&self.data_day, "data day")?)?)
        } else {
            None
        };

        let request = QueryRequest::new(
            field(&self.station, "station")?,
            field(&self.time_zone, "time zone")?,
            parse_year(&field(&self.earliest_year, "earliest year")?)?,
            AggregationMode::try_from(field(&self.mode, "max or min")?.as_str())?,
            TimeframeSpec::from_parts(kind, year, month, day)?,
            Unit::try_from(field(&self.unit, "unit")?.as_str())?,
        )?;

        debug!(?request, "built request from positional arguments");
        Ok(request)
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        match self.command {
            Some(Command::Configure) => {
                prompt::configure(&mut config)?;
                let path = config.save()?;
                println!("Saved defaults to {}", path.display());
            }
            None => {
                let request = if self.query.is_complete() {
                    self.query.to_request()?
                } else {
                    prompt::ask_request(&config)?
                };

                debug!(station = %request.station, timeframe = request.timeframe.kind().as_str(), "running query");
                let source = source_from_config(&config);
                let outcome = run_query(source.as_ref(), &request, &config.retry_policy())
                    .await
                    .context(
                        "An error occurred with your request. \
                         Please make sure that your data is formatted correctly.",
                    )?;

                println!("{}", outcome.sentence(&request.station));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("temprecords").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn nine_positionals_build_a_request() {
        let cli = parse(&[
            "kdsm",
            "America/Chicago",
            "1950",
            "min",
            "single-day",
            "2020",
            "06",
            "5",
            "f",
        ]);
        assert!(cli.command.is_none());
        assert!(cli.query.is_complete());

        let request = cli.query.to_request().unwrap();
        assert_eq!(request.station, "KDSM");
        assert_eq!(request.earliest_year, 1950);
        assert_eq!(request.mode, AggregationMode::Min);
        assert_eq!(request.timeframe, TimeframeSpec::SingleDay(2020, 6, 5));
        assert_eq!(request.unit, Unit::Fahrenheit);
    }

    #[test]
    fn unused_positionals_may_be_placeholders() {
        let cli = parse(&["KDSM", "UTC", "1928", "max", "all", "x", "x", "x", "c"]);
        let request = cli.query.to_request().unwrap();
        assert_eq!(request.timeframe, TimeframeSpec::All);
    }

    #[test]
    fn earliest_year_in_the_future_is_rejected() {
        let cli = parse(&["KDSM", "UTC", "3000", "max", "all", "x", "x", "x", "c"]);
        let err = cli.query.to_request().unwrap_err();
        assert!(err.to_string().contains("after the current year"));
    }

    #[test]
    fn fewer_positionals_means_interactive() {
        let cli = parse(&["KDSM", "UTC"]);
        assert!(!cli.query.is_complete());
    }

    #[test]
    fn bad_timeframe_is_rejected() {
        let cli = parse(&["KDSM", "UTC", "1928", "max", "decade", "2020", "1", "1", "c"]);
        let err = cli.query.to_request().unwrap_err();
        assert!(err.to_string().contains("Unknown timeframe"));
    }

    #[test]
    fn configure_subcommand_parses() {
        let cli = parse(&["configure"]);
        assert!(matches!(cli.command, Some(Command::Configure)));
    }
}
