//! Interactive prompts used when the positional arguments are incomplete.

use anyhow::Result;
use chrono::{Datelike, Local};
use inquire::{CustomType, Select, Text, validator::Validation};
use temprecords_core::{
    AggregationMode, Config, QueryRequest, RequestError, TimeframeKind, TimeframeSpec, Unit,
    model::{EARLIEST_ARCHIVE_YEAR, parse_day, parse_month, parse_year},
};

const STATION_HELP: &str =
    "Valid identifiers are listed at https://mesonet.agron.iastate.edu/request/download.phtml";
const TIME_ZONE_HELP: &str =
    "See https://en.wikipedia.org/wiki/List_of_tz_database_time_zones";

pub fn ask_request(config: &Config) -> Result<QueryRequest> {
    let station = ask_station(config)?;
    let time_zone = ask_time_zone(config)?;

    let current_year = Local::now().year();
    let earliest_year = CustomType::<i32>::new("Please enter the earliest year that you want the data from.")
        .with_default(config.earliest_year())
        .with_help_message("The earliest allowed year is 1928.")
        .with_error_message("Please enter a year (format: YYYY).")
        .with_validator(move |year: &i32| {
            if (EARLIEST_ARCHIVE_YEAR..=current_year).contains(year) {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid(
                    format!("Year must be between {EARLIEST_ARCHIVE_YEAR} and {current_year}.").into(),
                ))
            }
        })
        .prompt()?;

    let mode = Select::new(
        "Maximum or minimum temperature?",
        AggregationMode::all().to_vec(),
    )
    .prompt()?;

    let timeframe_message = format!("What timeframe do you want the {mode} temperature for?");
    let kind = Select::new(&timeframe_message, TimeframeKind::all().to_vec()).prompt()?;

    let year = if kind.needs_year() {
        Some(ask_field("What year do you want the data for? (format: YYYY)", parse_year)?)
    } else {
        None
    };
    let month = if kind.needs_month() {
        Some(ask_field("What month do you want the data for? (format: MM)", parse_month)?)
    } else {
        None
    };
    let day = if kind.needs_day() {
        Some(ask_field("What day do you want the data for? (format: DD)", parse_day)?)
    } else {
        None
    };
    let timeframe = TimeframeSpec::from_parts(kind, year, month, day)?;

    let unit = ask_unit(config)?;

    Ok(QueryRequest::new(station, time_zone, earliest_year, mode, timeframe, unit)?)
}

/// Prompt for the defaults stored in the config file.
pub fn configure(config: &mut Config) -> Result<()> {
    let station = ask_station(config)?;
    let time_zone = ask_time_zone(config)?;
    let unit = ask_unit(config)?;

    config.set_defaults(station.trim().to_uppercase(), time_zone.trim().to_string(), unit);
    Ok(())
}

fn ask_station(config: &Config) -> Result<String> {
    ask_text(
        "Please enter a weather station identifier.",
        STATION_HELP,
        config.station.as_deref(),
    )
}

fn ask_time_zone(config: &Config) -> Result<String> {
    ask_text(
        "Please enter a time zone name as it appears in the tz database.",
        TIME_ZONE_HELP,
        config.time_zone.as_deref(),
    )
}

fn ask_unit(config: &Config) -> Result<Unit> {
    let default = config.default_unit()?.unwrap_or(Unit::Celsius);
    let cursor = Unit::all().iter().position(|u| *u == default).unwrap_or_default();

    Ok(Select::new("Which unit?", Unit::all().to_vec())
        .with_starting_cursor(cursor)
        .prompt()?)
}

fn ask_text(message: &str, help: &str, default: Option<&str>) -> Result<String> {
    let mut prompt = Text::new(message)
        .with_help_message(help)
        .with_validator(|value: &str| {
            if value.trim().is_empty() {
                Ok(Validation::Invalid("A value is required.".into()))
            } else {
                Ok(Validation::Valid)
            }
        });
    if let Some(default) = default {
        prompt = prompt.with_default(default);
    }

    Ok(prompt.prompt()?)
}

/// Ask until `parse` accepts the answer.
fn ask_field<T: 'static>(message: &str, parse: fn(&str) -> Result<T, RequestError>) -> Result<T> {
    let answer = Text::new(message)
        .with_validator(move |value: &str| match parse(value) {
            Ok(_) => Ok(Validation::Valid),
            Err(err) => Ok(Validation::Invalid(err.to_string().into())),
        })
        .prompt()?;

    Ok(parse(&answer)?)
}
