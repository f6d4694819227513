use anyhow::Result;
use chrono::{NaiveDate, NaiveTime, Utc};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use weathersense::{CacheKey, QueryInterpreter, QueryParams, WeatherSenseConfig, logging};

/// Exit status when the query could not be interpreted
const EXIT_REJECTED: u8 = 2;

#[derive(Parser)]
#[command(
    name = "weathersense",
    version,
    about = "Interpret a natural-language weather query"
)]
struct Cli {
    /// Date that relative expressions resolve against. Defaults to today (UTC).
    #[arg(long, value_name = "YYYY-MM-DD")]
    reference: Option<NaiveDate>,

    /// Configuration file. Defaults to the user config directory.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log every interpretation stage.
    #[arg(short, long)]
    verbose: bool,

    /// Query text; multiple words are joined with spaces.
    #[arg(required = true, trailing_var_arg = true)]
    query: Vec<String>,
}

#[derive(Serialize)]
struct Interpreted<'a> {
    params: &'a QueryParams,
    cache_key: String,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = WeatherSenseConfig::load_from_path(cli.config)?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    logging::init(&config.logging)?;

    let reference = cli
        .reference
        .map_or_else(Utc::now, |date| date.and_time(NaiveTime::MIN).and_utc());
    let query = cli.query.join(" ");

    let interpreter = QueryInterpreter::new(&config.parser);
    match interpreter.interpret(&query, reference) {
        Ok(params) => {
            let output = Interpreted {
                params: &params,
                cache_key: CacheKey::from_params(&params).to_string(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            println!("{}", serde_json::to_string_pretty(&err.to_response())?);
            Ok(ExitCode::from(EXIT_REJECTED))
        }
    }
}
