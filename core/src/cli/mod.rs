pub mod convert;
pub mod currencies;
pub mod history;
pub mod shared;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use convert::{convert, rate};
use currencies::currencies;
use history::{clear_history, history};

use crate::{
    api,
    database::FileStore,
    services::{
        history_filter::FilterCriteria, market_data::fx_rates::RateClient,
        session::ConverterSession, shared::env::Settings,
    },
};

#[derive(Parser, Debug)]
#[command(about = "Convert currencies and keep a short history of conversions")]
struct Args {
    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Debug, clap::Args, PartialEq, Default)]
struct FilterArgs {
    /// Text to look for in currencies, amount and result
    #[arg(short, long)]
    search: Option<String>,
    /// Only conversions from or to this currency
    #[arg(short, long)]
    currency: Option<String>,
    /// Earliest date, YYYY-MM-DD or RFC 3339
    #[arg(long)]
    date_from: Option<String>,
    /// Latest date, YYYY-MM-DD or RFC 3339
    #[arg(long)]
    date_to: Option<String>,
    #[arg(long)]
    amount_min: Option<String>,
    #[arg(long)]
    amount_max: Option<String>,
}

impl From<FilterArgs> for FilterCriteria {
    fn from(args: FilterArgs) -> Self {
        FilterCriteria {
            search: args.search.unwrap_or_default(),
            currency: args.currency.unwrap_or_default(),
            date_from: args.date_from.unwrap_or_default(),
            date_to: args.date_to.unwrap_or_default(),
            amount_min: args.amount_min.unwrap_or_default(),
            amount_max: args.amount_max.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Subcommand, PartialEq)]
enum Command {
    /// Convert an amount and save it to the history
    Convert {
        amount: String,
        #[arg(short, long)]
        from: Option<String>,
        #[arg(short, long)]
        to: Option<String>,
    },
    /// Show the current exchange rate for a pair
    Rate { from: String, to: String },
    /// List known currencies
    Currencies {
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show past conversions
    History {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long)]
        json: bool,
    },
    ClearHistory {
        #[arg(short, long)]
        yes: bool,
    },
    /// Serve the converter as a JSON API
    Api,
}

fn build_session(settings: &Settings) -> anyhow::Result<ConverterSession> {
    let rates = RateClient::new(&settings.rates_api_url, &settings.base_currency);
    let storage = FileStore::open(&settings.data_dir)?;
    Ok(ConverterSession::new(
        Arc::new(rates),
        Arc::new(storage),
        &settings.default_from,
        &settings.default_to,
    ))
}

pub async fn cli(settings: Settings) -> anyhow::Result<()> {
    let args = Args::parse();
    let session = build_session(&settings)?;

    match args.cmd {
        Command::Convert { amount, from, to } => {
            convert(&session, &amount, from, to).await?;
        }
        Command::Rate { from, to } => {
            rate(&session, from, to).await?;
        }
        Command::Currencies { search } => {
            currencies(&session, search).await?;
        }
        Command::History { filters, json } => {
            history(&session, filters.into(), json).await?;
        }
        Command::ClearHistory { yes } => {
            clear_history(&session, yes).await?;
        }
        Command::Api => {
            println!("Starting web server...");
            api::api(&settings, Arc::new(session)).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_line_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_history_filters() {
        let args = Args::try_parse_from([
            "fxbox",
            "history",
            "--currency",
            "EUR",
            "--amount-min",
            "50",
            "--json",
        ])
        .unwrap();
        match args.cmd {
            Command::History { filters, json } => {
                assert!(json);
                let criteria = FilterCriteria::from(filters);
                assert_eq!(criteria.currency, "EUR");
                assert_eq!(criteria.amount_min, "50");
                assert!(criteria.search.is_empty());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_convert_with_pair() {
        let args = Args::try_parse_from(["fxbox", "convert", "100", "-f", "usd", "-t", "EUR"]).unwrap();
        assert_eq!(
            args.cmd,
            Command::Convert {
                amount: "100".into(),
                from: Some("usd".into()),
                to: Some("EUR".into()),
            }
        );
    }
}
