use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled};

use crate::{
    cli::shared::{confirm_action, format_money},
    database::models::conversion::ConversionRecord,
    services::{history_filter::FilterCriteria, session::ConverterSession},
};

#[derive(Debug, Tabled, Serialize, Clone)]
struct StringifiedConversion {
    amount: String,
    result: String,
    date: String,
}

impl From<&ConversionRecord> for StringifiedConversion {
    fn from(record: &ConversionRecord) -> Self {
        StringifiedConversion {
            amount: format!("{} {}", record.amount.normalize(), record.from),
            result: format_money(record.result, &record.to),
            date: record.timestamp.format("%Y/%m/%d %H:%M:%S").to_string(),
        }
    }
}

pub async fn history(
    session: &ConverterSession,
    criteria: FilterCriteria,
    as_json: bool,
) -> anyhow::Result<()> {
    let records = session.history(&criteria).await;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        if criteria.is_empty() {
            println!("No conversion history yet");
        } else {
            println!("No conversion matches the given filters");
        }
        return Ok(());
    }

    let rows: Vec<StringifiedConversion> = records.iter().map(StringifiedConversion::from).collect();
    println!("{}", Table::new(&rows));
    Ok(())
}

pub async fn clear_history(session: &ConverterSession, yes: bool) -> anyhow::Result<()> {
    if session.history(&FilterCriteria::default()).await.is_empty() {
        println!("History is already empty");
        return Ok(());
    }
    if yes || confirm_action("clear the conversion history")? {
        session.clear_history().await;
        println!("{}", "History cleared".green());
    }
    Ok(())
}
