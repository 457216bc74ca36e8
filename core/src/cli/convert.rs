use anyhow::anyhow;
use owo_colors::{OwoColorize, Style};
use spinners_rs::{Spinner, Spinners};

use crate::{
    cli::shared::{choose_currency, format_money},
    services::{
        currency_picker::Resolution, rate_tracker::RateState, session::ConverterSession,
    },
};

/// Maps typed input onto a known code. Leaves it untouched when the list couldn't load.
pub fn resolve_currency(
    session: &ConverterSession,
    input: &str,
    current: &str,
) -> anyhow::Result<String> {
    if session.currencies().is_empty() {
        return Ok(input.trim().to_uppercase());
    }
    let mut picker = session.picker(current);
    picker.open();
    picker.set_query(input.trim());

    let resolved = match picker.resolve(input) {
        Resolution::Exact(code) => Some(code.to_string()),
        Resolution::Ambiguous(options) => Some(choose_currency(input, &options)?),
        Resolution::NoMatch => None,
    };
    let Some(choice) = resolved else {
        picker.close();
        return Err(anyhow!("Unknown currency '{}'", input));
    };
    picker.select(&choice)?;
    Ok(picker.selected().to_string())
}

fn rate_or_error(state: RateState, from: &str, to: &str) -> anyhow::Result<()> {
    match state {
        RateState::Ready(_) => Ok(()),
        RateState::Failed { message, retryable } => {
            let hint = if retryable { " Try again in a moment." } else { "" };
            eprintln!("{}", format!("{}{}", message, hint).red());
            Err(anyhow!("No exchange rate for {} -> {}", from, to))
        }
        RateState::Idle | RateState::Loading => {
            Err(anyhow!("No exchange rate for {} -> {}", from, to))
        }
    }
}

async fn prepare_pair(
    session: &ConverterSession,
    from: Option<String>,
    to: Option<String>,
) -> anyhow::Result<(String, String)> {
    let mut sp = Spinner::new(Spinners::Point, "Fetching currencies and exchange rate");
    sp.start();
    let report = session.mount().await;
    sp.stop();
    println!();

    if let Err(e) = &report.currencies {
        eprintln!("{}", format!("Couldn't load the currency list: {}", e).yellow());
    }

    let (default_from, default_to) = session.pair();
    let from = resolve_currency(
        session,
        from.as_deref().unwrap_or(&default_from),
        &default_from,
    )?;
    let to = resolve_currency(session, to.as_deref().unwrap_or(&default_to), &default_to)?;

    let state = if (from.as_str(), to.as_str()) == (default_from.as_str(), default_to.as_str()) {
        report.rate
    } else {
        session.select_pair(&from, &to).await
    };
    rate_or_error(state, &from, &to)?;
    Ok((from, to))
}

pub async fn convert(
    session: &ConverterSession,
    amount: &str,
    from: Option<String>,
    to: Option<String>,
) -> anyhow::Result<()> {
    let (from, to) = prepare_pair(session, from, to).await?;
    let record = session.convert(amount).await?;

    let result_style = Style::new().black().on_white().bold();
    println!(
        "{} {} = {}",
        record.amount.normalize(),
        from,
        format_money(record.result, &to).style(result_style)
    );
    Ok(())
}

pub async fn rate(session: &ConverterSession, from: String, to: String) -> anyhow::Result<()> {
    let (from, to) = prepare_pair(session, Some(from), Some(to)).await?;
    if let RateState::Ready(rate) = session.rate_state() {
        println!("1 {} = {} {}", from, rate.normalize().bold(), to);
    }
    Ok(())
}
