use std::io::{self, Write};

use anyhow::anyhow;
use num_format::{Locale, ToFormattedString};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use rust_decimal_macros::dec;

use crate::services::shared::round_to_decimals;

pub fn confirm_action(action: &str) -> anyhow::Result<bool> {
    print!("Would you like to {}? (y/n): ", action);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}

pub fn format_money(amount: Decimal, currency: &str) -> String {
    let rounded = round_to_decimals(amount);
    let whole = rounded.trunc().abs().to_u64().unwrap_or_default();
    let cents = (rounded.fract().abs() * dec!(100))
        .to_u32()
        .unwrap_or_default();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!(
        "{}{}.{:02} {}",
        sign,
        whole.to_formatted_string(&Locale::en),
        cents,
        currency
    )
}

/// Numbered prompt for when a typed currency matches several codes.
pub fn choose_currency(input: &str, options: &[&str]) -> anyhow::Result<String> {
    println!("'{}' matches several currencies:", input);
    for (index, option) in options.iter().enumerate() {
        println!("{}: {}", index + 1, option);
    }

    loop {
        print!("Please choose a currency (1-{}): ", options.len());
        io::stdout().flush()?;

        let mut choice = String::new();
        if io::stdin().read_line(&mut choice)? == 0 {
            return Err(anyhow!("No currency chosen for '{}'", input));
        }

        match choice.trim().parse::<usize>() {
            Ok(index) if index > 0 && index <= options.len() => {
                return Ok(options[index - 1].to_string());
            }
            _ => println!("Invalid choice."),
        }
    }
}
