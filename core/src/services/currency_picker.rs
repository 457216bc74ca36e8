use crate::services::errors::ConversionError;

/// Searchable single-select over the known currency codes.
#[derive(Debug, Clone)]
pub struct CurrencyPicker {
    currencies: Vec<String>,
    selected: String,
    query: String,
    is_open: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Resolution<'a> {
    Exact(&'a str),
    Ambiguous(Vec<&'a str>),
    NoMatch,
}

impl CurrencyPicker {
    pub fn new(currencies: Vec<String>, selected: &str) -> Self {
        CurrencyPicker {
            currencies,
            selected: selected.to_string(),
            query: String::new(),
            is_open: false,
        }
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn toggle(&mut self) {
        self.is_open = !self.is_open;
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    /// Closing from outside keeps whatever was typed.
    pub fn close(&mut self) {
        self.is_open = false;
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn options(&self) -> Vec<&str> {
        filter_currencies(&self.currencies, &self.query)
    }

    pub fn select(&mut self, code: &str) -> Result<&str, ConversionError> {
        if !self.currencies.iter().any(|c| c == code) {
            return Err(ConversionError::UnknownCurrency(code.to_string()));
        }
        self.selected = code.to_string();
        self.is_open = false;
        self.query.clear();
        Ok(&self.selected)
    }

    /// An exact code wins over partial matches, so "EUR" never becomes ambiguous.
    pub fn resolve<'a>(&'a self, input: &str) -> Resolution<'a> {
        if let Some(exact) = self
            .currencies
            .iter()
            .find(|c| c.eq_ignore_ascii_case(input.trim()))
        {
            return Resolution::Exact(exact.as_str());
        }
        let options = filter_currencies(&self.currencies, input.trim());
        match options.len() {
            0 => Resolution::NoMatch,
            1 => Resolution::Exact(options[0]),
            _ => Resolution::Ambiguous(options),
        }
    }
}

pub fn filter_currencies<'a>(currencies: &'a [String], query: &str) -> Vec<&'a str> {
    let query = query.to_lowercase();
    currencies
        .iter()
        .filter(|currency| currency.to_lowercase().contains(&query))
        .map(String::as_str)
        .collect()
}
