// src/money.rs
use serde::{Deserialize, Serialize};
use std::fmt;

pub type AmountValue = i64;

/// How an auction's amounts are displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub symbol: String,
    pub code: String,
    /// The symbol goes before the amount ("$1500") instead of after ("1500 €").
    #[serde(default)]
    pub is_before: bool,
}

impl Currency {
    pub fn euro() -> Self {
        Currency {
            symbol: "€".to_string(),
            code: "EUR".to_string(),
            is_before: false,
        }
    }

    pub fn format(&self, value: AmountValue) -> String {
        Money::new(self, value).to_string()
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::euro()
    }
}

/// An amount paired with the currency used to render it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Money<'a> {
    currency: &'a Currency,
    value: AmountValue,
}

impl<'a> Money<'a> {
    pub fn new(currency: &'a Currency, value: AmountValue) -> Self {
        Money { currency, value }
    }

    pub fn value(&self) -> AmountValue {
        self.value
    }
}

impl fmt::Display for Money<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.currency.is_before {
            write!(f, "{}{}", self.currency.symbol, self.value)
        } else {
            write!(f, "{} {}", self.value, self.currency.symbol)
        }
    }
}

/// Signed increment as shown on fast-bid buttons, e.g. "+ 100 €".
pub fn format_increment(currency: &Currency, value: AmountValue) -> String {
    format!("+ {}", currency.format(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_after_amount() {
        assert_eq!(Currency::euro().format(1500), "1500 €");
    }

    #[test]
    fn test_symbol_before_amount() {
        let dollar = Currency {
            symbol: "$".to_string(),
            code: "USD".to_string(),
            is_before: true,
        };
        assert_eq!(dollar.format(1500), "$1500");
        assert_eq!(format_increment(&dollar, 100), "+ $100");
    }

    #[test]
    fn test_currency_deserialization_defaults_position() {
        let currency: Currency =
            serde_json::from_str(r#"{"symbol":"€","code":"EUR"}"#).unwrap();
        assert_eq!(currency, Currency::euro());
    }
}
