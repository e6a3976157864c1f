//! Currency and exchange rate value types

use anyhow::anyhow;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// A currency identified by its code, e.g. `USD`.
///
/// The code is opaque: it is trimmed and uppercased but never checked against
/// the ISO 4217 list, so the feed decides what it knows about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency {
    code: String,
}

impl Currency {
    pub fn new(code: &str) -> anyhow::Result<Self> {
        code.parse()
    }

    /// Czech koruna, the currency the CNB feed quotes against.
    pub fn czk() -> Self {
        Currency {
            code: "CZK".to_string(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code.is_empty() {
            return Err(anyhow!("Currency code must not be empty"));
        }
        Ok(Currency {
            code: code.to_uppercase(),
        })
    }
}

impl TryFrom<String> for Currency {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.code
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code)
    }
}

/// Price of one unit of `target_currency` expressed in `source_currency`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExchangeRate {
    source_currency: Currency,
    target_currency: Currency,
    value: Decimal,
}

impl ExchangeRate {
    /// Returns `None` unless `value` is strictly positive.
    pub fn new(
        source_currency: Currency,
        target_currency: Currency,
        value: Decimal,
    ) -> Option<Self> {
        if value <= Decimal::ZERO {
            return None;
        }
        Some(ExchangeRate {
            source_currency,
            target_currency,
            value,
        })
    }

    pub fn source_currency(&self) -> &Currency {
        &self.source_currency
    }

    pub fn target_currency(&self) -> &Currency {
        &self.target_currency
    }

    pub fn value(&self) -> Decimal {
        self.value
    }
}

impl Display for ExchangeRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}={}",
            self.source_currency, self.target_currency, self.value
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_code_is_normalized() {
        let currency: Currency = " usd ".parse().unwrap();
        assert_eq!(currency.code(), "USD");
        assert_eq!(currency.to_string(), "USD");
    }

    #[test]
    fn test_currency_code_is_opaque() {
        // Not an ISO code, still a valid identifier
        let currency = Currency::new("XYZ").unwrap();
        assert_eq!(currency.code(), "XYZ");
    }

    #[test]
    fn test_empty_currency_code_is_rejected() {
        assert!(Currency::new("").is_err());
        assert!(Currency::new("   ").is_err());
    }

    #[test]
    fn test_currency_deserializes_from_plain_string() {
        let currencies: Vec<Currency> = serde_yaml::from_str("[usd, EUR]").unwrap();
        assert_eq!(
            currencies,
            vec![Currency::new("USD").unwrap(), Currency::new("EUR").unwrap()]
        );

        let invalid: Result<Vec<Currency>, _> = serde_yaml::from_str(r#"["USD", ""]"#);
        assert!(invalid.is_err());
    }

    #[test]
    fn test_exchange_rate_display() {
        let rate = ExchangeRate::new(
            Currency::new("CZK").unwrap(),
            Currency::new("USD").unwrap(),
            dec!(22.75),
        )
        .unwrap();
        assert_eq!(rate.to_string(), "CZK/USD=22.75");
    }

    #[test]
    fn test_exchange_rate_requires_positive_value() {
        let czk = Currency::new("CZK").unwrap();
        let usd = Currency::new("USD").unwrap();
        assert!(ExchangeRate::new(czk.clone(), usd.clone(), Decimal::ZERO).is_none());
        assert!(ExchangeRate::new(czk, usd, dec!(-1.5)).is_none());
    }

    #[test]
    fn test_exchange_rate_serializes_codes_as_strings() {
        let rate = ExchangeRate::new(
            Currency::new("CZK").unwrap(),
            Currency::new("EUR").unwrap(),
            dec!(25.125),
        )
        .unwrap();
        let json = serde_json::to_value(&rate).unwrap();
        assert_eq!(json["source_currency"], "CZK");
        assert_eq!(json["target_currency"], "EUR");
        assert_eq!(json["value"], "25.125");
    }
}
