use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// One selectable symbol as served by the ticker index endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerItem {
    /// Human-facing symbol, e.g. `RELIANCE`.
    pub display: String,
    /// Opaque backend identifier, e.g. `RELIANCE.NS`.
    pub file: String,
}

impl TickerItem {
    pub fn new(display: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            display: display.into(),
            file: file.into(),
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum ExchangeScope {
    #[default]
    Nse,
    Bse,
}

/// Emitted to the hosting page once per user-committed search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCommit {
    /// Always upper-cased.
    pub symbol: String,
    pub exchange: ExchangeScope,
}

impl SearchCommit {
    pub fn new(symbol: &str, exchange: ExchangeScope) -> Self {
        Self {
            symbol: symbol.trim().to_uppercase(),
            exchange,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn exchange_round_trips_through_wire_names() {
        assert_eq!(ExchangeScope::Nse.to_string(), "NSE");
        assert_eq!(ExchangeScope::from_str("bse").unwrap(), ExchangeScope::Bse);
        assert!(ExchangeScope::from_str("NYSE").is_err());
        assert_eq!(serde_json::to_string(&ExchangeScope::Bse).unwrap(), "\"BSE\"");
    }

    #[test]
    fn commit_symbol_is_upper_cased() {
        let commit = SearchCommit::new(" reliance ", ExchangeScope::Nse);
        assert_eq!(commit.symbol, "RELIANCE");
    }
}
