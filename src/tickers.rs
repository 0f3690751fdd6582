use crate::core::types::{ExchangeScope, TickerItem};
use crate::typeahead::ranker::normalize;

/// Exchange suffixes stripped from backend file names to get the display symbol.
pub const SUFFIXES: [&str; 7] = [".BO", "_BO", ".NS", "_NS", "-EQ", "-BE", "-BZ"];

/// Ticker symbols for one exchange, in the order the backend returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickerIndex {
    exchange: ExchangeScope,
    items: Vec<TickerItem>,
}

impl TickerIndex {
    pub fn new(exchange: ExchangeScope, items: Vec<TickerItem>) -> Self {
        Self { exchange, items }
    }

    pub fn empty(exchange: ExchangeScope) -> Self {
        Self::new(exchange, Vec::new())
    }

    pub fn exchange(&self) -> ExchangeScope {
        self.exchange
    }

    pub fn items(&self) -> &[TickerItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Exact lookup on the display symbol, case-folded the same way the ranker folds.
    pub fn find_exact(&self, query: &str) -> Option<&TickerItem> {
        let wanted = normalize(query);
        if wanted.is_empty() {
            return None;
        }
        self.items
            .iter()
            .find(|item| item.display.to_uppercase() == wanted)
    }
}

/// Upper-cases a backend file ticker and strips exchange suffixes, checked in `SUFFIXES` order.
pub fn clean_ticker(name: &str) -> String {
    let mut cleaned = name.trim().to_uppercase();
    for suffix in SUFFIXES {
        if let Some(stripped) = cleaned.strip_suffix(suffix) {
            cleaned = stripped.to_string();
        }
    }
    cleaned
}
