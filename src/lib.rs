pub mod completer;
pub mod core;
pub mod fetch;
pub mod repl;
pub mod server;
pub mod tickers;
pub mod typeahead;

// Re-exports
pub use crate::core::config::TypeaheadConfig;
pub use crate::core::types::{ExchangeScope, SearchCommit, TickerItem};
pub use tickers::TickerIndex;
pub use typeahead::{FormEvent, FormHandle, SearchForm};
