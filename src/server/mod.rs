//! Ticker index endpoint backed by the per-exchange historical CSV folders.

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use crate::core::types::{ExchangeScope, TickerItem};
use crate::fetch::TickersResponse;
use crate::tickers::clean_ticker;

pub const HISTORICAL_DIR: &str = "historical";

struct AppState {
    data_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
struct TickersParams {
    exchange: Option<String>,
}

/// `<data_dir>/historical/<EXCHANGE>`
pub fn exchange_dir(data_dir: &Path, exchange: ExchangeScope) -> PathBuf {
    data_dir.join(HISTORICAL_DIR).join(exchange.as_ref())
}

/// One item per `*.csv` in the exchange folder, sorted by file name. A missing folder is an
/// empty exchange, not an error.
pub fn list_tickers(data_dir: &Path, exchange: ExchangeScope) -> Result<Vec<TickerItem>> {
    let folder = exchange_dir(data_dir, exchange);
    if !folder.is_dir() {
        log::info!("No data folder for {} at {:?}", exchange, folder);
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(&folder).with_context(|| format!("Cannot read {:?}", folder))? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if !is_csv {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            names.push(stem.to_string());
        }
    }
    names.sort();

    Ok(names
        .into_iter()
        .map(|stem| {
            let file = stem.replace('_', ".");
            TickerItem::new(clean_ticker(&file), file)
        })
        .collect())
}

async fn health() -> &'static str {
    "OK"
}

async fn tickers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TickersParams>,
) -> Result<Json<TickersResponse>, (StatusCode, Json<Value>)> {
    let raw = params.exchange.unwrap_or_else(|| ExchangeScope::default().to_string());
    let exchange = ExchangeScope::from_str(raw.trim()).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("unknown exchange: {}", raw) })),
        )
    })?;

    let items = list_tickers(&state.data_dir, exchange).map_err(|e| {
        log::error!("Listing tickers for {} failed: {:#}", exchange, e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
    })?;

    log::debug!("Serving {} tickers for {}", items.len(), exchange);
    Ok(Json(TickersResponse {
        exchange: Some(exchange),
        items,
    }))
}

pub fn router(data_dir: impl Into<PathBuf>) -> Router {
    let state = Arc::new(AppState {
        data_dir: data_dir.into(),
    });
    Router::new()
        .route("/health", get(health))
        .route("/api/tickers", get(tickers))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn lists_csv_files_with_cleaned_display() {
        let dir = tempdir().unwrap();
        let folder = exchange_dir(dir.path(), ExchangeScope::Nse);
        fs::create_dir_all(&folder).unwrap();
        for name in ["SBIN_NS.csv", "RELIANCE_NS.csv", "notes.txt", "INFY.CSV"] {
            fs::write(folder.join(name), "Date,Close\n").unwrap();
        }

        let items = list_tickers(dir.path(), ExchangeScope::Nse).unwrap();
        assert_eq!(
            items,
            vec![
                TickerItem::new("INFY", "INFY"),
                TickerItem::new("RELIANCE", "RELIANCE.NS"),
                TickerItem::new("SBIN", "SBIN.NS"),
            ]
        );
    }

    #[test]
    fn missing_folder_is_empty() {
        let dir = tempdir().unwrap();
        assert!(list_tickers(dir.path(), ExchangeScope::Bse).unwrap().is_empty());
    }
}
