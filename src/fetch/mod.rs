use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use mime::APPLICATION_JSON;
use reqwest::{header, Client, Url};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::core::types::{ExchangeScope, TickerItem};

const TICKERS_PATH: &str = "api/tickers";

/// Body of `GET /api/tickers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickersResponse {
    #[serde(default)]
    pub exchange: Option<ExchangeScope>,
    pub items: Vec<TickerItem>,
}

/// Where the ticker index comes from.
#[async_trait]
pub trait TickerSource: Send + Sync {
    async fn load(&self, exchange: ExchangeScope) -> Result<Vec<TickerItem>>;
}

/// Loads from the source, degrading any failure to an empty index.
pub async fn load_or_empty(source: &dyn TickerSource, exchange: ExchangeScope) -> Vec<TickerItem> {
    match source.load(exchange).await {
        Ok(items) => {
            log::debug!("Loaded {} tickers for {}", items.len(), exchange);
            items
        }
        Err(e) => {
            log::warn!("Ticker index for {} unavailable: {:#}", exchange, e);
            Vec::new()
        }
    }
}

pub struct HttpTickerSource {
    client: Client,
    base: Url,
}

impl HttpTickerSource {
    pub fn new(base: Url) -> Self {
        Self::with_client(Client::new(), base)
    }

    pub fn with_client(client: Client, mut base: Url) -> Self {
        // Url::join replaces the last segment unless the base ends in a slash.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self { client, base }
    }

    pub fn tickers_url(&self, exchange: ExchangeScope) -> Result<Url> {
        let mut url = self
            .base
            .join(TICKERS_PATH)
            .with_context(|| format!("Cannot build tickers url from {}", self.base))?;
        url.query_pairs_mut()
            .append_pair("exchange", exchange.as_ref());
        Ok(url)
    }
}

#[async_trait]
impl TickerSource for HttpTickerSource {
    async fn load(&self, exchange: ExchangeScope) -> Result<Vec<TickerItem>> {
        let url = self.tickers_url(exchange)?;
        log::debug!("Ticker index request URL: {}", url);

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, APPLICATION_JSON.as_ref())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Ticker index request failed with status {}", status));
        }

        let body: TickersResponse = response
            .json()
            .await
            .context("Malformed ticker index response")?;
        Ok(body.items)
    }
}

/// In-memory source keyed by exchange; exchanges without an entry fail to load.
#[derive(Debug, Clone, Default)]
pub struct StaticTickerSource {
    tickers: HashMap<ExchangeScope, Vec<TickerItem>>,
}

impl StaticTickerSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exchange(mut self, exchange: ExchangeScope, items: Vec<TickerItem>) -> Self {
        self.tickers.insert(exchange, items);
        self
    }

    pub fn into_shared(self) -> Arc<dyn TickerSource> {
        Arc::new(self)
    }
}

#[async_trait]
impl TickerSource for StaticTickerSource {
    async fn load(&self, exchange: ExchangeScope) -> Result<Vec<TickerItem>> {
        self.tickers
            .get(&exchange)
            .cloned()
            .ok_or_else(|| anyhow!("No tickers known for {}", exchange))
    }
}
