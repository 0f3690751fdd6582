use axum::{routing::get, Router};
use std::fs;
use std::path::Path;
use stocksearch::fetch::{load_or_empty, HttpTickerSource, TickerSource};
use stocksearch::server::{self, exchange_dir};
use stocksearch::{ExchangeScope, TickerItem};
use tempfile::tempdir;
use url::Url;

async fn serve(app: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Url::parse(&format!("http://{}/", addr)).unwrap()
}

fn seed(data_dir: &Path, exchange: ExchangeScope, files: &[&str]) {
    let folder = exchange_dir(data_dir, exchange);
    fs::create_dir_all(&folder).unwrap();
    for file in files {
        fs::write(folder.join(file), "Date,Open,High,Low,Close,Volume\n").unwrap();
    }
}

#[tokio::test]
async fn http_source_reads_served_index() {
    let dir = tempdir().unwrap();
    seed(dir.path(), ExchangeScope::Nse, &["RELIANCE_NS.csv", "SBIN_NS.csv"]);
    seed(dir.path(), ExchangeScope::Bse, &["TCS_BO.csv"]);
    let base = serve(server::router(dir.path())).await;
    let source = HttpTickerSource::new(base);

    let nse = source.load(ExchangeScope::Nse).await.unwrap();
    assert_eq!(
        nse,
        vec![
            TickerItem::new("RELIANCE", "RELIANCE.NS"),
            TickerItem::new("SBIN", "SBIN.NS"),
        ]
    );
    let bse = source.load(ExchangeScope::Bse).await.unwrap();
    assert_eq!(bse, vec![TickerItem::new("TCS", "TCS.BO")]);
}

#[tokio::test]
async fn endpoint_reports_exchange_and_rejects_unknown_ones() {
    let dir = tempdir().unwrap();
    seed(dir.path(), ExchangeScope::Nse, &["INFY_NS.csv"]);
    let base = serve(server::router(dir.path())).await;
    let client = reqwest::Client::new();

    let body: serde_json::Value = client
        .get(base.join("api/tickers?exchange=nse").unwrap())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["exchange"], "NSE");
    assert_eq!(body["items"][0]["display"], "INFY");

    let defaulted: serde_json::Value = client
        .get(base.join("api/tickers").unwrap())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(defaulted["exchange"], "NSE");

    let rejected = client
        .get(base.join("api/tickers?exchange=NYSE").unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(rejected.status(), reqwest::StatusCode::BAD_REQUEST);

    let health = client.get(base.join("health").unwrap()).send().await.unwrap();
    assert_eq!(health.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn non_success_and_malformed_responses_degrade_to_empty() {
    let app = Router::new().route("/api/tickers", get(|| async { "not json" }));
    let base = serve(app).await;
    let malformed = HttpTickerSource::new(base.clone());
    assert!(malformed.load(ExchangeScope::Nse).await.is_err());
    assert!(load_or_empty(&malformed, ExchangeScope::Nse).await.is_empty());

    let missing = HttpTickerSource::new(base.join("elsewhere/").unwrap());
    assert!(missing.load(ExchangeScope::Nse).await.is_err());
    assert!(load_or_empty(&missing, ExchangeScope::Nse).await.is_empty());
}
