//! HTTP API for the Quote Engine.
//!
//! This module exposes the calculators over a small REST API using
//! [`axum`](https://crates.io/crates/axum).  The price catalog is
//! loaded once at startup and shared read-only across requests.  An
//! unpriced quote is not an HTTP error: it is returned with status 200,
//! `price: 0` and `quoted: false`.

use crate::catalog::{load_catalog_from_dir, load_extras, PriceCatalog};
use crate::config::{RepairExtras, Settings};
use crate::engine::{quote, quote_batch};
use crate::models::{BatchRequest, BatchResponse, PricingRequest, QuoteResponse};
use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

/// Application state shared across requests.
pub struct AppState {
    pub catalog: Arc<dyn PriceCatalog>,
    pub extras: RepairExtras,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/quote", post(quote_handler))
        .route("/api/quote/batch", post(batch_handler))
        .with_state(state)
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "quote-engine",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Handler for POST /api/quote
async fn quote_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PricingRequest>,
) -> Json<QuoteResponse> {
    Json(quote(&request, state.catalog.as_ref(), &state.extras))
}

/// Handler for POST /api/quote/batch
async fn batch_handler(
    State(state): State<Arc<AppState>>,
    Json(batch): Json<BatchRequest>,
) -> Result<Json<BatchResponse>, StatusCode> {
    let count = batch.requests.len();
    // The rayon pool must not run on an async worker thread.
    let results = tokio::task::spawn_blocking(move || {
        quote_batch(&batch.requests, state.catalog.as_ref(), &state.extras)
    })
    .await
    .map_err(|err| {
        error!(error = %err, requests = count, "batch quote task failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(Json(BatchResponse { results }))
}

/// Load the catalog named by `settings` and serve the API until the
/// server terminates.
pub async fn serve(settings: &Settings) -> Result<()> {
    let catalog = load_catalog_from_dir(&settings.catalog_dir)?;
    let extras = load_extras(&settings.catalog_dir)?;
    let state = Arc::new(AppState {
        catalog: Arc::new(catalog),
        extras,
    });
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("binding {}", settings.bind_addr))?;
    info!(addr = %settings.bind_addr, "quote engine listening");
    axum::serve(listener, router).await.context("server terminated")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BuybackRecord, CatalogSnapshot, DeviceEntry};
    use crate::models::DeviceRef;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn router() -> Router {
        let mut snapshot = CatalogSnapshot::new();
        snapshot.insert(DeviceEntry {
            device: DeviceRef {
                brand: "Sony".into(),
                model: "PlayStation 5".into(),
                device_type: "console".into(),
            },
            buyback: vec![BuybackRecord::like_new("825GB", 350.0)],
            repair: [("hdmi", 90.0), ("fan", 60.0)].into_iter().collect(),
        });
        build_router(Arc::new(AppState {
            catalog: Arc::new(snapshot),
            extras: RepairExtras::default(),
        }))
    }

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "quote-engine");
    }

    #[tokio::test]
    async fn buyback_quote_with_missing_controller() {
        let (status, body) = post_json(
            "/api/quote",
            json!({
                "kind": "buyback",
                "brand": "Sony",
                "model": "PlayStation 5",
                "deviceType": "console",
                "storage": "825GB",
                "screenState": "flawless",
                "bodyState": "scratches",
                "controllerCount": 1
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        // 350 * 0.80 = 280, minus one controller
        assert_eq!(body["price"], 250);
        assert_eq!(body["quoted"], true);
        assert_eq!(body["deductions"][0]["label"], "Cosmetic Condition");
        assert_eq!(body["deductions"][0]["amount"], 70);
        assert_eq!(body["deductions"][1]["label"], "Missing Accessories");
        assert_eq!(body["deductions"][1]["amount"], 30);
    }

    #[tokio::test]
    async fn unpriced_quote_is_still_ok() {
        let (status, body) = post_json(
            "/api/quote",
            json!({
                "kind": "repair",
                "brand": "Sony",
                "model": "PlayStation 5",
                "deviceType": "console",
                "repairIssues": ["hdmi", "other"]
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["price"], 0);
        assert_eq!(body["quoted"], false);
        assert!(body["reason"].is_string());
    }

    #[tokio::test]
    async fn batch_returns_results_in_order() {
        let device = json!({"brand": "Sony", "model": "PlayStation 5", "deviceType": "console"});
        let mut repair = device.clone();
        repair["kind"] = json!("repair");
        repair["repairIssues"] = json!(["hdmi", "fan"]);
        let mut buyback = device.clone();
        buyback["kind"] = json!("buyback");
        buyback["storage"] = json!("825GB");
        buyback["turnsOn"] = json!(false);

        let (status, body) = post_json("/api/quote/batch", json!({"requests": [repair, buyback]})).await;
        assert_eq!(status, StatusCode::OK);
        // 90 + 60 * 0.75
        assert_eq!(body["results"][0]["price"], 135);
        assert_eq!(body["results"][1]["price"], 88);
        assert_eq!(body["results"][1]["deductions"][0]["label"], "Critical Damage / Locked");
    }

    #[tokio::test]
    async fn malformed_request_is_rejected() {
        let (status, _) = post_json("/api/quote", json!({"kind": "trade-in"})).await;
        assert!(status.is_client_error());
    }
}
