use actix_web::{get, web, HttpRequest, HttpResponse, ResponseError};
use serde::Deserialize;

use x402_nft::{decode_payer, MintOutcome, PAYMENT_HEADER};

use crate::error::ApiError;
use crate::metrics;
use crate::state::AppState;

/// Resolve the payer from the forwarded attestation header, if any.
fn payer_from(req: &HttpRequest) -> Option<alloy::primitives::Address> {
    decode_payer(
        req.headers()
            .get(PAYMENT_HEADER)
            .and_then(|v| v.to_str().ok()),
    )
}

/// Parse the `quantity` query parameter. Absent or non-numeric values fall
/// back to 1; numeric values that don't fit in a u64 (negatives, fractions,
/// overflow) map to an out-of-range value so the bounds check rejects them.
fn requested_quantity(raw: Option<&str>) -> u64 {
    match raw.map(str::trim) {
        None | Some("") => 1,
        Some(s) => s.parse::<u64>().unwrap_or_else(|_| {
            if s.parse::<f64>().is_ok() {
                u64::MAX
            } else {
                1
            }
        }),
    }
}

/// Record the request outcome and convert the domain failure for rendering.
fn fail(endpoint: &str, e: x402_nft::MintGateError) -> ApiError {
    let e = ApiError::from(e);
    metrics::REQUESTS
        .with_label_values(&[endpoint, e.status_code().as_str()])
        .inc();
    match &e {
        ApiError::QueueFull => metrics::QUEUE_REJECTIONS.inc(),
        ApiError::Mint(_) => metrics::MINTS.with_label_values(&["failed"]).inc(),
        _ => {}
    }
    e
}

fn minted_response(endpoint: &str, outcome: &MintOutcome, message: String) -> HttpResponse {
    metrics::REQUESTS.with_label_values(&[endpoint, "200"]).inc();
    metrics::MINTS.with_label_values(&["confirmed"]).inc();
    tracing::info!(
        minted_to = %outcome.minted_to,
        quantity = outcome.quantity,
        tx = %outcome.tx_hash,
        "mint served"
    );
    HttpResponse::Ok().json(serde_json::json!({
        "mintedTo": outcome.minted_to,
        "quantity": outcome.quantity,
        "txHash": outcome.tx_hash,
        "message": message,
    }))
}

#[derive(Debug, Deserialize)]
pub struct MintQuery {
    quantity: Option<String>,
}

#[get("/api/mint")]
pub async fn mint(
    req: HttpRequest,
    query: web::Query<MintQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let payer = payer_from(&req);
    let quantity = requested_quantity(query.quantity.as_deref());

    let outcome = state
        .minter
        .mint(payer, quantity)
        .await
        .map_err(|e| fail("/api/mint", e))?;

    let message = format!("Successfully minted {} NFT(s)", outcome.quantity);
    Ok(minted_response("/api/mint", &outcome, message))
}

#[get("/api/mint-10")]
pub async fn mint_10(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let payer = payer_from(&req);

    let outcome = state
        .minter
        .mint_fixed(payer, 10)
        .await
        .map_err(|e| fail("/api/mint-10", e))?;

    Ok(minted_response(
        "/api/mint-10",
        &outcome,
        "Successfully minted 10 NFTs".to_string(),
    ))
}

#[get("/api/mint-20")]
pub async fn mint_20(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let payer = payer_from(&req);

    let outcome = state
        .minter
        .mint_fixed(payer, 20)
        .await
        .map_err(|e| fail("/api/mint-20", e))?;

    Ok(minted_response(
        "/api/mint-20",
        &outcome,
        "Successfully minted 20 NFTs".to_string(),
    ))
}

#[get("/minted")]
pub async fn minted(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let payer = payer_from(&req);

    let supply = state
        .minter
        .total_minted(payer)
        .await
        .map_err(|e| fail("/minted", e))?;

    metrics::REQUESTS.with_label_values(&["/minted", "200"]).inc();
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "minted": supply.to_string(),
        "message": "Total NFTs minted so far",
    })))
}

#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    match state.minter.latest_block().await {
        Ok(block) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "x402-nft-gateway",
            "version": env!("CARGO_PKG_VERSION"),
            "latestBlock": block.to_string(),
            "pricedRoutes": state.pricing.len(),
        })),
        Err(e) => {
            tracing::error!(error = %e, "health check: RPC unreachable");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "degraded",
                "service": "x402-nft-gateway",
            }))
        }
    }
}

/// Constant-time byte comparison that does not leak input lengths.
/// Both inputs are hashed to fixed-length digests before comparison.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    use sha2::{Digest, Sha256};
    let ha = Sha256::digest(a);
    let hb = Sha256::digest(b);
    let mut result = 0u8;
    for (x, y) in ha.iter().zip(hb.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[get("/metrics")]
pub async fn metrics_endpoint(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    match &state.config.metrics_token {
        Some(expected) => {
            let authorized = req
                .headers()
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(|token| constant_time_eq(token.as_bytes(), expected.as_bytes()))
                .unwrap_or(false);

            if !authorized {
                return HttpResponse::Unauthorized().json(serde_json::json!({
                    "error": "unauthorized",
                    "message": "Valid Bearer token required for /metrics"
                }));
            }
        }
        None => {
            // No token configured: metrics stay protected unless explicitly
            // opted into.
            let public_metrics = std::env::var("X402_PUBLIC_METRICS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false);
            if !public_metrics {
                return HttpResponse::Forbidden().json(serde_json::json!({
                    "error": "forbidden",
                    "message": "Set METRICS_TOKEN or X402_PUBLIC_METRICS=true to access /metrics"
                }));
            }
        }
    }

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(metrics::metrics_output())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(mint)
        .service(mint_10)
        .service(mint_20)
        .service(minted)
        .service(health)
        .service(metrics_endpoint);
}
