//! HTTP gateway that mints NFTs behind x402 per-request payments.
//!
//! The external payment gate verifies and settles each payment against the
//! route pricing table before forwarding the request here with its
//! attestation header. This crate resolves the payer, dispatches to the mint
//! orchestrator or supply query in [`x402_nft`], and renders results and
//! failures as JSON.
//!
//! # Modules
//!
//! - [`config`] — environment configuration ([`ServerConfig`](config::ServerConfig))
//! - [`routes`] — request handlers and dispatch
//! - [`error`] — wire rendering of the failure taxonomy ([`ApiError`](error::ApiError))
//! - [`metrics`] — Prometheus request and mint counters
//! - [`state`] — shared application state

pub mod config;
pub mod error;
pub mod metrics;
pub mod routes;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use state::AppState;
