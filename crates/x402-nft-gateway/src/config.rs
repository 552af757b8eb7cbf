use alloy::primitives::Address;
use std::env;
use url::Url;

use x402_nft::DEFAULT_QUEUE_DEPTH;

const DEFAULT_PORT: u16 = 4021;
const DEFAULT_RATE_LIMIT_RPM: u64 = 60;

/// Process configuration, resolved once at startup.
///
/// Every required variable must be present before the server begins serving;
/// a missing credential or address is a fatal startup condition, not a
/// runtime error.
#[derive(Clone)]
pub struct ServerConfig {
    /// Hex-encoded private key of the ledger signing identity.
    pub server_private_key: String,
    /// Chain RPC endpoint.
    pub rpc_url: String,
    /// Address of the mint contract.
    pub contract_address: Address,
    /// Address payments are made out to, quoted by the payment gate.
    pub pay_to: Address,
    /// External facilitator/gate endpoint.
    pub facilitator_url: String,
    /// Listening port.
    pub port: u16,
    /// Bound on queued mint submissions.
    pub queue_depth: usize,
    /// CORS allowed origins (empty = localhost only).
    pub allowed_origins: Vec<String>,
    /// Per-IP rate limit, requests per minute.
    pub rate_limit_rpm: u64,
    /// Bearer token required for /metrics (None = refuse unless opted in).
    pub metrics_token: Option<String>,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("server_private_key", &"[REDACTED]")
            .field("rpc_url", &self.rpc_url)
            .field("contract_address", &self.contract_address)
            .field("pay_to", &self.pay_to)
            .field("facilitator_url", &self.facilitator_url)
            .field("port", &self.port)
            .field("queue_depth", &self.queue_depth)
            .field("allowed_origins", &self.allowed_origins)
            .field("rate_limit_rpm", &self.rate_limit_rpm)
            .field(
                "metrics_token",
                &self.metrics_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_private_key = required("SERVER_PRIVATE_KEY")?;
        let rpc_url = required("RPC_URL")?;

        let contract_str = required("NFT_CONTRACT_ADDRESS")?;
        let contract_address: Address = contract_str
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(contract_str))?;

        let pay_to_str = required("PAY_TO_ADDRESS")?;
        let pay_to: Address = pay_to_str
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(pay_to_str))?;

        let facilitator_url = required("FACILITATOR_URL")?;
        Url::parse(&facilitator_url)
            .map_err(|_| ConfigError::InvalidUrl(facilitator_url.clone()))?;

        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let queue_depth = env::var("MINT_QUEUE_DEPTH")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|&d| d > 0)
            .unwrap_or(DEFAULT_QUEUE_DEPTH);

        let allowed_origins: Vec<String> = env::var("ALLOWED_ORIGINS")
            .ok()
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let rate_limit_rpm = env::var("RATE_LIMIT_RPM")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_RATE_LIMIT_RPM);

        let metrics_token = env::var("METRICS_TOKEN").ok().filter(|s| !s.is_empty());
        if metrics_token.is_none() {
            tracing::warn!("METRICS_TOKEN not set — /metrics requires X402_PUBLIC_METRICS=true");
        }

        Ok(Self {
            server_private_key,
            rpc_url,
            contract_address,
            pay_to,
            facilitator_url,
            port,
            queue_depth,
            allowed_origins,
            rate_limit_rpm,
            metrics_token,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::MissingRequired(name))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingRequired(&'static str),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let config = ServerConfig {
            server_private_key: "0xdeadbeef".to_string(),
            rpc_url: "http://localhost:8545".to_string(),
            contract_address: Address::ZERO,
            pay_to: Address::ZERO,
            facilitator_url: "http://localhost:4022".to_string(),
            port: DEFAULT_PORT,
            queue_depth: DEFAULT_QUEUE_DEPTH,
            allowed_origins: vec![],
            rate_limit_rpm: DEFAULT_RATE_LIMIT_RPM,
            metrics_token: Some("secret-token".to_string()),
        };

        let rendered = format!("{config:?}");
        assert!(!rendered.contains("0xdeadbeef"));
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn test_config_error_messages_name_the_variable() {
        let e = ConfigError::MissingRequired("SERVER_PRIVATE_KEY");
        assert_eq!(
            e.to_string(),
            "missing required environment variable: SERVER_PRIVATE_KEY"
        );
    }
}
