use std::sync::Arc;

use x402_nft::{Minter, PricingTable};

use crate::config::ServerConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub pricing: Arc<PricingTable>,
    pub minter: Minter,
}

impl AppState {
    pub fn new(config: ServerConfig, pricing: PricingTable, minter: Minter) -> Self {
        Self {
            config: Arc::new(config),
            pricing: Arc::new(pricing),
            minter,
        }
    }
}
