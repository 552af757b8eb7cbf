//! Static route pricing table.
//!
//! Defined once at process start and handed to the external payment gate,
//! which quotes and settles the price before a request is forwarded here.
//! The core never mutates it.

use std::collections::HashMap;

/// Network identifier quoted to payers by default.
pub const DEFAULT_NETWORK: &str = "base";

/// Price quote for a single gated route.
#[derive(Debug, Clone)]
pub struct RoutePrice {
    pub method: String,
    pub path: String,
    /// Human-readable decimal currency amount, e.g. `"$0.5"`.
    pub price: String,
    pub network: String,
    pub description: Option<String>,
}

/// Immutable table of priced routes, keyed by `"METHOD path"`.
#[derive(Debug, Clone)]
pub struct PricingTable {
    network: String,
    routes: HashMap<String, RoutePrice>,
}

impl PricingTable {
    /// Start building a table for the given network identifier.
    pub fn builder(network: &str) -> PricingTableBuilder {
        PricingTableBuilder {
            network: network.to_string(),
            routes: HashMap::new(),
        }
    }

    /// Look up the price entry for a route key (e.g. `("GET", "/api/mint")`).
    pub fn get_route(&self, method: &str, path: &str) -> Option<&RoutePrice> {
        self.routes.get(&format!("{method} {path}"))
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn routes(&self) -> impl Iterator<Item = &RoutePrice> {
        self.routes.values()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Builder for a [`PricingTable`] with multiple priced routes.
pub struct PricingTableBuilder {
    network: String,
    routes: HashMap<String, RoutePrice>,
}

impl PricingTableBuilder {
    /// Register a priced route (e.g. `route("GET", "/api/mint", "$0.5", Some("..."))`).
    pub fn route(mut self, method: &str, path: &str, price: &str, description: Option<&str>) -> Self {
        let key = format!("{method} {path}");
        self.routes.insert(
            key,
            RoutePrice {
                method: method.to_string(),
                path: path.to_string(),
                price: price.to_string(),
                network: self.network.clone(),
                description: description.map(String::from),
            },
        );
        self
    }

    pub fn build(self) -> PricingTable {
        PricingTable {
            network: self.network,
            routes: self.routes,
        }
    }
}

/// The gateway's price tiers: variable mint, the two fixed bundles, and the
/// nominally priced supply query.
pub fn default_table() -> PricingTable {
    PricingTable::builder(DEFAULT_NETWORK)
        .route("GET", "/api/mint", "$0.5", Some("Mint 1 NFT"))
        .route("GET", "/api/mint-10", "$5", Some("Mint 10 NFTs"))
        .route("GET", "/api/mint-20", "$10", Some("Mint 20 NFTs"))
        .route("GET", "/minted", "$0.01", Some("Total NFTs minted"))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_prices() {
        let table = default_table();
        assert_eq!(table.len(), 4);

        let mint = table.get_route("GET", "/api/mint").unwrap();
        assert_eq!(mint.price, "$0.5");
        assert_eq!(mint.network, "base");

        let bundle = table.get_route("GET", "/api/mint-20").unwrap();
        assert_eq!(bundle.price, "$10");

        let minted = table.get_route("GET", "/minted").unwrap();
        assert_eq!(minted.price, "$0.01");
    }

    #[test]
    fn test_get_route_returns_none_for_unknown() {
        let table = default_table();
        assert!(table.get_route("POST", "/api/mint").is_none());
        assert!(table.get_route("GET", "/unknown").is_none());
    }

    #[test]
    fn test_builder_multiple_routes() {
        let table = PricingTable::builder("eip155:8453")
            .route("GET", "/a", "$0.001", Some("a"))
            .route("POST", "/b", "$0.01", None)
            .build();

        assert_eq!(table.len(), 2);
        assert_eq!(table.network(), "eip155:8453");

        let a = table.get_route("GET", "/a").unwrap();
        assert_eq!(a.description.as_deref(), Some("a"));

        let b = table.get_route("POST", "/b").unwrap();
        assert!(b.description.is_none());
        assert_eq!(b.network, "eip155:8453");
    }

    #[test]
    fn test_builder_empty_builds_no_routes() {
        let table = PricingTable::builder(DEFAULT_NETWORK).build();
        assert!(table.is_empty());
    }
}
