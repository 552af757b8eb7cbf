use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{web, App, HttpServer};
use alloy::network::EthereumWallet;
use alloy::providers::ProviderBuilder;
use alloy::signers::local::PrivateKeySigner;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use x402_nft::{default_table, Minter, NftContractLedger};
use x402_nft_gateway::{config::ServerConfig, routes, state::AppState};

fn build_cors(origins: &[String]) -> Cors {
    if origins.is_empty() {
        Cors::default()
            .allowed_origin_fn(|origin, _| {
                origin
                    .to_str()
                    .map(|o| {
                        // Match http://localhost or http://localhost:PORT exactly
                        o == "http://localhost" || o.starts_with("http://localhost:")
                    })
                    .unwrap_or(false)
            })
            .allow_any_method()
            .allow_any_header()
            .max_age(3600)
    } else {
        let mut cors = Cors::default();
        for origin in origins {
            cors = cors.allowed_origin(origin);
        }
        cors.allow_any_method().allow_any_header().max_age(3600)
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "refusing to start: invalid configuration");
            std::process::exit(1);
        }
    };

    let signer: PrivateKeySigner = match config.server_private_key.parse() {
        Ok(signer) => signer,
        Err(_) => {
            tracing::error!("refusing to start: SERVER_PRIVATE_KEY is not a valid private key");
            std::process::exit(1);
        }
    };
    tracing::info!("Server wallet address: {}", signer.address());

    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .connect_http(config.rpc_url.parse().expect("invalid RPC_URL"));

    let ledger = Arc::new(NftContractLedger::new(provider, config.contract_address));
    let minter = Minter::new(ledger, config.queue_depth);

    let pricing = default_table();
    for route in pricing.routes() {
        tracing::info!(
            method = %route.method,
            path = %route.path,
            price = %route.price,
            network = %route.network,
            "priced route"
        );
    }

    tracing::info!("NFT contract: {:#x}", config.contract_address);
    tracing::info!("Pay-to address: {:#x}", config.pay_to);
    tracing::info!("Facilitator: {}", config.facilitator_url);
    tracing::info!("Mint queue depth: {}", config.queue_depth);
    tracing::info!("Rate limit: {} req/min per IP", config.rate_limit_rpm);

    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_minute(config.rate_limit_rpm)
        .finish()
        .expect("failed to build rate limiter config");

    let port = config.port;
    let allowed_origins = config.allowed_origins.clone();
    let state = web::Data::new(AppState::new(config, pricing, minter));

    tracing::info!("x402 NFT mint gateway listening at http://localhost:{port}");

    HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&allowed_origins))
            .wrap(Governor::new(&governor_conf))
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
