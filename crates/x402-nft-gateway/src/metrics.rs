use prometheus::{
    register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec,
    TextEncoder,
};
use std::sync::LazyLock;

pub static REQUESTS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "nft_gateway_requests_total",
        "Total HTTP requests",
        &["endpoint", "status"]
    )
    .unwrap()
});

pub static MINTS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "nft_gateway_mints_total",
        "Total mint attempts that reached the ledger",
        &["result"]
    )
    .unwrap()
});

pub static QUEUE_REJECTIONS: LazyLock<IntCounter> = LazyLock::new(|| {
    register_int_counter!(
        "nft_gateway_queue_rejections_total",
        "Mint requests rejected because the submission queue was full"
    )
    .unwrap()
});

pub fn metrics_output() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
