// Contadores de processo lidos pelo /metrics. Ficam fora da camada HTTP
// porque gateway e services também registram eventos aqui.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static REQUEST_COUNT: AtomicU64 = AtomicU64::new(0);
static ERROR_COUNT: AtomicU64 = AtomicU64::new(0);
static GATEWAY_CALLS: AtomicU64 = AtomicU64::new(0);
static GATEWAY_FAILURES: AtomicU64 = AtomicU64::new(0);
static VALIDATION_REJECTIONS: AtomicU64 = AtomicU64::new(0);

pub fn increment_request_count() {
    REQUEST_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_error_count() {
    ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn record_gateway_call(ok: bool) {
    GATEWAY_CALLS.fetch_add(1, Ordering::Relaxed);
    if !ok {
        GATEWAY_FAILURES.fetch_add(1, Ordering::Relaxed);
    }
}

pub fn record_validation_rejection() {
    VALIDATION_REJECTIONS.fetch_add(1, Ordering::Relaxed);
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MetricsResponse {
    pub http_requests_total: u64,
    pub http_errors_total: u64,
    pub gateway_requests_total: u64,
    pub gateway_failures_total: u64,
    pub validation_rejections_total: u64,
}

pub fn snapshot() -> MetricsResponse {
    MetricsResponse {
        http_requests_total: REQUEST_COUNT.load(Ordering::Relaxed),
        http_errors_total: ERROR_COUNT.load(Ordering::Relaxed),
        gateway_requests_total: GATEWAY_CALLS.load(Ordering::Relaxed),
        gateway_failures_total: GATEWAY_FAILURES.load(Ordering::Relaxed),
        validation_rejections_total: VALIDATION_REJECTIONS.load(Ordering::Relaxed),
    }
}
