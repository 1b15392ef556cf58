pub mod auth;
pub mod request_metrics;

pub use auth::SessionMiddleware;
pub use request_metrics::RequestMetrics;
