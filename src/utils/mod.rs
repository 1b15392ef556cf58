// Utility functions
pub mod error;
pub mod jwt;
pub mod metrics;
pub mod slug;

pub use error::*;
pub use slug::generate_slug;
