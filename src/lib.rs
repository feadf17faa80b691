//! Library root for the `zenthera` crate

// Core error handling
pub mod api_errors;
pub mod errors;

// Shared taxonomy
pub mod severity;

// Feature records and stores
pub mod compliance;
pub mod failure;
pub mod narrative;
pub mod observability;
pub mod platform;
pub mod regulation;

// Heuristic engines
pub mod alignment_engine;
pub mod failure_engine;
pub mod narrative_generator;
pub mod quality_engine;
pub mod risk_engine;

// Web server interface
pub mod api;
pub mod pages;
pub mod web;

// Application state & demo data
pub mod app_state;
pub mod demo_seed;

// Configuration & CLI
pub mod cli;
pub mod config_loader;

#[cfg(test)]
mod tests {
    pub mod web;
}

// Re-export the types most callers need
pub use api_errors::ApiError;
pub use app_state::AppState;
pub use config_loader::{load_config, ZenConfig};
pub use errors::{ZenResult, ZentheraError};
pub use severity::Severity;
pub use web::build_router;
