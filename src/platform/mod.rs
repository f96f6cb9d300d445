//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Seeding from the clock
//! - Score storage (JSON file on native, LocalStorage on web)
//! - The browser-facing exports

#[cfg(not(target_arch = "wasm32"))]
pub mod native;
#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(not(target_arch = "wasm32"))]
pub use native::clock_seed;
#[cfg(target_arch = "wasm32")]
pub use web::clock_seed;

use crate::settings::Settings;

/// Configured seed, or one from the clock
pub fn seed(settings: &Settings) -> u64 {
    settings.seed.unwrap_or_else(clock_seed)
}
