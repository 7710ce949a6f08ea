//! Quote Engine library crate.
//!
//! This crate exposes the core quote pricing engine and API
//! components as reusable modules.  External applications may depend
//! on the `quote_engine` crate and call into
//! `engine::calculate_pricing` directly or embed the API via
//! `api::build_router`.

pub mod models;
pub mod region;
pub mod engine;
pub mod preview;
pub mod api;
