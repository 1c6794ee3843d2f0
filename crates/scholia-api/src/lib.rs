//! HTTP surface for the Scholia engine

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use app::build_router;
