//! HTTP adapter for the Triage issue tracker.

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod service_handler;
