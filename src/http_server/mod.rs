//! # HTTP Server
//!
//! Thin transport layer: route modules per concern, assembled by
//! [`server::HttpServer`].

pub mod auth_routes;
pub mod config;
pub mod document_routes;
pub mod server;

pub use config::{HttpServerConfig, ServiceConfig};
pub use server::HttpServer;
