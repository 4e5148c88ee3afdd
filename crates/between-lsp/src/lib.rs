//! Between Language Server library
//!
//! Exposes the server and its handlers for testing.

pub mod analysis;
pub mod config;
pub mod handlers;
pub mod message;
pub mod server;
pub mod session;
pub mod transport;

pub use config::ServerConfig;
pub use server::BetweenLanguageServer;
