//! HTTP front of the proxy

pub mod handlers;
pub mod routes;
pub mod server;

pub use server::ApiServer;
