//! Bucket region lookup for the S3 proxy
//!
//! This crate provides the HTTP implementation of
//! [`types::RegionResolver`] and picks a resolver from the boot settings.

pub mod client;
pub mod factory;

pub use client::*;
pub use factory::*;
