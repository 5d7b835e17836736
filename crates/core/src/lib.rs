//! Core media gateway logic for Courier.
//!
//! This crate owns the media storage gateway: provider credentials,
//! public-id derivation, the provider HTTP client, and the orchestrating
//! service. It carries no web-framework or database dependencies.

pub mod media;
