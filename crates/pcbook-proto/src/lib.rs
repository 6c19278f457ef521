//! pcbook Protocol Buffers
//!
//! Generated protobuf code for the pcbook gRPC API.
//!
//! This crate contains:
//! - `LaptopService` for catalog management, search, image upload and rating
//! - `AuthService` for issuing access tokens

#![allow(clippy::derive_partial_eq_without_eq)]

pub mod methods;

/// pcbook v1 API definitions.
///
/// All generated types and services are included here.
pub mod v1 {
    tonic::include_proto!("pcbook.v1");
}

// Re-export v1 as the default API version for convenience
pub use v1::*;

// Re-export prost_types for downstream crates that need Timestamp conversion
pub use prost_types;
