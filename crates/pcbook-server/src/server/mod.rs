//! gRPC service implementations for pcbook.

pub mod auth_svc;
pub mod interceptor;
pub mod laptop_svc;
pub mod status;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use auth_svc::AuthServiceImpl;
pub use interceptor::{auth_interceptor, authorize};
pub use laptop_svc::LaptopServiceImpl;
