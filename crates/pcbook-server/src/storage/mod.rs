//! In-memory stores for users, laptops, ratings and uploaded images.
//!
//! Each store owns its map behind a `tokio::sync::RwLock` and only ever
//! hands out owned copies, so callers cannot alias stored records.

mod filter;
mod image;
mod laptop;
mod rating;
mod user;


pub use filter::{is_qualified, memory_to_bits};
pub use image::{DiskImageStore, ImageInfo, ImageStoreError};
pub use laptop::{LaptopStore, SearchError};
pub use rating::{Rating, RatingStore};
pub use user::{User, UserStore};

use thiserror::Error;

/// Failures raised by the keyed stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record already exists: {0}")]
    AlreadyExists(String),

    #[error("laptop ID is not a valid UUID: {0}")]
    InvalidId(#[from] uuid::Error),
}
