//! Mapping of domain failures to gRPC status codes.
//!
//! This is the only place that decides which `tonic::Code` a failure gets.

use std::fmt::Display;

use tonic::Status;
use tracing::error;

use crate::context::ContextError;
use crate::storage::StoreError;
use crate::upload::UploadError;

/// Log `err` in full and return an opaque internal status.
pub fn internal(what: &str, err: &dyn Display) -> Status {
    error!(error = %err, "{what}");
    Status::internal(what.to_string())
}

pub fn context_status(err: ContextError) -> Status {
    match err {
        ContextError::Canceled => Status::cancelled(err.to_string()),
        ContextError::DeadlineExceeded => Status::deadline_exceeded(err.to_string()),
    }
}

pub fn store_status(err: &StoreError) -> Status {
    match err {
        StoreError::AlreadyExists(_) => {
            Status::already_exists(format!("cannot save laptop to the store: {err}"))
        }
        StoreError::InvalidId(_) => Status::invalid_argument(err.to_string()),
    }
}

pub fn upload_status(err: UploadError) -> Status {
    match err {
        UploadError::ReceiveInfo(_) | UploadError::ReceiveChunk(_) => {
            Status::unknown(err.to_string())
        }
        UploadError::MissingInfo
        | UploadError::InvalidImageType(_)
        | UploadError::LaptopNotFound(_)
        | UploadError::DuplicateInfo
        | UploadError::TooLarge { .. } => Status::invalid_argument(err.to_string()),
        UploadError::Context(e) => context_status(e),
        UploadError::Persist(e) => internal("cannot save image to the store", &e),
    }
}
