//! Chunked image upload.
//!
//! An upload stream is driven through an explicit state machine:
//!
//! ```text
//! AwaitMetadata -> Receiving -> Finalizing -> Done
//!        \             |             /
//!         `------> Aborted <--------'
//! ```
//!
//! `Aborted` is the `Err` arm of every transition. Nothing is written to
//! disk and no image ID is generated until `Finalizing`.


use thiserror::Error;
use tokio_stream::{Stream, StreamExt};
use tonic::Status;
use tracing::{debug, error, info, warn};

use pcbook_proto::v1::UploadImageRequest;
use pcbook_proto::v1::upload_image_request::Data;

use crate::context::{CallContext, ContextError};
use crate::storage::{DiskImageStore, ImageStoreError, LaptopStore};

/// Longest accepted image type, including the leading dot.
const MAX_IMAGE_TYPE_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("cannot receive image info: {0}")]
    ReceiveInfo(String),

    #[error("first message must carry image info")]
    MissingInfo,

    #[error("invalid image type: {0:?}")]
    InvalidImageType(String),

    #[error("laptop {0} doesn't exist")]
    LaptopNotFound(String),

    #[error("image info sent twice")]
    DuplicateInfo,

    #[error("cannot receive chunk data: {0}")]
    ReceiveChunk(String),

    #[error("image is too large: {size} > {max}")]
    TooLarge { size: usize, max: usize },

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error("cannot save image to the store: {0}")]
    Persist(#[from] ImageStoreError),
}

/// Result of a completed upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSummary {
    pub image_id: String,
    pub laptop_id: String,
    pub size: usize,
}

/// Bytes accumulated so far for an upload whose metadata has been accepted.
#[derive(Debug)]
struct PendingImage {
    laptop_id: String,
    image_type: String,
    data: Vec<u8>,
}

#[derive(Debug)]
enum UploadState {
    AwaitMetadata,
    Receiving(PendingImage),
    Finalizing(PendingImage),
    Done(UploadSummary),
}

/// Accumulates streamed chunks under a byte ceiling and persists the result.
#[derive(Clone)]
pub struct ImageIngestor {
    laptops: LaptopStore,
    images: DiskImageStore,
    max_image_bytes: usize,
}

impl ImageIngestor {
    pub const fn new(laptops: LaptopStore, images: DiskImageStore, max_image_bytes: usize) -> Self {
        Self {
            laptops,
            images,
            max_image_bytes,
        }
    }

    pub const fn max_image_bytes(&self) -> usize {
        self.max_image_bytes
    }

    /// Drive `stream` to completion. Chunks are consumed strictly in
    /// arrival order.
    pub async fn ingest<S>(&self, ctx: &CallContext, mut stream: S) -> Result<UploadSummary, UploadError>
    where
        S: Stream<Item = Result<UploadImageRequest, Status>> + Unpin,
    {
        let mut state = UploadState::AwaitMetadata;
        loop {
            state = match state {
                UploadState::AwaitMetadata => self.await_metadata(&mut stream).await?,
                UploadState::Receiving(pending) => {
                    self.receive(ctx, &mut stream, pending).await?
                }
                UploadState::Finalizing(pending) => self.finalize(pending).await?,
                UploadState::Done(summary) => return Ok(summary),
            };
        }
    }

    async fn await_metadata<S>(&self, stream: &mut S) -> Result<UploadState, UploadError>
    where
        S: Stream<Item = Result<UploadImageRequest, Status>> + Unpin,
    {
        let info = match stream.next().await {
            Some(Ok(UploadImageRequest {
                data: Some(Data::Info(info)),
            })) => info,
            Some(Ok(_)) => {
                warn!("Upload aborted: first message carried no image info");
                return Err(UploadError::MissingInfo);
            }
            Some(Err(status)) => {
                warn!(error = %status, "Upload aborted: cannot receive image info");
                return Err(UploadError::ReceiveInfo(status.message().to_string()));
            }
            None => {
                warn!("Upload aborted: stream ended before image info");
                return Err(UploadError::ReceiveInfo("stream closed".into()));
            }
        };

        info!(
            laptop_id = %info.laptop_id,
            image_type = %info.image_type,
            "Received upload-image request"
        );

        if !is_valid_image_type(&info.image_type) {
            warn!(laptop_id = %info.laptop_id, image_type = %info.image_type, "Upload aborted: invalid image type");
            return Err(UploadError::InvalidImageType(info.image_type));
        }

        if self.laptops.find(&info.laptop_id).await.is_none() {
            warn!(laptop_id = %info.laptop_id, "Upload aborted: laptop doesn't exist");
            return Err(UploadError::LaptopNotFound(info.laptop_id));
        }

        Ok(UploadState::Receiving(PendingImage {
            laptop_id: info.laptop_id,
            image_type: info.image_type,
            data: Vec::new(),
        }))
    }

    async fn receive<S>(
        &self,
        ctx: &CallContext,
        stream: &mut S,
        mut pending: PendingImage,
    ) -> Result<UploadState, UploadError>
    where
        S: Stream<Item = Result<UploadImageRequest, Status>> + Unpin,
    {
        if let Err(e) = ctx.check() {
            warn!(
                laptop_id = %pending.laptop_id,
                received = pending.data.len(),
                error = %e,
                "Upload aborted by caller"
            );
            return Err(e.into());
        }

        let chunk = match stream.next().await {
            None => {
                debug!(laptop_id = %pending.laptop_id, "No more data");
                return Ok(UploadState::Finalizing(pending));
            }
            Some(Err(status)) => {
                warn!(
                    laptop_id = %pending.laptop_id,
                    received = pending.data.len(),
                    error = %status,
                    "Upload aborted: cannot receive chunk"
                );
                return Err(UploadError::ReceiveChunk(status.message().to_string()));
            }
            Some(Ok(UploadImageRequest {
                data: Some(Data::ChunkData(chunk)),
            })) => chunk,
            Some(Ok(UploadImageRequest {
                data: Some(Data::Info(_)),
            })) => {
                warn!(laptop_id = %pending.laptop_id, "Upload aborted: image info sent twice");
                return Err(UploadError::DuplicateInfo);
            }
            Some(Ok(UploadImageRequest { data: None })) => {
                return Ok(UploadState::Receiving(pending));
            }
        };

        let size = pending.data.len() + chunk.len();
        debug!(laptop_id = %pending.laptop_id, chunk = chunk.len(), total = size, "Received chunk");
        if size > self.max_image_bytes {
            warn!(
                laptop_id = %pending.laptop_id,
                size,
                max = self.max_image_bytes,
                "Upload aborted: image is too large"
            );
            return Err(UploadError::TooLarge {
                size,
                max: self.max_image_bytes,
            });
        }

        pending.data.extend_from_slice(&chunk);
        Ok(UploadState::Receiving(pending))
    }

    async fn finalize(&self, pending: PendingImage) -> Result<UploadState, UploadError> {
        let size = pending.data.len();
        let image_id = self
            .images
            .save(&pending.laptop_id, &pending.image_type, &pending.data)
            .await
            .map_err(|e| {
                error!(laptop_id = %pending.laptop_id, size, error = %e, "Upload aborted: cannot persist image");
                UploadError::from(e)
            })?;

        info!(image_id = %image_id, laptop_id = %pending.laptop_id, size, "Saved image");
        Ok(UploadState::Done(UploadSummary {
            image_id,
            laptop_id: pending.laptop_id,
            size,
        }))
    }
}

/// Empty, or one or more `.`-prefixed ASCII alphanumeric segments such as
/// `.jpg` or `.tar.gz`. The type is appended to a generated file name, so
/// separators and empty segments (`..`) are refused.
fn is_valid_image_type(image_type: &str) -> bool {
    if image_type.is_empty() {
        return true;
    }
    image_type.len() <= MAX_IMAGE_TYPE_LEN
        && image_type.strip_prefix('.').is_some_and(|ext| {
            ext.split('.')
                .all(|seg| !seg.is_empty() && seg.bytes().all(|b| b.is_ascii_alphanumeric()))
        })
}
