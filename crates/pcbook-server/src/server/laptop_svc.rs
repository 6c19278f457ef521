//! LaptopService gRPC implementation.

use std::pin::Pin;

use tokio::sync::{mpsc, oneshot};
use tokio_stream::Stream;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status, Streaming};
use tracing::{debug, info, instrument, warn};

use pcbook_proto::methods::{
    METHOD_ADD_RATING, METHOD_CREATE_LAPTOP, METHOD_SEARCH_LAPTOP, METHOD_UPLOAD_IMAGE,
};
use pcbook_proto::v1::laptop_service_server::LaptopService;
use pcbook_proto::v1::{
    AddRatingRequest, AddRatingResponse, CreateLaptopRequest, CreateLaptopResponse,
    SearchLaptopRequest, SearchLaptopResponse, UploadImageRequest, UploadImageResponse,
};

use super::interceptor::authorize;
use super::status::{context_status, internal, store_status, upload_status};
use crate::context::CallContext;
use crate::storage::{LaptopStore, RatingStore, SearchError, is_qualified};
use crate::upload::ImageIngestor;

/// Buffered search results per stream before the scan waits on the client.
const SEARCH_CHANNEL_SIZE: usize = 16;

type SearchStream = Pin<Box<dyn Stream<Item = Result<SearchLaptopResponse, Status>> + Send>>;

pub struct LaptopServiceImpl {
    laptops: LaptopStore,
    ratings: RatingStore,
    ingestor: ImageIngestor,
}

impl LaptopServiceImpl {
    pub const fn new(laptops: LaptopStore, ratings: RatingStore, ingestor: ImageIngestor) -> Self {
        Self {
            laptops,
            ratings,
            ingestor,
        }
    }

    /// Body of `UploadImage`, generic over the inbound stream so it can be
    /// driven without a live transport.
    pub async fn upload<S>(&self, request: Request<S>) -> Result<Response<UploadImageResponse>, Status>
    where
        S: Stream<Item = Result<UploadImageRequest, Status>> + Unpin,
    {
        authorize(&request, METHOD_UPLOAD_IMAGE)?;
        let ctx = CallContext::from_metadata(request.metadata());

        let summary = self
            .ingestor
            .ingest(&ctx, request.into_inner())
            .await
            .map_err(upload_status)?;

        let size = u32::try_from(summary.size)
            .map_err(|e| internal("image size does not fit the response", &e))?;
        Ok(Response::new(UploadImageResponse {
            id: summary.image_id,
            size,
        }))
    }
}

#[tonic::async_trait]
impl LaptopService for LaptopServiceImpl {
    type SearchLaptopStream = SearchStream;

    #[instrument(skip(self, request), fields(rpc = "CreateLaptop"))]
    async fn create_laptop(
        &self,
        request: Request<CreateLaptopRequest>,
    ) -> Result<Response<CreateLaptopResponse>, Status> {
        authorize(&request, METHOD_CREATE_LAPTOP)?;
        let ctx = CallContext::from_metadata(request.metadata());

        let laptop = request.into_inner().laptop.unwrap_or_default();
        info!(laptop_id = %laptop.id, "Received create-laptop request");

        ctx.check().map_err(context_status)?;

        let id = self.laptops.save(laptop).await.map_err(|e| {
            warn!(error = %e, "Cannot save laptop");
            store_status(&e)
        })?;

        info!(laptop_id = %id, "Saved laptop");
        Ok(Response::new(CreateLaptopResponse { id }))
    }

    #[instrument(skip(self, request), fields(rpc = "SearchLaptop"))]
    async fn search_laptop(
        &self,
        request: Request<SearchLaptopRequest>,
    ) -> Result<Response<Self::SearchLaptopStream>, Status> {
        authorize(&request, METHOD_SEARCH_LAPTOP)?;
        let ctx = CallContext::from_metadata(request.metadata());

        let filter = request.into_inner().filter.unwrap_or_default();
        info!(?filter, "Received search-laptop request");

        let (tx, rx) = mpsc::channel(SEARCH_CHANNEL_SIZE);
        let laptops = self.laptops.clone();

        tokio::spawn(async move {
            // Cancel the scan as soon as the client drops the response stream.
            let (done_tx, done_rx) = oneshot::channel::<()>();
            let watch_tx = tx.clone();
            let watch_ctx = ctx.clone();
            tokio::spawn(async move {
                tokio::select! {
                    () = watch_tx.closed() => watch_ctx.cancel(),
                    _ = done_rx => {}
                }
            });

            let match_tx = tx.clone();
            let result = laptops
                .search(
                    &ctx,
                    |laptop| is_qualified(&filter, laptop),
                    |laptop| {
                        let tx = match_tx.clone();
                        async move {
                            let laptop_id = laptop.id.clone();
                            tx.send(Ok(SearchLaptopResponse {
                                laptop: Some(laptop),
                            }))
                            .await
                            .map_err(|_| Status::cancelled("search stream closed"))?;
                            debug!(laptop_id = %laptop_id, "Sent laptop");
                            Ok::<(), Status>(())
                        }
                    },
                )
                .await;
            drop(done_tx);

            match result {
                Ok(found) => info!(found, "Search completed"),
                Err(SearchError::Context(e)) => {
                    warn!(error = %e, "Search aborted");
                    let _ = tx.send(Err(context_status(e))).await;
                }
                Err(SearchError::Callback(status)) => {
                    debug!(error = %status, "Search stopped: client went away");
                }
            }
        });

        Ok(Response::new(Box::pin(ReceiverStream::new(rx))))
    }

    #[instrument(skip(self, request), fields(rpc = "UploadImage"))]
    async fn upload_image(
        &self,
        request: Request<Streaming<UploadImageRequest>>,
    ) -> Result<Response<UploadImageResponse>, Status> {
        self.upload(request).await
    }

    #[instrument(skip(self, request), fields(rpc = "AddRating"))]
    async fn add_rating(
        &self,
        request: Request<AddRatingRequest>,
    ) -> Result<Response<AddRatingResponse>, Status> {
        authorize(&request, METHOD_ADD_RATING)?;
        let req = request.into_inner();
        info!(laptop_id = %req.laptop_id, score = req.score, "Received add-rating request");

        if !req.score.is_finite() {
            return Err(Status::invalid_argument("score must be a finite number"));
        }
        if self.laptops.find(&req.laptop_id).await.is_none() {
            return Err(Status::not_found(format!(
                "laptop {} doesn't exist",
                req.laptop_id
            )));
        }

        let rating = self.ratings.add(&req.laptop_id, req.score).await;
        debug!(laptop_id = %req.laptop_id, count = rating.count, sum = rating.sum, "Rating updated");

        Ok(Response::new(AddRatingResponse {
            laptop_id: req.laptop_id,
            rated_count: rating.count,
            average_score: rating.average(),
        }))
    }
}
