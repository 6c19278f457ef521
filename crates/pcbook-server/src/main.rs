//! pcbook Server
//!
//! gRPC server for the laptop catalog: auth, search, image upload, ratings.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tonic::transport::Server;
use tracing::info;

use pcbook_core::Config;
use pcbook_core::config::LogFormat;
use pcbook_core::tracing_init::init_tracing;
use pcbook_proto::v1::auth_service_server::AuthServiceServer;
use pcbook_proto::v1::laptop_service_server::LaptopServiceServer;

use pcbook_server::auth::JwtManager;
use pcbook_server::server::{AuthServiceImpl, LaptopServiceImpl, auth_interceptor};
use pcbook_server::storage::{DiskImageStore, LaptopStore, RatingStore, UserStore};
use pcbook_server::upload::ImageIngestor;

#[derive(Parser, Debug)]
#[command(name = "pcbook-server")]
#[command(version, about = "pcbook gRPC server - laptop catalog, uploads and ratings")]
struct Args {
    /// Path to a TOML config file.
    #[arg(long, env = "PCBOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on (overrides the config file).
    #[arg(long)]
    addr: Option<SocketAddr>,

    /// Directory for uploaded images (overrides the config file).
    #[arg(long)]
    image_dir: Option<PathBuf>,

    /// JWT signing secret (overrides the config file).
    #[arg(long, env = "PCBOOK_JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,

    /// Output logs as JSON (for structured log aggregation).
    #[arg(long)]
    log_json: bool,
}

impl Args {
    fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(addr) = self.addr {
            config.server.addr = addr;
        }
        if let Some(dir) = &self.image_dir {
            config.server.image_dir.clone_from(dir);
        }
        if let Some(secret) = &self.jwt_secret {
            config.auth.jwt_secret.clone_from(secret);
        }
        if self.log_json {
            config.logging.format = LogFormat::Json;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = args.resolve_config()?;

    init_tracing("pcbook_server=info", config.logging.format);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %config.server.addr,
        "Starting pcbook-server"
    );

    let jwt = Arc::new(JwtManager::new(
        config.auth.jwt_secret.as_bytes(),
        config.auth.token_ttl_secs,
    ));

    let users = UserStore::new();
    pcbook_server::seed_users(&users).await?;
    info!(count = pcbook_server::SEED_USERS.len(), "Seeded users");

    tokio::fs::create_dir_all(&config.server.image_dir).await?;
    info!(path = %config.server.image_dir.display(), "Storing images");

    let laptops = LaptopStore::new();
    let images = DiskImageStore::new(&config.server.image_dir);
    let ratings = RatingStore::new();
    let ingestor = ImageIngestor::new(laptops.clone(), images, config.server.max_image_bytes);

    // Build services
    let auth = AuthServiceImpl::new(users, Arc::clone(&jwt));
    let laptop = LaptopServiceImpl::new(laptops, ratings, ingestor);
    let token_check = auth_interceptor(Arc::clone(&jwt));

    let (health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<AuthServiceServer<AuthServiceImpl>>()
        .await;
    health_reporter
        .set_serving::<LaptopServiceServer<LaptopServiceImpl>>()
        .await;

    let grpc_router = Server::builder()
        .add_service(health_service)
        .add_service(AuthServiceServer::new(auth))
        .add_service(LaptopServiceServer::with_interceptor(laptop, token_check));

    tokio::select! {
        result = grpc_router.serve(config.server.addr) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    info!("pcbook-server stopped");
    Ok(())
}
