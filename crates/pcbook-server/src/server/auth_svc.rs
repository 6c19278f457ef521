//! AuthService gRPC implementation.

use std::sync::Arc;

use tonic::{Request, Response, Status};
use tracing::{info, instrument, warn};

use pcbook_proto::v1::auth_service_server::AuthService;
use pcbook_proto::v1::{LoginRequest, LoginResponse};

use super::status::internal;
use crate::auth::{JwtManager, password};
use crate::storage::UserStore;

/// Message shared by the unknown-user and wrong-password paths so callers
/// cannot tell them apart.
pub const LOGIN_FAILED: &str = "incorrect username/password";

pub struct AuthServiceImpl {
    users: UserStore,
    jwt: Arc<JwtManager>,
}

impl AuthServiceImpl {
    pub fn new(users: UserStore, jwt: Arc<JwtManager>) -> Self {
        password::prime_decoy();
        Self { users, jwt }
    }
}

#[tonic::async_trait]
impl AuthService for AuthServiceImpl {
    #[instrument(skip(self, request), fields(rpc = "Login"))]
    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> Result<Response<LoginResponse>, Status> {
        let req = request.into_inner();

        let Some(user) = self.users.find(&req.username).await else {
            password::verify_decoy(&req.password);
            warn!(username = %req.username, "Failed login attempt");
            return Err(Status::not_found(LOGIN_FAILED));
        };

        let valid = user
            .verify_password(&req.password)
            .map_err(|e| internal("cannot verify password", &e))?;
        if !valid {
            warn!(username = %req.username, "Failed login attempt");
            return Err(Status::not_found(LOGIN_FAILED));
        }

        let access_token = self
            .jwt
            .issue(&user)
            .map_err(|e| internal("cannot generate access token", &e))?;

        info!(username = %user.username, role = %user.role, "User logged in");
        Ok(Response::new(LoginResponse { access_token }))
    }
}
