//! Shared test helpers for the service test modules.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use tonic::Request;

use pcbook_proto::v1::Laptop;

use crate::auth::{Claims, JwtManager, Role};
use crate::storage::{DiskImageStore, LaptopStore, RatingStore, User, UserStore};
use crate::upload::ImageIngestor;

use super::{AuthServiceImpl, LaptopServiceImpl};

pub const TEST_SECRET: &[u8] = b"test-secret";

/// Build a `Claims` value for `role` without going through the signer.
pub fn claims_for(role: Role) -> Claims {
    Claims {
        jti: "test-jti".into(),
        sub: format!("{role}1"),
        role,
        iat: 0,
        exp: i64::MAX,
    }
}

/// Wrap `inner` in a request that already carries claims for `role`, as if
/// it had passed the interceptor.
pub fn request_as<T>(inner: T, role: Role) -> Request<T> {
    let mut req = Request::new(inner);
    req.extensions_mut().insert(claims_for(role));
    req
}

/// Auth service seeded with `admin1`/admin and `user1`/user, both with
/// password `secret`.
pub async fn seeded_auth() -> (AuthServiceImpl, Arc<JwtManager>) {
    let users = UserStore::new();
    for (name, role) in [("admin1", Role::Admin), ("user1", Role::User)] {
        users
            .save(&User::new(name, "secret", role).unwrap())
            .await
            .unwrap();
    }
    let jwt = Arc::new(JwtManager::new(TEST_SECRET, 900));
    (AuthServiceImpl::new(users, Arc::clone(&jwt)), jwt)
}

pub struct LaptopFixture {
    pub svc: LaptopServiceImpl,
    pub laptops: LaptopStore,
    pub images: DiskImageStore,
    pub ratings: RatingStore,
    pub dir: tempfile::TempDir,
}

pub fn laptop_fixture(max_image_bytes: usize) -> LaptopFixture {
    let dir = tempfile::tempdir().unwrap();
    let laptops = LaptopStore::new();
    let images = DiskImageStore::new(dir.path());
    let ratings = RatingStore::new();
    let ingestor = ImageIngestor::new(laptops.clone(), images.clone(), max_image_bytes);
    let svc = LaptopServiceImpl::new(laptops.clone(), ratings.clone(), ingestor);
    LaptopFixture {
        svc,
        laptops,
        images,
        ratings,
        dir,
    }
}

pub fn priced_laptop(price_usd: f64) -> Laptop {
    Laptop {
        brand: "Apple".into(),
        name: "MacBook".into(),
        price_usd,
        ..Default::default()
    }
}
