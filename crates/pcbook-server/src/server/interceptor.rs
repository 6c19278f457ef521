//! Access-token interceptor and per-method role check.

use std::sync::Arc;

use tonic::{Request, Status};
use tracing::debug;

use pcbook_proto::methods::{METHOD_ADD_RATING, METHOD_CREATE_LAPTOP, METHOD_UPLOAD_IMAGE};

use crate::auth::{Claims, JwtManager, Role};

/// Marks a request whose `authorization` header was present but unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RejectedToken;

/// Validate a bearer token when one is sent and attach its claims.
///
/// The interceptor never fails a call: a missing header leaves the request
/// untouched and a bad one is tagged with [`RejectedToken`]. Whether either
/// is acceptable depends on the method, so the handler's [`authorize`] call
/// decides.
pub fn auth_interceptor(
    jwt: Arc<JwtManager>,
) -> impl Fn(Request<()>) -> Result<Request<()>, Status> + Clone {
    move |mut req: Request<()>| {
        let Some(header) = req.metadata().get("authorization") else {
            return Ok(req);
        };

        let claims = header
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .and_then(|token| match jwt.validate(token) {
                Ok(claims) => Some(claims),
                Err(e) => {
                    debug!(error = %e, "Rejected access token");
                    None
                }
            });

        if let Some(claims) = claims {
            req.extensions_mut().insert(claims);
        } else {
            req.extensions_mut().insert(RejectedToken);
        }
        Ok(req)
    }
}

/// Roles allowed to call `method`; `None` means the method is public.
pub fn accessible_roles(method: &str) -> Option<&'static [Role]> {
    match method {
        METHOD_CREATE_LAPTOP => Some(&[Role::Admin]),
        METHOD_UPLOAD_IMAGE | METHOD_ADD_RATING => Some(&[Role::Admin, Role::User]),
        _ => None,
    }
}

/// Check the caller's claims against the role table entry for `method`.
#[allow(clippy::result_large_err)]
pub fn authorize<T>(req: &Request<T>, method: &str) -> Result<(), Status> {
    let Some(roles) = accessible_roles(method) else {
        return Ok(());
    };

    let Some(claims) = req.extensions().get::<Claims>() else {
        return Err(if req.extensions().get::<RejectedToken>().is_some() {
            Status::unauthenticated("access token is invalid")
        } else {
            Status::unauthenticated("access token is not provided")
        });
    };

    if claims.has_any_role(roles) {
        Ok(())
    } else {
        Err(Status::permission_denied("no permission to access this RPC"))
    }
}
