//! Access key middleware
//!
//! Authenticates requests via `Authorization: Bearer <key>`. When no access
//! key is configured the middleware passes everything through, so a local
//! dashboard stays usable without setup.

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpResponse,
};
use futures::future::{ok, LocalBoxFuture, Ready};
use std::rc::Rc;

/// Access key middleware
pub struct AccessKeyMiddleware {
    access_key: Rc<Option<String>>,
}

impl AccessKeyMiddleware {
    /// An empty key disables authentication.
    pub fn new(access_key: String) -> Self {
        let key = access_key.trim().to_string();
        Self {
            access_key: Rc::new(if key.is_empty() { None } else { Some(key) }),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AccessKeyMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AccessKeyMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AccessKeyMiddlewareService {
            service: Rc::new(service),
            access_key: self.access_key.clone(),
        })
    }
}

pub struct AccessKeyMiddlewareService<S> {
    service: Rc<S>,
    access_key: Rc<Option<String>>,
}

impl<S, B> Service<ServiceRequest> for AccessKeyMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let access_key = self.access_key.clone();

        Box::pin(async move {
            // No key configured: open access (local use)
            let expected = match access_key.as_ref() {
                Some(key) => key.clone(),
                None => {
                    let res = service.call(req).await?;
                    return Ok(res.map_into_left_body());
                }
            };

            // Health stays reachable for probes
            if req.path().ends_with("/health") {
                let res = service.call(req).await?;
                return Ok(res.map_into_left_body());
            }

            let provided_key = req
                .headers()
                .get("Authorization")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "));

            match provided_key {
                Some(key) if key == expected => {
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                _ => {
                    let response = HttpResponse::Unauthorized().json(serde_json::json!({
                        "code": 401,
                        "message": "invalid bearer token",
                        "data": null
                    }));
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}
