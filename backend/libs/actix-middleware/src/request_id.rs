//! Request correlation ID middleware
//!
//! Extracts or generates a correlation identifier for every inbound request.
//! The identifier carries no meaning beyond log correlation; it is threaded
//! through every downstream call as the `request_id` query parameter.
//!
//! ## Design
//! - If the query string has `request_id`: use it
//! - Else if the request has an `X-Request-ID` header: use it
//! - Otherwise: generate UUID v4
//! - Store in request extensions for access by handlers ([`RequestId`] extractor)
//! - Echo it back in the `X-Request-ID` response header
//!
//! ## Example
//! ```rust
//! use actix_middleware::RequestIdMiddleware;
//! use actix_web::App;
//!
//! let app = App::new()
//!     .wrap(RequestIdMiddleware);
//! ```

use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::LocalBoxFuture;
use std::collections::HashMap;
use std::fmt;
use std::future::{ready, Ready};
use uuid::Uuid;

pub use news_common::REQUEST_ID_PARAM;

/// Header accepted as an alternative source and set on every response
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation identifier of the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Pick the identifier the client supplied, if any.
    fn from_incoming(req: &ServiceRequest) -> Option<Self> {
        let from_query = web::Query::<HashMap<String, String>>::from_query(req.query_string())
            .ok()
            .and_then(|q| q.get(REQUEST_ID_PARAM).cloned());

        let from_header = || {
            req.headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|h| h.to_str().ok())
                .map(|s| s.to_string())
        };

        from_query
            .or_else(from_header)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(Self)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromRequest for RequestId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // Without the middleware installed every request still gets an id.
        ready(Ok(req
            .extensions()
            .get::<RequestId>()
            .cloned()
            .unwrap_or_else(RequestId::generate)))
    }
}

/// Middleware that manages request correlation IDs
#[derive(Clone, Default)]
pub struct RequestIdMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestIdMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestIdMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdMiddlewareService { service }))
    }
}

pub struct RequestIdMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestIdMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let request_id = RequestId::from_incoming(&req).unwrap_or_else(RequestId::generate);

        req.extensions_mut().insert(request_id.clone());

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;
            if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
                res.headers_mut()
                    .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
            }
            Ok(res)
        })
    }
}
