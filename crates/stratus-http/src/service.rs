//! Control-plane HTTP service implementing the hyper `Service` trait.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::BodyExt;
use hyper::body::Incoming;

use stratus_model::ControlError;

use crate::body::ControlResponseBody;
use crate::dispatch::{ControlHandler, dispatch_operation};
use crate::response::{CONTENT_TYPE, error_to_response};
use crate::router::resolve_operation;

/// Hyper `Service` implementation for the control plane.
///
/// Wraps a [`ControlHandler`] implementation and routes incoming HTTP
/// requests to the matching control-plane operation.
#[derive(Debug)]
pub struct ControlHttpService<H: ControlHandler> {
    handler: Arc<H>,
}

impl<H: ControlHandler> ControlHttpService<H> {
    /// Create a new `ControlHttpService`.
    pub fn new(handler: H) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }
}

impl<H: ControlHandler> Clone for ControlHttpService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<H: ControlHandler> hyper::service::Service<http::Request<Incoming>>
    for ControlHttpService<H>
{
    type Response = http::Response<ControlResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        let request_id = uuid::Uuid::new_v4().to_string();

        Box::pin(async move {
            let response = process_request(req, handler.as_ref(), &request_id).await;
            let response = add_common_headers(response, &request_id);
            Ok(response)
        })
    }
}

/// Process a single control-plane HTTP request through the full pipeline.
async fn process_request<H: ControlHandler>(
    req: http::Request<Incoming>,
    handler: &H,
    request_id: &str,
) -> http::Response<ControlResponseBody> {
    let (parts, incoming) = req.into_parts();

    // 1. Route: operations are fixed method + path pairs.
    let op = match resolve_operation(&parts.method, parts.uri.path()) {
        Ok(op) => op,
        Err(err) => return error_to_response(&err, request_id),
    };

    // 2. Collect body.
    let body = match collect_body(incoming).await {
        Ok(body) => body,
        Err(err) => return error_to_response(&err, request_id),
    };

    // 3. Dispatch to the handler.
    match dispatch_operation(handler, op, body).await {
        Ok(response) => response,
        Err(err) => {
            tracing::debug!(operation = %op, error = %err, "operation failed");
            error_to_response(&err, request_id)
        }
    }
}

/// Collect the incoming body into a single `Bytes` buffer.
async fn collect_body(incoming: Incoming) -> Result<Bytes, ControlError> {
    incoming
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .map_err(|e| ControlError::invalid_request(format!("failed to read request body: {e}")))
}

/// Add common response headers to every control-plane response.
fn add_common_headers(
    mut response: http::Response<ControlResponseBody>,
    request_id: &str,
) -> http::Response<ControlResponseBody> {
    let headers = response.headers_mut();

    if let Ok(hv) = http::HeaderValue::from_str(request_id) {
        headers.entry("x-request-id").or_insert(hv);
    }
    headers
        .entry("content-type")
        .or_insert(http::HeaderValue::from_static(CONTENT_TYPE));
    headers.insert("server", http::HeaderValue::from_static("Stratus"));

    response
}
