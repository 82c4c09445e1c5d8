//! Control handler trait and operation dispatch.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;

use stratus_model::{ControlError, Operation};

use crate::body::ControlResponseBody;

/// Trait the control-plane business logic provider implements.
///
/// The handler receives the resolved operation and the raw JSON body bytes
/// and returns a complete HTTP response. This is the boundary between the
/// transport and `stratus-core`.
pub trait ControlHandler: Send + Sync + 'static {
    /// Handle one control-plane operation and produce an HTTP response.
    fn handle_operation(
        &self,
        op: Operation,
        body: Bytes,
    ) -> Pin<
        Box<
            dyn Future<Output = Result<http::Response<ControlResponseBody>, ControlError>> + Send,
        >,
    >;
}

/// Dispatch an operation to the handler.
pub async fn dispatch_operation<H: ControlHandler>(
    handler: &H,
    op: Operation,
    body: Bytes,
) -> Result<http::Response<ControlResponseBody>, ControlError> {
    tracing::debug!(operation = %op, "dispatching control-plane operation");
    handler.handle_operation(op, body).await
}

/// Default handler that rejects every operation.
#[derive(Debug, Clone, Default)]
pub struct NotImplementedHandler;

impl ControlHandler for NotImplementedHandler {
    fn handle_operation(
        &self,
        op: Operation,
        _body: Bytes,
    ) -> Pin<
        Box<
            dyn Future<Output = Result<http::Response<ControlResponseBody>, ControlError>> + Send,
        >,
    > {
        Box::pin(async move {
            Err(ControlError::invalid_request(format!(
                "operation {op} is not implemented",
            )))
        })
    }
}
