//! Operation handler implementation for [`ControlPlane`].
//!
//! Bridges the HTTP layer (`stratus-http`) with the business logic
//! (`stratus-core`) by implementing the [`ControlHandler`] trait: each
//! operation deserializes its JSON body, calls the matching `handle_*`
//! method, and serializes the result.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use stratus_core::ControlPlane;
use stratus_http::body::ControlResponseBody;
use stratus_http::dispatch::ControlHandler;
use stratus_http::response::{empty_response, json_response};
use stratus_model::{ControlError, Operation};

/// Wrapper that implements [`ControlHandler`] by delegating to
/// [`ControlPlane`] handler methods.
#[derive(Debug, Clone)]
pub struct StratusHandler(pub Arc<ControlPlane>);

/// Deserialize a JSON request body, mapping failures to a 400.
fn parse<T: DeserializeOwned>(body: &Bytes) -> Result<T, ControlError> {
    serde_json::from_slice(body)
        .map_err(|e| ControlError::invalid_request(format!("malformed request body: {e}")))
}

impl ControlHandler for StratusHandler {
    fn handle_operation(
        &self,
        op: Operation,
        body: Bytes,
    ) -> Pin<
        Box<
            dyn Future<Output = Result<http::Response<ControlResponseBody>, ControlError>> + Send,
        >,
    > {
        let plane = Arc::clone(&self.0);
        Box::pin(async move {
            match op {
                // Upload protocol
                Operation::StartUpload => {
                    json_response(&plane.handle_start_upload(parse(&body)?)?)
                }
                Operation::CompleteUpload => {
                    plane.handle_complete_upload(parse(&body)?)?;
                    Ok(empty_response())
                }
                Operation::SetMultipartId => {
                    plane.handle_set_multipart_id(parse(&body)?)?;
                    Ok(empty_response())
                }
                Operation::AppendPart => {
                    plane.handle_append_part(parse(&body)?)?;
                    Ok(empty_response())
                }
                Operation::ContinueUpload => {
                    json_response(&plane.handle_continue_upload(parse(&body)?)?)
                }

                // Delete protocol
                Operation::StartDeleteObjects => {
                    json_response(&plane.handle_start_delete_objects(parse(&body)?)?)
                }
                Operation::CompleteDeleteObjects => {
                    plane.handle_complete_delete_objects(parse(&body)?)?;
                    Ok(empty_response())
                }

                // Read paths
                Operation::LocateObject => {
                    json_response(&plane.handle_locate_object(parse(&body)?)?)
                }
                Operation::HeadObject => {
                    json_response(&plane.handle_head_object(parse(&body)?)?)
                }
                Operation::StartWarmup => {
                    json_response(&plane.handle_start_warmup(parse(&body)?)?)
                }
                Operation::LocateObjectStatus => {
                    json_response(&plane.handle_locate_object_status(parse(&body)?)?)
                }
                Operation::ListObjects => {
                    json_response(&plane.handle_list_objects(parse(&body)?)?)
                }
                Operation::ListObjectsVersioning => {
                    json_response(&plane.handle_list_objects_versioning(parse(&body)?)?)
                }
                Operation::ListMultipartUploads => {
                    json_response(&plane.handle_list_multipart_uploads(parse(&body)?)?)
                }
                Operation::ListParts => {
                    json_response(&plane.handle_list_parts(parse(&body)?)?)
                }

                // Metrics sink
                Operation::RecordMetrics => {
                    plane.handle_record_metrics(parse(&body)?)?;
                    Ok(empty_response())
                }
                Operation::ListMetrics => {
                    json_response(&plane.handle_list_metrics(parse(&body)?)?)
                }

                // Provisioning surface
                Operation::RegisterBucket => {
                    plane.handle_register_bucket(parse(&body)?)?;
                    Ok(empty_response())
                }
                Operation::SetVersioning => {
                    plane.handle_set_versioning(parse(&body)?)?;
                    Ok(empty_response())
                }

                Operation::Health => json_response(&serde_json::json!({"status": "ok"})),
            }
        })
    }
}
