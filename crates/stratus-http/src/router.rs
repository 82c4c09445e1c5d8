//! Control-plane request router.
//!
//! Every endpoint is a fixed method + path pair (`POST /start_upload`,
//! `PATCH /complete_upload`, ...), so routing is a single lookup on
//! [`Operation`]; there is no query-string or virtual-host parsing.

use stratus_model::{ControlError, Operation};

/// Resolve a control-plane operation from an HTTP request line.
pub fn resolve_operation(
    method: &http::Method,
    path: &str,
) -> Result<Operation, ControlError> {
    Operation::resolve(method, path)
        .ok_or_else(|| ControlError::not_found(format!("no operation at {method} {path}")))
}
