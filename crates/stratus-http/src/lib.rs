//! HTTP service layer for the Stratus metadata control plane.
//!
//! Routing is trivial by design: every endpoint is a fixed method + path
//! pair carrying a JSON body, so the router is a single match over
//! [`stratus_model::Operation`]. The interesting pieces are the
//! [`dispatch::ControlHandler`] trait that the server binary implements to
//! bridge operations to `stratus-core`, and the error serialization that
//! maps [`stratus_model::ControlError`] kinds to status codes.

pub mod body;
pub mod dispatch;
pub mod response;
pub mod router;
pub mod service;
