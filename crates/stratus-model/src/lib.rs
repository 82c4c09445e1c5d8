//! Wire types for the Stratus metadata control plane.
//!
//! Every request and response body exchanged between the data-plane proxy
//! and the control plane lives here, together with the shared enums
//! ([`Status`], [`VersioningState`], [`PlacementPolicy`], [`DeleteOpType`]),
//! the [`ControlError`] type that maps error kinds to HTTP status codes,
//! and the [`Operation`] enum the HTTP router dispatches on.
//!
//! The control plane never carries object bytes. Clients call it to learn
//! *where* to read or write, then report back what the backing cloud did;
//! the types in this crate are that conversation.

pub mod error;
pub mod operations;
pub mod request;
pub mod response;
pub mod types;

pub use error::ControlError;
pub use operations::Operation;
pub use types::{DeleteOpType, PlacementPolicy, Status, VersioningState};
