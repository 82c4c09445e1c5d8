//! Control-plane provider.
//!
//! [`ControlPlane`] owns the entity store and exposes one `handle_*` method
//! per endpoint; the implementations live in the `ops` submodules. The
//! server binary bridges these handlers to the HTTP layer by implementing
//! the `ControlHandler` trait from `stratus-http`.

use crate::store::MetaStore;

/// The metadata control plane: entity store plus operation handlers.
#[derive(Debug, Default)]
pub struct ControlPlane {
    /// Entity tables behind the transactional store.
    pub(crate) store: MetaStore,
}

impl ControlPlane {
    /// Create a control plane with an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
