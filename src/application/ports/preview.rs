//! Preview handle port interface
//!
//! Preview handles are the object-URL equivalent: a short-lived,
//! externally visible reference to a slot's resource. Every handle
//! acquired must be released exactly once; the lifecycle manager is the
//! only caller.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::media::{MediaResource, SlotId};

/// Preview errors
#[derive(Debug, Clone, Error)]
pub enum PreviewError {
    #[error("Failed to create preview: {0}")]
    CreateFailed(String),
}

/// An acquired preview handle.
/// Opaque to the application; the path is present for file-backed
/// registries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewHandle {
    id: u64,
    path: Option<PathBuf>,
}

impl PreviewHandle {
    /// Create a handle (called by registry implementations)
    pub fn new(id: u64, path: Option<PathBuf>) -> Self {
        Self { id, path }
    }

    /// Registry-scoped handle identity
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Filesystem location of the preview, if file-backed
    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }
}

/// Port for preview handle management
pub trait PreviewRegistry: Send + Sync {
    /// Create a preview for a slot's resource
    fn acquire(
        &self,
        slot: SlotId,
        resource: &MediaResource,
    ) -> Result<PreviewHandle, PreviewError>;

    /// Release a previously acquired handle
    fn release(&self, handle: &PreviewHandle);
}
