//! Temp-file preview registry
//!
//! Materializes each slot resource as a named temp file so external
//! viewers/players can open it. Files live exactly as long as their
//! handle: release drops the backing NamedTempFile, which removes the
//! file from disk.

use std::collections::HashMap;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tempfile::{Builder, NamedTempFile};

use crate::application::ports::{PreviewError, PreviewHandle, PreviewRegistry};
use crate::domain::media::{MediaResource, SlotId};

/// File-backed preview registry
pub struct TempFilePreviewRegistry {
    next_id: AtomicU64,
    files: Mutex<HashMap<u64, NamedTempFile>>,
}

impl TempFilePreviewRegistry {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            files: Mutex::new(HashMap::new()),
        }
    }

    /// Number of live preview files (for teardown checks)
    pub fn live_count(&self) -> usize {
        self.files.lock().map(|files| files.len()).unwrap_or(0)
    }
}

impl Default for TempFilePreviewRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewRegistry for TempFilePreviewRegistry {
    fn acquire(
        &self,
        slot: SlotId,
        resource: &MediaResource,
    ) -> Result<PreviewHandle, PreviewError> {
        let mut file = Builder::new()
            .prefix(&format!("preview-{}-", slot))
            .suffix(&format!(".{}", resource.mime_type().extension()))
            .tempfile()
            .map_err(|e| PreviewError::CreateFailed(e.to_string()))?;

        file.write_all(resource.data())
            .map_err(|e| PreviewError::CreateFailed(e.to_string()))?;
        file.flush()
            .map_err(|e| PreviewError::CreateFailed(e.to_string()))?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let path = file.path().to_path_buf();

        let mut files = self
            .files
            .lock()
            .map_err(|_| PreviewError::CreateFailed("Registry lock poisoned".to_string()))?;
        files.insert(id, file);

        Ok(PreviewHandle::new(id, Some(path)))
    }

    fn release(&self, handle: &PreviewHandle) {
        // Dropping the NamedTempFile deletes the file
        if let Ok(mut files) = self.files.lock() {
            files.remove(&handle.id());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::media::MediaMimeType;

    fn resource() -> MediaResource {
        MediaResource::with_filename(vec![1, 2, 3, 4], MediaMimeType::Png, "cat.png")
    }

    #[test]
    fn acquire_writes_resource_to_disk() {
        let registry = TempFilePreviewRegistry::new();
        let handle = registry.acquire(SlotId::Image, &resource()).unwrap();

        let path = handle.path().unwrap();
        assert!(path.exists());
        assert_eq!(std::fs::read(path).unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(path.extension().unwrap(), "png");
    }

    #[test]
    fn release_removes_file() {
        let registry = TempFilePreviewRegistry::new();
        let handle = registry.acquire(SlotId::Image, &resource()).unwrap();
        let path = handle.path().unwrap().clone();

        registry.release(&handle);
        assert!(!path.exists());
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn release_unknown_handle_is_noop() {
        let registry = TempFilePreviewRegistry::new();
        registry.release(&PreviewHandle::new(999, None));
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn handles_get_distinct_ids() {
        let registry = TempFilePreviewRegistry::new();
        let a = registry.acquire(SlotId::Image, &resource()).unwrap();
        let b = registry.acquire(SlotId::UploadedAudio, &resource()).unwrap();

        assert_ne!(a.id(), b.id());
        assert_eq!(registry.live_count(), 2);
    }
}
