//! Resource lifecycle manager
//!
//! Owns the three input slots and pairs every preview acquire with
//! exactly one release. All resource replacement and teardown flows
//! through this one code path.

use std::sync::Arc;

use crate::domain::media::{MediaResource, SlotId};

use super::ports::{PreviewError, PreviewHandle, PreviewRegistry};

/// One slot: optional resource plus optional preview handle.
/// Invariant: a preview handle exists only while a resource does.
#[derive(Debug, Default)]
struct SlotEntry {
    resource: Option<MediaResource>,
    preview: Option<PreviewHandle>,
}

/// Manages transient resources for all input slots.
pub struct ResourceLifecycle {
    registry: Arc<dyn PreviewRegistry>,
    recorded_audio: SlotEntry,
    uploaded_audio: SlotEntry,
    image: SlotEntry,
}

impl ResourceLifecycle {
    /// Create a lifecycle manager backed by the given preview registry
    pub fn new(registry: Arc<dyn PreviewRegistry>) -> Self {
        Self {
            registry,
            recorded_audio: SlotEntry::default(),
            uploaded_audio: SlotEntry::default(),
            image: SlotEntry::default(),
        }
    }

    fn entry(&self, slot: SlotId) -> &SlotEntry {
        match slot {
            SlotId::RecordedAudio => &self.recorded_audio,
            SlotId::UploadedAudio => &self.uploaded_audio,
            SlotId::Image => &self.image,
        }
    }

    fn entry_mut(&mut self, slot: SlotId) -> &mut SlotEntry {
        match slot {
            SlotId::RecordedAudio => &mut self.recorded_audio,
            SlotId::UploadedAudio => &mut self.uploaded_audio,
            SlotId::Image => &mut self.image,
        }
    }

    /// Store a new resource in a slot.
    /// Releases the previous preview handle first, then acquires a fresh
    /// one for the new resource.
    pub fn set_resource(
        &mut self,
        slot: SlotId,
        resource: MediaResource,
    ) -> Result<(), PreviewError> {
        self.release_preview(slot);

        let handle = self.registry.acquire(slot, &resource)?;
        let entry = self.entry_mut(slot);
        entry.resource = Some(resource);
        entry.preview = Some(handle);
        Ok(())
    }

    /// Empty a slot, releasing its preview handle.
    pub fn clear(&mut self, slot: SlotId) {
        self.release_preview(slot);
        self.entry_mut(slot).resource = None;
    }

    /// Empty all slots (full application reset).
    pub fn reset(&mut self) {
        for slot in SlotId::ALL {
            self.clear(slot);
        }
    }

    /// Current resource in a slot, if any
    pub fn resource(&self, slot: SlotId) -> Option<&MediaResource> {
        self.entry(slot).resource.as_ref()
    }

    /// Current preview handle for a slot, if any
    pub fn preview(&self, slot: SlotId) -> Option<&PreviewHandle> {
        self.entry(slot).preview.as_ref()
    }

    /// Whether a slot holds a resource
    pub fn is_occupied(&self, slot: SlotId) -> bool {
        self.entry(slot).resource.is_some()
    }

    fn release_preview(&mut self, slot: SlotId) {
        if let Some(handle) = self.entry_mut(slot).preview.take() {
            self.registry.release(&handle);
        }
    }
}
