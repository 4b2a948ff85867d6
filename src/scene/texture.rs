use crate::scene::backend::{GpuHandle, RenderBackend};
use log::{debug, warn};
use std::sync::Arc;

/// A 2D texture map: CPU pixel data plus its GPU residency state.
///
/// Pixel data is shared; the GPU handle is per-instance so that clones can
/// be uploaded and released independently.
#[derive(Debug, Clone)]
pub struct Texture {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Raw pixel bytes as delivered by the decoder (layout is owned by the
    /// rendering engine, the viewer core never samples them).
    pub pixels: Arc<Vec<u8>>,
    gpu: Option<GpuHandle>,
}

impl Texture {
    pub fn from_pixels(name: impl Into<String>, width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            pixels: Arc::new(pixels),
            gpu: None,
        }
    }

    pub fn gpu_handle(&self) -> Option<GpuHandle> {
        self.gpu
    }

    /// Mirrors the texture on the GPU. Uploading twice is a no-op.
    pub fn upload(&mut self, backend: &mut dyn RenderBackend) -> GpuHandle {
        *self
            .gpu
            .get_or_insert_with(|| backend.upload_texture(self.width, self.height))
    }

    /// Releases the GPU copy if there is one.
    ///
    /// A texture without a handle is skipped with a debug note; a backend
    /// refusal is logged and swallowed. Neither blocks the caller.
    pub fn release(&mut self, backend: &mut dyn RenderBackend) {
        match self.gpu.take() {
            Some(handle) => {
                if let Err(e) = backend.dispose_texture(handle) {
                    warn!("skipping texture release for '{}': {e}", self.name);
                }
            }
            None => debug!("texture '{}' has no GPU copy to release", self.name),
        }
    }
}
