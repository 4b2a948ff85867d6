use std::collections::HashSet;
use thiserror::Error;

/// Opaque handle to a GPU-resident resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GpuHandle(pub u64);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReleaseError {
    #[error("resource {0:?} was already released")]
    AlreadyReleased(GpuHandle),
    #[error("resource {0:?} was never allocated by this backend")]
    Unknown(GpuHandle),
}

/// Seam between the viewer core and whatever actually renders.
///
/// The core only tracks residency: it uploads geometry and textures when a
/// model is installed and disposes them when it is replaced. Vertex layout,
/// pixel formats and draw submission are the engine's business.
pub trait RenderBackend {
    fn upload_geometry(&mut self, vertex_count: usize, index_count: usize) -> GpuHandle;
    fn upload_texture(&mut self, width: u32, height: u32) -> GpuHandle;
    fn dispose_geometry(&mut self, handle: GpuHandle) -> Result<(), ReleaseError>;
    fn dispose_texture(&mut self, handle: GpuHandle) -> Result<(), ReleaseError>;
}

/// Backend that only does the bookkeeping. Used by the inspector binary and
/// by tests that assert on resource lifetimes.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_handle: u64,
    live_geometry: HashSet<GpuHandle>,
    live_textures: HashSet<GpuHandle>,
    pub disposed_geometry: usize,
    pub disposed_textures: usize,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resources currently resident (geometry and textures combined).
    pub fn live_count(&self) -> usize {
        self.live_geometry.len() + self.live_textures.len()
    }

    fn allocate(&mut self) -> GpuHandle {
        self.next_handle += 1;
        GpuHandle(self.next_handle)
    }

    fn check_known(&self, handle: GpuHandle) -> Result<(), ReleaseError> {
        if handle.0 == 0 || handle.0 > self.next_handle {
            Err(ReleaseError::Unknown(handle))
        } else {
            Err(ReleaseError::AlreadyReleased(handle))
        }
    }
}

impl RenderBackend for HeadlessBackend {
    fn upload_geometry(&mut self, _vertex_count: usize, _index_count: usize) -> GpuHandle {
        let handle = self.allocate();
        self.live_geometry.insert(handle);
        handle
    }

    fn upload_texture(&mut self, _width: u32, _height: u32) -> GpuHandle {
        let handle = self.allocate();
        self.live_textures.insert(handle);
        handle
    }

    fn dispose_geometry(&mut self, handle: GpuHandle) -> Result<(), ReleaseError> {
        if self.live_geometry.remove(&handle) {
            self.disposed_geometry += 1;
            Ok(())
        } else {
            self.check_known(handle)
        }
    }

    fn dispose_texture(&mut self, handle: GpuHandle) -> Result<(), ReleaseError> {
        if self.live_textures.remove(&handle) {
            self.disposed_textures += 1;
            Ok(())
        } else {
            self.check_known(handle)
        }
    }
}
