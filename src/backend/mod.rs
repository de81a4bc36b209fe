//! Execution backend boundary.
//!
//! The pipeline core only ever calls [`ExecutionBackend::allocate`],
//! [`ExecutionBackend::release`] and [`ExecutionBackend::execute`]. Readback is for export
//! collaborators and tests.

pub(crate) mod cpu;
pub(crate) mod kernel;

use crate::backend::kernel::Kernel;
use crate::foundation::core::Extent;
use crate::foundation::error::SeqResult;

/// Opaque handle to a backend-owned image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub(crate) u32);

impl ImageHandle {
    /// Raw slot index, useful for diagnostics.
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Counters describing backend resource traffic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BackendStats {
    /// Images currently allocated.
    pub live: usize,
    /// Total successful allocations.
    pub allocations: u64,
    /// Total releases.
    pub releases: u64,
    /// Total kernel executions.
    pub executions: u64,
}

/// Image storage and kernel execution used by the pipeline.
pub trait ExecutionBackend {
    /// Allocate a cleared image of the given extent.
    fn allocate(&mut self, extent: Extent) -> SeqResult<ImageHandle>;

    /// Release an image. Releasing an unknown handle is a no-op.
    fn release(&mut self, handle: ImageHandle);

    /// Run `kernel` reading `inputs` and writing `dest`.
    fn execute(&mut self, kernel: &Kernel, inputs: &[ImageHandle], dest: ImageHandle)
    -> SeqResult<()>;

    /// Copy an image back to host memory.
    fn read_back(&self, handle: ImageHandle) -> SeqResult<image::Rgba32FImage>;

    /// Resource counters.
    fn stats(&self) -> BackendStats;
}

/// Available backend kinds.
#[derive(Clone, Copy, Debug)]
pub enum BackendKind {
    /// Linear-float CPU backend powered by `image`.
    Cpu,
}

/// Create a backend implementation.
pub fn create_backend(kind: BackendKind) -> Box<dyn ExecutionBackend> {
    match kind {
        BackendKind::Cpu => Box::new(cpu::CpuBackend::new()),
    }
}
