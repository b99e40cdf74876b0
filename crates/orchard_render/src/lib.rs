pub mod batch;
pub mod camera;
pub mod gpu_context;
pub mod quad_pipeline;
pub mod vertex;

pub use batch::{QuadBatch, RegionStyle};
pub use camera::{Camera2D, CameraUniform};
pub use gpu_context::{Frame, GpuContext, GpuError};
pub use quad_pipeline::{QuadMesh, QuadPipeline};
pub use vertex::QuadVertex;
