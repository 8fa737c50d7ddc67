pub mod bounds;
pub mod config;
pub mod error;
pub mod export;
pub mod mesh;
pub mod pipeline;
pub mod scene;
pub mod script;

pub use bounds::{timesteps_per_frame, world_bounds, WorldBounds};
pub use config::SimulationConfig;
pub use error::{ConfigError, ExportError, GenerateError, SceneError};
pub use export::{
  export_deformable, export_rigid, export_single, ExportedMeshRef,
};
pub use mesh::{load_surface, load_surface_with_transform, SurfaceMesh};
pub use pipeline::{generate_input_files, GenerationReport};
pub use scene::{load_scene, MemoryScene, MeshObject, SceneObject, SceneSource};

/// Scalar type used throughout.
pub type S = f64;
