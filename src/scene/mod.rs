pub mod memory;

pub use memory::{load_scene, MemoryScene, MeshObject};

use crate::error::SceneError;
use crate::mesh::SurfaceMesh;
use crate::S;
use nalgebra::{Point3, Transform3};

/// One host object, queried per frame. Geometry is returned in local
/// space; callers apply `world_transform` themselves.
pub trait SceneObject {
  fn name(&self) -> &str;

  fn world_transform(&self) -> Transform3<S>;

  /// The 8 corners of the local-space bounding box.
  fn local_bounds(&self) -> [Point3<S>; 8];

  /// Triangulated surface as of the given frame. `None` asks for the
  /// rest (un-animated) geometry and is what rigid export uses; frame
  /// selection is an explicit parameter, there is no scene-wide
  /// current-frame cursor to advance or restore.
  fn surface_at(&self, frame: Option<i32>) -> Result<SurfaceMesh, SceneError>;
}

/// The host scene seen as a read-only snapshot.
pub trait SceneSource {
  type Object: SceneObject;

  fn object(&self, name: &str) -> Option<&Self::Object>;
}
