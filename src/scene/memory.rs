use crate::bounds::box_corners;
use crate::config::SimulationConfig;
use crate::error::SceneError;
use crate::mesh::{load_surface, SurfaceMesh};
use crate::scene::{SceneObject, SceneSource};
use crate::S;
use nalgebra::{Matrix4, Point3, Rotation3, Transform3, Translation3, Vector3};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Placeholder substituted with the frame number in per-frame mesh
/// filename patterns.
const FRAME_PLACEHOLDER: &str = "{frame}";

/// An in-memory scene object backed by mesh files: a rest surface and
/// an optional per-frame filename pattern for animated geometry.
pub struct MeshObject {
  name: String,
  transform: Transform3<S>,
  rest: SurfaceMesh,
  frame_pattern: Option<(PathBuf, String)>,
  local_min: Point3<S>,
  local_max: Point3<S>,
}

impl MeshObject {
  pub fn new(name: &str, transform: Transform3<S>, rest: SurfaceMesh) -> Self {
    let (local_min, local_max) = local_extent(&rest);

    Self {
      name: name.to_owned(),
      transform,
      rest,
      frame_pattern: None,
      local_min,
      local_max,
    }
  }

  /// Sets a per-frame mesh filename pattern (`{frame}` placeholder),
  /// resolved relative to `dir`.
  pub fn with_frame_pattern(mut self, dir: &Path, pattern: &str) -> Self {
    self.frame_pattern = Some((dir.to_path_buf(), pattern.to_owned()));
    self
  }
}

fn local_extent(surface: &SurfaceMesh) -> (Point3<S>, Point3<S>) {
  let (vertices, _) = surface;

  let mut min = Point3::origin();
  let mut max = Point3::origin();

  for (idx, vert) in vertices.iter().enumerate() {
    if idx == 0 {
      min = *vert;
      max = *vert;
      continue;
    }
    for i in 0..3 {
      min[i] = min[i].min(vert[i]);
      max[i] = max[i].max(vert[i]);
    }
  }

  (min, max)
}

impl SceneObject for MeshObject {
  fn name(&self) -> &str {
    &self.name
  }

  fn world_transform(&self) -> Transform3<S> {
    self.transform
  }

  fn local_bounds(&self) -> [Point3<S>; 8] {
    box_corners(&self.local_min, &self.local_max)
  }

  fn surface_at(&self, frame: Option<i32>) -> Result<SurfaceMesh, SceneError> {
    match (frame, &self.frame_pattern) {
      (Some(frame), Some((dir, pattern))) => {
        let file = pattern.replace(FRAME_PLACEHOLDER, &frame.to_string());
        load_surface(&dir.join(file))
      }
      _ => Ok(self.rest.clone()),
    }
  }
}

/// An ordered collection of `MeshObject`s; insertion order is the
/// order scripts and exports walk the scene in.
#[derive(Default)]
pub struct MemoryScene {
  objects: Vec<MeshObject>,
}

impl MemoryScene {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, object: MeshObject) {
    self.objects.push(object);
  }
}

impl SceneSource for MemoryScene {
  type Object = MeshObject;

  fn object(&self, name: &str) -> Option<&MeshObject> {
    self.objects.iter().find(|o| o.name == name)
  }
}

#[derive(Debug, Deserialize)]
struct SceneDoc {
  tray: Option<String>,
  insertion_volume: Option<String>,
  simulation_volume: Option<String>,
  #[serde(default)]
  moving_objects: Vec<String>,
  #[serde(default)]
  frames: FramesDoc,
  #[serde(default)]
  params: ParamsDoc,
  #[serde(default)]
  objects: Vec<ObjectDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct FramesDoc {
  start: i32,
  end: i32,
  rate: S,
}

impl Default for FramesDoc {
  fn default() -> Self {
    Self {
      start: 1,
      end: 250,
      rate: 250.0,
    }
  }
}

// Defaults mirror the authoring tool's parameter panel.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct ParamsDoc {
  radius: S,
  timestep: S,
  youngs_modulus: S,
  cohesion: S,
  poisson_ratio: S,
}

impl Default for ParamsDoc {
  fn default() -> Self {
    Self {
      radius: 0.001,
      timestep: 1e-6,
      youngs_modulus: 5e7,
      cohesion: 75_000.0,
      poisson_ratio: 0.4,
    }
  }
}

#[derive(Debug, Deserialize)]
struct ObjectDoc {
  name: String,
  mesh: PathBuf,
  frame_meshes: Option<String>,
  #[serde(default)]
  translation: [S; 3],
  #[serde(default)]
  rotation: [S; 3],
  #[serde(default = "unit_scale")]
  scale: [S; 3],
}

fn unit_scale() -> [S; 3] {
  [1.0, 1.0, 1.0]
}

fn object_transform(doc: &ObjectDoc) -> Transform3<S> {
  let translation = Translation3::from(Vector3::from(doc.translation));
  let rotation =
    Rotation3::from_euler_angles(doc.rotation[0], doc.rotation[1], doc.rotation[2]);
  let scaling = Matrix4::new_nonuniform_scaling(&Vector3::from(doc.scale));

  Transform3::from_matrix_unchecked(
    translation.to_homogeneous() * rotation.to_homogeneous() * scaling,
  )
}

/// Reads a scene document and its mesh files into a `MemoryScene`
/// plus the configured `SimulationConfig`. Values are taken verbatim;
/// validation happens downstream at generation time.
pub fn load_scene(
  path: &Path,
) -> Result<(MemoryScene, SimulationConfig), SceneError> {
  let contents = fs::read_to_string(path).map_err(|source| SceneError::Io {
    path: path.to_path_buf(),
    source,
  })?;
  let doc: SceneDoc = toml::from_str(&contents)?;

  let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

  let mut scene = MemoryScene::new();

  for object_doc in &doc.objects {
    if scene.object(&object_doc.name).is_some() {
      return Err(SceneError::DuplicateObject {
        name: object_doc.name.clone(),
      });
    }

    let rest = load_surface(&base_dir.join(&object_doc.mesh))?;
    let mut object =
      MeshObject::new(&object_doc.name, object_transform(object_doc), rest);

    if let Some(pattern) = &object_doc.frame_meshes {
      object = object.with_frame_pattern(base_dir, pattern);
    }

    scene.push(object);
  }

  let config = SimulationConfig {
    moving_objects: doc.moving_objects,
    tray: doc.tray,
    insertion_volume: doc.insertion_volume,
    simulation_volume: doc.simulation_volume,
    radius: doc.params.radius,
    timestep: doc.params.timestep,
    youngs_modulus: doc.params.youngs_modulus,
    cohesion: doc.params.cohesion,
    poisson_ratio: doc.params.poisson_ratio,
    frame_rate: doc.frames.rate,
    frame_start: doc.frames.start,
    frame_end: doc.frames.end,
    deformable: false,
  };

  Ok((scene, config))
}
