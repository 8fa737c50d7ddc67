pub mod stl;

pub use stl::write_ascii_stl;

use crate::error::ExportError;
use crate::mesh::SurfaceMesh;
use crate::scene::{SceneObject, SceneSource};
use indicatif::ProgressBar;
use std::fs::{create_dir_all, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// One mesh file the exporter actually wrote. The run-script emitter
/// only references filenames present in this list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedMeshRef {
  pub object: String,
  pub frame: Option<i32>,
  pub path: PathBuf,
}

/// `<object>.stl`, or `<object>_<frame>.stl` for per-frame snapshots.
pub fn mesh_filename(object: &str, frame: Option<i32>) -> String {
  match frame {
    Some(frame) => format!("{}_{}.stl", object, frame),
    None => format!("{}.stl", object),
  }
}

fn ensure_output_dir(dir: &Path) -> Result<(), ExportError> {
  create_dir_all(dir).map_err(|source| ExportError::CreateDir {
    path: dir.to_path_buf(),
    source,
  })
}

fn resolve<'a, H: SceneSource>(
  scene: &'a H,
  name: &str,
) -> Result<&'a H::Object, ExportError> {
  scene.object(name).ok_or_else(|| ExportError::UnknownObject {
    name: name.to_owned(),
  })
}

/// Object surface at `frame`, moved into world space.
fn world_surface(
  object: &impl SceneObject,
  frame: Option<i32>,
) -> Result<SurfaceMesh, ExportError> {
  let (vertices, faces) =
    object.surface_at(frame).map_err(|source| ExportError::Geometry {
      object: object.name().to_owned(),
      frame,
      source,
    })?;

  let transform = object.world_transform();
  let vertices = vertices.into_iter().map(|v| transform * v).collect();

  Ok((vertices, faces))
}

fn write_stl_file(
  path: &Path,
  solid_name: &str,
  surfaces: &[SurfaceMesh],
) -> Result<(), ExportError> {
  let as_write_err = |source| ExportError::Write {
    path: path.to_path_buf(),
    source,
  };

  let file = File::create(path).map_err(&as_write_err)?;
  let mut writer = BufWriter::new(file);
  write_ascii_stl(&mut writer, solid_name, surfaces).map_err(&as_write_err)?;
  writer.into_inner().map_err(|e| as_write_err(e.into_error()))?;

  Ok(())
}

fn export_one<H: SceneSource>(
  scene: &H,
  output_dir: &Path,
  name: &str,
  frame: Option<i32>,
) -> Result<ExportedMeshRef, ExportError> {
  let object = resolve(scene, name)?;
  let surface = world_surface(object, frame)?;
  let path = output_dir.join(mesh_filename(name, frame));

  write_stl_file(&path, name, &[surface])?;

  Ok(ExportedMeshRef {
    object: name.to_owned(),
    frame,
    path,
  })
}

/// Rigid export: one file per object, rest geometry, no frame suffix.
pub fn export_rigid<H: SceneSource>(
  scene: &H,
  output_dir: &Path,
  objects: &[String],
) -> Result<Vec<ExportedMeshRef>, ExportError> {
  ensure_output_dir(output_dir)?;

  objects
    .iter()
    .map(|name| export_one(scene, output_dir, name, None))
    .collect()
}

/// Deformable export: one file per object per frame over the
/// inclusive range, frames ascending, objects in list order within a
/// frame. Checks `cancel` between frames; a cancelled or failed run
/// aborts immediately since a partial file set is not a valid
/// simulator input.
pub fn export_deformable<H: SceneSource>(
  scene: &H,
  output_dir: &Path,
  objects: &[String],
  frame_start: i32,
  frame_end: i32,
  cancel: &AtomicBool,
  progress: Option<&ProgressBar>,
) -> Result<Vec<ExportedMeshRef>, ExportError> {
  ensure_output_dir(output_dir)?;

  let mut refs = Vec::new();

  for frame in frame_start..=frame_end {
    if cancel.load(Ordering::Relaxed) {
      return Err(ExportError::Cancelled);
    }

    for name in objects {
      refs.push(export_one(scene, output_dir, name, Some(frame))?);
    }

    if let Some(progress) = progress {
      progress.inc(1);
    }
  }

  Ok(refs)
}

/// Writes the union of the given objects' geometry into a single
/// file (the tray export).
pub fn export_single<H: SceneSource>(
  scene: &H,
  path: &Path,
  objects: &[String],
) -> Result<(), ExportError> {
  let surfaces = objects
    .iter()
    .map(|name| {
      let object = resolve(scene, name)?;
      world_surface(object, None)
    })
    .collect::<Result<Vec<_>, _>>()?;

  write_stl_file(path, "tray", &surfaces)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::scene::fixtures::{box_surface, scene_of};
  use crate::scene::{MemoryScene, MeshObject};
  use nalgebra::Transform3;
  use std::fs;

  fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| (*n).to_owned()).collect()
  }

  #[test]
  fn rigid_export_one_file_per_object() {
    let scene = scene_of(&["a", "b"]);
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");

    let refs = export_rigid(&scene, &out, &names(&["a", "b"])).unwrap();

    assert_eq!(refs.len(), 2);
    assert_eq!(refs[0].object, "a");
    assert_eq!(refs[0].frame, None);
    assert!(out.join("a.stl").is_file());
    assert!(out.join("b.stl").is_file());
  }

  #[test]
  fn rigid_export_unknown_object() {
    let scene = scene_of(&["a"]);
    let dir = tempfile::tempdir().unwrap();

    assert!(matches!(
      export_rigid(&scene, dir.path(), &names(&["ghost"])),
      Err(ExportError::UnknownObject { .. })
    ));
  }

  #[test]
  fn deformable_export_per_frame_files() {
    let scene = scene_of(&["a"]);
    let dir = tempfile::tempdir().unwrap();
    let cancel = AtomicBool::new(false);

    let refs = export_deformable(
      &scene,
      dir.path(),
      &names(&["a"]),
      1,
      3,
      &cancel,
      None,
    )
    .unwrap();

    assert_eq!(refs.len(), 3);
    let files: Vec<_> = refs
      .iter()
      .map(|r| r.path.file_name().unwrap().to_str().unwrap().to_owned())
      .collect();
    assert_eq!(files, vec!["a_1.stl", "a_2.stl", "a_3.stl"]);
  }

  #[test]
  fn degenerate_single_frame_range_matches_rigid_count() {
    let scene = scene_of(&["a", "b"]);
    let dir = tempfile::tempdir().unwrap();
    let cancel = AtomicBool::new(false);

    let refs = export_deformable(
      &scene,
      dir.path(),
      &names(&["a", "b"]),
      5,
      5,
      &cancel,
      None,
    )
    .unwrap();

    assert_eq!(refs.len(), 2);
    assert!(dir.path().join("a_5.stl").is_file());
    assert!(dir.path().join("b_5.stl").is_file());
  }

  #[test]
  fn cancellation_stops_before_first_frame() {
    let scene = scene_of(&["a"]);
    let dir = tempfile::tempdir().unwrap();
    let cancel = AtomicBool::new(true);

    let result = export_deformable(
      &scene,
      dir.path(),
      &names(&["a"]),
      1,
      100,
      &cancel,
      None,
    );

    assert!(matches!(result, Err(ExportError::Cancelled)));
    assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
  }

  #[test]
  fn failed_frame_aborts_export() {
    // an object with a frame pattern but no files behind it
    let missing_dir = tempfile::tempdir().unwrap();
    let object = MeshObject::new(
      "a",
      Transform3::identity(),
      box_surface([0.0; 3], [1.0; 3]),
    )
    .with_frame_pattern(missing_dir.path(), "a_{frame}.mesh");

    let mut scene = MemoryScene::new();
    scene.push(object);

    let dir = tempfile::tempdir().unwrap();
    let cancel = AtomicBool::new(false);

    let result = export_deformable(
      &scene,
      dir.path(),
      &names(&["a"]),
      1,
      2,
      &cancel,
      None,
    );

    match result {
      Err(ExportError::Geometry { object, frame, .. }) => {
        assert_eq!(object, "a");
        assert_eq!(frame, Some(1));
      }
      other => panic!("expected geometry error, got {:?}", other),
    }
  }

  #[test]
  fn single_export_unions_objects() {
    let scene = scene_of(&["a", "b"]);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("simtray.stl");

    export_single(&scene, &path, &names(&["a", "b"])).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.matches("facet normal").count(), 4);
    assert!(text.starts_with("solid tray\n"));
  }

  #[test]
  fn world_transform_applied_to_exported_vertices() {
    let mut scene = MemoryScene::new();
    let transform = Transform3::from_matrix_unchecked(
      nalgebra::Translation3::new(10.0, 0.0, 0.0).to_homogeneous(),
    );
    scene.push(MeshObject::new(
      "a",
      transform,
      box_surface([0.0; 3], [1.0; 3]),
    ));

    let dir = tempfile::tempdir().unwrap();
    export_rigid(&scene, dir.path(), &names(&["a"])).unwrap();

    let text = fs::read_to_string(dir.path().join("a.stl")).unwrap();
    assert!(text.contains("vertex 1.000000e1"));
  }
}
