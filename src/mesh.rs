use crate::error::SceneError;
use crate::S;
use nalgebra::{Point3, Transform3};
use regex::Regex;
use std::fs::File;
use std::io::{prelude::*, BufReader};
use std::path::Path;

/// A triangulated surface: vertex positions plus zero-based vertex
/// index triples.
pub type SurfaceMesh = (Vec<Point3<S>>, Vec<[u32; 3]>);

const FLOAT: &str = r"(-?\d*\.?\d+(?:[eE][-+]?\d+)?)";

/// Loads a surface from a plain text mesh file: one `v x y z` line
/// per vertex, one `f a b c` line per triangle (zero-based indices).
/// Unrecognized lines are skipped.
pub fn load_surface_with_transform(
  path: &Path,
  transform: Option<&Transform3<S>>,
) -> Result<SurfaceMesh, SceneError> {
  let file = File::open(path).map_err(|source| SceneError::Io {
    path: path.to_path_buf(),
    source,
  })?;
  let reader = BufReader::new(file);

  let vertex_re =
    Regex::new(&format!(r"^v +{} +{} +{}", FLOAT, FLOAT, FLOAT)).unwrap();
  let face_re = Regex::new(r"^f +(\d+) +(\d+) +(\d+)").unwrap();

  let malformed = |line| SceneError::MeshParse {
    path: path.to_path_buf(),
    line,
  };

  let mut vertices: Vec<Point3<S>> = Vec::new();
  let mut faces = Vec::new();

  for (idx, line) in reader.lines().enumerate() {
    let line = line.map_err(|source| SceneError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    let line_no = idx + 1;

    if let Some(matchs) = vertex_re.captures(&line) {
      let mut vert = Point3::origin();

      for (i, group) in matchs.iter().skip(1).enumerate() {
        let group = group.ok_or_else(|| malformed(line_no))?;
        vert[i] = group.as_str().parse().map_err(|_| malformed(line_no))?;
      }

      if let Some(transform) = transform {
        vert = transform * vert;
      }

      vertices.push(vert);
    } else if let Some(matchs) = face_re.captures(&line) {
      let mut face = [0u32; 3];

      for (i, group) in matchs.iter().skip(1).enumerate() {
        let group = group.ok_or_else(|| malformed(line_no))?;
        face[i] = group.as_str().parse().map_err(|_| malformed(line_no))?;
      }

      faces.push(face);
    }
  }

  for face in &faces {
    for index in face.iter() {
      if *index as usize >= vertices.len() {
        return Err(SceneError::FaceIndexOutOfRange {
          path: path.to_path_buf(),
          index: *index,
          vertices: vertices.len(),
        });
      }
    }
  }

  Ok((vertices, faces))
}

pub fn load_surface(path: &Path) -> Result<SurfaceMesh, SceneError> {
  load_surface_with_transform(path, None)
}
