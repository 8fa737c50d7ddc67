use crate::error::ConfigError;
use crate::scene::SceneObject;
use crate::S;
use nalgebra::Point3;

/// Axis-aligned world-space box. `min <= max` componentwise by
/// construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
  pub min: Point3<S>,
  pub max: Point3<S>,
}

/// The 8 corners of the box spanned by `min` and `max`.
pub fn box_corners(min: &Point3<S>, max: &Point3<S>) -> [Point3<S>; 8] {
  let mut corners = [*min; 8];

  for (idx, corner) in corners.iter_mut().enumerate() {
    for axis in 0..3 {
      if idx & (1 << axis) != 0 {
        corner[axis] = max[axis];
      }
    }
  }

  corners
}

/// World-space bounding box of an object: its 8 local bounding-box
/// corners pushed through the world transform, then componentwise
/// min/max.
pub fn world_bounds(object: &impl SceneObject) -> WorldBounds {
  let transform = object.world_transform();
  let corners = object.local_bounds();

  let mut min = transform * corners[0];
  let mut max = min;

  for corner in corners[1..].iter() {
    let world = transform * *corner;
    for i in 0..3 {
      min[i] = min[i].min(world[i]);
      max[i] = max[i].max(world[i]);
    }
  }

  WorldBounds { min, max }
}

/// Whole simulation timesteps elapsing per rendered frame:
/// `(1 / frame_rate) / timestep`, truncated toward zero. The
/// fractional remainder is dropped each frame with no carry,
/// matching the original scheduling.
pub fn timesteps_per_frame(frame_rate: S, timestep: S) -> Result<u64, ConfigError> {
  if frame_rate <= 0.0 {
    return Err(ConfigError::NonPositiveParameter {
      name: "frame_rate",
      value: frame_rate,
    });
  }
  if timestep <= 0.0 {
    return Err(ConfigError::NonPositiveParameter {
      name: "timestep",
      value: timestep,
    });
  }

  Ok(((1.0 / frame_rate) / timestep) as u64)
}
