use crate::error::{ConfigError, VolumeKind};
use crate::scene::SceneSource;
use crate::S;

/// Snapshot of everything one generation run needs. Built once (from
/// the scene document or by hand), then passed down the pipeline
/// unchanged.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
  /// Moving objects in list order; the order fixes the order of
  /// placement and motion blocks in the run script.
  pub moving_objects: Vec<String>,
  pub tray: Option<String>,
  pub insertion_volume: Option<String>,
  pub simulation_volume: Option<String>,

  pub radius: S,
  pub timestep: S,
  pub youngs_modulus: S,
  pub cohesion: S,
  pub poisson_ratio: S,

  pub frame_rate: S,
  pub frame_start: i32,
  pub frame_end: i32,

  pub deformable: bool,
}

impl SimulationConfig {
  /// Pre-flight check run before any file is written. Material
  /// parameters are passed through verbatim and are deliberately not
  /// range-checked.
  pub fn validate<H: SceneSource>(&self, scene: &H) -> Result<(), ConfigError> {
    let require_present = |name: &str| {
      if scene.object(name).is_none() {
        Err(ConfigError::MissingObject {
          name: name.to_owned(),
        })
      } else {
        Ok(())
      }
    };

    for &(field, kind) in [
      (&self.insertion_volume, VolumeKind::Insertion),
      (&self.simulation_volume, VolumeKind::Simulation),
    ]
    .iter()
    {
      let name = field.as_ref().ok_or(ConfigError::MissingVolume { kind })?;
      require_present(name)?;
    }

    if let Some(tray) = &self.tray {
      require_present(tray)?;
    }

    if self.moving_objects.is_empty() {
      return Err(ConfigError::NoMovingObjects);
    }
    for name in &self.moving_objects {
      require_present(name)?;
    }

    for &(name, value) in [
      ("radius", self.radius),
      ("timestep", self.timestep),
      ("frame_rate", self.frame_rate),
    ]
    .iter()
    {
      if value <= 0.0 {
        return Err(ConfigError::NonPositiveParameter { name, value });
      }
    }

    if self.deformable && self.frame_start > self.frame_end {
      return Err(ConfigError::BadFrameRange {
        start: self.frame_start,
        end: self.frame_end,
      });
    }

    Ok(())
  }
}

#[cfg(test)]
pub(crate) fn test_config() -> SimulationConfig {
  SimulationConfig {
    moving_objects: vec!["a".to_owned()],
    tray: None,
    insertion_volume: Some("ins".to_owned()),
    simulation_volume: Some("dom".to_owned()),
    radius: 0.001,
    timestep: 1e-6,
    youngs_modulus: 5e7,
    cohesion: 75_000.0,
    poisson_ratio: 0.4,
    frame_rate: 250.0,
    frame_start: 1,
    frame_end: 3,
    deformable: false,
  }
}
