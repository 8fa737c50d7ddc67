use crate::bounds::{timesteps_per_frame, world_bounds, WorldBounds};
use crate::config::SimulationConfig;
use crate::error::{ConfigError, GenerateError, VolumeKind};
use crate::export::{export_deformable, export_rigid, export_single};
use crate::scene::SceneSource;
use crate::script::{
  write_run_script, write_setup_script, RUN_FILENAME, SETUP_FILENAME,
  TRAY_FILENAME,
};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

/// Summary of one completed generation run.
#[derive(Debug)]
pub struct GenerationReport {
  pub output_dir: PathBuf,
  /// STL files written, tray included.
  pub mesh_files: usize,
  pub timesteps_per_frame: u64,
}

fn volume_bounds<H: SceneSource>(
  scene: &H,
  name: &Option<String>,
  kind: VolumeKind,
) -> Result<WorldBounds, ConfigError> {
  let name = name.as_ref().ok_or(ConfigError::MissingVolume { kind })?;
  let object = scene.object(name).ok_or_else(|| ConfigError::MissingObject {
    name: name.clone(),
  })?;

  Ok(world_bounds(object))
}

/// Runs the whole pipeline once: validate, export meshes (and the
/// tray), compute volume bounds and the step schedule, write the two
/// decks. Everything that can be rejected without touching the
/// filesystem is checked up front.
pub fn generate_input_files<H: SceneSource>(
  scene: &H,
  config: &SimulationConfig,
  output_dir: &Path,
  cancel: &AtomicBool,
  progress: Option<&ProgressBar>,
) -> Result<GenerationReport, GenerateError> {
  config.validate(scene)?;

  let steps_per_frame =
    timesteps_per_frame(config.frame_rate, config.timestep)?;
  let sim =
    volume_bounds(scene, &config.simulation_volume, VolumeKind::Simulation)?;
  let ins =
    volume_bounds(scene, &config.insertion_volume, VolumeKind::Insertion)?;

  let refs = if config.deformable {
    export_deformable(
      scene,
      output_dir,
      &config.moving_objects,
      config.frame_start,
      config.frame_end,
      cancel,
      progress,
    )?
  } else {
    export_rigid(scene, output_dir, &config.moving_objects)?
  };

  let mut mesh_files = refs.len();

  if let Some(tray) = &config.tray {
    export_single(
      scene,
      &output_dir.join(TRAY_FILENAME),
      std::slice::from_ref(tray),
    )?;
    mesh_files += 1;
  }

  write_setup_script(&output_dir.join(SETUP_FILENAME), config, &sim, &ins)?;
  write_run_script(
    &output_dir.join(RUN_FILENAME),
    config,
    steps_per_frame,
    &refs,
  )?;

  Ok(GenerationReport {
    output_dir: output_dir.to_path_buf(),
    mesh_files,
    timesteps_per_frame: steps_per_frame,
  })
}
