use crate::config::SimulationConfig;
use crate::error::GenerateError;
use crate::export::{mesh_filename, ExportedMeshRef};
use crate::script::{SETUP_FILENAME, TRAY_FILENAME};
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// LIGGGHTS fix ids must be plain identifiers; object names are not.
fn fix_id(name: &str) -> String {
  let mut id = String::with_capacity(name.len() + 2);
  id.push_str("m_");
  for c in name.chars() {
    id.push(if c.is_ascii_alphanumeric() { c } else { '_' });
  }
  id
}

/// Every `(object, frame)` mesh reference the run deck will emit.
fn required_refs(config: &SimulationConfig) -> Vec<(String, Option<i32>)> {
  let mut required = Vec::new();

  if config.deformable {
    for frame in config.frame_start..=config.frame_end {
      for object in &config.moving_objects {
        required.push((object.clone(), Some(frame)));
      }
    }
  } else {
    for object in &config.moving_objects {
      required.push((object.clone(), None));
    }
  }

  required
}

fn emit_wall_fix<W: Write>(
  writer: &mut W,
  config: &SimulationConfig,
) -> io::Result<()> {
  let mut meshes = Vec::new();
  if config.tray.is_some() {
    meshes.push("tray".to_owned());
  }
  meshes.extend(config.moving_objects.iter().map(|o| fix_id(o)));

  writeln!(
    writer,
    "fix  walls all wall/gran model hertz tangential history mesh n_meshes {} meshes {}",
    meshes.len(),
    meshes.join(" ")
  )
}

fn emit_mesh_fix<W: Write>(
  writer: &mut W,
  object: &str,
  frame: Option<i32>,
) -> io::Result<()> {
  writeln!(
    writer,
    "fix  {} all mesh/surface file {} type 2",
    fix_id(object),
    mesh_filename(object, frame)
  )
}

/// Emits the run deck. Rigid mode places each moving object's mesh
/// once; deformable mode swaps every object's mesh to the next
/// frame's snapshot after each `run timesteps_per_frame` block, so
/// the total stepped is `timesteps_per_frame * (frame_end -
/// frame_start)` in both modes.
pub fn emit_run<W: Write>(
  writer: &mut W,
  config: &SimulationConfig,
  timesteps_per_frame: u64,
) -> io::Result<()> {
  writeln!(writer, "# LIGGGHTS run deck (generated)")?;
  writeln!(writer, "include {}", SETUP_FILENAME)?;
  writeln!(writer)?;

  if config.tray.is_some() {
    writeln!(
      writer,
      "fix  tray all mesh/surface file {} type 2",
      TRAY_FILENAME
    )?;
  }

  let initial_frame = if config.deformable {
    Some(config.frame_start)
  } else {
    None
  };

  for object in &config.moving_objects {
    emit_mesh_fix(writer, object, initial_frame)?;
  }
  emit_wall_fix(writer, config)?;
  writeln!(writer)?;

  let frame_span = (config.frame_end - config.frame_start).max(0) as u64;

  if config.deformable {
    for frame in config.frame_start..config.frame_end {
      let next = frame + 1;
      writeln!(writer, "# frame {} -> {}", frame, next)?;
      writeln!(writer, "run             {}", timesteps_per_frame)?;
      writeln!(writer, "unfix  walls")?;
      for object in &config.moving_objects {
        writeln!(writer, "unfix  {}", fix_id(object))?;
        emit_mesh_fix(writer, object, Some(next))?;
      }
      emit_wall_fix(writer, config)?;
    }
  } else {
    writeln!(writer, "run             {}", timesteps_per_frame * frame_span)?;
  }

  Ok(())
}

/// Writes the run deck to `path`, first checking that every mesh
/// file the deck will reference was actually produced by the
/// exporter.
pub fn write_run_script(
  path: &Path,
  config: &SimulationConfig,
  timesteps_per_frame: u64,
  refs: &[ExportedMeshRef],
) -> Result<(), GenerateError> {
  let produced: HashSet<(&str, Option<i32>)> =
    refs.iter().map(|r| (r.object.as_str(), r.frame)).collect();

  for (object, frame) in required_refs(config) {
    if !produced.contains(&(object.as_str(), frame)) {
      return Err(GenerateError::Inconsistent { object, frame });
    }
  }

  let as_write_err = |source| GenerateError::Write {
    path: path.to_path_buf(),
    source,
  };

  let file = File::create(path).map_err(&as_write_err)?;
  let mut writer = BufWriter::new(file);
  emit_run(&mut writer, config, timesteps_per_frame).map_err(&as_write_err)?;
  writer.into_inner().map_err(|e| as_write_err(e.into_error()))?;

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::test_config;
  use std::path::PathBuf;

  fn refs_for(config: &SimulationConfig) -> Vec<ExportedMeshRef> {
    required_refs(config)
      .into_iter()
      .map(|(object, frame)| {
        let path = PathBuf::from(mesh_filename(&object, frame));
        ExportedMeshRef {
          object,
          frame,
          path,
        }
      })
      .collect()
  }

  fn render(config: &SimulationConfig, timesteps_per_frame: u64) -> String {
    let mut out = Vec::new();
    emit_run(&mut out, config, timesteps_per_frame).unwrap();
    String::from_utf8(out).unwrap()
  }

  #[test]
  fn rigid_mode_places_objects_once_in_order() {
    let mut config = test_config();
    config.moving_objects = vec!["A".to_owned(), "B".to_owned()];
    config.tray = Some("tray".to_owned());

    let text = render(&config, 4000);

    assert_eq!(text.matches("simtray.stl").count(), 1);
    assert_eq!(text.matches("file A.stl").count(), 1);
    assert_eq!(text.matches("file B.stl").count(), 1);
    assert!(text.find("file A.stl").unwrap() < text.find("file B.stl").unwrap());

    // frames 1..3, 4000 steps per frame
    assert!(text.contains("run             8000"));
  }

  #[test]
  fn rigid_mode_without_tray() {
    let text = render(&test_config(), 4000);

    assert!(!text.contains("simtray.stl"));
    assert!(text.contains("n_meshes 1 meshes m_a"));
  }

  #[test]
  fn deformable_schedule_shape() {
    let mut config = test_config();
    config.moving_objects = vec!["A".to_owned()];
    config.deformable = true;

    let text = render(&config, 4000);

    // frames [1, 3]: two transitions, each gated at 4000 steps
    assert_eq!(text.matches("run             4000").count(), 2);
    assert!(text.contains("# frame 1 -> 2"));
    assert!(text.contains("# frame 2 -> 3"));
    assert_eq!(text.matches("file A_1.stl").count(), 1);
    assert_eq!(text.matches("file A_2.stl").count(), 1);
    assert_eq!(text.matches("file A_3.stl").count(), 1);
    assert!(
      text.find("file A_1.stl").unwrap() < text.find("file A_2.stl").unwrap()
    );
    assert!(
      text.find("file A_2.stl").unwrap() < text.find("file A_3.stl").unwrap()
    );
  }

  #[test]
  fn degenerate_single_frame_has_no_transitions() {
    let mut config = test_config();
    config.deformable = true;
    config.frame_start = 4;
    config.frame_end = 4;

    let text = render(&config, 4000);

    assert!(!text.contains("# frame"));
    assert!(text.contains("file a_4.stl"));
    assert_eq!(text.matches("run").count(), 1); // the "# LIGGGHTS run deck" header
  }

  #[test]
  fn fix_ids_are_sanitized() {
    assert_eq!(fix_id("Blade.001"), "m_Blade_001");
    assert_eq!(fix_id("my object"), "m_my_object");
  }

  #[test]
  fn missing_ref_is_inconsistent_state() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config();
    config.deformable = true;

    let mut refs = refs_for(&config);
    refs.pop(); // drop the last frame's mesh

    let result = write_run_script(
      &dir.path().join("run.liggghts"),
      &config,
      4000,
      &refs,
    );

    match result {
      Err(GenerateError::Inconsistent { object, frame }) => {
        assert_eq!(object, "a");
        assert_eq!(frame, Some(3));
      }
      other => panic!("expected inconsistency, got {:?}", other),
    }
    // nothing written on inconsistency
    assert!(!dir.path().join("run.liggghts").exists());
  }

  #[test]
  fn complete_refs_write_successfully() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config();
    let refs = refs_for(&config);
    let path = dir.path().join("run.liggghts");

    write_run_script(&path, &config, 4000, &refs).unwrap();

    assert!(path.is_file());
  }
}
