use crate::bounds::WorldBounds;
use crate::config::SimulationConfig;
use crate::error::GenerateError;
use crate::S;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

// Deck constants not carried in the scene document.
const RESTITUTION: S = 0.3;
const FRICTION: S = 0.5;
const PARTICLE_DENSITY: S = 2500.0;
const VOLUME_FRACTION: S = 0.6;
const GRAVITY: S = 9.81;

// LIGGGHTS wants prime seeds; fixed values keep regenerated decks
// byte-identical for the same configuration.
const TEMPLATE_SEED: u32 = 15485863;
const DISTRIBUTION_SEED: u32 = 15485867;
const INSERT_SEED: u32 = 32452843;

/// Emits the setup deck: globals, simulation domain, neighbor lists,
/// material properties, timestep, gravity, insertion region and
/// particle insertion. Statement order is fixed.
pub fn emit_setup<W: Write>(
  writer: &mut W,
  config: &SimulationConfig,
  sim: &WorldBounds,
  ins: &WorldBounds,
) -> io::Result<()> {
  writeln!(writer, "# LIGGGHTS setup deck (generated)")?;
  writeln!(writer, "atom_style      granular")?;
  writeln!(writer, "atom_modify     map array")?;
  writeln!(writer, "boundary        f f f")?;
  writeln!(writer, "newton          off")?;
  writeln!(writer, "communicate     single vel yes")?;
  writeln!(writer, "units           si")?;
  writeln!(writer)?;

  writeln!(
    writer,
    "region          domain block {} {} {} {} {} {} units box",
    sim.min.x, sim.max.x, sim.min.y, sim.max.y, sim.min.z, sim.max.z
  )?;
  writeln!(writer, "create_box      2 domain")?;
  writeln!(writer)?;

  writeln!(writer, "neighbor        {} bin", config.radius)?;
  writeln!(writer, "neigh_modify    delay 0")?;
  writeln!(writer)?;

  writeln!(
    writer,
    "fix  m1 all property/global youngsModulus peratomtype {} {}",
    config.youngs_modulus, config.youngs_modulus
  )?;
  writeln!(
    writer,
    "fix  m2 all property/global poissonsRatio peratomtype {} {}",
    config.poisson_ratio, config.poisson_ratio
  )?;
  writeln!(
    writer,
    "fix  m3 all property/global coefficientRestitution peratomtypepair 2 {r} {r} {r} {r}",
    r = RESTITUTION
  )?;
  writeln!(
    writer,
    "fix  m4 all property/global coefficientFriction peratomtypepair 2 {f} {f} {f} {f}",
    f = FRICTION
  )?;
  writeln!(
    writer,
    "fix  m5 all property/global cohesionEnergyDensity peratomtypepair 2 {c} {c} {c} {c}",
    c = config.cohesion
  )?;
  writeln!(writer)?;

  writeln!(
    writer,
    "pair_style      gran model hertz tangential history cohesion sjkr"
  )?;
  writeln!(writer, "pair_coeff      * *")?;
  writeln!(writer)?;

  writeln!(writer, "timestep        {}", config.timestep)?;
  writeln!(writer)?;

  writeln!(
    writer,
    "fix  gravi all gravity {} vector 0.0 0.0 -1.0",
    GRAVITY
  )?;
  writeln!(writer)?;

  writeln!(
    writer,
    "region          insertion block {} {} {} {} {} {} units box",
    ins.min.x, ins.max.x, ins.min.y, ins.max.y, ins.min.z, ins.max.z
  )?;
  writeln!(
    writer,
    "fix  pts1 all particletemplate/sphere {} atom_type 1 density constant {} radius constant {}",
    TEMPLATE_SEED, PARTICLE_DENSITY, config.radius
  )?;
  writeln!(
    writer,
    "fix  pdd1 all particledistribution/discrete {} 1 pts1 1.0",
    DISTRIBUTION_SEED
  )?;
  writeln!(
    writer,
    "fix  ins all insert/pack seed {} distributiontemplate pdd1 insert_every once overlapcheck yes all_in yes region insertion volumefraction_region {}",
    INSERT_SEED, VOLUME_FRACTION
  )?;

  Ok(())
}

/// Writes the setup deck to `path`.
pub fn write_setup_script(
  path: &Path,
  config: &SimulationConfig,
  sim: &WorldBounds,
  ins: &WorldBounds,
) -> Result<(), GenerateError> {
  let as_write_err = |source| GenerateError::Write {
    path: path.to_path_buf(),
    source,
  };

  let file = File::create(path).map_err(&as_write_err)?;
  let mut writer = BufWriter::new(file);
  emit_setup(&mut writer, config, sim, ins).map_err(&as_write_err)?;
  writer.into_inner().map_err(|e| as_write_err(e.into_error()))?;

  Ok(())
}
