use clap::Parser;
use indicatif::ProgressBar;
use liggghts_prep::{
  generate_input_files, load_scene, GenerateError, GenerationReport,
};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

#[derive(Parser)]
#[command(
  version,
  about = "Generate LIGGGHTS input decks from a scene description"
)]
struct Opts {
  /// Scene document (TOML) describing objects, volumes and parameters
  scene_file: PathBuf,

  #[arg(short = 'o', long = "output-dir")]
  output_dir: PathBuf,

  /// Export one mesh per object per frame instead of a single rigid
  /// snapshot per object
  #[arg(short = 'd', long = "deformable")]
  deformable: bool,

  /// Suppress the frame-export progress bar
  #[arg(short = 'q', long = "quiet")]
  quiet: bool,
}

fn run(opts: &Opts) -> Result<GenerationReport, GenerateError> {
  let (scene, mut config) = load_scene(&opts.scene_file)?;
  config.deformable = opts.deformable;

  let cancel = AtomicBool::new(false);

  let progress = if opts.deformable && !opts.quiet {
    let frames = (config.frame_end - config.frame_start + 1).max(0) as u64;
    Some(ProgressBar::new(frames))
  } else {
    None
  };

  let report = generate_input_files(
    &scene,
    &config,
    &opts.output_dir,
    &cancel,
    progress.as_ref(),
  );

  if let Some(progress) = progress {
    progress.finish_and_clear();
  }

  report
}

fn main() {
  let opts = Opts::parse();

  match run(&opts) {
    Ok(report) => {
      let mode = if opts.deformable { "Deformable" } else { "Rigid" };
      println!(
        "{} input files generated in {} ({} mesh files, {} steps/frame)",
        mode,
        report.output_dir.display(),
        report.mesh_files,
        report.timesteps_per_frame
      );
    }
    Err(err) => {
      eprintln!("error: {}", err);
      std::process::exit(1);
    }
  }
}
