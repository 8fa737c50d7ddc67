pub mod run;
pub mod setup;

pub use run::{emit_run, write_run_script};
pub use setup::{emit_setup, write_setup_script};

/// Output filenames are fixed; the run deck references the setup deck
/// and the tray mesh by these names.
pub const SETUP_FILENAME: &str = "setup.liggghts";
pub const RUN_FILENAME: &str = "run.liggghts";
pub const TRAY_FILENAME: &str = "simtray.stl";
