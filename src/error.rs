use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Which designated volume a configuration field refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeKind {
  Insertion,
  Simulation,
}

impl fmt::Display for VolumeKind {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      VolumeKind::Insertion => write!(f, "insertion"),
      VolumeKind::Simulation => write!(f, "simulation"),
    }
  }
}

/// Configuration problems, all detected before any file is written.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("no {kind} volume object configured")]
  MissingVolume { kind: VolumeKind },

  #[error("object {name:?} is not present in the scene")]
  MissingObject { name: String },

  #[error("no moving objects configured")]
  NoMovingObjects,

  #[error("{name} must be positive, got {value}")]
  NonPositiveParameter { name: &'static str, value: f64 },

  #[error("frame range start {start} exceeds end {end}")]
  BadFrameRange { start: i32, end: i32 },
}

/// Problems loading a scene document or one of its mesh files.
#[derive(Debug, Error)]
pub enum SceneError {
  #[error("cannot read {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("scene document parse error: {0}")]
  Parse(#[from] toml::de::Error),

  #[error("malformed mesh record at {path}:{line}")]
  MeshParse { path: PathBuf, line: usize },

  #[error("face index {index} out of range in {path} ({vertices} vertices)")]
  FaceIndexOutOfRange {
    path: PathBuf,
    index: u32,
    vertices: usize,
  },

  #[error("duplicate object name {name:?} in scene document")]
  DuplicateObject { name: String },
}

/// Mesh export failures. A single failed object or frame aborts the
/// whole generation run; a partial file set is not a valid simulator
/// input.
#[derive(Debug, Error)]
pub enum ExportError {
  #[error("unknown object {name:?}")]
  UnknownObject { name: String },

  #[error("no geometry for object {object:?} (frame {frame:?}): {source}")]
  Geometry {
    object: String,
    frame: Option<i32>,
    #[source]
    source: SceneError,
  },

  #[error("cannot create output directory {path}: {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("cannot write {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("export cancelled")]
  Cancelled,
}

/// Top-level error for one generation run.
#[derive(Debug, Error)]
pub enum GenerateError {
  #[error("configuration error: {0}")]
  Config(#[from] ConfigError),

  #[error("scene error: {0}")]
  Scene(#[from] SceneError),

  #[error("export failure: {0}")]
  Export(#[from] ExportError),

  #[error("cannot write {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  // Internal invariant violation: the run script was asked to
  // reference a mesh file the exporter never produced.
  #[error("internal inconsistency: mesh for {object:?} (frame {frame:?}) was not exported")]
  Inconsistent { object: String, frame: Option<i32> },
}
