use criterion::{black_box, criterion_group, criterion_main, Criterion};
use liggghts_prep::bounds::{world_bounds, WorldBounds};
use liggghts_prep::export::write_ascii_stl;
use liggghts_prep::mesh::SurfaceMesh;
use liggghts_prep::scene::{MeshObject, SceneObject};
use liggghts_prep::script::emit_setup;
use liggghts_prep::SimulationConfig;
use nalgebra::{Point3, Rotation3, Transform3, Translation3, Vector3};

fn surface_for_repeat(repeat: usize) -> SurfaceMesh {
  let base = [
    Point3::new(0.0, 0.0, 0.0),
    Point3::new(1.0, 0.0, 0.0),
    Point3::new(0.0, 1.0, 0.0),
    Point3::new(0.0, 0.0, 1.0),
  ];

  let mut vertices = Vec::new();
  let mut faces = Vec::new();

  for i in 0..repeat {
    let offset = Vector3::new(0.0, 0.0, 1.5 * i as f64);
    let start = vertices.len() as u32;

    vertices.extend(base.iter().map(|v| v + offset));
    faces.push([start, start + 1, start + 2]);
    faces.push([start, start + 1, start + 3]);
    faces.push([start, start + 2, start + 3]);
    faces.push([start + 1, start + 2, start + 3]);
  }

  (vertices, faces)
}

fn bench_object(repeat: usize) -> MeshObject {
  let transform = Transform3::from_matrix_unchecked(
    Translation3::new(2.0, -1.0, 0.5).to_homogeneous()
      * Rotation3::new(Vector3::new(0.3, 0.7, 0.1)).to_homogeneous(),
  );
  MeshObject::new("bench", transform, surface_for_repeat(repeat))
}

fn bench_config() -> SimulationConfig {
  SimulationConfig {
    moving_objects: vec!["bench".to_owned()],
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
    frame_end: 250,
    deformable: false,
  }
}

fn criterion_benchmark(c: &mut Criterion) {
  let object = bench_object(64);
  c.bench_function("world_bounds 64 tets", |b| {
    b.iter(|| world_bounds(black_box(&object)))
  });

  let config = bench_config();
  let sim = WorldBounds {
    min: Point3::new(0.0, 0.0, 0.0),
    max: Point3::new(1.0, 1.0, 1.0),
  };
  let ins = WorldBounds {
    min: Point3::new(0.2, 0.2, 0.5),
    max: Point3::new(0.8, 0.8, 0.9),
  };
  c.bench_function("emit_setup", |b| {
    b.iter(|| {
      let mut out = Vec::new();
      emit_setup(&mut out, black_box(&config), &sim, &ins).unwrap();
      out
    })
  });

  let surface = object.surface_at(None).unwrap();
  c.bench_function("write_ascii_stl 256 facets", |b| {
    b.iter(|| {
      let mut out = Vec::new();
      write_ascii_stl(&mut out, "bench", black_box(std::slice::from_ref(&surface)))
        .unwrap();
      out
    })
  });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
