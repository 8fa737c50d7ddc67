use crate::mesh::SurfaceMesh;
use std::io::{self, Write};

/// Writes one ASCII STL solid containing every facet of the given
/// surfaces, in order. Facet normals are recomputed from the vertex
/// winding; degenerate triangles get a zero normal.
pub fn write_ascii_stl<W: Write>(
  writer: &mut W,
  solid_name: &str,
  surfaces: &[SurfaceMesh],
) -> io::Result<()> {
  writeln!(writer, "solid {}", solid_name)?;

  for (vertices, faces) in surfaces {
    for face in faces {
      let v0 = vertices[face[0] as usize];
      let v1 = vertices[face[1] as usize];
      let v2 = vertices[face[2] as usize];

      let normal = (v1 - v0).cross(&(v2 - v0));
      let len = normal.norm();
      let normal = if len > f64::EPSILON {
        normal / len
      } else {
        normal * 0.0
      };

      writeln!(
        writer,
        "  facet normal {:.6e} {:.6e} {:.6e}",
        normal.x, normal.y, normal.z
      )?;
      writeln!(writer, "    outer loop")?;
      for vert in [v0, v1, v2].iter() {
        writeln!(
          writer,
          "      vertex {:.6e} {:.6e} {:.6e}",
          vert.x, vert.y, vert.z
        )?;
      }
      writeln!(writer, "    endloop")?;
      writeln!(writer, "  endfacet")?;
    }
  }

  writeln!(writer, "endsolid {}", solid_name)?;

  Ok(())
}
