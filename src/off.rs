//! Export of meshes in the Object File Format (`.off`).

use crate::geometry::Mesh;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes `mesh` in the OFF text format.
///
/// The output has one header line, one line per point and one line per
/// triangle. Edges are not listed.
pub fn write_off<W: Write>(mesh: &Mesh, out: &mut W) -> io::Result<()> {
    writeln!(out, "OFF")?;
    writeln!(out, "{} {} 0", mesh.points.len(), mesh.triangles.len())?;

    for pt in &mesh.points {
        writeln!(out, "{} {} {}", pt.x, pt.y, pt.z)?;
    }

    for tri in &mesh.triangles {
        writeln!(out, "3 {} {} {}", tri[0], tri[1], tri[2])?;
    }

    Ok(())
}

/// Outputs an OFF file at the given path, replacing any existing file.
pub fn write_off_file(mesh: &Mesh, path: &Path) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_off(mesh, &mut out)?;
    out.flush()
}
