//! Writing the exchange format.
//!
//! [`write_to_path`] owns the whole lifetime of the file handle: it is opened, written, flushed,
//! synced and closed before the function returns, so a solver spawned afterwards always reads a
//! complete file.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::ProblemInstance;

/// Write `instance` to any destination and flush it.
pub fn write<W: Write>(instance: &ProblemInstance, mut dest: W) -> io::Result<()> {
    writeln!(dest, "{}", instance.len())?;
    for t in instance.terminals() {
        writeln!(dest, "{} {} {}", t.x, t.y, t.z)?;
    }
    dest.flush()
}

/// Create (or truncate) `path` and write `instance` into it.
pub fn write_to_path(instance: &ProblemInstance, path: &Path) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write(instance, &mut out)?;
    let file = out.into_inner().map_err(io::IntoInnerError::into_error)?;
    file.sync_all()
}
