use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::sweep::SweepPoint;

pub fn write_sweep_csv(path: impl AsRef<Path>, rows: &[SweepPoint]) -> io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "noise,s_max,s_estimated,converged")?;
    for row in rows {
        let est = row.s_estimated.map(|s| s.to_string()).unwrap_or_default();
        writeln!(w, "{},{},{},{}", row.noise, row.s_max, est, row.converged)?;
    }
    w.flush()
}
