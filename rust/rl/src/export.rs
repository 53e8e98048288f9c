use crate::algos::model_based::mdp::common::ValueHistory;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Writes one column per state keyed `(x, y)`, an all-zero baseline row, then
/// one row per recorded snapshot.
pub fn write_csv<W: Write>(history: &ValueHistory, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(history.states().iter().map(ToString::to_string))?;
    wtr.write_record(history.states().iter().map(|_| "0"))?;
    for snapshot in history.snapshots() {
        wtr.write_record(snapshot.iter().map(ToString::to_string))?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn export_csv(history: &ValueHistory, path: &Path) -> Result<()> {
    if history.is_empty() {
        warn!(path = %path.display(), "no sweeps recorded, exporting baseline only");
    }

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_csv(history, file).with_context(|| format!("writing {}", path.display()))?;

    info!(path = %path.display(), rows = history.len(), "exported value history");
    Ok(())
}
