use super::DistanceEntry;
use crate::core_types::Location;
use crate::error::{SlotPlanError, SpResult};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Reads a `From,To,Distance` table. Blank rows and rows with fewer than
/// three columns are skipped; an unparseable distance is an error.
pub fn load_distance_table<P: AsRef<Path>>(path: P) -> SpResult<Vec<DistanceEntry>> {
    let file = File::open(path)?;
    read_distance_table(file)
}

pub fn read_distance_table<R: Read>(reader: R) -> SpResult<Vec<DistanceEntry>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut entries = Vec::new();

    for (line, record) in rdr.records().enumerate() {
        let record = record?;
        if record.len() < 3 {
            if !record.iter().all(str::is_empty) {
                warn!("Distance table row {} has {} columns, skipping", line + 2, record.len());
            }
            continue;
        }

        let from = &record[0];
        let to = &record[1];
        if from.is_empty() || to.is_empty() {
            continue;
        }

        let distance: u32 = record[2].parse().map_err(|_| {
            SlotPlanError::Validation(format!(
                "Distance table row {}: '{}' is not a non-negative integer",
                line + 2,
                &record[2]
            ))
        })?;

        entries.push(DistanceEntry {
            from: Location::new(from),
            to: Location::new(to),
            distance,
        });
    }

    debug!("Loaded {} distance entries", entries.len());
    Ok(entries)
}
