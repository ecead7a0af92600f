use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::info;

use crate::models::VenueRow;
use crate::{Database, Error, Result};

/// Parses venue records. `Name` and `Type` columns are required (matched
/// case-insensitively); every other column is kept as a detail. Short rows
/// read as empty cells and cells past the header row are dropped.
pub fn read_venues<R: Read>(reader: R) -> Result<Vec<VenueRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let position = |wanted: &'static str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(wanted))
            .ok_or(Error::MissingColumn(wanted))
    };
    let name_idx = position("Name")?;
    let type_idx = position("Type")?;

    let mut venues = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let field = |idx: usize| record.get(idx).unwrap_or_default().to_string();

        let details = headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != name_idx && *idx != type_idx)
            .map(|(idx, header)| (header.to_string(), field(idx)))
            .collect();

        venues.push(VenueRow {
            name: field(name_idx),
            kind: field(type_idx),
            details,
        });
    }

    Ok(venues)
}

impl Database {
    /// Replaces the venue table with the contents of a CSV file.
    pub fn import_venues_csv(&self, path: &Path) -> Result<usize> {
        let venues = read_venues(File::open(path)?)?;
        let count = self.replace_venues(&venues)?;
        info!("Imported {} venues from {}", count, path.display());
        Ok(count)
    }
}
