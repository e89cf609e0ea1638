//! CSV output for the account listing (`teller export`).

use serde::Serialize;
use std::io::Write;

/// Writes account rows as CSV, with a header taken from the row's field names.
/// Nothing is written for an empty listing.
pub fn write_csv<T, W>(writer: W, records: impl Iterator<Item = T>) -> csv::Result<()>
where
    T: Serialize,
    W: Write,
{
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}
