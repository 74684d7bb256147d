//! CSV export of the per-century table.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;

use crate::aggregate::TrendTable;
use crate::error::Result;

/// Write the table as CSV: a `century` column, then one column per series.
///
/// Rows cover every century present in any series. A series without a
/// point for that century leaves its cell empty.
pub fn write_trend_csv<W: Write>(table: &TrendTable, writer: W) -> Result<()> {
    let mut writer = WriterBuilder::new().from_writer(writer);

    let mut header = vec!["century"];
    header.extend(table.series().iter().map(|s| s.metric.column()));
    writer.write_record(&header)?;

    for century in table.centuries() {
        let mut row = vec![century.get().to_string()];
        for series in table.series() {
            row.push(
                series
                    .mean_at(century)
                    .map(|mean| mean.to_string())
                    .unwrap_or_default(),
            );
        }
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the table to a CSV file, replacing it.
pub fn save_trend_csv(table: &TrendTable, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_trend_csv(table, file)?;
    log::info!("Data saved to {}", path.display());
    Ok(())
}
