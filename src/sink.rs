use crate::error::Result;
use crate::types::ResultTable;
use rusqlite::{params, Connection};
use std::fs;
use std::path::Path;
use tracing::info;

/// Table name shared with downstream consumers of the database file.
pub const TABLE_NAME: &str = "air_quality_data";

/// Persist the table to both sinks, replacing any previous run's output.
///
/// The sinks are independent; a failure in the second leaves the first
/// written.
pub fn write(table: &ResultTable, csv_path: &Path, db_path: &Path) -> Result<()> {
    write_csv(table, csv_path)?;
    println!("✅ Data saved to CSV: {}", csv_path.display());

    write_sqlite(table, db_path)?;
    println!("✅ Data saved to SQLite DB: {}", db_path.display());

    Ok(())
}

/// Write the table as CSV with a header row, overwriting any existing file.
pub fn write_csv(table: &ResultTable, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for reading in table.rows() {
        writer.serialize(reading)?;
    }
    writer.flush()?;

    info!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

/// Drop and recreate the readings table, one row per reading.
///
/// All inserts run in a single transaction so the file never holds a
/// partial run.
pub fn write_sqlite(table: &ResultTable, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut conn = Connection::open(path)?;
    let tx = conn.transaction()?;

    tx.execute_batch(&format!(
        "DROP TABLE IF EXISTS {TABLE_NAME};
         CREATE TABLE {TABLE_NAME} (
            city              TEXT NOT NULL,
            aqi_us            INTEGER NOT NULL,
            main_pollutant_us TEXT NOT NULL,
            temperature       REAL NOT NULL,
            humidity          INTEGER NOT NULL,
            pressure          REAL NOT NULL,
            wind_speed        REAL NOT NULL,
            wind_direction    INTEGER NOT NULL,
            timestamp         TEXT NOT NULL,
            datetime          TEXT NOT NULL
         );"
    ))?;

    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {TABLE_NAME} (city, aqi_us, main_pollutant_us, temperature, humidity, \
             pressure, wind_speed, wind_direction, timestamp, datetime) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
        ))?;

        for r in table.rows() {
            stmt.execute(params![
                r.city,
                r.aqi_us,
                r.main_pollutant_us,
                r.temperature,
                r.humidity,
                r.pressure,
                r.wind_speed,
                r.wind_direction,
                r.timestamp,
                r.datetime,
            ])?;
        }
    }

    tx.commit()?;

    info!("Replaced table {} in {}", TABLE_NAME, path.display());
    Ok(())
}
