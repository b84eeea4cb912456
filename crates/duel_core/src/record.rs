//! Per-tick records and their CSV export.
//!
//! One immutable record per elapsed tick; the ordered sequence is the
//! whole output of a run. Column names and ordering are a compatibility
//! surface for downstream statistics/plotting consumers; do not
//! reorder or rename without bumping those consumers too.

use crate::engine::Outcome;
use crate::ship::{Ship, Strategy};
use crate::vec3::GeometryError;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Serialize)]
pub struct TickRecord {
    pub index: u64,
    pub result: Outcome,
    pub ship1_strategy: Strategy,
    pub ship2_strategy: Strategy,

    pub ship1_position_x: f64,
    pub ship1_position_y: f64,
    pub ship1_position_z: f64,
    pub ship2_position_x: f64,
    pub ship2_position_y: f64,
    pub ship2_position_z: f64,

    pub ship1_direction_x: f64,
    pub ship1_direction_y: f64,
    pub ship1_direction_z: f64,
    pub ship2_direction_x: f64,
    pub ship2_direction_y: f64,
    pub ship2_direction_z: f64,

    pub ship_distance: f64,
    pub ship1_angle_to_enemy: f64,
    pub ship2_angle_to_enemy: f64,
}

impl TickRecord {
    /// Snapshot the derived geometry of both ships at the current tick.
    /// Errors when the ships coincide and the angles are undefined.
    pub fn capture(
        index: u64,
        result: Outcome,
        ship1: &Ship,
        ship2: &Ship,
    ) -> Result<Self, GeometryError> {
        let heading1 = ship1.heading();
        let heading2 = ship2.heading();
        Ok(Self {
            index,
            result,
            ship1_strategy: ship1.strategy(),
            ship2_strategy: ship2.strategy(),
            ship1_position_x: ship1.position.x,
            ship1_position_y: ship1.position.y,
            ship1_position_z: ship1.position.z,
            ship2_position_x: ship2.position.x,
            ship2_position_y: ship2.position.y,
            ship2_position_z: ship2.position.z,
            ship1_direction_x: heading1.x,
            ship1_direction_y: heading1.y,
            ship1_direction_z: heading1.z,
            ship2_direction_x: heading2.x,
            ship2_direction_y: heading2.y,
            ship2_direction_z: heading2.z,
            ship_distance: ship1.distance_to(ship2.position),
            ship1_angle_to_enemy: ship1.angle_to_degrees(ship2.position)?,
            ship2_angle_to_enemy: ship2.angle_to_degrees(ship1.position)?,
        })
    }
}

/// Write the CSV header row for tick records.
pub fn write_records_header(writer: &mut impl Write) -> std::io::Result<()> {
    writeln!(
        writer,
        "index,result,ship1_strategy,ship2_strategy,\
         ship1_position_x,ship1_position_y,ship1_position_z,\
         ship2_position_x,ship2_position_y,ship2_position_z,\
         ship1_direction_x,ship1_direction_y,ship1_direction_z,\
         ship2_direction_x,ship2_direction_y,ship2_direction_z,\
         ship_distance,ship1_angle_to_enemy,ship2_angle_to_enemy"
    )
}

/// Append a single tick record as a CSV row.
pub fn append_record_row(writer: &mut impl Write, record: &TickRecord) -> std::io::Result<()> {
    writeln!(
        writer,
        "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
        record.index,
        record.result.as_str(),
        record.ship1_strategy.as_str(),
        record.ship2_strategy.as_str(),
        record.ship1_position_x,
        record.ship1_position_y,
        record.ship1_position_z,
        record.ship2_position_x,
        record.ship2_position_y,
        record.ship2_position_z,
        record.ship1_direction_x,
        record.ship1_direction_y,
        record.ship1_direction_z,
        record.ship2_direction_x,
        record.ship2_direction_y,
        record.ship2_direction_z,
        record.ship_distance,
        record.ship1_angle_to_enemy,
        record.ship2_angle_to_enemy,
    )
}

/// Write a full record sequence to a CSV file.
pub fn write_records_csv(path: &std::path::Path, records: &[TickRecord]) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    write_records_header(&mut writer)?;
    for record in records {
        append_record_row(&mut writer, record)?;
    }
    writer.flush()
}

/// Maximum data rows per CSV file before rotating to a new file.
const MAX_ROWS_PER_FILE: usize = 50_000;

/// Rotating record CSV writer. Splits into numbered files
/// (`records_000.csv`, `records_001.csv`, ...) after
/// [`MAX_ROWS_PER_FILE`] rows each.
pub struct RecordFileWriter {
    run_dir: std::path::PathBuf,
    file_index: u32,
    rows_in_current_file: usize,
    writer: std::io::BufWriter<std::fs::File>,
}

impl RecordFileWriter {
    /// Create a new writer, opening the first CSV file with a header row.
    pub fn new(run_dir: std::path::PathBuf) -> std::io::Result<Self> {
        let writer = open_csv_file(&run_dir, 0)?;
        Ok(Self {
            run_dir,
            file_index: 0,
            rows_in_current_file: 0,
            writer,
        })
    }

    /// Append one record row, rotating to a new file if the current one
    /// is full.
    pub fn write_row(&mut self, record: &TickRecord) -> std::io::Result<()> {
        if self.rows_in_current_file >= MAX_ROWS_PER_FILE {
            self.writer.flush()?;
            self.file_index += 1;
            self.writer = open_csv_file(&self.run_dir, self.file_index)?;
            self.rows_in_current_file = 0;
        }
        append_record_row(&mut self.writer, record)?;
        self.rows_in_current_file += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

fn open_csv_file(
    run_dir: &std::path::Path,
    index: u32,
) -> std::io::Result<std::io::BufWriter<std::fs::File>> {
    let path = run_dir.join(format!("records_{index:03}.csv"));
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    write_records_header(&mut writer)?;
    Ok(writer)
}
