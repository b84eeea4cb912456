//! Deterministic two-ship duel simulation.
//!
//! No IO beyond the record export helpers, no clock. All randomness via
//! the passed-in Rng.

mod engine;
mod record;
mod ship;
mod vec3;

pub use engine::{run_duel, DuelReport, Outcome};
pub use record::{
    append_record_row, write_records_csv, write_records_header, RecordFileWriter, TickRecord,
};
pub use ship::{Ship, ShipConfig, ShipSnapshot, Strategy};
pub use vec3::{GeometryError, Vec3, EPSILON};
