//! Duel run loop.
//!
//! Advances two ships tick-by-tick with simultaneous-move semantics:
//! the win condition is evaluated on current positions, one record is
//! emitted per tick, and both ships then update against the opponent's
//! pre-tick snapshot. The loop stops at the first terminal outcome or
//! when the tick budget runs out.

use crate::record::TickRecord;
use crate::ship::Ship;
use crate::vec3::GeometryError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Per-tick classification of the duel. A run that exhausts its tick
/// budget ends on `Ongoing`: inconclusive, not a decisive result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "ONGOING")]
    Ongoing,
    #[serde(rename = "SHIP_1_WINS")]
    Ship1Wins,
    #[serde(rename = "SHIP_2_WINS")]
    Ship2Wins,
    #[serde(rename = "BOTH_DESTROYED")]
    BothDestroyed,
}

impl Outcome {
    pub fn classify(ship1_hits: bool, ship2_hits: bool) -> Self {
        match (ship1_hits, ship2_hits) {
            (true, true) => Outcome::BothDestroyed,
            (true, false) => Outcome::Ship1Wins,
            (false, true) => Outcome::Ship2Wins,
            (false, false) => Outcome::Ongoing,
        }
    }

    pub fn is_terminal(self) -> bool {
        self != Outcome::Ongoing
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Ongoing => "ONGOING",
            Outcome::Ship1Wins => "SHIP_1_WINS",
            Outcome::Ship2Wins => "SHIP_2_WINS",
            Outcome::BothDestroyed => "BOTH_DESTROYED",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Completed run: the append-only record sequence plus the accessors
/// the batch layer aggregates over.
#[derive(Debug, Clone)]
pub struct DuelReport {
    pub records: Vec<TickRecord>,
}

impl DuelReport {
    /// Final classification: the last record's result, `Ongoing` for
    /// an empty (zero-budget) run.
    pub fn outcome(&self) -> Outcome {
        self.records.last().map_or(Outcome::Ongoing, |r| r.result)
    }

    pub fn is_decisive(&self) -> bool {
        self.outcome().is_terminal()
    }

    /// Number of elapsed ticks, one record each.
    pub fn run_length(&self) -> usize {
        self.records.len()
    }

    pub fn initial_distance(&self) -> Option<f64> {
        self.records.first().map(|r| r.ship_distance)
    }

    /// Both ships' tick-0 angle to the opponent, in degrees.
    pub fn initial_angles(&self) -> Option<(f64, f64)> {
        self.records
            .first()
            .map(|r| (r.ship1_angle_to_enemy, r.ship2_angle_to_enemy))
    }
}

/// Run one duel to termination or budget exhaustion.
///
/// Any degenerate-geometry error aborts the run; there is no partial
/// recovery.
pub fn run_duel(
    mut ship1: Ship,
    mut ship2: Ship,
    max_ticks: u64,
    rng: &mut impl Rng,
) -> Result<DuelReport, GeometryError> {
    let mut records = Vec::new();

    for index in 0..max_ticks {
        let ship1_hits = ship1.is_in_range(ship2.position)?;
        let ship2_hits = ship2.is_in_range(ship1.position)?;
        let result = Outcome::classify(ship1_hits, ship2_hits);

        records.push(TickRecord::capture(index, result, &ship1, &ship2)?);

        if result.is_terminal() {
            break;
        }

        // Snapshot both ships before either moves, so neither reacts
        // to the other's same-tick motion.
        let snapshot1 = ship1.snapshot();
        let snapshot2 = ship2.snapshot();
        ship1.update(Some(&snapshot2), rng)?;
        ship2.update(Some(&snapshot1), rng)?;
    }

    Ok(DuelReport { records })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ship::ShipConfig;
    use crate::vec3::Vec3;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn static_ship(position: Vec3, heading: Vec3) -> Ship {
        Ship::from_config(&ShipConfig {
            position,
            heading,
            speed: 0.0,
            turn_rate_deg: 0.0,
            ..ShipConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_classify_covers_all_cases() {
        assert_eq!(Outcome::classify(true, true), Outcome::BothDestroyed);
        assert_eq!(Outcome::classify(true, false), Outcome::Ship1Wins);
        assert_eq!(Outcome::classify(false, true), Outcome::Ship2Wins);
        assert_eq!(Outcome::classify(false, false), Outcome::Ongoing);
        assert!(!Outcome::Ongoing.is_terminal());
        assert!(Outcome::BothDestroyed.is_terminal());
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(Outcome::Ship1Wins.as_str(), "SHIP_1_WINS");
        let json = serde_json::to_string(&Outcome::BothDestroyed).unwrap();
        assert_eq!(json, "\"BOTH_DESTROYED\"");
    }

    #[test]
    fn test_one_sided_kill_at_tick_zero() {
        // Ship 1 stares straight at ship 2 from inside weapon range;
        // ship 2 faces away.
        let ship1 = static_ship(Vec3::ZERO, Vec3::PLUS_X);
        let ship2 = static_ship(Vec3::new(30.0, 0.0, 0.0), Vec3::PLUS_X);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let report = run_duel(ship1, ship2, 100, &mut rng).unwrap();
        assert_eq!(report.outcome(), Outcome::Ship1Wins);
        assert_eq!(report.run_length(), 1);
        assert_eq!(report.records[0].index, 0);
    }

    #[test]
    fn test_records_index_ascending_one_per_tick() {
        let ship1 = static_ship(Vec3::ZERO, Vec3::PLUS_X);
        let ship2 = static_ship(Vec3::new(0.0, 500.0, 0.0), Vec3::PLUS_X);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let report = run_duel(ship1, ship2, 25, &mut rng).unwrap();
        assert_eq!(report.run_length(), 25);
        for (expected, record) in report.records.iter().enumerate() {
            assert_eq!(record.index, expected as u64);
        }
    }

    #[test]
    fn test_zero_budget_is_ongoing_and_empty() {
        let ship1 = static_ship(Vec3::ZERO, Vec3::PLUS_X);
        let ship2 = static_ship(Vec3::new(0.0, 500.0, 0.0), Vec3::PLUS_X);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let report = run_duel(ship1, ship2, 0, &mut rng).unwrap();
        assert_eq!(report.run_length(), 0);
        assert_eq!(report.outcome(), Outcome::Ongoing);
        assert!(!report.is_decisive());
        assert!(report.initial_distance().is_none());
    }

    #[test]
    fn test_report_initial_accessors() {
        let ship1 = static_ship(Vec3::ZERO, Vec3::PLUS_X);
        let ship2 = static_ship(Vec3::new(0.0, 500.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let report = run_duel(ship1, ship2, 10, &mut rng).unwrap();
        assert!((report.initial_distance().unwrap() - 500.0).abs() < 1e-9);
        let (angle1, angle2) = report.initial_angles().unwrap();
        assert!((angle1 - 90.0).abs() < 1e-9);
        assert!(angle2.abs() < 1e-9);
    }
}
