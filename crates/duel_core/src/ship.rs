//! Ship state and per-tick steering.
//!
//! A ship never holds a pointer to its opponent. The run loop owns both
//! ships and hands each update an explicit [`ShipSnapshot`] of the
//! opponent captured at tick start, so both ships act on the same
//! pre-tick information.

use crate::vec3::{GeometryError, Vec3, EPSILON};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Behavioral mode for one tick. Recomputed from current geometry on
/// every update; there are no sticky transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    Patrol,
    ChaseDistance,
    ChaseAngle,
    Evade,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Patrol => "patrol",
            Strategy::ChaseDistance => "chase-distance",
            Strategy::ChaseAngle => "chase-angle",
            Strategy::Evade => "evade",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Construction parameters for a ship. Distances are in world units,
/// speed in units per tick, turn rate in degrees per tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipConfig {
    #[serde(default)]
    pub position: Vec3,
    #[serde(default = "default_heading")]
    pub heading: Vec3,
    #[serde(default = "default_speed")]
    pub speed: f64,
    #[serde(default = "default_turn_rate")]
    pub turn_rate_deg: f64,
    #[serde(default = "default_weapon_range")]
    pub weapon_range: f64,
    #[serde(default = "default_weapon_half_angle")]
    pub weapon_half_angle_deg: f64,
}

fn default_heading() -> Vec3 {
    Vec3::PLUS_X
}

fn default_speed() -> f64 {
    1.0
}

fn default_turn_rate() -> f64 {
    10.0
}

fn default_weapon_range() -> f64 {
    50.0
}

fn default_weapon_half_angle() -> f64 {
    15.0
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            heading: default_heading(),
            speed: default_speed(),
            turn_rate_deg: default_turn_rate(),
            weapon_range: default_weapon_range(),
            weapon_half_angle_deg: default_weapon_half_angle(),
        }
    }
}

/// Pre-tick view of a ship, captured by the run loop before either
/// ship moves.
#[derive(Debug, Clone, Copy)]
pub struct ShipSnapshot {
    pub position: Vec3,
    pub heading: Vec3,
    pub weapon_range: f64,
}

#[derive(Debug, Clone)]
pub struct Ship {
    pub position: Vec3,
    // Invariant: unit length. Normalized at construction and after
    // every turn.
    heading: Vec3,
    pub speed: f64,
    pub turn_rate_deg: f64,
    pub weapon_range: f64,
    pub weapon_half_angle_deg: f64,
    strategy: Strategy,
}

impl Ship {
    /// Build a ship from its config. Errors when the configured heading
    /// is (near-)zero and has no direction to normalize.
    pub fn from_config(config: &ShipConfig) -> Result<Self, GeometryError> {
        Ok(Self {
            position: config.position,
            heading: config.heading.normalized()?,
            speed: config.speed,
            turn_rate_deg: config.turn_rate_deg,
            weapon_range: config.weapon_range,
            weapon_half_angle_deg: config.weapon_half_angle_deg,
            strategy: Strategy::Patrol,
        })
    }

    pub fn heading(&self) -> Vec3 {
        self.heading
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn snapshot(&self) -> ShipSnapshot {
        ShipSnapshot {
            position: self.position,
            heading: self.heading,
            weapon_range: self.weapon_range,
        }
    }

    pub fn distance_to(&self, point: Vec3) -> f64 {
        self.position.distance(point)
    }

    /// Angle between the current heading and the direction to `point`,
    /// in degrees. Errors when `point` coincides with the ship.
    pub fn angle_to_degrees(&self, point: Vec3) -> Result<f64, GeometryError> {
        self.heading.angle_degrees(point - self.position)
    }

    /// True iff `point` lies inside the weapon cone: distance within
    /// range AND bearing within the half-angle. Both conditions are
    /// independent; violating either keeps the point safe.
    pub fn is_in_range(&self, point: Vec3) -> Result<bool, GeometryError> {
        let to_target = point - self.position;
        if to_target.magnitude() > self.weapon_range {
            return Ok(false);
        }
        Ok(self.heading.angle_degrees(to_target)? <= self.weapon_half_angle_deg)
    }

    /// One tick: re-derive the strategy from current geometry, turn
    /// toward the strategy's target direction (clamped by turn rate),
    /// then advance along the heading.
    pub fn update(
        &mut self,
        opponent: Option<&ShipSnapshot>,
        rng: &mut impl Rng,
    ) -> Result<(), GeometryError> {
        self.choose_strategy(opponent)?;
        let target = self.target_heading(opponent, rng)?;
        self.turn_towards(target)?;
        self.position = self.position + self.heading * self.speed;
        Ok(())
    }

    /// Stateless decision function over current geometry:
    /// no opponent -> patrol; opponent beyond twice its own weapon
    /// range -> close the distance; already facing it (< 90 degrees)
    /// -> press the attack; otherwise evade.
    fn choose_strategy(&mut self, opponent: Option<&ShipSnapshot>) -> Result<(), GeometryError> {
        let Some(opponent) = opponent else {
            self.strategy = Strategy::Patrol;
            return Ok(());
        };
        let to_opponent = opponent.position - self.position;
        self.strategy = if to_opponent.magnitude() > 2.0 * opponent.weapon_range {
            Strategy::ChaseDistance
        } else if self.heading.angle_degrees(to_opponent)? < 90.0 {
            Strategy::ChaseAngle
        } else {
            Strategy::Evade
        };
        Ok(())
    }

    fn target_heading(
        &self,
        opponent: Option<&ShipSnapshot>,
        rng: &mut impl Rng,
    ) -> Result<Vec3, GeometryError> {
        let Some(opponent) = opponent else {
            return Ok(Vec3::random_direction(rng));
        };
        match self.strategy {
            Strategy::Patrol => Ok(Vec3::random_direction(rng)),
            Strategy::ChaseDistance | Strategy::ChaseAngle => Ok(opponent.position - self.position),
            Strategy::Evade => self.evade_heading(opponent, rng),
        }
    }

    /// Evade direction: perpendicular to both the opponent-ward vector
    /// and the opponent's heading, picking the sign that needs the
    /// smaller turn.
    fn evade_heading(
        &self,
        opponent: &ShipSnapshot,
        rng: &mut impl Rng,
    ) -> Result<Vec3, GeometryError> {
        let to_opponent = opponent.position - self.position;
        let mut candidate = to_opponent.cross(opponent.heading);
        // Collinear case (opponent coming straight at us or running
        // straight away): the cross product vanishes and no unique
        // perpendicular exists. Resample against a random direction
        // until one does.
        while candidate.magnitude() < EPSILON {
            candidate = Vec3::random_direction(rng).cross(opponent.heading);
        }
        let mirrored = -candidate;
        if candidate.angle_degrees(self.heading)? < mirrored.angle_degrees(self.heading)? {
            Ok(candidate)
        } else {
            Ok(mirrored)
        }
    }

    /// Turn toward `desired` (any non-zero vector), clamped to at most
    /// `turn_rate_deg` this tick. A gap within the turn rate snaps
    /// exactly onto the target direction.
    fn turn_towards(&mut self, desired: Vec3) -> Result<(), GeometryError> {
        let gap = self.heading.angle_degrees(desired)?;
        if gap <= self.turn_rate_deg {
            self.heading = desired.normalized()?;
        } else {
            self.heading = self
                .heading
                .rotate_towards_degrees(desired, self.turn_rate_deg)?
                .normalized()?;
        }
        Ok(())
    }
}
