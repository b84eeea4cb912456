//! 3D Cartesian vector primitives.
//!
//! Plain value geometry: every operation returns a new vector, nothing
//! is cached. Angles are radians unless the name says degrees.

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Neg, Sub};
use thiserror::Error;

/// Floating point fudge factor for approximate comparisons and
/// degeneracy checks.
pub const EPSILON: f64 = 1e-9;

/// Degenerate-geometry failure. Callers are expected to keep inputs
/// away from the singularity; when they don't, the run aborts.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate vector in {op}: magnitude below epsilon")]
    DegenerateVector { op: &'static str },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const PLUS_X: Self = Self {
        x: 1.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Component-wise comparison within [`EPSILON`]. Use this instead of
    /// `==` anywhere floating-point drift can accumulate.
    pub fn approx_eq(self, other: Self) -> bool {
        (self.x - other.x).abs() < EPSILON
            && (self.y - other.y).abs() < EPSILON
            && (self.z - other.z).abs() < EPSILON
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Right-handed cross product.
    pub fn cross(self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn magnitude(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn distance(self, other: Self) -> f64 {
        (other - self).magnitude()
    }

    /// Unit vector in the direction of `self`. Errors when the
    /// magnitude is below [`EPSILON`].
    pub fn normalized(self) -> Result<Self, GeometryError> {
        let magnitude = self.magnitude();
        if magnitude < EPSILON {
            return Err(GeometryError::DegenerateVector { op: "normalized" });
        }
        Ok(self / magnitude)
    }

    /// Angle between `self` and `other` in radians, in `[0, pi]`.
    /// Errors when either magnitude is below [`EPSILON`].
    pub fn angle(self, other: Self) -> Result<f64, GeometryError> {
        let denominator = self.magnitude() * other.magnitude();
        if denominator < EPSILON {
            return Err(GeometryError::DegenerateVector { op: "angle" });
        }
        // Clamp: floating-point drift can push the cosine slightly
        // outside [-1, 1], which would make acos return NaN.
        let cosine = (self.dot(other) / denominator).clamp(-1.0, 1.0);
        Ok(cosine.acos())
    }

    pub fn angle_degrees(self, other: Self) -> Result<f64, GeometryError> {
        Ok(self.angle(other)?.to_degrees())
    }

    /// Rotate `self` toward `other` by exactly `angle` radians,
    /// preserving magnitude.
    ///
    /// The rotation axis is `((self x other) x self).normalized()`, so
    /// collinear inputs have no defined axis and error. Callers
    /// pre-check collinearity where it can occur.
    pub fn rotate_towards(self, other: Self, angle: f64) -> Result<Self, GeometryError> {
        // Rodrigues-style in-plane form: cos(a)*self + sin(a)*axis.
        let axis = self.cross(other).cross(self).normalized()?;
        Ok(self * angle.cos() + axis * (angle.sin() * self.magnitude()))
    }

    pub fn rotate_towards_degrees(self, other: Self, angle: f64) -> Result<Self, GeometryError> {
        self.rotate_towards(other, angle.to_radians())
    }

    /// Uniformly distributed direction on the unit sphere: three
    /// independent standard-normal samples, normalized (sphere point
    /// picking). Resamples in the measure-zero case where all three
    /// come out at the origin.
    pub fn random_direction(rng: &mut impl Rng) -> Self {
        loop {
            let candidate = Self {
                x: rng.sample(StandardNormal),
                y: rng.sample(StandardNormal),
                z: rng.sample(StandardNormal),
            };
            if let Ok(direction) = candidate.normalized() {
                return direction;
            }
        }
    }
}

impl Neg for Vec3 {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self::Output {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;

    // Division by (near-)zero is a caller-avoided precondition; the
    // only divisors in this crate are magnitudes already checked
    // against EPSILON.
    fn div(self, scalar: f64) -> Self::Output {
        self * (1.0 / scalar)
    }
}

impl std::fmt::Display for Vec3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{:.4},{:.4},{:.4}>", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_arithmetic_component_wise() {
        let a = Vec3::new(1.0, 2.0, 2.0);
        let b = Vec3::new(3.0, 4.0, 0.0);
        assert!((a + b).approx_eq(Vec3::new(4.0, 6.0, 2.0)));
        assert!((a - b).approx_eq(Vec3::new(-2.0, -2.0, 2.0)));
        assert!((-a).approx_eq(Vec3::new(-1.0, -2.0, -2.0)));
        assert!((a * 3.0).approx_eq(Vec3::new(3.0, 6.0, 6.0)));
        assert!((a / 2.0).approx_eq(Vec3::new(0.5, 1.0, 1.0)));
    }

    #[test]
    fn test_magnitude_and_distance() {
        let a = Vec3::new(1.0, 2.0, 2.0);
        assert!((a.magnitude() - 3.0).abs() < EPSILON);
        let b = Vec3::new(1.0, 2.0, 5.0);
        assert!((a.distance(b) - 3.0).abs() < EPSILON);
        assert!((b.distance(a) - 3.0).abs() < EPSILON);
    }

    #[test]
    fn test_normalized_unit_magnitude() {
        for v in [
            Vec3::new(1.0, 2.0, 2.0),
            Vec3::new(-5.0, 0.1, 3.0),
            Vec3::new(0.0, 0.0, 1e-3),
        ] {
            let n = v.normalized().unwrap();
            assert!((n.magnitude() - 1.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_normalized_zero_vector_fails() {
        assert!(Vec3::ZERO.normalized().is_err());
        assert!(Vec3::new(0.0, EPSILON / 10.0, 0.0).normalized().is_err());
    }

    #[test]
    fn test_cross_anti_symmetry() {
        let a = Vec3::new(1.0, 2.0, 2.0);
        let b = Vec3::new(3.0, 4.0, 0.0);
        assert!(a.cross(b).approx_eq(-(b.cross(a))));
        // Orthogonal to both inputs.
        assert!(a.cross(b).dot(a).abs() < EPSILON);
        assert!(a.cross(b).dot(b).abs() < EPSILON);
    }

    #[test]
    fn test_angle_range_and_extremes() {
        let a = Vec3::new(1.0, 2.0, 2.0);
        let b = Vec3::new(3.0, 4.0, 0.0);
        let angle = a.angle(b).unwrap();
        assert!((0.0..=std::f64::consts::PI).contains(&angle));
        assert!(a.angle(a).unwrap().abs() < EPSILON);
        assert!((a.angle(-a).unwrap() - std::f64::consts::PI).abs() < EPSILON);
    }

    #[test]
    fn test_angle_zero_magnitude_fails() {
        let a = Vec3::new(1.0, 2.0, 2.0);
        assert!(a.angle(Vec3::ZERO).is_err());
        assert!(Vec3::ZERO.angle(a).is_err());
    }

    #[test]
    fn test_angle_degrees_perpendicular() {
        let angle = Vec3::PLUS_X.angle_degrees(Vec3::new(0.0, 1.0, 0.0)).unwrap();
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotate_towards_preserves_magnitude() {
        let v = Vec3::new(10.0, 0.0, 0.0);
        let target = Vec3::new(0.0, 1.0, 0.0);
        for step in 0..=18 {
            let angle = f64::from(step) * 5.0_f64.to_radians();
            let rotated = v.rotate_towards(target, angle).unwrap();
            assert!(
                (rotated.magnitude() - 10.0).abs() < 1e-9,
                "magnitude drifted at step {step}: {}",
                rotated.magnitude()
            );
        }
    }

    #[test]
    fn test_rotate_towards_monotone_alignment() {
        let v = Vec3::new(10.0, 0.0, 0.0);
        let target = Vec3::new(0.0, 1.0, 0.0);
        let mut previous_gap = v.angle(target).unwrap();
        for step in 1..=9 {
            let angle = f64::from(step) * 10.0_f64.to_radians();
            let rotated = v.rotate_towards(target, angle).unwrap();
            let gap = rotated.angle(target).unwrap();
            assert!(
                gap < previous_gap + EPSILON,
                "alignment regressed at step {step}: {gap} vs {previous_gap}"
            );
            previous_gap = gap;
        }
        // The full angle lands exactly on the target direction.
        let full = v.angle(target).unwrap();
        let landed = v.rotate_towards(target, full).unwrap();
        assert!(landed.normalized().unwrap().approx_eq(target));
    }

    #[test]
    fn test_rotate_towards_collinear_fails() {
        let v = Vec3::new(10.0, 0.0, 0.0);
        assert!(v.rotate_towards(v * 2.0, 0.1).is_err());
        assert!(v.rotate_towards(-v, 0.1).is_err());
    }

    #[test]
    fn test_random_direction_is_unit() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..100 {
            let d = Vec3::random_direction(&mut rng);
            assert!((d.magnitude() - 1.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_random_direction_covers_octants() {
        // Coarse uniformity check: with 512 draws every octant of the
        // sphere should be hit.
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut octants = [false; 8];
        for _ in 0..512 {
            let d = Vec3::random_direction(&mut rng);
            let index = usize::from(d.x > 0.0)
                | (usize::from(d.y > 0.0) << 1)
                | (usize::from(d.z > 0.0) << 2);
            octants[index] = true;
        }
        assert!(octants.iter().all(|&hit| hit));
    }
}
