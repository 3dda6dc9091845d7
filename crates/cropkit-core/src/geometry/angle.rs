//! Rotation angle in degrees.

use serde::{Deserialize, Serialize};

/// A rotation angle in degrees, positive = clockwise.
///
/// Any finite value is accepted and interpreted modulo 360. Non-finite values
/// normalize to 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Angle(f64);

impl Angle {
    /// No rotation.
    pub const ZERO: Angle = Angle(0.0);

    pub fn from_degrees(degrees: f64) -> Self {
        Self(degrees)
    }

    /// The angle as given, not normalized.
    pub fn degrees(self) -> f64 {
        self.0
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// The angle reduced to `[0, 360)`.
    pub fn normalized(self) -> f64 {
        if !self.0.is_finite() {
            return 0.0;
        }
        let n = self.0.rem_euclid(360.0);
        // rem_euclid rounds tiny negative inputs up to exactly 360.0
        if n >= 360.0 {
            0.0
        } else {
            n
        }
    }

    /// True for 0, 90, 180 and 270 degrees (mod 360).
    pub fn is_quarter_turn(self) -> bool {
        (self.normalized() / 90.0).fract() == 0.0
    }

    /// `(sin θ, cos θ)` with exact values at quarter turns.
    ///
    /// `f64::sin(PI)` is about 1.2e-16 rather than 0, which would leak into
    /// bounding boxes and sampling coordinates at axis-aligned rotations.
    pub fn sin_cos(self) -> (f64, f64) {
        let n = self.normalized();
        let quarter = n / 90.0;
        if quarter.fract() == 0.0 {
            return match quarter as u8 {
                0 => (0.0, 1.0),
                1 => (1.0, 0.0),
                2 => (0.0, -1.0),
                _ => (-1.0, 0.0),
            };
        }
        n.to_radians().sin_cos()
    }
}

impl From<f64> for Angle {
    fn from(degrees: f64) -> Self {
        Self(degrees)
    }
}
