// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Linear unit and angular offset conversions
//!
//! Model coordinates arrive in the host's internal length unit (feet for the
//! building models we export from). They are scaled to meters, then turned
//! into decimal-degree deltas with a planar small-angle approximation.

use serde::{Deserialize, Serialize};

/// Feet to meters (the host's internal length unit)
pub const FEET_TO_METERS: f64 = 0.3048;

/// Meters to decimal degrees
///
/// 1.11 m is roughly 0.00001°, 0.111 m roughly 0.000001°. This is a flat
/// approximation: it ignores latitude and is only usable for short offsets
/// from the anchor.
pub const METERS_TO_DECIMAL_DEGREES: f64 = 0.000009;

/// Convert a length in model units to meters
#[inline]
pub fn length_to_meters(value: f64, factor: f64) -> f64 {
    value * factor
}

/// Convert a metric offset to a decimal-degree delta
#[inline]
pub fn meters_to_decimal_degrees(meters: f64, factor: f64) -> f64 {
    meters * factor
}

/// The pair of factors used by one export run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitFactors {
    /// Model length unit to meters
    pub length_to_meters: f64,
    /// Meters to decimal degrees
    pub meters_to_degrees: f64,
}

impl Default for UnitFactors {
    fn default() -> Self {
        Self {
            length_to_meters: FEET_TO_METERS,
            meters_to_degrees: METERS_TO_DECIMAL_DEGREES,
        }
    }
}

impl UnitFactors {
    /// Model length straight to a decimal-degree delta
    #[inline]
    pub fn length_to_degrees(&self, value: f64) -> f64 {
        meters_to_decimal_degrees(
            length_to_meters(value, self.length_to_meters),
            self.meters_to_degrees,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_feet_to_meters() {
        assert_relative_eq!(length_to_meters(10.0, FEET_TO_METERS), 3.048);
        assert_eq!(length_to_meters(0.0, FEET_TO_METERS), 0.0);
        assert_relative_eq!(length_to_meters(-1.0, FEET_TO_METERS), -0.3048);
    }

    #[test]
    fn test_meters_to_degrees() {
        assert_relative_eq!(
            meters_to_decimal_degrees(1.11, METERS_TO_DECIMAL_DEGREES),
            0.00000999,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_conversion_chain_is_linear() {
        let factors = UnitFactors::default();
        for v in [0.5, 3.0, 120.0, -42.0] {
            let once = factors.length_to_degrees(v);
            let twice = factors.length_to_degrees(2.0 * v);
            assert_relative_eq!(twice, 2.0 * once, max_relative = 1e-12);
        }
    }
}
