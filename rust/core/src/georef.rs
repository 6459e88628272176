// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Site georeferencing
//!
//! Rotates model coordinates from project north to true north and offsets
//! them from the site anchor to produce longitude/latitude.

use nalgebra::{Point3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use crate::units::{length_to_meters, meters_to_decimal_degrees, UnitFactors};

/// Real-world origin of the building model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteAnchor {
    /// Anchor latitude in decimal degrees
    pub latitude_degrees: f64,
    /// Anchor longitude in decimal degrees
    pub longitude_degrees: f64,
    /// Signed angle from project north to true north
    pub true_north_angle_radians: f64,
}

impl SiteAnchor {
    pub fn new(latitude_degrees: f64, longitude_degrees: f64, true_north_angle_radians: f64) -> Self {
        Self {
            latitude_degrees,
            longitude_degrees,
            true_north_angle_radians,
        }
    }

    /// Build from a site position reported in radians
    pub fn from_radians(latitude: f64, longitude: f64, true_north_angle_radians: f64) -> Self {
        Self::new(latitude.to_degrees(), longitude.to_degrees(), true_north_angle_radians)
    }
}

/// Point in the host's local (model) frame, in model length units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LocalPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl LocalPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Geo-located point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
    /// Rotated height in meters; not used as an elevation
    pub z: f64,
}

/// Model-to-geographic transform for one site
///
/// The rotation is built once per export run and reused for every fixture.
#[derive(Debug, Clone)]
pub struct GeoTransform {
    anchor: SiteAnchor,
    rotation: Rotation3<f64>,
    factors: UnitFactors,
}

impl GeoTransform {
    pub fn new(anchor: SiteAnchor, factors: UnitFactors) -> Self {
        let rotation =
            Rotation3::from_axis_angle(&Vector3::z_axis(), anchor.true_north_angle_radians);
        Self {
            anchor,
            rotation,
            factors,
        }
    }

    pub fn anchor(&self) -> &SiteAnchor {
        &self.anchor
    }

    pub fn factors(&self) -> &UnitFactors {
        &self.factors
    }

    /// Rotate about the vertical axis into true-north alignment
    #[inline]
    pub fn rotate(&self, point: LocalPoint) -> LocalPoint {
        let p = self.rotation * Point3::new(point.x, point.y, point.z);
        LocalPoint::new(p.x, p.y, p.z)
    }

    /// Transform a local point to longitude/latitude
    pub fn to_geo(&self, point: LocalPoint) -> GeoPoint {
        let rotated = self.rotate(point);

        let x_meters = length_to_meters(rotated.x, self.factors.length_to_meters);
        let y_meters = length_to_meters(rotated.y, self.factors.length_to_meters);
        let z_meters = length_to_meters(rotated.z, self.factors.length_to_meters);

        GeoPoint {
            longitude: self.anchor.longitude_degrees
                + meters_to_decimal_degrees(x_meters, self.factors.meters_to_degrees),
            latitude: self.anchor.latitude_degrees
                + meters_to_decimal_degrees(y_meters, self.factors.meters_to_degrees),
            z: z_meters,
        }
    }
}

/// One-shot transform of a local point
///
/// The angle is passed separately from the anchor so a caller can override
/// the site's true-north angle.
pub fn to_geo(
    point: LocalPoint,
    true_north_angle_radians: f64,
    anchor: &SiteAnchor,
    length_to_meter_factor: f64,
    meter_to_degree_factor: f64,
) -> GeoPoint {
    let anchor = SiteAnchor {
        true_north_angle_radians,
        ..*anchor
    };
    let factors = UnitFactors {
        length_to_meters: length_to_meter_factor,
        meters_to_degrees: meter_to_degree_factor,
    };
    GeoTransform::new(anchor, factors).to_geo(point)
}
