// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # BDE Core
//!
//! Turns beacon fixtures placed in a building model into geo-located,
//! identified and linked beacons for an indoor-positioning topology.
//!
//! ## Overview
//!
//! - **Units**: model length to meters, meters to decimal-degree deltas
//! - **Georeferencing**: true-north rotation and anchor offset
//! - **Identifiers**: UUID-shaped encoding of a beacon's coordinates
//! - **Neighbors**: slash-delimited mark lists resolved to identifiers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bde_core::{neighbors, Beacon, GeoTransform, RawFixture, SiteAnchor, UnitFactors};
//!
//! let transform = GeoTransform::new(SiteAnchor::new(25.04, 121.53, 0.1), UnitFactors::default());
//! let mut beacons = Vec::new();
//! for fixture in &fixtures {
//!     let geo = transform.to_geo(fixture.local_point());
//!     beacons.push(Beacon::located(fixture, &geo, 0.0)?);
//! }
//! neighbors::resolve(&mut beacons);
//! bde_core::sort_by_elevation(&mut beacons);
//! ```
//!
//! Geo conversion is a planar approximation and is only meaningful for
//! building-sized offsets from the anchor.

pub mod beacon;
pub mod error;
pub mod georef;
pub mod identifier;
pub mod neighbors;
pub mod units;

pub use beacon::{colliding_ids, sort_by_elevation, Beacon, BeaconSpecs, RawFixture};
pub use error::{Error, ErrorKind, Result};
pub use georef::{to_geo, GeoPoint, GeoTransform, LocalPoint, SiteAnchor};
pub use neighbors::{duplicate_marks, resolve, NeighborList};
pub use units::{
    length_to_meters, meters_to_decimal_degrees, UnitFactors, FEET_TO_METERS,
    METERS_TO_DECIMAL_DEGREES,
};
