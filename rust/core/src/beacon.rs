// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fixture records and the beacon entity built from them.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::georef::{GeoPoint, LocalPoint};
use crate::identifier;
use crate::neighbors::{significant_slots, NeighborList};

/// Technical parameters of a beacon.
///
/// Reserved for future export: carried through the pipeline but not yet
/// written to the topology document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BeaconSpecs {
    /// Antenna beamwidth in degrees (e.g. 30, 60)
    pub beamwidth_degrees: Option<f64>,
    pub antenna_type: Option<String>,
    pub cable: Option<String>,
    pub connector: Option<String>,
    pub emergency_instructions: Option<String>,
    pub frequency_coverage: Option<String>,
    pub peak_gain: Option<String>,
    pub polarization: Option<String>,
    pub return_loss: Option<String>,
}

/// One selected fixture as captured from the host.
///
/// `mark`, `node_type` and `neighbor` are host parameters that may be unset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFixture {
    /// Host element id, for diagnostics only
    #[serde(default)]
    pub element_id: Option<String>,
    pub category_name: String,
    /// Family type name, e.g. `30Degree` or `LaserPointer`
    pub type_name: String,
    pub level_name: String,
    #[serde(default)]
    pub mark: Option<String>,
    #[serde(default)]
    pub node_type: Option<String>,
    /// Slash-delimited neighbor marks
    #[serde(default)]
    pub neighbor: Option<String>,
    pub local_x: f64,
    pub local_y: f64,
    pub local_z: f64,
    #[serde(default)]
    pub specs: BeaconSpecs,
}

impl RawFixture {
    /// Human-readable handle for log lines and failure reports
    pub fn describe(&self) -> String {
        match (&self.element_id, &self.mark) {
            (Some(id), Some(mark)) => format!("#{id} ({mark})"),
            (Some(id), None) => format!("#{id}"),
            (None, Some(mark)) => mark.clone(),
            (None, None) => format!("{} on {}", self.type_name, self.level_name),
        }
    }

    pub fn local_point(&self) -> LocalPoint {
        LocalPoint::new(self.local_x, self.local_y, self.local_z)
    }

    pub fn mark(&self) -> Result<&str> {
        self.mark
            .as_deref()
            .ok_or_else(|| Error::missing("Mark", self.describe()))
    }

    pub fn node_type(&self) -> Result<&str> {
        self.node_type
            .as_deref()
            .ok_or_else(|| Error::missing("NodeType", self.describe()))
    }

    pub fn neighbor_list(&self) -> Result<NeighborList> {
        self.neighbor
            .as_deref()
            .map(NeighborList::parse)
            .ok_or_else(|| Error::missing("Neighbor", self.describe()))
    }

    /// Raw split of the neighbor parameter
    pub fn neighbor_marks(&self) -> Result<Vec<String>> {
        Ok(self.neighbor_list()?.into_slots())
    }
}

/// A beacon ready for neighbor resolution and export.
///
/// `id` is derived from `(longitude, latitude, elevation_index)` when the
/// beacon is built. Only `neighbors` changes afterwards.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Beacon {
    pub id: String,
    pub mark: String,
    pub node_type: String,
    pub level: String,
    pub category_name: String,
    pub type_name: String,
    pub longitude: f64,
    pub latitude: f64,
    /// Vertical ordering key, not a computed elevation
    pub elevation_index: f64,
    /// Neighbor marks, rewritten to ids by [`crate::neighbors::resolve`]
    pub neighbors: Vec<String>,
    pub specs: BeaconSpecs,
}

impl Beacon {
    /// Beacon at the fixture's model coordinates, used for labelling
    pub fn raw(fixture: &RawFixture, elevation_index: f64) -> Result<Self> {
        Self::at(fixture, fixture.local_x, fixture.local_y, elevation_index)
    }

    /// Beacon at geo-transformed coordinates, used for export
    pub fn located(fixture: &RawFixture, geo: &GeoPoint, elevation_index: f64) -> Result<Self> {
        Self::at(fixture, geo.longitude, geo.latitude, elevation_index)
    }

    fn at(fixture: &RawFixture, longitude: f64, latitude: f64, elevation_index: f64) -> Result<Self> {
        let mark = fixture.mark()?.to_string();
        let node_type = fixture.node_type()?.to_string();
        let neighbors = fixture.neighbor_marks()?;

        Ok(Self {
            id: identifier::encode(longitude, latitude, elevation_index as f32),
            mark,
            node_type,
            level: fixture.level_name.clone(),
            category_name: fixture.category_name.clone(),
            type_name: fixture.type_name.clone(),
            longitude,
            latitude,
            elevation_index,
            neighbors,
            specs: fixture.specs.clone(),
        })
    }

    /// Neighbor slots written to the topology document
    pub fn exported_neighbors(&self) -> &[String] {
        significant_slots(&self.neighbors)
    }
}

/// Sort ascending by elevation index.
///
/// Ties keep their input order, which callers should not rely on.
pub fn sort_by_elevation(beacons: &mut [Beacon]) {
    beacons.sort_by(|a, b| a.elevation_index.total_cmp(&b.elevation_index));
}

/// Identifiers shared by more than one beacon, with the marks involved.
///
/// Beacons at identical coordinates encode to the same id; this only
/// reports the collision, it does not disambiguate.
pub fn colliding_ids(beacons: &[Beacon]) -> Vec<(String, Vec<String>)> {
    let mut by_id: FxHashMap<&str, Vec<String>> = FxHashMap::default();
    let mut order = Vec::new();
    for beacon in beacons {
        let marks = by_id.entry(beacon.id.as_str()).or_default();
        if marks.is_empty() {
            order.push(beacon.id.as_str());
        }
        marks.push(beacon.mark.clone());
    }

    order
        .into_iter()
        .filter_map(|id| {
            let marks = &by_id[id];
            (marks.len() > 1).then(|| (id.to_string(), marks.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(mark: &str, neighbor: &str) -> RawFixture {
        RawFixture {
            element_id: Some("312".into()),
            category_name: "Lighting Fixtures".into(),
            type_name: "30Degree".into(),
            level_name: "1F".into(),
            mark: Some(mark.into()),
            node_type: Some("normal".into()),
            neighbor: Some(neighbor.into()),
            local_x: 12.0,
            local_y: -4.5,
            local_z: 9.0,
            specs: BeaconSpecs::default(),
        }
    }

    #[test]
    fn located_beacon_encodes_geo_coordinates() {
        let geo = GeoPoint {
            longitude: 121.5,
            latitude: 25.0,
            z: 0.0,
        };
        let beacon = Beacon::located(&fixture("L1", "L2/L3/"), &geo, 0.0).unwrap();
        assert_eq!(beacon.id, identifier::encode(121.5, 25.0, 0.0));
        assert_eq!(beacon.mark, "L1");
        assert_eq!(beacon.level, "1F");
        assert_eq!(beacon.neighbors, vec!["L2", "L3", ""]);
        assert_eq!(beacon.exported_neighbors(), &["L2", "L3"]);
    }

    #[test]
    fn raw_beacon_uses_local_coordinates() {
        let beacon = Beacon::raw(&fixture("L1", ""), 0.0).unwrap();
        assert_eq!(beacon.longitude, 12.0);
        assert_eq!(beacon.latitude, -4.5);
    }

    #[test]
    fn missing_parameters_are_reported() {
        let mut f = fixture("L1", "");
        f.mark = None;
        let err = Beacon::raw(&f, 0.0).unwrap_err();
        assert!(matches!(err, Error::MissingAttribute { attribute: "Mark", .. }));

        let mut f = fixture("L1", "");
        f.node_type = None;
        assert!(matches!(
            Beacon::raw(&f, 0.0),
            Err(Error::MissingAttribute { attribute: "NodeType", .. })
        ));

        let mut f = fixture("L1", "");
        f.neighbor = None;
        assert!(matches!(
            Beacon::raw(&f, 0.0),
            Err(Error::MissingAttribute { attribute: "Neighbor", .. })
        ));
    }

    #[test]
    fn sorts_by_elevation_index() {
        let mut beacons: Vec<Beacon> = [3.0, 1.0, 2.0]
            .iter()
            .map(|&z| Beacon {
                mark: format!("M{z}"),
                elevation_index: z,
                ..Beacon::default()
            })
            .collect();
        sort_by_elevation(&mut beacons);
        let marks: Vec<&str> = beacons.iter().map(|b| b.mark.as_str()).collect();
        assert_eq!(marks, vec!["M1", "M2", "M3"]);
    }

    #[test]
    fn identical_coordinates_collide() {
        let geo = GeoPoint {
            longitude: 121.5,
            latitude: 25.0,
            z: 0.0,
        };
        let beacons = vec![
            Beacon::located(&fixture("A", ""), &geo, 0.0).unwrap(),
            Beacon::located(&fixture("B", ""), &geo, 0.0).unwrap(),
        ];
        let collisions = colliding_ids(&beacons);
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].1, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn fixture_json_defaults() {
        let f: RawFixture = serde_json::from_str(
            r#"{
                "categoryName": "Lighting Fixtures",
                "typeName": "LaserPointer",
                "levelName": "2F",
                "mark": "P7",
                "localX": 1.0, "localY": 2.0, "localZ": 3.0
            }"#,
        )
        .unwrap();
        assert_eq!(f.mark.as_deref(), Some("P7"));
        assert!(f.node_type.is_none());
        assert_eq!(f.specs, BeaconSpecs::default());
        assert_eq!(f.describe(), "P7");
    }
}
