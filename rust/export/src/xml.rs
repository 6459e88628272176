// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building topology XML.
//!
//! The document lists every beacon twice: once as a short `node` inside the
//! `region` element, and once as a full `node` directly under `Building`.
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <Building name="Tower">
//!   <region>
//!     <node id="..." name="L1" region="" category=""/>
//!   </region>
//!   <node id="..." name="L1" region="" lat="25.041171" lon="121.537845"
//!         neighbor1="..." category="" nodeType="normal" connectPointID=""
//!         groupID="" elevation="1F"/>
//! </Building>
//! ```
//!
//! There is no region model yet, so `region` and `category` are always empty.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use bde_core::Beacon;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::error::{Error, Result};
use crate::format::format_coordinate;

const BUILDING: &str = "Building";
const REGION: &str = "region";
const NODE: &str = "node";
const NEIGHBOR_PREFIX: &str = "neighbor";

/// Writes the topology document for `beacons`, in the given order.
///
/// Callers sort by elevation index first (see [`bde_core::sort_by_elevation`]).
pub fn write_topology<W: Write>(inner: W, building_name: &str, beacons: &[Beacon]) -> Result<W> {
    if !beacons
        .windows(2)
        .all(|w| w[0].elevation_index <= w[1].elevation_index)
    {
        tracing::warn!(building = building_name, "beacons are not sorted by elevation index");
    }

    let mut writer = Writer::new_with_indent(inner, b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut building = BytesStart::new(BUILDING);
    building.push_attribute(("name", building_name));
    writer.write_event(Event::Start(building))?;

    if beacons.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(REGION)))?;
    } else {
        writer.write_event(Event::Start(BytesStart::new(REGION)))?;
        for beacon in beacons {
            writer.write_event(Event::Empty(region_node(beacon)))?;
        }
        writer.write_event(Event::End(BytesEnd::new(REGION)))?;
    }

    for beacon in beacons {
        writer.write_event(Event::Empty(building_node(beacon)))?;
    }

    writer.write_event(Event::End(BytesEnd::new(BUILDING)))?;
    Ok(writer.into_inner())
}

/// Serializes the topology document to a string.
pub fn to_xml_string(building_name: &str, beacons: &[Beacon]) -> Result<String> {
    let bytes = write_topology(Vec::new(), building_name, beacons)?;
    String::from_utf8(bytes).map_err(|e| Error::Schema(e.to_string()))
}

/// Writes the topology document to `path`, replacing any existing file.
pub fn export_to_path(path: &Path, building_name: &str, beacons: &[Beacon]) -> Result<()> {
    let file = File::create(path)?;
    let mut out = write_topology(BufWriter::new(file), building_name, beacons)?;
    out.flush()?;

    tracing::info!(
        path = %path.display(),
        building = building_name,
        beacons = beacons.len(),
        "Wrote topology document"
    );
    Ok(())
}

fn region_node(beacon: &Beacon) -> BytesStart<'_> {
    let mut node = BytesStart::new(NODE);
    node.push_attribute(("id", beacon.id.as_str()));
    node.push_attribute(("name", beacon.mark.as_str()));
    node.push_attribute(("region", ""));
    node.push_attribute(("category", ""));
    node
}

fn building_node(beacon: &Beacon) -> BytesStart<'_> {
    let mut node = BytesStart::new(NODE);
    node.push_attribute(("id", beacon.id.as_str()));
    node.push_attribute(("name", beacon.mark.as_str()));
    node.push_attribute(("region", ""));
    node.push_attribute(("lat", format_coordinate(beacon.latitude).as_str()));
    node.push_attribute(("lon", format_coordinate(beacon.longitude).as_str()));
    for (i, neighbor) in beacon.exported_neighbors().iter().enumerate() {
        let key = format!("{NEIGHBOR_PREFIX}{}", i + 1);
        node.push_attribute((key.as_str(), neighbor.as_str()));
    }
    node.push_attribute(("category", ""));
    node.push_attribute(("nodeType", beacon.node_type.as_str()));
    node.push_attribute(("connectPointID", ""));
    node.push_attribute(("groupID", ""));
    node.push_attribute(("elevation", beacon.level.as_str()));
    node
}

/// Short node listed inside `region`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionNode {
    pub id: String,
    pub name: String,
    pub region: String,
    pub category: String,
}

/// Full node listed directly under `Building`
///
/// Coordinates are kept as written so callers can check the text format.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TopologyNode {
    pub id: String,
    pub name: String,
    pub region: String,
    pub lat: String,
    pub lon: String,
    /// `neighbor1..neighborN`, in attribute-number order
    pub neighbors: Vec<String>,
    pub category: String,
    pub node_type: String,
    pub connect_point_id: String,
    pub group_id: String,
    /// Level name
    pub elevation: String,
}

impl TopologyNode {
    pub fn latitude(&self) -> Option<f64> {
        self.lat.parse().ok()
    }

    pub fn longitude(&self) -> Option<f64> {
        self.lon.parse().ok()
    }
}

/// A topology document read back from XML
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TopologyDocument {
    pub building_name: String,
    pub region_nodes: Vec<RegionNode>,
    pub nodes: Vec<TopologyNode>,
}

/// Parses a topology document.
pub fn parse_topology(xml: &str) -> Result<TopologyDocument> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut doc = TopologyDocument::default();
    let mut seen_building = false;
    let mut in_region = false;

    loop {
        let (element, open) = match reader.read_event()? {
            Event::Start(e) => (e, true),
            Event::Empty(e) => (e, false),
            Event::End(e) => {
                if e.local_name().as_ref() == REGION.as_bytes() {
                    in_region = false;
                }
                continue;
            }
            Event::Eof => break,
            _ => continue,
        };

        match element.local_name().as_ref() {
            b"Building" => {
                seen_building = true;
                for attr in element.attributes() {
                    let attr = attr?;
                    if attr.key.as_ref() == b"name" {
                        doc.building_name = attr.unescape_value()?.into_owned();
                    }
                }
            }
            b"region" => in_region = open,
            b"node" if in_region => doc.region_nodes.push(read_region_node(&element)?),
            b"node" => doc.nodes.push(read_topology_node(&element)?),
            other => {
                return Err(Error::Schema(format!(
                    "unexpected element <{}>",
                    String::from_utf8_lossy(other)
                )))
            }
        }
    }

    if !seen_building {
        return Err(Error::Schema("missing <Building> root".into()));
    }
    Ok(doc)
}

fn read_region_node(e: &BytesStart<'_>) -> Result<RegionNode> {
    let mut node = RegionNode::default();
    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?.into_owned();
        match attr.key.as_ref() {
            b"id" => node.id = value,
            b"name" => node.name = value,
            b"region" => node.region = value,
            b"category" => node.category = value,
            _ => {}
        }
    }
    Ok(node)
}

fn read_topology_node(e: &BytesStart<'_>) -> Result<TopologyNode> {
    let mut node = TopologyNode::default();
    let mut neighbors: Vec<(usize, String)> = Vec::new();

    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?.into_owned();
        match attr.key.as_ref() {
            b"id" => node.id = value,
            b"name" => node.name = value,
            b"region" => node.region = value,
            b"lat" => node.lat = value,
            b"lon" => node.lon = value,
            b"category" => node.category = value,
            b"nodeType" => node.node_type = value,
            b"connectPointID" => node.connect_point_id = value,
            b"groupID" => node.group_id = value,
            b"elevation" => node.elevation = value,
            key => {
                let key = String::from_utf8_lossy(key);
                if let Some(n) = key
                    .strip_prefix(NEIGHBOR_PREFIX)
                    .and_then(|n| n.parse::<usize>().ok())
                {
                    neighbors.push((n, value));
                }
            }
        }
    }

    neighbors.sort_by_key(|(n, _)| *n);
    node.neighbors = neighbors.into_iter().map(|(_, v)| v).collect();
    Ok(node)
}
