// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # BDE Export
//!
//! Writes resolved beacons as a building topology XML document for the
//! indoor-positioning system, and reads such documents back.

pub mod error;
pub mod format;
pub mod xml;

pub use error::{Error, Result};
pub use format::format_coordinate;
pub use xml::{
    export_to_path, parse_topology, to_xml_string, write_topology, RegionNode, TopologyDocument,
    TopologyNode,
};
