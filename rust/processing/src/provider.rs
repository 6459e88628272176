// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boundary to the modeling host.
//!
//! The pipeline never touches host types. An adapter for the host (or a
//! file-backed stand-in) implements [`ElementProvider`].

use std::path::{Path, PathBuf};

use bde_core::{LocalPoint, RawFixture, Result, SiteAnchor};
use serde::{Deserialize, Serialize};

/// Snapshot of the fixtures selected in one user action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    /// Path of the host document the fixtures belong to
    pub document_path: PathBuf,
    /// Building name written to the topology root
    pub building_name: String,
    pub anchor: SiteAnchor,
    #[serde(default)]
    pub fixtures: Vec<RawFixture>,
}

/// Host capabilities the export pipeline relies on
pub trait ElementProvider {
    /// Returns the currently selected fixtures with the site anchor.
    fn selection(&mut self) -> Result<Selection>;

    /// Places a text label in the host document at a model location.
    fn place_label(&mut self, text: &str, at: LocalPoint) -> Result<()>;
}

impl<P: ElementProvider + ?Sized> ElementProvider for &mut P {
    fn selection(&mut self) -> Result<Selection> {
        (**self).selection()
    }

    fn place_label(&mut self, text: &str, at: LocalPoint) -> Result<()> {
        (**self).place_label(text, at)
    }
}

/// Topology file for a host document: same name, `.xml` extension.
pub fn topology_path_for(document_path: &Path) -> PathBuf {
    document_path.with_extension("xml")
}
