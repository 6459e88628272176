// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outcome of an export run.

use std::path::PathBuf;

use bde_core::{Beacon, Error, ErrorKind};

/// A problem tied to one selected fixture
#[derive(Debug)]
pub struct FixtureFailure {
    /// Position in the selection
    pub index: usize,
    /// Element handle for messages
    pub element: String,
    pub error: Error,
}

impl FixtureFailure {
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

impl std::fmt::Display for FixtureFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fixture {} [{}]: {}", self.index, self.element, self.error)
    }
}

/// Everything a run produced, for the host to display and annotate
#[derive(Debug, Default)]
pub struct ExportReport {
    pub building_name: String,
    /// Written topology file; `None` until the document is persisted
    pub output_path: Option<PathBuf>,
    /// Resolved beacons in export order
    pub beacons: Vec<Beacon>,
    /// Fixtures left out of the export
    pub failures: Vec<FixtureFailure>,
    /// Non-fatal problems on exported fixtures
    pub warnings: Vec<FixtureFailure>,
    /// Fixtures whose type is not exported
    pub skipped: usize,
    pub labels_placed: usize,
    pub duplicate_marks: Vec<String>,
    /// Identifiers shared by several beacons, with their marks
    pub colliding_ids: Vec<(String, Vec<String>)>,
}

impl ExportReport {
    /// No failures and no warnings
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
            && self.warnings.is_empty()
            && self.duplicate_marks.is_empty()
            && self.colliding_ids.is_empty()
    }

    pub fn failures_of(&self, kind: ErrorKind) -> impl Iterator<Item = &FixtureFailure> {
        self.failures.iter().filter(move |f| f.kind() == kind)
    }

    pub fn warnings_of(&self, kind: ErrorKind) -> impl Iterator<Item = &FixtureFailure> {
        self.warnings.iter().filter(move |f| f.kind() == kind)
    }
}
