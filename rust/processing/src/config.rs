// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Export run configuration.

use std::str::FromStr;

use bde_core::{RawFixture, UnitFactors};
use serde::{Deserialize, Serialize};

/// Fixture family types exported by default.
pub const DEFAULT_FIXTURE_TYPES: [&str; 3] = ["30Degree", "60Degree", "LaserPointer"];

/// What happens to a fixture whose label could not be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelFailurePolicy {
    /// Record the failure and still export the beacon.
    #[default]
    Continue,
    /// Treat the fixture as failed and leave it out of the export.
    AbortFixture,
}

impl FromStr for LabelFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continue" => Ok(Self::Continue),
            "abort" | "abort-fixture" => Ok(Self::AbortFixture),
            other => Err(format!("unknown label failure policy: {other}")),
        }
    }
}

/// Where a beacon's elevation index comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElevationIndexSource {
    /// Every beacon gets index 0, which keeps identifiers compatible with
    /// topology files already deployed in the field.
    #[default]
    Zero,
    /// Numeric prefix of the level name (`"3F"` -> 3). Changes identifiers.
    LevelName,
}

impl FromStr for ElevationIndexSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zero" => Ok(Self::Zero),
            "level" | "level-name" => Ok(Self::LevelName),
            other => Err(format!("unknown elevation index source: {other}")),
        }
    }
}

/// Settings for one export run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportConfig {
    pub factors: UnitFactors,
    /// Accepted fixture type names; empty accepts every type.
    pub allowed_types: Vec<String>,
    pub label_failures: LabelFailurePolicy,
    pub elevation_index: ElevationIndexSource,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            factors: UnitFactors::default(),
            allowed_types: DEFAULT_FIXTURE_TYPES.iter().map(|s| s.to_string()).collect(),
            label_failures: LabelFailurePolicy::default(),
            elevation_index: ElevationIndexSource::default(),
        }
    }
}

impl ExportConfig {
    /// Whether a fixture of this type takes part in the export
    pub fn accepts(&self, type_name: &str) -> bool {
        self.allowed_types.is_empty() || self.allowed_types.iter().any(|t| t == type_name)
    }

    /// Elevation index for a fixture
    pub fn elevation_index_for(&self, fixture: &RawFixture) -> f64 {
        match self.elevation_index {
            ElevationIndexSource::Zero => 0.0,
            ElevationIndexSource::LevelName => match level_number(&fixture.level_name) {
                Some(n) => n,
                None => {
                    tracing::warn!(
                        level = %fixture.level_name,
                        fixture = %fixture.describe(),
                        "Level name has no numeric prefix, using elevation index 0"
                    );
                    0.0
                }
            },
        }
    }
}

/// Leading number of a level name: `"12"`, `"3F"`, `"-1 Basement"`.
pub fn level_number(name: &str) -> Option<f64> {
    let name = name.trim();
    if let Ok(n) = name.parse::<f64>() {
        return Some(n);
    }

    let end = name
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && c == '-')))
        .map(|(i, _)| i)
        .unwrap_or(name.len());
    name[..end].parse().ok()
}
