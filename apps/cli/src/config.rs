// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Export configuration loaded from environment variables.

use bde_core::UnitFactors;
use bde_processing::{ExportConfig, DEFAULT_FIXTURE_TYPES};

/// Command-line configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Model length unit to meters.
    pub length_to_meters: f64,
    /// Meters to decimal degrees.
    pub meters_to_degrees: f64,
    /// Exported fixture types (comma-separated, empty for all).
    pub allowed_types: Vec<String>,
    /// `continue` or `abort`.
    pub label_failures: String,
    /// `zero` or `level`.
    pub elevation_index: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = UnitFactors::default();
        Self {
            length_to_meters: get("BDE_LENGTH_TO_METERS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.length_to_meters),
            meters_to_degrees: get("BDE_METERS_TO_DEGREES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.meters_to_degrees),
            allowed_types: get("BDE_ALLOWED_TYPES")
                .unwrap_or_else(|| DEFAULT_FIXTURE_TYPES.join(","))
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            label_failures: get("BDE_LABEL_FAILURES").unwrap_or_else(|| "continue".into()),
            elevation_index: get("BDE_ELEVATION_INDEX").unwrap_or_else(|| "zero".into()),
        }
    }

    /// Pipeline configuration; unknown policy names are rejected.
    pub fn export_config(&self) -> Result<ExportConfig, String> {
        Ok(ExportConfig {
            factors: UnitFactors {
                length_to_meters: self.length_to_meters,
                meters_to_degrees: self.meters_to_degrees,
            },
            allowed_types: self.allowed_types.clone(),
            label_failures: self.label_failures.parse()?,
            elevation_index: self.elevation_index.parse()?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
