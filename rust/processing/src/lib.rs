// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Beacon export pipeline shared by host adapters and the command line.
//!
//! ```rust,ignore
//! use bde_processing::{ExportConfig, ExportPipeline};
//!
//! let report = ExportPipeline::new(ExportConfig::default()).run(&mut host)?;
//! for failure in &report.failures {
//!     host.show_message(&failure.to_string());
//! }
//! ```

pub mod config;
pub mod pipeline;
pub mod provider;
pub mod report;

pub use config::{
    level_number, ElevationIndexSource, ExportConfig, LabelFailurePolicy, DEFAULT_FIXTURE_TYPES,
};
pub use pipeline::{label_fixture, ExportPipeline};
pub use provider::{topology_path_for, ElementProvider, Selection};
pub use report::{ExportReport, FixtureFailure};
