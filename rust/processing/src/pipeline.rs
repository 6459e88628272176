// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fixture selection to topology file.
//!
//! A run goes: build beacons fixture by fixture, resolve neighbors, sort by
//! elevation index, write the document once. A failing fixture is recorded
//! in the report and the remaining fixtures are still processed. Writing the
//! file is the only run-level failure.

use std::path::Path;

use bde_core::{
    colliding_ids, duplicate_marks, resolve, sort_by_elevation, Beacon, GeoTransform, RawFixture,
    Result,
};

use crate::config::{ExportConfig, LabelFailurePolicy};
use crate::provider::{topology_path_for, ElementProvider, Selection};
use crate::report::{ExportReport, FixtureFailure};

/// Export pipeline for one configuration
#[derive(Debug, Clone, Default)]
pub struct ExportPipeline {
    config: ExportConfig,
}

impl ExportPipeline {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Runs the export for the provider's current selection.
    ///
    /// The document is written next to the host document.
    pub fn run<P: ElementProvider + ?Sized>(&self, provider: &mut P) -> Result<ExportReport> {
        let selection = provider.selection()?;
        let output = topology_path_for(&selection.document_path);
        self.run_selection(provider, &selection, &output)
    }

    /// Runs the export for a given selection, writing to `output`.
    pub fn run_selection<P: ElementProvider + ?Sized>(
        &self,
        provider: &mut P,
        selection: &Selection,
        output: &Path,
    ) -> Result<ExportReport> {
        let mut report = self.process(provider, selection);
        bde_export::export_to_path(output, &report.building_name, &report.beacons)?;
        report.output_path = Some(output.to_path_buf());
        Ok(report)
    }

    /// Builds, labels, links and orders beacons without writing anything.
    pub fn process<P: ElementProvider + ?Sized>(
        &self,
        provider: &mut P,
        selection: &Selection,
    ) -> ExportReport {
        let start = std::time::Instant::now();
        let transform = GeoTransform::new(selection.anchor, self.config.factors);

        tracing::info!(
            building = %selection.building_name,
            fixtures = selection.fixtures.len(),
            true_north = selection.anchor.true_north_angle_radians,
            "Starting beacon export"
        );

        let mut report = ExportReport {
            building_name: selection.building_name.clone(),
            ..ExportReport::default()
        };

        for (index, fixture) in selection.fixtures.iter().enumerate() {
            if !self.config.accepts(&fixture.type_name) {
                tracing::debug!(index, type_name = %fixture.type_name, "Skipping fixture type");
                report.skipped += 1;
                continue;
            }

            match self.build_beacon(provider, &transform, index, fixture, &mut report) {
                Ok((beacon, warnings)) => {
                    report.beacons.push(beacon);
                    report.warnings.extend(warnings);
                }
                Err(error) => {
                    let failure = FixtureFailure {
                        index,
                        element: fixture.describe(),
                        error,
                    };
                    tracing::warn!(kind = ?failure.kind(), "{failure}");
                    report.failures.push(failure);
                }
            }
        }

        link_beacons(&mut report);

        tracing::info!(
            beacons = report.beacons.len(),
            failures = report.failures.len(),
            warnings = report.warnings.len(),
            skipped = report.skipped,
            elapsed_ms = start.elapsed().as_millis(),
            "Beacon export processed"
        );
        report
    }

    /// One fixture: raw beacon, label, geo-located beacon.
    ///
    /// Warnings come back with the beacon, so a fixture that fails later
    /// leaves none behind.
    fn build_beacon<P: ElementProvider + ?Sized>(
        &self,
        provider: &mut P,
        transform: &GeoTransform,
        index: usize,
        fixture: &RawFixture,
        report: &mut ExportReport,
    ) -> Result<(Beacon, Vec<FixtureFailure>)> {
        let elevation_index = self.config.elevation_index_for(fixture);
        let raw = Beacon::raw(fixture, elevation_index)?;
        let mut warnings = Vec::new();

        if let Some(error) = fixture.neighbor_list()?.issue() {
            tracing::warn!(index, mark = %raw.mark, "{error}");
            warnings.push(FixtureFailure {
                index,
                element: fixture.describe(),
                error,
            });
        }

        match label_fixture(provider, fixture, &raw) {
            Ok(()) => report.labels_placed += 1,
            Err(error) if self.config.label_failures == LabelFailurePolicy::AbortFixture => {
                return Err(error)
            }
            Err(error) => {
                tracing::warn!(index, mark = %raw.mark, "{error}");
                warnings.push(FixtureFailure {
                    index,
                    element: fixture.describe(),
                    error,
                });
            }
        }

        let geo = transform.to_geo(fixture.local_point());
        let beacon = Beacon::located(fixture, &geo, elevation_index)?;
        Ok((beacon, warnings))
    }
}

/// Places the fixture's mark at its raw model location.
pub fn label_fixture<P: ElementProvider + ?Sized>(
    provider: &mut P,
    fixture: &RawFixture,
    raw: &Beacon,
) -> Result<()> {
    provider.place_label(&raw.mark, fixture.local_point())
}

/// Resolves neighbors, sorts, and records ambiguity diagnostics.
fn link_beacons(report: &mut ExportReport) {
    resolve(&mut report.beacons);
    sort_by_elevation(&mut report.beacons);

    report.duplicate_marks = duplicate_marks(&report.beacons);
    for mark in &report.duplicate_marks {
        tracing::warn!(mark = %mark, "Mark used by several beacons, neighbor links are ambiguous");
    }

    report.colliding_ids = colliding_ids(&report.beacons);
    for (id, marks) in &report.colliding_ids {
        tracing::warn!(id = %id, ?marks, "Beacons share an identifier");
    }
}
