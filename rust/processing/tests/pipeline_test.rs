// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end export runs against an in-memory host.

use approx::assert_relative_eq;
use bde_core::{
    identifier, Error, ErrorKind, LocalPoint, RawFixture, Result, SiteAnchor, FEET_TO_METERS,
    METERS_TO_DECIMAL_DEGREES,
};
use bde_export::parse_topology;
use bde_processing::{
    ElementProvider, ExportConfig, ExportPipeline, LabelFailurePolicy, Selection,
};

/// Host stand-in that records labels and can refuse some of them
struct RecordingHost {
    selection: Selection,
    labels: Vec<(String, LocalPoint)>,
    refuse_labels_for: Vec<String>,
}

impl RecordingHost {
    fn new(selection: Selection) -> Self {
        Self {
            selection,
            labels: Vec::new(),
            refuse_labels_for: Vec::new(),
        }
    }
}

impl ElementProvider for RecordingHost {
    fn selection(&mut self) -> Result<Selection> {
        Ok(self.selection.clone())
    }

    fn place_label(&mut self, text: &str, at: LocalPoint) -> Result<()> {
        if self.refuse_labels_for.iter().any(|m| m == text) {
            return Err(Error::Annotation(format!("view is read-only for {text}")));
        }
        self.labels.push((text.to_string(), at));
        Ok(())
    }
}

fn fixture(id: &str, mark: Option<&str>, level: &str, neighbor: &str, x: f64, y: f64) -> RawFixture {
    RawFixture {
        element_id: Some(id.into()),
        category_name: "Lighting Fixtures".into(),
        type_name: "30Degree".into(),
        level_name: level.into(),
        mark: mark.map(String::from),
        node_type: Some("normal".into()),
        neighbor: Some(neighbor.into()),
        local_x: x,
        local_y: y,
        local_z: 10.0,
        ..RawFixture::default()
    }
}

fn selection(dir: &std::path::Path, fixtures: Vec<RawFixture>) -> Selection {
    Selection {
        document_path: dir.join("Tower.rvt"),
        building_name: "Tower".into(),
        anchor: SiteAnchor::new(25.0, 121.5, 0.0),
        fixtures,
    }
}

#[test]
fn run_writes_linked_topology_next_to_document() {
    let dir = tempfile::tempdir().unwrap();
    let mut host = RecordingHost::new(selection(
        dir.path(),
        vec![
            fixture("101", Some("A1"), "1F", "A2/", 0.0, 0.0),
            fixture("102", Some("A2"), "1F", "A1/A3/", 100.0, 0.0),
            fixture("103", Some("A3"), "1F", "A2/", 100.0, 100.0),
        ],
    ));

    let report = ExportPipeline::default().run(&mut host).unwrap();

    let output = dir.path().join("Tower.xml");
    assert_eq!(report.output_path.as_deref(), Some(output.as_path()));
    assert!(report.is_clean(), "{report:?}");
    assert_eq!(report.beacons.len(), 3);

    let doc = parse_topology(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(doc.building_name, "Tower");
    assert_eq!(doc.nodes.len(), 3);

    let a2 = doc.nodes.iter().find(|n| n.name == "A2").unwrap();
    let a1_id = &doc.nodes.iter().find(|n| n.name == "A1").unwrap().id;
    let a3_id = &doc.nodes.iter().find(|n| n.name == "A3").unwrap().id;
    assert_eq!(a2.neighbors, vec![a1_id.clone(), a3_id.clone()]);
}

#[test]
fn beacons_are_geo_located_from_anchor() {
    let dir = tempfile::tempdir().unwrap();
    let mut host = RecordingHost::new(selection(
        dir.path(),
        vec![fixture("101", Some("A1"), "1F", "", 100.0, 50.0)],
    ));

    let report = ExportPipeline::default().run(&mut host).unwrap();
    let beacon = &report.beacons[0];

    let deg = FEET_TO_METERS * METERS_TO_DECIMAL_DEGREES;
    assert_relative_eq!(beacon.longitude, 121.5 + 100.0 * deg, epsilon = 1e-12);
    assert_relative_eq!(beacon.latitude, 25.0 + 50.0 * deg, epsilon = 1e-12);
    assert_eq!(beacon.id, identifier::encode(beacon.longitude, beacon.latitude, 0.0));
}

#[test]
fn labels_use_mark_at_raw_location() {
    let dir = tempfile::tempdir().unwrap();
    let mut host = RecordingHost::new(selection(
        dir.path(),
        vec![
            fixture("101", Some("A1"), "1F", "", 3.0, 4.0),
            fixture("102", Some("A2"), "1F", "", -1.0, 2.0),
        ],
    ));

    let report = ExportPipeline::default().run(&mut host).unwrap();
    assert_eq!(report.labels_placed, 2);
    assert_eq!(host.labels[0], ("A1".to_string(), LocalPoint::new(3.0, 4.0, 10.0)));
    assert_eq!(host.labels[1], ("A2".to_string(), LocalPoint::new(-1.0, 2.0, 10.0)));
}

#[test]
fn missing_mark_fails_only_that_fixture() {
    let dir = tempfile::tempdir().unwrap();
    let mut host = RecordingHost::new(selection(
        dir.path(),
        vec![
            fixture("101", Some("A1"), "1F", "", 0.0, 0.0),
            fixture("102", None, "1F", "", 10.0, 0.0),
            fixture("103", Some("A3"), "1F", "", 20.0, 0.0),
        ],
    ));

    let report = ExportPipeline::default().run(&mut host).unwrap();
    assert_eq!(report.beacons.len(), 2);
    assert_eq!(report.failures.len(), 1);

    let failure = &report.failures[0];
    assert_eq!(failure.index, 1);
    assert_eq!(failure.element, "#102");
    assert_eq!(failure.kind(), ErrorKind::MissingAttribute);
    assert_eq!(report.failures_of(ErrorKind::MissingAttribute).count(), 1);

    // No label for the failed fixture
    assert_eq!(host.labels.len(), 2);
}

#[test]
fn label_failure_policy() {
    let dir = tempfile::tempdir().unwrap();
    let fixtures = vec![
        fixture("101", Some("A1"), "1F", "", 0.0, 0.0),
        fixture("102", Some("A2"), "1F", "", 10.0, 0.0),
    ];

    let mut host = RecordingHost::new(selection(dir.path(), fixtures.clone()));
    host.refuse_labels_for = vec!["A2".into()];
    let report = ExportPipeline::default().run(&mut host).unwrap();
    assert_eq!(report.beacons.len(), 2);
    assert_eq!(report.warnings_of(ErrorKind::Annotation).count(), 1);
    assert!(report.failures.is_empty());

    let mut host = RecordingHost::new(selection(dir.path(), fixtures));
    host.refuse_labels_for = vec!["A2".into()];
    let pipeline = ExportPipeline::new(ExportConfig {
        label_failures: LabelFailurePolicy::AbortFixture,
        ..ExportConfig::default()
    });
    let report = pipeline.run(&mut host).unwrap();
    assert_eq!(report.beacons.len(), 1);
    assert_eq!(report.failures_of(ErrorKind::Annotation).count(), 1);
}

#[test]
fn other_fixture_types_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let mut sprinkler = fixture("900", Some("S1"), "1F", "", 0.0, 0.0);
    sprinkler.type_name = "Sprinkler".into();
    let mut host = RecordingHost::new(selection(
        dir.path(),
        vec![sprinkler, fixture("101", Some("A1"), "1F", "", 0.0, 0.0)],
    ));

    let report = ExportPipeline::default().run(&mut host).unwrap();
    assert_eq!(report.skipped, 1);
    assert_eq!(report.beacons.len(), 1);
    assert_eq!(host.labels.len(), 1);
}

#[test]
fn malformed_neighbor_list_is_a_warning() {
    let dir = tempfile::tempdir().unwrap();
    let mut host = RecordingHost::new(selection(
        dir.path(),
        vec![
            fixture("101", Some("A"), "1F", "B//C/", 0.0, 0.0),
            fixture("102", Some("B"), "1F", "A/", 10.0, 0.0),
            fixture("103", Some("C"), "1F", "A/", 20.0, 0.0),
        ],
    ));

    let report = ExportPipeline::default().run(&mut host).unwrap();
    assert_eq!(report.beacons.len(), 3);
    assert_eq!(report.warnings_of(ErrorKind::MalformedNeighborList).count(), 1);

    let id_of = |mark: &str| report.beacons.iter().find(|b| b.mark == mark).unwrap().id.clone();
    let a = report.beacons.iter().find(|b| b.mark == "A").unwrap();
    assert_eq!(a.neighbors, vec![id_of("B"), String::new(), id_of("C"), String::new()]);

    // The gap is written as an empty neighbor attribute
    let doc = parse_topology(&std::fs::read_to_string(dir.path().join("Tower.xml")).unwrap()).unwrap();
    let node = doc.nodes.iter().find(|n| n.name == "A").unwrap();
    assert_eq!(node.neighbors, vec![id_of("B"), String::new(), id_of("C")]);
}

#[test]
fn neighbor_list_without_marks_is_kept_raw() {
    let dir = tempfile::tempdir().unwrap();
    let mut host = RecordingHost::new(selection(
        dir.path(),
        vec![fixture("101", Some("A"), "1F", "//", 0.0, 0.0)],
    ));

    let report = ExportPipeline::default().run(&mut host).unwrap();
    assert_eq!(report.warnings_of(ErrorKind::MalformedNeighborList).count(), 1);
    assert_eq!(report.beacons[0].neighbors, vec!["//"]);
}

#[test]
fn aborted_fixture_leaves_no_warnings() {
    let dir = tempfile::tempdir().unwrap();
    let mut host = RecordingHost::new(selection(
        dir.path(),
        vec![fixture("101", Some("A"), "1F", "B//", 0.0, 0.0)],
    ));
    host.refuse_labels_for = vec!["A".into()];
    let pipeline = ExportPipeline::new(ExportConfig {
        label_failures: LabelFailurePolicy::AbortFixture,
        ..ExportConfig::default()
    });

    let report = pipeline.run(&mut host).unwrap();
    assert!(report.beacons.is_empty());
    assert_eq!(report.failures_of(ErrorKind::Annotation).count(), 1);
    assert!(report.warnings.is_empty());
}

#[test]
fn level_name_ordering_when_enabled() {
    let dir = tempfile::tempdir().unwrap();
    let mut host = RecordingHost::new(selection(
        dir.path(),
        vec![
            fixture("103", Some("C"), "3F", "", 0.0, 0.0),
            fixture("101", Some("A"), "1F", "", 0.0, 0.0),
            fixture("102", Some("B"), "2F", "", 0.0, 0.0),
        ],
    ));
    let pipeline = ExportPipeline::new(ExportConfig {
        elevation_index: bde_processing::ElevationIndexSource::LevelName,
        ..ExportConfig::default()
    });

    let report = pipeline.run(&mut host).unwrap();
    let marks: Vec<&str> = report.beacons.iter().map(|b| b.mark.as_str()).collect();
    assert_eq!(marks, vec!["A", "B", "C"]);
    // Same coordinates, different floors: distinct ids
    assert!(report.colliding_ids.is_empty());
}

#[test]
fn stacked_fixtures_collide_with_default_index() {
    let dir = tempfile::tempdir().unwrap();
    let mut host = RecordingHost::new(selection(
        dir.path(),
        vec![
            fixture("101", Some("A"), "1F", "", 5.0, 5.0),
            fixture("201", Some("B"), "2F", "", 5.0, 5.0),
        ],
    ));

    let report = ExportPipeline::default().run(&mut host).unwrap();
    assert_eq!(report.colliding_ids.len(), 1);
    assert_eq!(report.colliding_ids[0].1, vec!["A".to_string(), "B".to_string()]);
}

#[test]
fn unwritable_output_is_a_run_failure() {
    let dir = tempfile::tempdir().unwrap();
    let mut sel = selection(dir.path(), vec![fixture("101", Some("A1"), "1F", "", 0.0, 0.0)]);
    sel.document_path = dir.path().join("missing").join("Tower.rvt");
    let mut host = RecordingHost::new(sel);

    let err = ExportPipeline::default().run(&mut host).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn each_run_starts_from_scratch() {
    let dir = tempfile::tempdir().unwrap();
    let mut host = RecordingHost::new(selection(
        dir.path(),
        vec![
            fixture("101", Some("A1"), "1F", "", 0.0, 0.0),
            fixture("102", Some("A2"), "1F", "", 10.0, 0.0),
        ],
    ));
    let pipeline = ExportPipeline::default();
    pipeline.run(&mut host).unwrap();

    host.selection.fixtures.truncate(1);
    let report = pipeline.run(&mut host).unwrap();
    assert_eq!(report.beacons.len(), 1);

    let xml = std::fs::read_to_string(dir.path().join("Tower.xml")).unwrap();
    assert_eq!(parse_topology(&xml).unwrap().nodes.len(), 1);
}
