// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Neighbor lists and mark-to-identifier resolution.
//!
//! Each fixture names its neighbors by mark in a slash-delimited parameter,
//! conventionally terminated by a delimiter (`"A1/B2/"`). The terminal empty
//! slot is kept so slot counts match the raw split, but it is never resolved
//! or exported.
//!
//! Resolution scans every beacon for every slot. Runs hold tens of beacons,
//! so the quadratic scan stays cheap and keeps the exact rewrite order:
//! once a slot is rewritten it holds an id, so later beacons sharing the
//! same mark no longer match it.

use rustc_hash::FxHashMap;

use crate::beacon::Beacon;
use crate::error::Error;

/// Neighbor delimiter used by the host parameter
pub const NEIGHBOR_DELIMITER: char = '/';

/// Split neighbor marks of one fixture
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NeighborList {
    slots: Vec<String>,
    malformed: bool,
    degraded: bool,
}

impl NeighborList {
    /// Splits a raw neighbor parameter.
    ///
    /// Empty interior segments (`"A//B"`, `"/A/"`) make the list malformed.
    /// The split is kept so the remaining marks still resolve, and each gap
    /// is exported as an empty neighbor. A malformed list with no mark at all
    /// (`"/"`, `"//"`) degrades to a single unresolved slot holding the raw
    /// text.
    pub fn parse(raw: &str) -> Self {
        let slots: Vec<String> = raw.split(NEIGHBOR_DELIMITER).map(str::to_string).collect();
        let malformed = slots[..slots.len() - 1].iter().any(|s| s.is_empty());

        if malformed && slots.iter().all(|s| s.is_empty()) {
            tracing::debug!(raw, "degrading neighbor list without marks");
            return Self {
                slots: vec![raw.to_string()],
                malformed,
                degraded: true,
            };
        }

        Self {
            slots,
            malformed,
            degraded: false,
        }
    }

    /// Whether an empty segment precedes the final slot
    pub fn is_malformed(&self) -> bool {
        self.malformed
    }

    /// Whether parsing fell back to a single raw slot
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// The malformed-list error carrying the raw parameter, if any
    pub fn issue(&self) -> Option<Error> {
        self.malformed
            .then(|| Error::MalformedNeighborList(self.slots.join(&NEIGHBOR_DELIMITER.to_string())))
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    pub fn into_slots(self) -> Vec<String> {
        self.slots
    }
}

/// Slots that take part in resolution and export.
///
/// Drops the terminal empty slot left by a trailing delimiter.
pub fn significant_slots(slots: &[String]) -> &[String] {
    match slots.split_last() {
        Some((last, rest)) if last.is_empty() => rest,
        _ => slots,
    }
}

/// Rewrites neighbor marks into beacon identifiers, in place.
///
/// Matching is exact and case-sensitive against `mark`, never against `id`.
/// Unmatched slots keep their raw mark. Empty slots never match. When
/// several beacons share a mark (see [`duplicate_marks`]), the first of them
/// in slice order wins.
pub fn resolve(beacons: &mut [Beacon]) {
    let targets: Vec<(String, String)> = beacons
        .iter()
        .map(|b| (b.mark.clone(), b.id.clone()))
        .collect();

    let mut rewritten = 0usize;
    for beacon in beacons.iter_mut() {
        let len = significant_slots(&beacon.neighbors).len();
        for slot in beacon.neighbors[..len].iter_mut() {
            if slot.is_empty() {
                continue;
            }
            for (mark, id) in &targets {
                if *slot == *mark {
                    *slot = id.clone();
                    rewritten += 1;
                }
            }
        }
    }

    tracing::debug!(beacons = beacons.len(), rewritten, "resolved neighbor marks");
}

/// Marks carried by more than one beacon, in first-seen order.
///
/// A duplicated mark makes resolution ambiguous.
pub fn duplicate_marks(beacons: &[Beacon]) -> Vec<String> {
    let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
    let mut order = Vec::new();
    for beacon in beacons {
        let count = counts.entry(beacon.mark.as_str()).or_insert(0);
        *count += 1;
        if *count == 2 {
            order.push(beacon.mark.clone());
        }
    }
    order
}
