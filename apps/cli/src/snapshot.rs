// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! File-backed host: a JSON selection snapshot in, a label sheet out.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use bde_core::{LocalPoint, Result};
use bde_processing::{ElementProvider, Selection};
use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;

/// Text label placed during an export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    pub at: LocalPoint,
}

/// Host stand-in backed by a snapshot file exported from the modeling tool.
#[derive(Debug)]
pub struct SnapshotProvider {
    source: PathBuf,
    selection: Selection,
    labels: Vec<Label>,
}

impl SnapshotProvider {
    /// Reads and parses a snapshot file.
    pub fn open(path: impl AsRef<Path>) -> std::result::Result<Self, SnapshotError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SnapshotError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let selection = serde_json::from_str(&text).map_err(|source| SnapshotError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::from_selection(path, selection))
    }

    pub fn from_selection(source: impl Into<PathBuf>, selection: Selection) -> Self {
        Self {
            source: source.into(),
            selection,
            labels: Vec::new(),
        }
    }

    /// Labels placed so far
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Label sheet path: `<snapshot>.labels.json`
    pub fn labels_path(&self) -> PathBuf {
        self.source.with_extension("labels.json")
    }

    /// Writes placed labels as a JSON array.
    pub fn write_labels(&self, path: &Path) -> std::result::Result<(), SnapshotError> {
        let mut writer = BufWriter::new(fs::File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &self.labels)?;
        writer.flush()?;
        tracing::debug!(path = %path.display(), labels = self.labels.len(), "Label sheet written");
        Ok(())
    }
}

impl ElementProvider for SnapshotProvider {
    fn selection(&mut self) -> Result<Selection> {
        Ok(self.selection.clone())
    }

    fn place_label(&mut self, text: &str, at: LocalPoint) -> Result<()> {
        if text.is_empty() {
            return Err(SnapshotError::EmptyLabel.into());
        }
        self.labels.push(Label {
            text: text.to_string(),
            at,
        });
        Ok(())
    }
}
