// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the snapshot host.

use thiserror::Error;

/// Snapshot host errors.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Cannot read snapshot {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid snapshot {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cannot write labels: {0}")]
    Labels(#[from] std::io::Error),

    #[error("Label serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Label text is empty")]
    EmptyLabel,
}

impl From<SnapshotError> for bde_core::Error {
    fn from(err: SnapshotError) -> Self {
        match err {
            SnapshotError::EmptyLabel => bde_core::Error::Annotation(err.to_string()),
            other => bde_core::Error::Provider(other.to_string()),
        }
    }
}
