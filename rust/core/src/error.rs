// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for beacon processing.

/// Result type alias for beacon operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`], so callers can decide between
/// retrying a fixture, skipping it, or aborting the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A fixture lacks one of its required parameters.
    MissingAttribute,
    /// A neighbor list could not be split into meaningful slots.
    MalformedNeighborList,
    /// Label placement in the host document failed.
    Annotation,
    /// The host could not supply a selection.
    Provider,
    /// Serializing the topology document failed.
    Serialization,
    /// Reading or writing the topology file failed.
    Io,
}

/// Errors that can occur while building or exporting beacons.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A fixture is missing a required parameter such as `Mark`.
    #[error("fixture {element} has no `{attribute}` parameter")]
    MissingAttribute {
        attribute: &'static str,
        element: String,
    },

    /// The neighbor string has empty interior segments.
    #[error("neighbor list {0:?} has empty segments")]
    MalformedNeighborList(String),

    /// The host rejected a label placement.
    #[error("label placement failed: {0}")]
    Annotation(String),

    /// The host could not enumerate the selected fixtures.
    #[error("element provider error: {0}")]
    Provider(String),

    /// XML serialization or parsing error.
    #[error("xml error: {0}")]
    Xml(String),

    /// Underlying file I/O error.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the classification used by the pipeline's failure policy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingAttribute { .. } => ErrorKind::MissingAttribute,
            Error::MalformedNeighborList(_) => ErrorKind::MalformedNeighborList,
            Error::Annotation(_) => ErrorKind::Annotation,
            Error::Provider(_) => ErrorKind::Provider,
            Error::Xml(_) => ErrorKind::Serialization,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    /// Shorthand for a missing fixture parameter.
    pub fn missing(attribute: &'static str, element: impl Into<String>) -> Self {
        Error::MissingAttribute {
            attribute,
            element: element.into(),
        }
    }
}
