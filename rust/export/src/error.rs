// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for topology export
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while writing or reading a topology document
#[derive(Error, Debug)]
pub enum Error {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("Invalid topology document: {0}")]
    Schema(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<Error> for bde_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(io) => bde_core::Error::Io(io),
            other => bde_core::Error::Xml(other.to_string()),
        }
    }
}
