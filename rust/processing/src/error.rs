// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

/// Pipeline failure classes
#[derive(Error, Debug)]
pub enum ProcessingError {
    /// Every parse path failed
    #[error("Unable to parse geometry: {0}")]
    Unparseable(String),

    /// Parsed, but nothing to analyze
    #[error("Invalid geometry: {0}")]
    EmptyGeometry(String),

    /// Temp storage or other failures unrelated to the input bytes
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProcessingError {
    /// Whether the input file is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ProcessingError::Unparseable(_) | ProcessingError::EmptyGeometry(_)
        )
    }
}

impl From<eshant_geometry::Error> for ProcessingError {
    fn from(err: eshant_geometry::Error) -> Self {
        ProcessingError::EmptyGeometry(err.to_string())
    }
}

impl From<std::io::Error> for ProcessingError {
    fn from(err: std::io::Error) -> Self {
        ProcessingError::Internal(err.to_string())
    }
}
