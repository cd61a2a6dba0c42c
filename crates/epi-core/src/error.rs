// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use std::fmt;

/// Errors raised while assembling the data model.
///
/// Evaluation paths never return errors: missing data degrades to a safe
/// numeric default instead (see the crate-level policy on degenerate
/// values). Only construction and catalog operations are fallible.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EpiError {
    InvalidInput(String),
    NotSupported(String),
}

impl EpiError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn not_supported(msg: impl Into<String>) -> Self {
        Self::NotSupported(msg.into())
    }
}

impl fmt::Display for EpiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "{msg}"),
            Self::NotSupported(msg) => write!(f, "not supported: {msg}"),
        }
    }
}

impl std::error::Error for EpiError {}

#[cfg(test)]
mod tests {
    use super::EpiError;

    #[test]
    fn invalid_input_displays_raw_message() {
        let err = EpiError::invalid_input("day key must be YYYY-MM-DD");
        assert_eq!(err.to_string(), "day key must be YYYY-MM-DD");
    }

    #[test]
    fn not_supported_prefixes_message() {
        let err = EpiError::not_supported("negative truncation");
        assert_eq!(err.to_string(), "not supported: negative truncation");
    }
}
