// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

use crate::{Error, FrameGroup};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Unique identifier for a dataset version in FrameVault.
///
/// Dataset versions are named, append-only collections of frame records.
/// Each version has a unique ID displayed in hexadecimal format with a "v-"
/// prefix (e.g. "v-2a").
///
/// # Examples
///
/// ```rust
/// use framevault_client::DatasetVersionID;
/// use std::str::FromStr;
///
/// let version_id = DatasetVersionID::from(42);
/// assert_eq!(version_id.to_string(), "v-2a");
///
/// let version_id = DatasetVersionID::from_str("v-2a").unwrap();
/// assert_eq!(version_id.value(), 42);
/// ```
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DatasetVersionID(u64);

impl Display for DatasetVersionID {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "v-{:x}", self.0)
    }
}

impl From<u64> for DatasetVersionID {
    fn from(id: u64) -> Self {
        DatasetVersionID(id)
    }
}

impl From<DatasetVersionID> for u64 {
    fn from(val: DatasetVersionID) -> Self {
        val.0
    }
}

impl DatasetVersionID {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl FromStr for DatasetVersionID {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_part = s.strip_prefix("v-").ok_or_else(|| {
            Error::InvalidParameters("Dataset version ID must start with 'v-' prefix".to_string())
        })?;
        let id = u64::from_str_radix(hex_part, 16)?;
        Ok(DatasetVersionID(id))
    }
}

impl TryFrom<&str> for DatasetVersionID {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        DatasetVersionID::from_str(s)
    }
}

impl TryFrom<String> for DatasetVersionID {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        DatasetVersionID::from_str(&s)
    }
}

#[derive(Serialize)]
pub(crate) struct VersionCreateParams {
    pub dataset_name: String,
    pub version_name: String,
}

#[derive(Deserialize)]
pub(crate) struct VersionCreateResult {
    pub version_id: DatasetVersionID,
}

#[derive(Serialize)]
pub(crate) struct FramesAddParams<'a> {
    pub version_id: DatasetVersionID,
    pub frames: &'a [FrameGroup],
    pub upload_uri: String,
    pub root_dir: String,
    pub batch_size: usize,
}

#[derive(Deserialize)]
pub(crate) struct FramesAddResult {
    pub added: usize,
}

#[derive(Serialize)]
pub(crate) struct VersionCommitParams {
    pub version_id: DatasetVersionID,
}

#[derive(Deserialize)]
pub(crate) struct EmptyResult {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_id_display() {
        assert_eq!(DatasetVersionID::from(42).to_string(), "v-2a");
        assert_eq!(DatasetVersionID::from(0).to_string(), "v-0");
    }

    #[test]
    fn test_version_id_parse() {
        let id = DatasetVersionID::from_str("v-2a").unwrap();
        assert_eq!(id.value(), 42);
        assert_eq!(id, DatasetVersionID::from(42));
    }

    #[test]
    fn test_version_id_round_trip() {
        let id = DatasetVersionID::from(0xdeadbeef);
        let parsed = DatasetVersionID::from_str(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_version_id_rejects_missing_prefix() {
        assert!(matches!(
            DatasetVersionID::from_str("2a"),
            Err(Error::InvalidParameters(_))
        ));
        assert!(matches!(
            DatasetVersionID::from_str("v-zz"),
            Err(Error::ParseIntError(_))
        ));
    }
}
