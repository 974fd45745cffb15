// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

use crate::{
    Error,
    api::{DatasetVersionID, EmptyResult, FramesAddParams, FramesAddResult, VersionCommitParams},
    client::Client,
    upload::VersionStore,
};
use log::debug;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Reference to the single image file backing a frame record.
///
/// The source path is resolved locally; the service ingests the content
/// relative to the root directory supplied with each batch.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SingleFrame {
    source: PathBuf,
}

impl SingleFrame {
    pub fn new(source: PathBuf) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}

/// Frame-level metadata carried alongside the image reference.
#[derive(Serialize, Clone, Debug)]
pub struct FrameMetadata {
    pub face_landmarks: Value,
}

/// One uploadable record pairing an image reference with its metadata.
///
/// Frame groups are created once during annotation collection and consumed
/// read-only by the upload loop.
#[derive(Serialize, Clone, Debug)]
pub struct FrameGroup {
    uuid: String,
    image: SingleFrame,
    metadata: FrameMetadata,
    /// Stem of the annotation file this frame came from. Kept for local
    /// diagnostics only and not part of the upload payload.
    #[serde(skip)]
    provenance: String,
}

impl FrameGroup {
    pub fn new(image: SingleFrame, metadata: FrameMetadata, provenance: String) -> Self {
        Self {
            uuid: uuid::Uuid::new_v4().to_string(),
            image,
            metadata,
            provenance,
        }
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn source(&self) -> &Path {
        self.image.source()
    }

    pub fn metadata(&self) -> &FrameMetadata {
        &self.metadata
    }

    pub fn provenance(&self) -> &str {
        &self.provenance
    }
}

/// Handle to a dataset version created on the FrameVault server.
///
/// Obtained from [`Client::create_version`]. The handle implements
/// [`VersionStore`], so it can be passed directly to
/// [`upload_frames`][crate::upload_frames].
#[derive(Clone, Debug)]
pub struct DatasetVersion {
    client: Client,
    id: DatasetVersionID,
}

impl DatasetVersion {
    pub(crate) fn new(client: Client, id: DatasetVersionID) -> Self {
        Self { client, id }
    }

    pub fn id(&self) -> DatasetVersionID {
        self.id
    }
}

impl VersionStore for DatasetVersion {
    async fn add_frames(
        &self,
        batch: &[FrameGroup],
        upload_uri: &str,
        root_dir: &Path,
        batch_size: usize,
    ) -> Result<(), Error> {
        let params = FramesAddParams {
            version_id: self.id,
            frames: batch,
            upload_uri: upload_uri.to_owned(),
            root_dir: root_dir.display().to_string(),
            batch_size,
        };
        let result: FramesAddResult = self.client.rpc("frames.add".to_owned(), Some(params)).await?;
        debug!(
            "version {} acknowledged {} of {} frames",
            self.id,
            result.added,
            batch.len()
        );
        Ok(())
    }

    async fn commit_version(&self) -> Result<(), Error> {
        let params = VersionCommitParams { version_id: self.id };
        let _: EmptyResult = self
            .client
            .rpc("datasets.commit_version".to_owned(), Some(params))
            .await?;
        debug!("version {} committed", self.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_frame_group_payload_shape() {
        let frame = FrameGroup::new(
            SingleFrame::new(PathBuf::from("/data/ffhq-unpacked/0ab/img000photo.png")),
            FrameMetadata {
                face_landmarks: json!([1, 2]),
            },
            "train".to_string(),
        );

        let value = serde_json::to_value(&frame).unwrap();
        let object = value.as_object().unwrap();

        // Provenance is intentionally not serialized.
        assert!(object.contains_key("uuid"));
        assert!(object.contains_key("image"));
        assert!(object.contains_key("metadata"));
        assert!(!object.contains_key("provenance"));

        assert_eq!(
            value["image"]["source"],
            json!("/data/ffhq-unpacked/0ab/img000photo.png")
        );
        assert_eq!(value["metadata"]["face_landmarks"], json!([1, 2]));
    }

    #[test]
    fn test_frame_group_uuids_are_unique() {
        let make = || {
            FrameGroup::new(
                SingleFrame::new(PathBuf::from("a.png")),
                FrameMetadata {
                    face_landmarks: Value::Null,
                },
                "train".to_string(),
            )
        };
        assert_ne!(make().uuid(), make().uuid());
    }
}
