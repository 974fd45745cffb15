// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! # FrameVault Client Library
//!
//! Rust client for FrameVault, a dataset-versioning service for image
//! datasets. The library collects face-landmark annotation files from the
//! local filesystem, resolves the image files they reference, and submits
//! the resulting frame records to the service in ordered batches.
//!
//! The service owns storage, content ingestion, and versioning semantics;
//! this crate creates a dataset version, adds frame batches, and commits.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use framevault_client::{
//!     Client, Error, PathLayout, UploadOptions, find_annotation_files,
//!     parse_annotation_file, upload_frames,
//! };
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     let workdir = PathBuf::from("/data");
//!     let layout = PathLayout::default();
//!
//!     let mut frames = Vec::new();
//!     for file in find_annotation_files(&workdir)? {
//!         frames.extend(parse_annotation_file(&file, &workdir, &layout)?);
//!     }
//!
//!     let client = Client::new()?;
//!     let version = client.create_version("ffhq", "1.0").await?;
//!
//!     let opts = UploadOptions {
//!         batch_size: 1000,
//!         start_index: 0,
//!         upload_uri: "s3://bucket/ffhq".to_string(),
//!         root_dir: workdir,
//!     };
//!     upload_frames(&version, &frames, &opts, None).await?;
//!
//!     Ok(())
//! }
//! ```

mod annotations;
mod api;
mod client;
mod dataset;
mod error;
mod retry;
mod upload;

pub use crate::{
    annotations::{
        AnnotationRecord, ImageEntry, PathLayout, find_annotation_files, parse_annotation_file,
        resolve_image_path,
    },
    api::DatasetVersionID,
    client::{Client, Progress},
    dataset::{DatasetVersion, FrameGroup, FrameMetadata, SingleFrame},
    error::Error,
    retry::{RetryScope, classify_url},
    upload::{UploadOptions, VersionStore, upload_frames},
};
