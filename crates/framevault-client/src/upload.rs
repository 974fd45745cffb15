// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Batch upload orchestration.
//!
//! The orchestrator walks an ordered frame sequence from a resume offset,
//! submits fixed-size contiguous batches strictly in order through an
//! injected [`VersionStore`], and commits the version once every batch has
//! been accepted. Failures propagate unmodified: there is no retry at this
//! layer and no rollback of already-submitted batches, so resuming after an
//! interruption is only as good as the start index supplied by the caller.

use crate::{Error, client::Progress, dataset::FrameGroup};
use log::debug;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::Sender;

/// Remote dataset-version operations required by the upload loop.
///
/// [`DatasetVersion`][crate::DatasetVersion] is the production
/// implementation; tests inject recording or failing stores.
#[allow(async_fn_in_trait)]
pub trait VersionStore {
    /// Add one contiguous batch of frame records to the version.
    async fn add_frames(
        &self,
        batch: &[FrameGroup],
        upload_uri: &str,
        root_dir: &Path,
        batch_size: usize,
    ) -> Result<(), Error>;

    /// Finalize the version after all batches have been added.
    async fn commit_version(&self) -> Result<(), Error>;
}

/// Parameters for a batch upload run.
#[derive(Clone, Debug)]
pub struct UploadOptions {
    /// Number of frames submitted per batch. Must be positive.
    pub batch_size: usize,
    /// Index to resume from after an interrupted run.
    pub start_index: usize,
    /// Remote bucket URI the service ingests frame content into.
    pub upload_uri: String,
    /// Local root directory frame sources are resolved against.
    pub root_dir: PathBuf,
}

/// Submit `frames[start_index..]` in fixed-size batches and commit.
///
/// Batches are submitted strictly sequentially. Cumulative progress is
/// published on the optional channel, starting from `start_index` so
/// resumed runs display correct totals. Returns the final cursor position:
/// `frames.len()` when the start index was inside the sequence, or the
/// start index itself when it already covered the whole sequence (in which
/// case no batches are submitted but the version is still committed).
pub async fn upload_frames<S: VersionStore>(
    store: &S,
    frames: &[FrameGroup],
    opts: &UploadOptions,
    progress: Option<Sender<Progress>>,
) -> Result<usize, Error> {
    if opts.batch_size == 0 {
        return Err(Error::InvalidParameters(
            "batch size must be positive".to_string(),
        ));
    }

    let total = frames.len();
    let mut cursor = opts.start_index;

    send_progress(&progress, cursor, total).await;

    while cursor < total {
        let end = usize::min(cursor + opts.batch_size, total);
        store
            .add_frames(
                &frames[cursor..end],
                &opts.upload_uri,
                &opts.root_dir,
                opts.batch_size,
            )
            .await?;
        debug!("submitted frames [{}, {}) of {}", cursor, end, total);
        cursor = end;
        send_progress(&progress, cursor, total).await;
    }

    store.commit_version().await?;

    Ok(cursor)
}

async fn send_progress(progress: &Option<Sender<Progress>>, current: usize, total: usize) {
    if let Some(tx) = progress {
        // A dropped receiver only disables progress reporting.
        let _ = tx.send(Progress { current, total }).await;
    }
}
