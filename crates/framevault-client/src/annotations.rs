// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Face-landmark annotation collection.
//!
//! Annotation files are JSON objects mapping opaque record ids to records
//! of the form:
//!
//! ```json
//! { "image": { "face_landmarks": [...], "file_path": "parent/subfolder/file" } }
//! ```
//!
//! Each record's raw `file_path` is rewritten onto the unpacked image tree:
//! the parent segment is replaced with a fixed directory name, the subfolder
//! is reduced to its first characters and zero-padded, and the filename gets
//! a fixed prefix. The rewrite constants live in [`PathLayout`] with the
//! historical FFHQ defaults.

use crate::{
    Error,
    dataset::{FrameGroup, FrameMetadata, SingleFrame},
};
use serde::Deserialize;
use serde_json::Value;
use std::{
    collections::BTreeMap,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Rewrite rules mapping raw annotation paths onto the unpacked image tree.
#[derive(Clone, Debug)]
pub struct PathLayout {
    /// Directory name replacing the raw parent segment.
    pub parent_dir: String,
    /// Number of leading subfolder characters to keep.
    pub subfolder_keep: usize,
    /// Width the kept subfolder characters are zero-padded to.
    pub subfolder_width: usize,
    /// Prefix prepended to the raw filename.
    pub file_prefix: String,
}

impl Default for PathLayout {
    fn default() -> Self {
        Self {
            parent_dir: "ffhq-unpacked".to_string(),
            subfolder_keep: 2,
            subfolder_width: 3,
            file_prefix: "img000".to_string(),
        }
    }
}

/// One entry of an annotation file, keyed by an opaque record id.
#[derive(Deserialize, Clone, Debug)]
pub struct AnnotationRecord {
    pub image: ImageEntry,
}

/// The image sub-record of an annotation entry.
#[derive(Deserialize, Clone, Debug)]
pub struct ImageEntry {
    pub face_landmarks: Value,
    pub file_path: String,
}

/// List the `*.json` files directly under `dir`, sorted by path.
///
/// The listing is non-recursive; annotation files in subdirectories are not
/// picked up. Zero files is valid and yields zero records downstream.
pub fn find_annotation_files(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// Resolve a raw annotation `file_path` against the working directory.
///
/// The raw path must decompose into exactly three `/`-delimited segments
/// (parent, subfolder, filename); any other shape fails with
/// [`Error::MalformedFramePath`].
pub fn resolve_image_path(
    file_path: &str,
    workdir: &Path,
    layout: &PathLayout,
) -> Result<PathBuf, Error> {
    let mut segments = file_path.split('/');
    let (Some(_parent), Some(subfolder), Some(file_name), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(Error::MalformedFramePath(file_path.to_string()));
    };

    let kept: String = subfolder.chars().take(layout.subfolder_keep).collect();
    let subfolder = format!("{:0>width$}", kept, width = layout.subfolder_width);
    let file_name = format!("{}{}", layout.file_prefix, file_name);

    Ok(workdir
        .join(&layout.parent_dir)
        .join(subfolder)
        .join(file_name))
}

/// Parse one annotation file into frame groups.
///
/// Records are returned in a deterministic order (sorted by record id).
/// Malformed JSON and malformed `file_path` values fail the whole run; no
/// recovery is attempted.
pub fn parse_annotation_file(
    path: &Path,
    workdir: &Path,
    layout: &PathLayout,
) -> Result<Vec<FrameGroup>, Error> {
    let provenance = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let file = File::open(path)?;
    let records: BTreeMap<String, AnnotationRecord> = serde_json::from_reader(BufReader::new(file))?;

    let mut frames = Vec::with_capacity(records.len());
    for record in records.into_values() {
        let source = resolve_image_path(&record.image.file_path, workdir, layout)?;
        frames.push(FrameGroup::new(
            SingleFrame::new(source),
            FrameMetadata {
                face_landmarks: record.image.face_landmarks,
            },
            provenance.clone(),
        ));
    }

    Ok(frames)
}
