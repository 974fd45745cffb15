// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

use clap::Parser;
use framevault_client::{
    Client, Error, PathLayout, Progress, UploadOptions, find_annotation_files,
    parse_annotation_file, upload_frames,
};
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use std::path::PathBuf;
use tokio::sync::mpsc;
use url::Url;

/// Upload face-landmark annotation files to a FrameVault dataset version.
///
/// Collects the `*.json` annotation files under the annotation directory,
/// resolves each record's image under the working directory, and submits
/// the frames in ordered batches before committing the version. After an
/// interrupted run, pass --startix to resume from the first frame that was
/// not yet submitted.
#[derive(Parser, Debug, Clone)]
#[command(author, about, long_about = None, disable_version_flag = true)]
struct Args {
    /// FrameVault Server Name
    #[clap(long, env = "FRAMEVAULT_SERVER")]
    server: Option<String>,

    /// FrameVault API Token
    #[clap(long, env = "FRAMEVAULT_TOKEN")]
    token: Option<String>,

    /// Dataset name
    #[clap(long)]
    name: String,

    /// Dataset version
    #[clap(long = "version")]
    version: String,

    /// Data directory
    #[clap(long, default_value = ".")]
    workdir: PathBuf,

    /// Annotation directory, defaults to the workdir
    #[clap(long)]
    jsondir: Option<PathBuf>,

    /// Remote bucket URI (GCS or S3)
    #[clap(long = "uploadURI")]
    upload_uri: String,

    /// How many frames to add at once
    #[clap(long, default_value_t = 1000)]
    batch: usize,

    /// Starting index, for resuming
    #[clap(long, default_value_t = 0)]
    startix: usize,
}

fn collect_frames(args: &Args) -> Result<Vec<framevault_client::FrameGroup>, Error> {
    let jsondir = args.jsondir.clone().unwrap_or_else(|| args.workdir.clone());
    let files = find_annotation_files(&jsondir)?;
    println!("Found the following annotation files: {:?}", files);

    if files.is_empty() {
        warn!("no annotation files found under {:?}", jsondir);
    }

    let layout = PathLayout::default();
    let bar = ProgressBar::new(files.len() as u64);
    bar.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] Collecting frames: {wide_bar:.yellow} {human_pos}/{human_len}",
        )
        .unwrap()
        .progress_chars("█▇▆▅▄▃▂▁  "),
    );

    let mut frames = Vec::new();
    for file in &files {
        frames.extend(parse_annotation_file(file, &args.workdir, &layout)?);
        bar.inc(1);
    }
    bar.finish_and_clear();

    Ok(frames)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    // Fail fast on an unusable destination before collecting anything.
    let upload_uri = Url::parse(&args.upload_uri)?;

    let frames = collect_frames(&args)?;
    println!(
        "Adding {} frame groups to dataset {}:{}",
        frames.len(),
        args.name,
        args.version
    );

    let client = Client::new()?;
    let client = match &args.server {
        Some(server) => client.with_server(server),
        None => client,
    };
    let client = match &args.token {
        Some(token) => client.with_token(token)?,
        None => client,
    };

    let version = client.create_version(&args.name, &args.version).await?;

    let bar = ProgressBar::new(frames.len() as u64);
    bar.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise} ETA: {eta}] Adding frames: {wide_bar:.yellow} {human_pos}/{human_len}",
        )
        .unwrap()
        .progress_chars("█▇▆▅▄▃▂▁  "),
    );

    let (tx, mut rx) = mpsc::channel::<Progress>(1);
    let drain = tokio::spawn(async move {
        while let Some(progress) = rx.recv().await {
            if progress.total > 0 {
                bar.set_length(progress.total as u64);
                bar.set_position(progress.current as u64);
            }
        }
        bar.finish_and_clear();
    });

    let opts = UploadOptions {
        batch_size: args.batch,
        start_index: args.startix,
        upload_uri: upload_uri.to_string(),
        root_dir: args.workdir.clone(),
    };
    let submitted = upload_frames(&version, &frames, &opts, Some(tx)).await?;
    let _ = drain.await;

    println!(
        "Committed dataset version {} ({}:{}) with {} frames submitted",
        version.id(),
        args.name,
        args.version,
        submitted
    );

    Ok(())
}
