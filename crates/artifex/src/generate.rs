// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `generate` subcommand: enqueue one request, follow it to settlement,
//! and write the resulting images to disk.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use clap::Args;
use tracing::info;

use artifex_core::{ArtifexError, AspectRatio, GenerationRequest, ImageData, Resolution};
use artifex_queue::ItemStatus;

use artifex::{active_provider_config, build_engine};

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Text prompt describing the desired image.
    pub prompt: String,

    /// Reference image files to guide or edit from (repeatable).
    #[arg(short = 'r', long = "reference")]
    pub references: Vec<PathBuf>,

    /// Output resolution: 1K, 2K, or 4K.
    #[arg(long, default_value = "1K", value_parser = parse_resolution)]
    pub resolution: Resolution,

    /// Output aspect ratio: 1:1, 3:2, 2:3, 16:9, or 9:16.
    #[arg(long, default_value = "1:1", value_parser = parse_aspect_ratio)]
    pub aspect_ratio: AspectRatio,

    /// Directory where generated images are written.
    #[arg(short, long, default_value = ".")]
    pub out: PathBuf,
}

fn parse_resolution(s: &str) -> Result<Resolution, String> {
    Resolution::from_str(s).map_err(|_| format!("`{s}` is not one of 1K, 2K, 4K"))
}

fn parse_aspect_ratio(s: &str) -> Result<AspectRatio, String> {
    AspectRatio::from_str(s).map_err(|_| format!("`{s}` is not one of 1:1, 3:2, 2:3, 16:9, 9:16"))
}

pub async fn run(
    config: &artifex_config::ArtifexConfig,
    args: GenerateArgs,
) -> Result<(), ArtifexError> {
    let provider_config = active_provider_config(config)?;

    let mut request = GenerationRequest::new(args.prompt);
    request.resolution = args.resolution;
    request.aspect_ratio = args.aspect_ratio;
    for path in &args.references {
        request.reference_images.push(read_image(path).await?);
    }

    let queue = build_engine(config)?;
    let id = queue.enqueue(request, provider_config).await?;
    info!(item = %id, "request enqueued");

    // Follow the item until it settles, echoing status changes.
    let mut last_line = String::new();
    let settled = loop {
        let Some(item) = queue.item(&id).await else {
            return Err(ArtifexError::Internal("item vanished from queue".to_string()));
        };
        if item.is_settled() {
            break item;
        }
        let line = match (&item.progress, &item.status_message) {
            (Some(p), Some(m)) => format!("[{p:>3}%] {m}"),
            _ => format!("{}...", item.status),
        };
        if line != last_line {
            println!("{line} ({}s elapsed)", item.elapsed.as_secs());
            last_line = line;
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    };
    queue.shutdown().await;

    match settled.status {
        ItemStatus::Completed => {
            let images = settled.final_images.unwrap_or_default();
            tokio::fs::create_dir_all(&args.out)
                .await
                .map_err(|e| ArtifexError::Storage { source: Box::new(e) })?;
            for (index, image) in images.iter().enumerate() {
                let path = args
                    .out
                    .join(format!("{}-{index}.{}", id, extension_for(&image.mime_type)));
                let bytes = BASE64
                    .decode(&image.data)
                    .map_err(|e| ArtifexError::Storage { source: Box::new(e) })?;
                tokio::fs::write(&path, bytes)
                    .await
                    .map_err(|e| ArtifexError::Storage { source: Box::new(e) })?;
                println!("wrote {}", path.display());
            }
            Ok(())
        }
        _ => Err(ArtifexError::Internal(
            settled
                .error_message
                .unwrap_or_else(|| "generation failed".to_string()),
        )),
    }
}

async fn read_image(path: &Path) -> Result<ImageData, ArtifexError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ArtifexError::InvalidRequest(format!("cannot read {}: {e}", path.display())))?;
    let mime = match path.extension().and_then(|e| e.to_str()) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => {
            return Err(ArtifexError::InvalidRequest(format!(
                "unsupported reference image type: {}",
                path.display()
            )))
        }
    };
    Ok(ImageData::new(mime, BASE64.encode(bytes)))
}

fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reference_files_are_encoded_with_mime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ref.png");
        tokio::fs::write(&path, b"pngbytes").await.unwrap();

        let image = read_image(&path).await.unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, BASE64.encode(b"pngbytes"));
    }

    #[tokio::test]
    async fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ref.txt");
        tokio::fs::write(&path, b"text").await.unwrap();

        assert!(matches!(
            read_image(&path).await,
            Err(ArtifexError::InvalidRequest(_))
        ));
    }

    #[test]
    fn cli_value_parsers_accept_tag_vocabulary() {
        assert_eq!(parse_resolution("2K").unwrap(), Resolution::TwoK);
        assert!(parse_resolution("3K").is_err());
        assert_eq!(parse_aspect_ratio("16:9").unwrap(), AspectRatio::Widescreen);
        assert!(parse_aspect_ratio("4:3").is_err());
    }
}
