//! Image extraction.
//!
//! Decodes each picture payload to learn its dimensions and format, then
//! writes the original bytes under a collision-resistant file name. A
//! payload that cannot be decoded or written is skipped; its reference
//! keeps its number and simply has no asset.

use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::ImageReader;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::{ImageAsset, ImageFormat, RefId};

use super::options::ParseOptions;
use super::walker::picture_refs;
use super::{DocumentSource, ImageHandle};

/// Extract every picture of a document into `dest_dir`.
///
/// The returned map is keyed by the same references the walker assigns.
///
/// # Errors
/// Only a failure to create `dest_dir` is returned; per-image failures are
/// logged and skipped.
pub fn extract_images<S>(
    source: &S,
    dest_dir: &Path,
    options: &ParseOptions,
) -> Result<BTreeMap<RefId, ImageAsset>>
where
    S: DocumentSource + ?Sized,
{
    std::fs::create_dir_all(dest_dir)?;

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
    let mut assets = BTreeMap::new();

    for (ref_id, handle) in picture_refs(source.elements()) {
        let Some(handle) = handle else {
            log::warn!("{}: image payload not found, using placeholder", ref_id);
            continue;
        };

        match extract_one(source, handle, ref_id, dest_dir, &timestamp, options) {
            Ok(asset) => {
                log::debug!(
                    "{} -> {} ({}x{} {})",
                    ref_id,
                    asset.stored_filename,
                    asset.width,
                    asset.height,
                    asset.format
                );
                assets.insert(ref_id, asset);
            }
            Err(e) => log::warn!("{}: skipping image: {}", ref_id, e),
        }
    }

    Ok(assets)
}

fn extract_one<S>(
    source: &S,
    handle: &ImageHandle,
    ref_id: RefId,
    dest_dir: &Path,
    timestamp: &str,
    options: &ParseOptions,
) -> Result<ImageAsset>
where
    S: DocumentSource + ?Sized,
{
    let data = source.image_bytes(handle)?;
    let (format, width, height) = probe_image(&data)?;

    let filename = stored_filename(
        timestamp,
        &options.image_basename,
        ref_id,
        format.extension(),
    );
    std::fs::write(dest_dir.join(&filename), &data)
        .map_err(|e| Error::ImageDecode(format!("cannot write {}: {}", filename, e)))?;

    let asset = ImageAsset::new(ref_id, filename, width, height, format);
    Ok(if options.retain_image_bytes {
        asset.with_data(data)
    } else {
        asset
    })
}

/// Read an image header to learn its format and pixel dimensions.
fn probe_image(data: &[u8]) -> Result<(ImageFormat, u32, u32)> {
    let format = image::guess_format(data).map_err(|e| Error::ImageDecode(e.to_string()))?;
    let (width, height) = ImageReader::with_format(Cursor::new(data), format)
        .into_dimensions()
        .map_err(|e| Error::ImageDecode(e.to_string()))?;
    Ok((ImageFormat::from_decoded(format), width, height))
}

/// Stored file name: `<timestamp>_<basename>_<nnn>.<ext>`.
pub fn stored_filename(timestamp: &str, basename: &str, ref_id: RefId, extension: &str) -> String {
    format!(
        "{}_{}_{:03}.{}",
        timestamp,
        basename,
        ref_id.index(),
        extension
    )
}

/// Per-run image directory under the system temp dir.
///
/// Named `<stem>_<millis>_<uuid>`, so runs over same-named files never
/// share a directory, even within one millisecond.
pub fn default_image_dir(source_path: &Path) -> PathBuf {
    let stem = source_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "document".to_string());
    let millis = chrono::Utc::now().timestamp_millis();
    std::env::temp_dir()
        .join("docpage")
        .join(format!("{}_{}_{}", stem, millis, Uuid::new_v4().simple()))
}
