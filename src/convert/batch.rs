//! Parallel conversion of independent documents.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::Result;

use super::{ConvertOptions, ConvertResult, ConverterRegistry};

/// File name of the tree JSON inside an output folder.
pub const PAGE_JSON: &str = "page.json";

/// Name of the image directory inside an output folder.
pub const IMAGES_DIR: &str = "images";

/// Outcome of converting one document of a batch.
#[derive(Debug)]
pub struct BatchItem {
    /// Input document
    pub path: PathBuf,
    /// Folder holding `page.json` and `images/`
    pub output_dir: PathBuf,
    /// Conversion result
    pub result: Result<ConvertResult>,
}

impl BatchItem {
    /// Check if the conversion succeeded.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

impl ConverterRegistry {
    /// Convert a document into `output_dir`, writing `page.json` and `images/`.
    ///
    /// The image directory of `options` is replaced by `output_dir/images`.
    pub fn convert_into(
        &self,
        path: &Path,
        options: &ConvertOptions,
        output_dir: &Path,
    ) -> Result<ConvertResult> {
        std::fs::create_dir_all(output_dir)?;
        let options = options.clone().with_image_dir(output_dir.join(IMAGES_DIR));

        let result = self.convert(path, &options)?;
        std::fs::write(output_dir.join(PAGE_JSON), &result.content)?;
        Ok(result)
    }

    /// Convert many documents in parallel.
    ///
    /// Each document gets its own `<output_root>/<file stem>` folder, so runs
    /// never share an image directory. Results are returned in input order.
    pub fn convert_batch(
        &self,
        paths: &[PathBuf],
        options: &ConvertOptions,
        output_root: &Path,
    ) -> Vec<BatchItem> {
        let output_dirs = output_dirs(paths, output_root);

        paths
            .par_iter()
            .zip(output_dirs.into_par_iter())
            .map(|(path, output_dir)| {
                let result = self.convert_into(path, options, &output_dir);
                match &result {
                    Ok(_) => log::debug!("{} -> {}", path.display(), output_dir.display()),
                    Err(e) => log::warn!("{}: {}", path.display(), e),
                }
                BatchItem {
                    path: path.clone(),
                    output_dir,
                    result,
                }
            })
            .collect()
    }
}

/// Convert many documents in parallel with the default converters.
pub fn convert_batch(
    paths: &[PathBuf],
    options: &ConvertOptions,
    output_root: &Path,
) -> Vec<BatchItem> {
    ConverterRegistry::with_defaults().convert_batch(paths, options, output_root)
}

/// One distinct folder per input; repeated stems get a numeric suffix.
fn output_dirs(paths: &[PathBuf], output_root: &Path) -> Vec<PathBuf> {
    let mut used = HashSet::new();
    paths
        .iter()
        .map(|path| {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "document".to_string());

            let mut name = stem.clone();
            let mut n = 2;
            while !used.insert(name.clone()) {
                name = format!("{}_{}", stem, n);
                n += 1;
            }
            output_root.join(name)
        })
        .collect()
}
