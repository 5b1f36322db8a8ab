// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scan and annotation fetching.
//!
//! Assets live under a base location with the layout
//!
//! ```text
//! <base>/content/images/<difficulty>/<id>.png
//! <base>/content/annotation/<difficulty>/<id>.json
//! ```
//!
//! The base is either an HTTP(S) URL or a local directory.

use super::media::{load_image, load_image_bytes, LoadedImage};
use crate::error::Result;
use crate::models::annotation::Annotation;
use crate::models::scan::{Difficulty, ScanRecord};
use std::path::PathBuf;
use std::time::Duration;

/// Relative path of a scan image.
pub fn image_path(difficulty: Difficulty, id: u32) -> String {
    format!("content/images/{}/{}.png", difficulty.as_str(), id)
}

/// Relative path of an annotation file.
pub fn annotation_path(difficulty: Difficulty, id: u32) -> String {
    format!("content/annotation/{}/{}.json", difficulty.as_str(), id)
}

/// A fetched scan: boxes plus decoded pixels.
#[derive(Debug, Clone)]
pub struct ScanData {
    pub record: ScanRecord,
    pub image: LoadedImage,
}

/// Where scans come from. Called from background threads.
pub trait ScanSource: Send + Sync {
    fn fetch(&self, difficulty: Difficulty, id: u32) -> Result<ScanData>;
}

fn decode_scan(id: u32, image_path: String, annotation: &[u8], image: LoadedImage) -> Result<ScanData> {
    let annotation: Annotation = serde_json::from_slice(annotation)?;
    Ok(ScanData {
        record: ScanRecord::new(id, image_path, annotation),
        image,
    })
}

/// Fetches scans over HTTP.
pub struct HttpScanSource {
    base: String,
    client: reqwest::blocking::Client,
}

impl HttpScanSource {
    pub fn new(base: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            base: base.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path)
    }

    fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let bytes = self
            .client
            .get(self.url(path))
            .header("User-Agent", "spot-the-lesion")
            .send()?
            .error_for_status()?
            .bytes()?;
        Ok(bytes.to_vec())
    }
}

impl ScanSource for HttpScanSource {
    fn fetch(&self, difficulty: Difficulty, id: u32) -> Result<ScanData> {
        let image_path = image_path(difficulty, id);
        let annotation = self.get_bytes(&annotation_path(difficulty, id))?;
        let image = self.get_bytes(&image_path)?;
        log::info!("Fetched {} ({} bytes)", self.url(&image_path), image.len());
        decode_scan(id, self.url(&image_path), &annotation, load_image_bytes(&image)?)
    }
}

/// Reads scans from a local copy of the asset tree.
pub struct DirectoryScanSource {
    root: PathBuf,
}

impl DirectoryScanSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ScanSource for DirectoryScanSource {
    fn fetch(&self, difficulty: Difficulty, id: u32) -> Result<ScanData> {
        let image_path = self.root.join(image_path(difficulty, id));
        let annotation = std::fs::read(self.root.join(annotation_path(difficulty, id)))?;
        let image = load_image(&image_path)?;
        log::info!("Read scan {}", image_path.display());
        decode_scan(id, image_path.to_string_lossy().into_owned(), &annotation, image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_paths() {
        assert_eq!(image_path(Difficulty::Medium, 42), "content/images/medium/42.png");
        assert_eq!(
            annotation_path(Difficulty::Hard, 7),
            "content/annotation/hard/7.json"
        );
    }

    #[test]
    fn test_http_url_joins_base() {
        let source = HttpScanSource::new("https://example.org/assets/").unwrap();
        assert_eq!(
            source.url(&image_path(Difficulty::Easy, 1)),
            "https://example.org/assets/content/images/easy/1.png"
        );
    }

    fn write_scan(root: &std::path::Path, difficulty: Difficulty, id: u32, annotation: &str) {
        let image = root.join(image_path(difficulty, id));
        let json = root.join(annotation_path(difficulty, id));
        std::fs::create_dir_all(image.parent().unwrap()).unwrap();
        std::fs::create_dir_all(json.parent().unwrap()).unwrap();

        let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 0, 255]));
        img.save(&image).unwrap();
        std::fs::write(&json, annotation).unwrap();
    }

    #[test]
    fn test_directory_source_reads_scan() {
        let dir = tempfile::tempdir().unwrap();
        write_scan(
            dir.path(),
            Difficulty::Easy,
            3,
            r#"{"truth": [10, 10, 20, 20], "predicted": [15, 15, 25, 25]}"#,
        );

        let scan = DirectoryScanSource::new(dir.path()).fetch(Difficulty::Easy, 3).unwrap();
        assert_eq!(scan.record.id, 3);
        assert_eq!(scan.record.truth.to_array(), [10.0, 10.0, 20.0, 20.0]);
        assert_eq!(scan.image.width, 4);
    }

    #[test]
    fn test_directory_source_rejects_bad_annotation() {
        let dir = tempfile::tempdir().unwrap();
        write_scan(
            dir.path(),
            Difficulty::Easy,
            4,
            r#"{"truth": [20, 20, 10, 10], "predicted": [15, 15, 25, 25]}"#,
        );

        let err = DirectoryScanSource::new(dir.path())
            .fetch(Difficulty::Easy, 4)
            .unwrap_err();
        assert!(err.is_storage_error());

        let missing = DirectoryScanSource::new(dir.path())
            .fetch(Difficulty::Easy, 99)
            .unwrap_err();
        assert!(missing.is_storage_error());
    }
}
