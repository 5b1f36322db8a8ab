// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Uploading new scan/annotation pairs to the asset server.
//!
//! Selected files are sorted by name and paired one-to-one; each pair is sent
//! as its own multipart POST with the fields `pass`, `scan` and `json`.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Body the server answers with when the key is wrong, even with HTTP 200.
pub const WRONG_PASSWORD_RESPONSE: &str =
    "Upload has not been completed, the server password was not correct!";

pub const MISSING_FILE_MESSAGE: &str = "Please select a file.";
pub const TOO_FEW_IMAGES_MESSAGE: &str = "Too few images for the selected jsons.";
pub const TOO_FEW_JSONS_MESSAGE: &str = "Too few jsons for the selected images.";
pub const NAME_MISMATCH_MESSAGE: &str = "Images and jsons names don't match.";

/// Strip the last extension from a file name (`a.b.png` gives `a.b`).
pub fn remove_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(ix) if ix > 0 && ix + 1 < file_name.len() => &file_name[..ix],
        _ => file_name,
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Names of the selected files, `; ` separated.
pub fn file_names(paths: &[PathBuf]) -> String {
    paths.iter().map(|p| file_name(p)).collect::<Vec<_>>().join("; ")
}

/// Sort a selection by file name.
pub fn sort_by_name(paths: &mut [PathBuf]) {
    paths.sort_by_key(|p| file_name(p));
}

/// Why a selection cannot be uploaded, with a message for each side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionError {
    pub images: Option<&'static str>,
    pub jsons: Option<&'static str>,
}

/// One scan and its annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPair {
    pub scan: PathBuf,
    pub json: PathBuf,
}

/// Pair two selections, both already sorted by name.
pub fn pair_files(
    images: &[PathBuf],
    jsons: &[PathBuf],
) -> std::result::Result<Vec<UploadPair>, SelectionError> {
    if images.is_empty() || jsons.is_empty() {
        return Err(SelectionError {
            images: images.is_empty().then_some(MISSING_FILE_MESSAGE),
            jsons: jsons.is_empty().then_some(MISSING_FILE_MESSAGE),
        });
    }

    if images.len() < jsons.len() {
        return Err(SelectionError {
            images: Some(TOO_FEW_IMAGES_MESSAGE),
            jsons: None,
        });
    }
    if jsons.len() < images.len() {
        return Err(SelectionError {
            images: None,
            jsons: Some(TOO_FEW_JSONS_MESSAGE),
        });
    }

    let matching = images.iter().zip(jsons).all(|(image, json)| {
        remove_extension(&file_name(image)) == remove_extension(&file_name(json))
    });
    if !matching {
        return Err(SelectionError {
            images: Some(NAME_MISMATCH_MESSAGE),
            jsons: Some(NAME_MISMATCH_MESSAGE),
        });
    }

    Ok(images
        .iter()
        .zip(jsons)
        .map(|(scan, json)| UploadPair {
            scan: scan.clone(),
            json: json.clone(),
        })
        .collect())
}

/// An upload succeeded iff the server said 200 and did not reject the key.
pub fn is_upload_successful(status: u16, body: &str) -> bool {
    status == 200 && body != WRONG_PASSWORD_RESPONSE
}

/// Blocking client for the upload endpoint.
pub struct UploadClient {
    endpoint: String,
    key: String,
    client: reqwest::blocking::Client,
}

impl UploadClient {
    pub fn new(endpoint: impl Into<String>, key: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            key: key.into(),
            client,
        })
    }

    /// Send one pair. Returns the server message on success and
    /// [`Error::UploadRejected`] with the server message otherwise.
    pub fn upload(&self, pair: &UploadPair) -> Result<String> {
        let form = reqwest::blocking::multipart::Form::new()
            .text("pass", self.key.clone())
            .file("scan", &pair.scan)?
            .file("json", &pair.json)?;

        let response = self.client.post(&self.endpoint).multipart(form).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;

        if is_upload_successful(status, &body) {
            log::info!("Uploaded {}", pair.scan.display());
            Ok(body)
        } else {
            log::warn!("Upload of {} rejected ({}): {}", pair.scan.display(), status, body);
            Err(Error::UploadRejected(body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_remove_extension() {
        assert_eq!(remove_extension("12.png"), "12");
        assert_eq!(remove_extension("scan.v2.json"), "scan.v2");
        assert_eq!(remove_extension("noext"), "noext");
        assert_eq!(remove_extension(".hidden"), ".hidden");
    }

    #[test]
    fn test_pairing_messages() {
        let err = pair_files(&[], &paths(&["1.json"])).unwrap_err();
        assert_eq!(err.images, Some(MISSING_FILE_MESSAGE));
        assert_eq!(err.jsons, None);

        let err = pair_files(&paths(&["1.png"]), &paths(&["1.json", "2.json"])).unwrap_err();
        assert_eq!(err.images, Some(TOO_FEW_IMAGES_MESSAGE));

        let err = pair_files(&paths(&["1.png", "2.png"]), &paths(&["1.json"])).unwrap_err();
        assert_eq!(err.jsons, Some(TOO_FEW_JSONS_MESSAGE));

        let err = pair_files(&paths(&["1.png"]), &paths(&["2.json"])).unwrap_err();
        assert_eq!(err.images, Some(NAME_MISMATCH_MESSAGE));
        assert_eq!(err.jsons, Some(NAME_MISMATCH_MESSAGE));
    }

    #[test]
    fn test_pairing_after_sort() {
        let mut images = paths(&["/a/2.png", "/a/1.png"]);
        let mut jsons = paths(&["/b/1.json", "/b/2.json"]);
        sort_by_name(&mut images);
        sort_by_name(&mut jsons);

        let pairs = pair_files(&images, &jsons).unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].scan, PathBuf::from("/a/1.png"));
        assert_eq!(pairs[0].json, PathBuf::from("/b/1.json"));
        assert_eq!(file_names(&images), "1.png; 2.png");
    }

    #[test]
    fn test_upload_success_rule() {
        assert!(is_upload_successful(200, "Upload successful"));
        assert!(!is_upload_successful(200, WRONG_PASSWORD_RESPONSE));
        assert!(!is_upload_successful(500, "Upload successful"));
    }
}
